//! # Shop Backend Trait
//!
//! The seam between the web layer and the remote platform. The web layer only
//! sees `Arc<dyn ShopBackend>`; the platform client implements it, and tests
//! substitute an in-memory fake.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ShopBackend (trait)                      │
//! │  ├── categories() / products() / search() / product()       │
//! │  ├── add_to_cart() / cart() / update_cart_line()            │
//! │  ├── clear_cart()            (default: one update per line) │
//! │  ├── checkout_form()                                        │
//! │  └── verify_notification()                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!                  │  PlatformClient   │
//!                  │  (shop-platform)  │
//!                  └───────────────────┘
//! ```

use crate::cart::{AddToCart, Cart, CartAddOutcome, CartId, ClearOutcome};
use crate::category::Category;
use crate::checkout::{PaymentForm, PaymentNotification};
use crate::error::ShopResult;
use crate::product::{Product, ProductPage, ShopLocale};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Products of one category, one page at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub category_id: String,
    /// 1-based
    pub page: u32,
    pub rows: u32,
    pub locale: ShopLocale,
}

/// Free-text product search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// 1-based
    pub page: u32,
    pub rows: u32,
    pub locale: ShopLocale,
}

/// Everything the storefront needs from the remote platform.
#[async_trait]
pub trait ShopBackend: Send + Sync {
    /// Category tree for a language.
    async fn categories(&self, lang: &str) -> ShopResult<Vec<Category>>;

    /// One page of products in a category.
    async fn products(&self, query: &ListingQuery) -> ShopResult<ProductPage>;

    /// One page of search results.
    async fn search(&self, query: &SearchQuery) -> ShopResult<ProductPage>;

    /// A single product with its description.
    async fn product(&self, product_id: &str, locale: &ShopLocale) -> ShopResult<Product>;

    /// Add a product, creating a cart when `request.cart_id` is `None`.
    async fn add_to_cart(&self, request: &AddToCart) -> ShopResult<CartAddOutcome>;

    /// List a cart's lines.
    async fn cart(&self, cart_id: &CartId, locale: &ShopLocale) -> ShopResult<Cart>;

    /// Set a line's quantity; zero removes the line.
    async fn update_cart_line(
        &self,
        cart_id: &CartId,
        item_id: &str,
        quantity: u32,
        locale: &ShopLocale,
    ) -> ShopResult<Cart>;

    /// Empty a cart by setting every line to zero, one call per line.
    ///
    /// Every line is attempted even after a failure, so a partial failure
    /// leaves a partially cleared cart. Only the initial listing is fatal.
    async fn clear_cart(&self, cart_id: &CartId, locale: &ShopLocale) -> ShopResult<ClearOutcome> {
        let cart = self.cart(cart_id, locale).await?;
        let mut outcome = ClearOutcome::default();

        for line in &cart.lines {
            outcome.attempted += 1;
            if let Err(err) = self.update_cart_line(cart_id, &line.item_id, 0, locale).await {
                warn!(
                    cart_id = %cart_id,
                    item_id = %line.item_id,
                    "Failed to clear cart line: {}",
                    err
                );
                outcome.failed += 1;
            }
        }

        Ok(outcome)
    }

    /// Form that hands the cart over to the hosted payment page.
    fn checkout_form(&self, cart_id: &CartId, locale: &ShopLocale) -> PaymentForm;

    /// Check a payment callback's signature.
    fn verify_notification(&self, notification: &PaymentNotification) -> bool;

    /// Backend name (for logging).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared backend (dynamic dispatch)
pub type BoxedShopBackend = Arc<dyn ShopBackend>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::error::ShopError;
    use crate::product::{Currency, Price};
    use std::sync::Mutex;

    /// Cart backend that records update calls and fails on chosen items
    struct RecordingBackend {
        lines: Vec<&'static str>,
        failing: Vec<&'static str>,
        updates: Mutex<Vec<(String, u32)>>,
    }

    impl RecordingBackend {
        fn new(lines: Vec<&'static str>, failing: Vec<&'static str>) -> Self {
            Self {
                lines,
                failing,
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ShopBackend for RecordingBackend {
        async fn categories(&self, _lang: &str) -> ShopResult<Vec<Category>> {
            Ok(Vec::new())
        }

        async fn products(&self, query: &ListingQuery) -> ShopResult<ProductPage> {
            Ok(ProductPage::new(Vec::new(), query.page))
        }

        async fn search(&self, query: &SearchQuery) -> ShopResult<ProductPage> {
            Ok(ProductPage::new(Vec::new(), query.page))
        }

        async fn product(&self, product_id: &str, _locale: &ShopLocale) -> ShopResult<Product> {
            Err(ShopError::NotFound(product_id.to_string()))
        }

        async fn add_to_cart(&self, _request: &AddToCart) -> ShopResult<CartAddOutcome> {
            Err(ShopError::Internal("unused".into()))
        }

        async fn cart(&self, cart_id: &CartId, locale: &ShopLocale) -> ShopResult<Cart> {
            let mut cart = Cart::new(cart_id.clone(), locale.currency);
            for item in &self.lines {
                cart.lines.push(CartLine {
                    item_id: item.to_string(),
                    product_id: format!("p{item}"),
                    name: item.to_string(),
                    unit_price: Price::new(1.0, Currency::USD),
                    quantity: 1,
                });
            }
            Ok(cart)
        }

        async fn update_cart_line(
            &self,
            cart_id: &CartId,
            item_id: &str,
            quantity: u32,
            locale: &ShopLocale,
        ) -> ShopResult<Cart> {
            self.updates
                .lock()
                .unwrap()
                .push((item_id.to_string(), quantity));
            if self.failing.iter().any(|f| *f == item_id) {
                return Err(ShopError::NetworkError("timeout".into()));
            }
            Ok(Cart::new(cart_id.clone(), locale.currency))
        }

        fn checkout_form(&self, _cart_id: &CartId, _locale: &ShopLocale) -> PaymentForm {
            PaymentForm::new("https://pay.example")
        }

        fn verify_notification(&self, _notification: &PaymentNotification) -> bool {
            false
        }

        fn backend_name(&self) -> &'static str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_clear_cart_updates_every_line_to_zero() {
        let backend = RecordingBackend::new(vec!["a", "b", "c"], vec![]);
        let id = CartId::new("cart-1").unwrap();

        let outcome = backend.clear_cart(&id, &ShopLocale::default()).await.unwrap();

        assert_eq!(outcome, ClearOutcome { attempted: 3, failed: 0 });
        let updates = backend.updates.lock().unwrap().clone();
        assert_eq!(
            updates,
            vec![("a".into(), 0), ("b".into(), 0), ("c".into(), 0)]
        );
    }

    #[tokio::test]
    async fn test_clear_cart_continues_after_failure() {
        let backend = RecordingBackend::new(vec!["a", "b", "c"], vec!["a"]);
        let id = CartId::new("cart-1").unwrap();

        let outcome = backend.clear_cart(&id, &ShopLocale::default()).await.unwrap();

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.failed, 1);
        assert_eq!(backend.updates.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_clear_empty_cart_issues_no_updates() {
        let backend = RecordingBackend::new(vec![], vec![]);
        let id = CartId::new("cart-1").unwrap();

        let outcome = backend.clear_cart(&id, &ShopLocale::default()).await.unwrap();

        assert_eq!(outcome.attempted, 0);
        assert!(backend.updates.lock().unwrap().is_empty());
    }
}
