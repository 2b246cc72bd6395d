//! # Cart Endpoints
//!
//! Pass-through calls to the platform's cart service. Requests are
//! form-encoded and answered with JSON carrying a `cart_err` field.

use crate::client::{check_cart_err, PlatformClient};
use crate::normalize::{normalize_cart, string_field, u32_field};
use shop_core::{AddToCart, Cart, CartAddOutcome, CartId, ShopError, ShopLocale, ShopResult};
use tracing::{info, instrument};

const CART_ADD_PATH: &str = "xml/shop_cart_add.asp";
const CART_LIST_PATH: &str = "xml/shop_cart_lst.asp";

impl PlatformClient {
    /// Add a product; the platform creates a cart when no `cart_uid` is sent
    #[instrument(
        skip(self, request),
        fields(product_id = %request.product_id, quantity = request.quantity)
    )]
    pub async fn cart_add(&self, request: &AddToCart) -> ShopResult<CartAddOutcome> {
        if request.quantity == 0 {
            return Err(ShopError::InvalidRequest("Quantity must be at least 1".to_string()));
        }

        let mut form = vec![
            ("product_id", request.product_id.clone()),
            ("product_cnt", request.quantity.to_string()),
            ("typecurr", request.locale.currency.as_str().to_string()),
            ("lang", request.locale.lang.clone()),
        ];
        if let Some(cart_id) = &request.cart_id {
            form.push(("cart_uid", cart_id.as_str().to_string()));
        }

        let body = self.post_form(CART_ADD_PATH, &form).await?;
        check_cart_err(&body)?;

        let cart_id = string_field(&body, &["cart_uid"])
            .and_then(CartId::new)
            .or_else(|| request.cart_id.clone())
            .ok_or_else(|| {
                ShopError::MalformedResponse("Cart add returned no cart_uid".to_string())
            })?;

        let count = u32_field(&body, &["cart_cnt"]);

        info!("Added to cart {}: count={:?}", cart_id, count);
        Ok(CartAddOutcome { cart_id, count })
    }

    /// List a cart
    #[instrument(skip(self, locale))]
    pub async fn cart_list(&self, cart_id: &CartId, locale: &ShopLocale) -> ShopResult<Cart> {
        let form = [
            ("cart_uid", cart_id.as_str().to_string()),
            ("cur", locale.currency.as_str().to_string()),
            ("lang", locale.lang.clone()),
        ];

        let body = self.post_form(CART_LIST_PATH, &form).await?;
        check_cart_err(&body)?;

        Ok(normalize_cart(&body, cart_id, locale.currency))
    }

    /// Set one line's quantity; the platform drops lines set to zero
    #[instrument(skip(self, locale))]
    pub async fn cart_update(
        &self,
        cart_id: &CartId,
        item_id: &str,
        quantity: u32,
        locale: &ShopLocale,
    ) -> ShopResult<Cart> {
        let form = [
            ("cart_uid", cart_id.as_str().to_string()),
            ("item_id", item_id.to_string()),
            ("product_cnt", quantity.to_string()),
            ("cur", locale.currency.as_str().to_string()),
            ("lang", locale.lang.clone()),
        ];

        let body = self.post_form(CART_LIST_PATH, &form).await?;
        check_cart_err(&body)?;

        Ok(normalize_cart(&body, cart_id, locale.currency))
    }
}
