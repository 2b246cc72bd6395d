//! # shop-core
//!
//! Core types and traits for the shopfront storefront proxy.
//!
//! This crate provides:
//! - `ShopBackend` trait the web layer calls into
//! - `Category`, `Product`, `Price`, `Currency` for the catalog
//! - `Cart`, `CartLine`, `CartId` for the remote cart
//! - `PaymentForm` and `PaymentNotification` for checkout
//! - `TtlCache` and `Clock` for expiring in-memory state
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{AddToCart, ShopBackend, ShopLocale, Currency};
//!
//! let locale = ShopLocale::new("en-US", Currency::USD);
//! let outcome = backend
//!     .add_to_cart(&AddToCart {
//!         product_id: "3012".into(),
//!         quantity: 1,
//!         cart_id: None,
//!         locale: locale.clone(),
//!     })
//!     .await?;
//!
//! // Hand the cart to the hosted payment page
//! let form = backend.checkout_form(&outcome.cart_id, &locale);
//! ```

pub mod backend;
pub mod cache;
pub mod cart;
pub mod category;
pub mod checkout;
pub mod error;
pub mod product;

// Re-exports for convenience
pub use backend::{BoxedShopBackend, ListingQuery, SearchQuery, ShopBackend};
pub use cache::{Clock, ManualClock, SharedClock, SystemClock, TtlCache};
pub use cart::{AddToCart, Cart, CartAddOutcome, CartId, CartLine, ClearOutcome};
pub use category::{find_category, Category, LocalizedName, LocalizedValue};
pub use checkout::{PaymentForm, PaymentNotification};
pub use error::{ShopError, ShopResult};
pub use product::{Currency, Price, Product, ProductPage, ShopLocale};
