//! # shop-platform
//!
//! Backend for shopfront-rs that talks to the hosted e-commerce platform.
//!
//! The platform owns the catalog, the carts and the payment page. This crate
//! wraps its REST and form endpoints behind [`shop_core::ShopBackend`]:
//!
//! - **Catalog**: category tree (cached per language), listings with a
//!   seller-goods fallback, search and product detail
//! - **Cart**: add, list and per-line updates keyed by the platform cart id
//! - **Checkout**: the hidden form posted to the hosted payment page
//! - **Callback**: HMAC verification of payment notifications
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_platform::PlatformClient;
//! use shop_core::{ShopBackend, ShopLocale};
//!
//! let client = PlatformClient::from_env()?;
//! let tree = client.categories("en-US").await?;
//! let product = client.product("3012", &ShopLocale::default()).await?;
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod normalize;
pub mod webhook;

// Re-exports
pub use auth::login_signature;
pub use checkout::payment_form;
pub use client::PlatformClient;
pub use config::PlatformConfig;
pub use webhook::{canonical_string, sign_notification, verify_notification};
