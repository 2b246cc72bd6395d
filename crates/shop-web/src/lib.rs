//! # shop-web
//!
//! HTTP storefront for shopfront-rs.
//!
//! This crate provides:
//! - Axum router with HTML pages rendered by askama templates
//! - Cart actions backed by the platform's cart service
//! - Checkout hand-off to the hosted payment page
//! - Payment callback verification
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Category tree |
//! | GET | `/category/{id}` | Products in a category |
//! | GET | `/search?q=` | Search results |
//! | GET | `/product/{id}` | Product page |
//! | GET | `/cart` | Cart view |
//! | POST | `/cart/add` | Add to cart |
//! | POST | `/cart/update` | Change a line's quantity |
//! | POST | `/cart/clear` | Empty the cart |
//! | GET | `/checkout` | Redirect to the payment page |
//! | GET | `/payment/callback` | Payment notification |
//! | GET | `/health` | Health check |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use error::AppError;
pub use routes::create_router;
pub use state::{AppConfig, AppState, StoreSettings};
