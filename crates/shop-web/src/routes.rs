//! # Routes
//!
//! Axum router configuration for the storefront.

use crate::handlers;
use crate::session::create_session_layer;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes:
/// - Pages:
///   - GET /                 - Category tree (old `?page=` URLs redirect)
///   - GET /category/{id}    - Products in a category (`?page=N`)
///   - GET /search           - Search results (`?q=..&page=N`)
///   - GET /product/{id}     - Product page
///   - GET /cart             - Cart view
///
/// - Cart actions (form POST with `csrf_token`):
///   - POST /cart/add
///   - POST /cart/update
///   - POST /cart/clear
///
/// - Checkout:
///   - GET /checkout         - Auto-submitting form to the payment page
///   - GET /payment/callback - Signed payment notification
pub fn create_router(state: AppState) -> Router {
    let session_layer = create_session_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::home))
        .route("/category/{category_id}", get(handlers::category))
        .route("/search", get(handlers::search))
        .route("/product/{product_id}", get(handlers::product))
        .route("/cart", get(handlers::cart_view))
        .route("/cart/add", post(handlers::cart_add))
        .route("/cart/update", post(handlers::cart_update))
        .route("/cart/clear", post(handlers::cart_clear))
        .route("/checkout", get(handlers::checkout))
        .route("/payment/callback", get(handlers::payment_callback))
        // Middleware
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
