//! # Shopfront RS
//!
//! Storefront for a hosted e-commerce platform.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PLATFORM_SELLER_ID=100500
//! export PLATFORM_API_KEY=...
//! export PLATFORM_WEBHOOK_SECRET=...
//! export PLATFORM_API_URL=https://api.platform.example
//! export PLATFORM_PAYMENT_URL=https://pay.platform.example/asp2/pay.asp
//!
//! # Run the server
//! shopfront
//! ```

use shop_web::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::from_env()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Store: {} ({}, {})", state.store.title, state.store.lang, state.store.currency);
    info!("Backend: {}", state.backend.backend_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Shopfront starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Payment callback: GET http://{}/payment/callback", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` overrides the level.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
  Shopfront RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Storefront for a hosted shop
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
