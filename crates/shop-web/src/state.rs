//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the shop backend, server configuration and store presentation
//! settings.

use serde::Deserialize;
use shop_core::{BoxedShopBackend, Currency, ShopLocale};
use shop_platform::PlatformClient;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; `https://` turns on secure cookies
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}: {}", addr, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Store presentation settings (`config/storefront.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Shown in the header and page titles
    pub title: String,
    /// Language tag sent to the platform
    pub lang: String,
    /// Display and billing currency
    pub currency: Currency,
    /// Products per listing page
    pub page_size: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            title: "Shopfront".to_string(),
            lang: "en-US".to_string(),
            currency: Currency::USD,
            page_size: 20,
        }
    }
}

impl StoreSettings {
    /// Parse settings from TOML text; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(content)?;
        settings.page_size = settings.page_size.clamp(1, 100);
        Ok(settings)
    }

    /// Load from the first config file found, or defaults
    pub fn load() -> anyhow::Result<Self> {
        let config_paths = [
            "config/storefront.toml",
            "../config/storefront.toml",
            "../../config/storefront.toml",
        ];

        for path in config_paths {
            if let Ok(content) = std::fs::read_to_string(path) {
                let settings = Self::from_toml_str(&content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
                tracing::info!("Loaded store settings from {}", path);
                return Ok(settings);
            }
        }

        tracing::warn!("No store settings found, using defaults");
        Ok(Self::default())
    }

    pub fn locale(&self) -> ShopLocale {
        ShopLocale::new(self.lang.clone(), self.currency)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Remote shop the storefront proxies
    pub backend: BoxedShopBackend,
    /// Application config
    pub config: Arc<AppConfig>,
    /// Presentation settings
    pub store: Arc<StoreSettings>,
}

impl AppState {
    pub fn new(backend: BoxedShopBackend, config: AppConfig, store: StoreSettings) -> Self {
        Self {
            backend,
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Build state from the environment with the platform backend
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let store = StoreSettings::load()?;

        let client = PlatformClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize platform client: {}", e))?;

        Ok(Self::new(Arc::new(client), config, store))
    }

    /// Locale used for every platform call
    pub fn locale(&self) -> ShopLocale {
        self.store.locale()
    }
}
