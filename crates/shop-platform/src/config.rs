//! # Platform Configuration
//!
//! Configuration for the remote platform integration.
//! All secrets are loaded from environment variables.

use chrono::Duration;
use shop_core::ShopError;
use std::env;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 60;
const DEFAULT_CATEGORY_TTL_SECS: u64 = 5 * 60;
/// Upper bound for any configured lifetime: one week
const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Platform API configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Seller account the storefront sells for
    pub seller_id: String,

    /// API key used to sign token requests
    pub api_key: String,

    /// Secret for payment callback signatures
    pub webhook_secret: String,

    /// API base URL, without trailing slash
    pub api_base_url: String,

    /// Hosted payment page the checkout form posts to
    pub payment_url: String,

    /// Per-request timeout for every outbound call
    pub timeout: std::time::Duration,

    /// How long an auth token is reused before a new login
    pub token_ttl: Duration,

    /// How long a category tree is reused per language
    pub category_ttl: Duration,
}

impl PlatformConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PLATFORM_SELLER_ID`
    /// - `PLATFORM_API_KEY`
    /// - `PLATFORM_WEBHOOK_SECRET`
    /// - `PLATFORM_API_URL`
    /// - `PLATFORM_PAYMENT_URL`
    ///
    /// Optional: `PLATFORM_TIMEOUT_SECS`, `PLATFORM_TOKEN_TTL_SECS`,
    /// `PLATFORM_CATEGORY_TTL_SECS`.
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let seller_id = required("PLATFORM_SELLER_ID")?;
        let api_key = required("PLATFORM_API_KEY")?;
        let webhook_secret = required("PLATFORM_WEBHOOK_SECRET")?;
        let api_base_url = required("PLATFORM_API_URL")?;
        let payment_url = required("PLATFORM_PAYMENT_URL")?;

        if !seller_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ShopError::Configuration(
                "PLATFORM_SELLER_ID must be numeric".to_string(),
            ));
        }

        for (name, url) in [
            ("PLATFORM_API_URL", &api_base_url),
            ("PLATFORM_PAYMENT_URL", &payment_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ShopError::Configuration(format!(
                    "{name} must be an http(s) URL"
                )));
            }
        }

        let timeout =
            request_timeout(optional_secs("PLATFORM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?)?;
        let token_ttl = ttl(
            "PLATFORM_TOKEN_TTL_SECS",
            optional_secs("PLATFORM_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
        )?;
        let category_ttl = ttl(
            "PLATFORM_CATEGORY_TTL_SECS",
            optional_secs("PLATFORM_CATEGORY_TTL_SECS", DEFAULT_CATEGORY_TTL_SECS)?,
        )?;

        Ok(Self {
            seller_id,
            api_key,
            webhook_secret,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            payment_url,
            timeout,
            token_ttl,
            category_ttl,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        seller_id: impl Into<String>,
        api_key: impl Into<String>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            seller_id: seller_id.into(),
            api_key: api_key.into(),
            webhook_secret: webhook_secret.into(),
            api_base_url: "http://localhost".to_string(),
            payment_url: "http://localhost/pay".to_string(),
            timeout: std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_ttl: Duration::minutes(30),
            category_ttl: Duration::minutes(5),
        }
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set hosted payment page URL
    pub fn with_payment_url(mut self, url: impl Into<String>) -> Self {
        self.payment_url = url.into();
        self
    }

    /// Builder: set token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Builder: set category cache lifetime
    pub fn with_category_ttl(mut self, ttl: Duration) -> Self {
        self.category_ttl = ttl;
        self
    }
}

fn required(name: &str) -> Result<String, ShopError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ShopError::Configuration(format!("{name} not set"))),
    }
}

fn optional_secs(name: &str, default: u64) -> Result<u64, ShopError> {
    match env::var(name) {
        Ok(value) => parse_secs(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<u64, ShopError> {
    raw.trim()
        .parse()
        .map_err(|_| ShopError::Configuration(format!("{name} must be a number of seconds")))
}

fn request_timeout(secs: u64) -> Result<std::time::Duration, ShopError> {
    if secs == 0 {
        return Err(ShopError::Configuration(
            "PLATFORM_TIMEOUT_SECS must be greater than zero".to_string(),
        ));
    }
    Ok(std::time::Duration::from_secs(secs))
}

/// Cache lifetime in seconds; zero and anything past a week are rejected
fn ttl(name: &str, secs: u64) -> Result<Duration, ShopError> {
    let out_of_range =
        || ShopError::Configuration(format!("{name} must be between 1 and {MAX_TTL_SECS} seconds"));

    if secs == 0 || secs > MAX_TTL_SECS {
        return Err(out_of_range());
    }
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlatformConfig::new("12345", "key", "secret");
        assert_eq!(config.timeout, std::time::Duration::from_secs(15));
        assert_eq!(config.token_ttl, Duration::minutes(30));
        assert_eq!(config.category_ttl, Duration::minutes(5));
    }

    #[test]
    fn test_default_ttls_match_constants() {
        let config = PlatformConfig::new("12345", "key", "secret");
        assert_eq!(config.token_ttl.num_seconds() as u64, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.category_ttl.num_seconds() as u64, DEFAULT_CATEGORY_TTL_SECS);
    }

    #[test]
    fn test_ttl_bounds() {
        assert_eq!(ttl("T", 90).unwrap(), Duration::seconds(90));
        assert_eq!(ttl("T", MAX_TTL_SECS).unwrap(), Duration::weeks(1));

        for secs in [0, MAX_TTL_SECS + 1, u64::MAX, i64::MAX as u64 + 1] {
            assert!(
                matches!(ttl("T", secs), Err(ShopError::Configuration(_))),
                "{secs} accepted"
            );
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(matches!(request_timeout(0), Err(ShopError::Configuration(_))));
        assert_eq!(request_timeout(15).unwrap(), std::time::Duration::from_secs(15));
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("T", " 60 ").unwrap(), 60);
        assert!(parse_secs("T", "-5").is_err());
        assert!(parse_secs("T", "soon").is_err());
        assert!(parse_secs("T", "99999999999999999999999").is_err());
    }

    #[test]
    fn test_url_joining() {
        let config =
            PlatformConfig::new("12345", "key", "secret").with_api_base_url("https://api.example/");
        assert_eq!(config.url("/api/categories"), "https://api.example/api/categories");
        assert_eq!(
            config.url("xml/shop_cart_add.asp"),
            "https://api.example/xml/shop_cart_add.asp"
        );
    }

    #[test]
    fn test_from_env_missing_key() {
        // Clear any existing env vars
        env::remove_var("PLATFORM_SELLER_ID");

        let result = PlatformConfig::from_env();
        assert!(result.is_err());
    }
}
