//! # Platform Client
//!
//! HTTP client for the remote platform. Holds the two pieces of cross-request
//! state the storefront keeps: the auth token and the per-language category
//! tree. Both expire on a clock injected at construction.

use crate::checkout::payment_form;
use crate::config::PlatformConfig;
use crate::webhook::verify_notification;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde_json::Value;
use shop_core::{
    AddToCart, Cart, CartAddOutcome, CartId, Category, ListingQuery, PaymentForm,
    PaymentNotification, Product, ProductPage, SearchQuery, SharedClock, ShopBackend, ShopError,
    ShopLocale, ShopResult, SystemClock, TtlCache,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// A token and the moment it stops being reused
#[derive(Debug, Clone)]
pub(crate) struct CachedToken {
    pub(crate) value: String,
    pub(crate) expires_at: DateTime<Utc>,
}

/// Client for the platform's catalog, cart and auth endpoints
pub struct PlatformClient {
    pub(crate) config: PlatformConfig,
    pub(crate) http: Client,
    pub(crate) clock: SharedClock,
    pub(crate) token: Mutex<Option<CachedToken>>,
    pub(crate) categories: TtlCache<String, Vec<Category>>,
}

impl PlatformClient {
    /// Create a client on the wall clock
    pub fn new(config: PlatformConfig) -> ShopResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client whose caches expire on the given clock
    pub fn with_clock(config: PlatformConfig, clock: SharedClock) -> ShopResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShopError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        let categories = TtlCache::new(config.category_ttl);

        Ok(Self {
            config,
            http,
            clock,
            token: Mutex::new(None),
            categories,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        let config = PlatformConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// GET a JSON endpoint
    pub(crate) async fn get_json(&self, path: &str, query: &[(&str, String)]) -> ShopResult<Value> {
        let url = self.config.url(path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        read_json(response).await
    }

    /// POST a JSON body, answered with JSON
    pub(crate) async fn post_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> ShopResult<Value> {
        let url = self.config.url(path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        read_json(response).await
    }

    /// POST a form-encoded body, answered with JSON
    pub(crate) async fn post_form(&self, path: &str, form: &[(&str, String)]) -> ShopResult<Value> {
        let url = self.config.url(path);
        debug!("POST {} (form)", url);

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        read_json(response).await
    }
}

async fn read_json(response: Response) -> ShopResult<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ShopError::NetworkError(e.to_string()))?;

    if !status.is_success() {
        error!("Platform API error: status={}, body={}", status, body);
        return Err(ShopError::provider(
            status.as_u16().to_string(),
            format!("HTTP {status}"),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        ShopError::MalformedResponse(format!("Failed to parse platform response: {e}"))
    })
}

/// Fail on a non-zero `retval` (JSON API endpoints)
pub(crate) fn check_retval(body: &Value) -> ShopResult<()> {
    let code = match body.get("retval") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };

    if code.is_empty() || code == "0" {
        return Ok(());
    }

    let message = ["retdesc", "desc", "message"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .unwrap_or("request rejected");
    Err(ShopError::provider(code, message))
}

/// Fail on a non-empty `cart_err` (cart endpoints)
pub(crate) fn check_cart_err(body: &Value) -> ShopResult<()> {
    let message = match body.get("cart_err") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    };

    if message.is_empty() || message == "0" {
        return Ok(());
    }

    let code = body
        .get("cart_err_num")
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "cart".to_string());
    Err(ShopError::provider(code, message))
}

#[async_trait]
impl ShopBackend for PlatformClient {
    async fn categories(&self, lang: &str) -> ShopResult<Vec<Category>> {
        self.fetch_categories(lang).await
    }

    async fn products(&self, query: &ListingQuery) -> ShopResult<ProductPage> {
        self.fetch_products(query).await
    }

    async fn search(&self, query: &SearchQuery) -> ShopResult<ProductPage> {
        self.search_products(query).await
    }

    async fn product(&self, product_id: &str, locale: &ShopLocale) -> ShopResult<Product> {
        self.fetch_product(product_id, locale).await
    }

    async fn add_to_cart(&self, request: &AddToCart) -> ShopResult<CartAddOutcome> {
        self.cart_add(request).await
    }

    async fn cart(&self, cart_id: &CartId, locale: &ShopLocale) -> ShopResult<Cart> {
        self.cart_list(cart_id, locale).await
    }

    async fn update_cart_line(
        &self,
        cart_id: &CartId,
        item_id: &str,
        quantity: u32,
        locale: &ShopLocale,
    ) -> ShopResult<Cart> {
        self.cart_update(cart_id, item_id, quantity, locale).await
    }

    fn checkout_form(&self, cart_id: &CartId, locale: &ShopLocale) -> PaymentForm {
        payment_form(&self.config, cart_id, locale)
    }

    fn verify_notification(&self, notification: &PaymentNotification) -> bool {
        if notification.seller_id != self.config.seller_id {
            debug!("Callback for foreign seller: {}", notification.seller_id);
            return false;
        }
        verify_notification(&self.config.webhook_secret, notification)
    }

    fn backend_name(&self) -> &'static str {
        "platform"
    }
}
