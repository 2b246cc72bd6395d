//! # Token Acquisition
//!
//! Authenticated endpoints take a short-lived token obtained by a signed
//! login: `sign = hex(sha256(api_key || timestamp))`. The token is reused for
//! a fixed interval and then fetched again.

use crate::client::{check_retval, CachedToken, PlatformClient};
use crate::normalize::string_field;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use shop_core::{ShopError, ShopResult};
use tracing::{info, instrument};

/// Signature for a login request at `timestamp` (unix seconds)
pub fn login_signature(api_key: &str, timestamp: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

impl PlatformClient {
    /// Current auth token, logging in when none is cached or it has expired.
    ///
    /// Logins are serialized: concurrent callers wait for one login and share
    /// its token.
    #[instrument(skip(self))]
    pub async fn token(&self) -> ShopResult<String> {
        let mut slot = self.token.lock().await;
        let now = self.now();

        if let Some(cached) = slot.as_ref() {
            if now < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        let value = self.login(now.timestamp()).await?;
        *slot = Some(CachedToken {
            value: value.clone(),
            expires_at: now + self.config.token_ttl,
        });

        Ok(value)
    }

    /// Drop the cached token so the next call logs in again
    pub async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    async fn login(&self, timestamp: i64) -> ShopResult<String> {
        let seller_id = self
            .config
            .seller_id
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(self.config.seller_id.clone()));

        let body = json!({
            "seller_id": seller_id,
            "timestamp": timestamp,
            "sign": login_signature(&self.config.api_key, timestamp),
        });

        let response = self.post_json("api/apilogin", &[], &body).await?;
        check_retval(&response).map_err(|e| ShopError::AuthFailed(e.to_string()))?;

        let token = string_field(&response, &["token"])
            .ok_or_else(|| ShopError::AuthFailed("Login response has no token".to_string()))?;

        info!("Obtained platform token");
        Ok(token)
    }
}
