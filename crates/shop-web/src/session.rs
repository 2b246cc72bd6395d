//! Session state for the storefront.
//!
//! Sessions live in an in-memory `tower-sessions` store and hold the CSRF
//! token, a one-shot flash message, the platform cart id and the last known
//! cart count. Nothing else about the cart is kept locally.

use serde::{Deserialize, Serialize};
use shop_core::CartId;
use subtle::ConstantTimeEq;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::error::Result;
use crate::state::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopfront_session";

/// Idle time before a session is dropped (one day).
const SESSION_INACTIVITY_SECONDS: i64 = 24 * 60 * 60;

/// Flash text for any failed action; details go to the log only.
pub const FAILED: &str = "failed";

/// Session keys.
pub mod keys {
    pub const CSRF_TOKEN: &str = "csrf_token";
    pub const FLASH: &str = "flash";
    pub const CART_ID: &str = "cart_id";
    pub const CART_COUNT: &str = "cart_count";
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AppConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_INACTIVITY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS class for the message box
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

/// A message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// The generic failure message
    pub fn failed() -> Self {
        Self::error(FAILED)
    }
}

/// The session's CSRF token, created on first use.
pub async fn csrf_token(session: &Session) -> Result<String> {
    if let Some(token) = session.get::<String>(keys::CSRF_TOKEN).await? {
        return Ok(token);
    }

    let token = uuid::Uuid::new_v4().simple().to_string();
    session.insert(keys::CSRF_TOKEN, &token).await?;
    Ok(token)
}

/// Compare a submitted token with the session's in constant time.
///
/// A session without a token rejects everything.
pub async fn verify_csrf(session: &Session, submitted: &str) -> Result<bool> {
    let Some(expected) = session.get::<String>(keys::CSRF_TOKEN).await? else {
        return Ok(false);
    };
    Ok(tokens_match(&expected, submitted))
}

fn tokens_match(expected: &str, submitted: &str) -> bool {
    !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(submitted.as_bytes()))
}

pub async fn set_flash(session: &Session, flash: Flash) -> Result<()> {
    session.insert(keys::FLASH, flash).await?;
    Ok(())
}

/// Read the flash message and clear it.
pub async fn take_flash(session: &Session) -> Result<Option<Flash>> {
    Ok(session.remove::<Flash>(keys::FLASH).await?)
}

pub async fn cart_id(session: &Session) -> Result<Option<CartId>> {
    Ok(session.get::<CartId>(keys::CART_ID).await?)
}

pub async fn set_cart_id(session: &Session, cart_id: &CartId) -> Result<()> {
    session.insert(keys::CART_ID, cart_id).await?;
    Ok(())
}

/// Last known number of items, for the header badge.
pub async fn cart_count(session: &Session) -> Result<u32> {
    Ok(session.get::<u32>(keys::CART_COUNT).await?.unwrap_or(0))
}

pub async fn set_cart_count(session: &Session, count: u32) -> Result<()> {
    session.insert(keys::CART_COUNT, count).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("abc123", "abc123"));
        assert!(!tokens_match("abc123", "abc124"));
        assert!(!tokens_match("abc123", "abc12"));
        assert!(!tokens_match("", ""));
    }

    #[tokio::test]
    async fn test_csrf_token_is_stable() {
        let session = session();
        let first = csrf_token(&session).await.unwrap();
        let second = csrf_token(&session).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(verify_csrf(&session, &first).await.unwrap());
        assert!(!verify_csrf(&session, "forged").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_without_token_rejects() {
        let session = session();
        assert!(!verify_csrf(&session, "").await.unwrap());
        assert!(!verify_csrf(&session, "anything").await.unwrap());
    }

    #[tokio::test]
    async fn test_flash_is_read_once() {
        let session = session();
        set_flash(&session, Flash::success("Added to cart")).await.unwrap();

        assert_eq!(
            take_flash(&session).await.unwrap(),
            Some(Flash::success("Added to cart"))
        );
        assert_eq!(take_flash(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cart_state_defaults() {
        let session = session();
        assert_eq!(cart_id(&session).await.unwrap(), None);
        assert_eq!(cart_count(&session).await.unwrap(), 0);

        let id = CartId::new("C0FFEE").unwrap();
        set_cart_id(&session, &id).await.unwrap();
        set_cart_count(&session, 4).await.unwrap();

        assert_eq!(cart_id(&session).await.unwrap(), Some(id));
        assert_eq!(cart_count(&session).await.unwrap(), 4);
    }
}
