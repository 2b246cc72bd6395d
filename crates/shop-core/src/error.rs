//! # Shop Error Types
//!
//! Typed error handling for storefront backend operations.
//! Every call into the remote platform returns `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all backend operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network/HTTP error communicating with the platform
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The platform answered with a non-zero return code
    #[error("Platform error [{code}]: {message}")]
    ProviderError { code: String, message: String },

    /// Token acquisition failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Product or category not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Shorthand for a platform return-code failure
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        ShopError::ProviderError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Configuration(_) => 500,
            ShopError::InvalidRequest(_) => 400,
            ShopError::NetworkError(_) => 503,
            ShopError::ProviderError { .. } => 502,
            ShopError::AuthFailed(_) => 502,
            ShopError::MalformedResponse(_) => 502,
            ShopError::NotFound(_) => 404,
            ShopError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for backend operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ShopError::InvalidRequest("test".into()).status_code(), 400);
        assert_eq!(ShopError::NotFound("p-1".into()).status_code(), 404);
        assert_eq!(ShopError::provider("1", "nope").status_code(), 502);
        assert_eq!(ShopError::NetworkError("timeout".into()).status_code(), 503);
    }

    #[test]
    fn test_provider_display() {
        let err = ShopError::provider("2", "cart not found");
        assert_eq!(err.to_string(), "Platform error [2]: cart not found");
    }

    #[test]
    fn test_from_json_error() {
        let err: ShopError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ShopError::MalformedResponse(_)));
    }
}
