//! Top-level error handling for page handlers.
//!
//! Action handlers turn backend failures into a flash message and a redirect.
//! What reaches `AppError` is a failure to render a page at all; it is logged
//! and answered with the generic error page.

use crate::views::ErrorTemplate;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use shop_core::ShopError;
use thiserror::Error;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Page does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Shop(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the visitor; details stay in the log
    fn public_message(&self) -> &'static str {
        match self.status() {
            StatusCode::NOT_FOUND => "The page you were looking for does not exist.",
            StatusCode::BAD_REQUEST => "The request could not be understood.",
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
                "The shop is temporarily unavailable. Please try again later."
            }
            _ => "Something went wrong.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let page = ErrorTemplate {
            status: status.as_u16(),
            message: self.public_message().to_string(),
        };

        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!("Failed to render error page: {}", err);
                (status, self.public_message()).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
