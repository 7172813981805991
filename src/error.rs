// src/error.rs

//! Unified error handling for the review crawler.

use actix_web::HttpResponse;
use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Store listing URL does not match the expected format
    #[error("Invalid store URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Bearer token could not be extracted from the listing page
    #[error("Token acquisition failed: {0}")]
    TokenAcquisition(String),

    /// Rate-limit retries exhausted
    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Reviews endpoint answered with a non-success status
    #[error("Review fetch failed with status {status}")]
    Fetch { status: u16 },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Review date could not be parsed
    #[error("Date parse error: {0}")]
    Date(#[from] chrono::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed store response payload
    #[error("Store response error for {context}: {message}")]
    StoreResponse { context: String, message: String },
}

impl AppError {
    /// Create an invalid-URL error.
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a token acquisition error.
    pub fn token(message: impl Into<String>) -> Self {
        Self::TokenAcquisition(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a store response error with context.
    pub fn store_response(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreResponse {
            context: context.into(),
            message: message.into(),
        }
    }
}

// Anything escaping the batch boundary becomes a server fault.
impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "detail": self.to_string(),
        }))
    }
}
