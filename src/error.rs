//! Error types for airmodel
//!
//! This module defines the error hierarchy for the entire library.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for airmodel
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // Validation Errors (raised before any network call)
    // ============================================================================
    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("Record '{id}' not found")]
    RecordNotFound { id: String },

    #[error("Airtable API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a record-not-found error
    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound { id: id.into() }
    }

    /// Create an API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } => true,
            Error::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for airmodel
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::validation("email", "unknown field");
        assert_eq!(
            err.to_string(),
            "Validation error for field 'email': unknown field"
        );

        let err = Error::record_not_found("recABC");
        assert_eq!(err.to_string(), "Record 'recABC' not found");

        let err = Error::api(422, "Unknown field name", "{}");
        assert_eq!(
            err.to_string(),
            "Airtable API error (HTTP 422): Unknown field name"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 30
        }
        .is_retryable());
        assert!(Error::api(429, "", "").is_retryable());
        assert!(Error::api(500, "", "").is_retryable());
        assert!(Error::api(503, "", "").is_retryable());

        assert!(!Error::api(400, "", "").is_retryable());
        assert!(!Error::api(404, "", "").is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::validation("f", "bad").is_retryable());
    }
}
