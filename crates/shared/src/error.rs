//! Application-wide error types.

use serde_json::{Value, json};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// A required request field is missing or malformed.
    #[error("{0}")]
    MissingField(String),

    /// A path or query parameter could not be parsed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    ///
    /// Only storage failures surface as 500.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::MissingField(_) | Self::Validation(_) => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::MissingField(_) => "missing_field",
            Self::Validation(_) => "validation_error",
            Self::Database(_) => "internal_error",
        }
    }

    /// Returns the JSON body sent to clients.
    ///
    /// Server-side failures never leak their details.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let message = match self {
            Self::Database(_) => "An error occurred".to_string(),
            other => other.to_string(),
        };
        json!({ "error": self.error_code(), "message": message })
    }
}
