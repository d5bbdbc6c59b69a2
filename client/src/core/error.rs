//! # Common Error Types
//!
//! Consolidated error handling for the DMC client.
//!
//! Two layers:
//!
//! - [`ApiError`]: what went wrong talking to the remote service. Every
//!   accessor in [`crate::services::api`] returns it.
//! - [`AppError`]: what the application flows report to their caller. It wraps
//!   [`ApiError`] and adds local validation, state and configuration failures.
//!
//! ## Error Categories
//!
//! | variant | source | session effect |
//! |---|---|---|
//! | [`ApiError::Network`] | transport failure (DNS, refused, timeout) | none |
//! | [`ApiError::Unauthorized`] | HTTP 401 / 403 | fatal, session expires |
//! | [`ApiError::Application`] | other non-2xx, with a message payload | none |
//! | [`ApiError::Decode`] | 2xx body that does not match the schema | none |
//!
//! ## Usage Pattern
//!
//! ```rust
//! use dmc_client::core::error::{ApiError, AppError};
//!
//! fn validate_amount(amount: f64) -> Result<f64, AppError> {
//!     if amount <= 0.0 {
//!         return Err(AppError::Validation("Amount must be positive".to_string()));
//!     }
//!     Ok(amount)
//! }
//!
//! let err: AppError = ApiError::Unauthorized { status: 403 }.into();
//! assert!(err.is_auth());
//! ```

use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 401/403. Treated as fatal to the session everywhere.
    #[error("Authentication failed (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Any other non-2xx response. `message` comes from the body's `message`
    /// or `error` field, or the endpoint's default text.
    #[error("{message}")]
    Application { status: u16, message: String },

    /// A 2xx body that could not be decoded into the expected schema.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error terminates the session (HTTP 401/403).
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status } | ApiError::Application { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Application-wide error type for the client flows.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Input rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the current state (e.g. no pending login).
    #[error("State error: {0}")]
    State(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether the underlying failure was an authentication failure.
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Api(e) if e.is_auth())
    }
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
