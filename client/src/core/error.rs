//! # Common Error Types
//!
//! Consolidated error handling for the client state layer.
//!
//! ## Error Categories
//!
//! - **Api**: The gateway answered but the answer is unusable (missing payload)
//! - **Transport**: Network failures and malformed responses
//! - **Storage**: Key-value store reads/writes (file I/O, corrupt records)
//! - **Validation**: Input rejected before any network call
//! - **Config**: Invalid environment configuration
//!
//! Expected domain failures (bad credentials, insufficient balance) are *not*
//! errors at this level: they arrive as an envelope with `success: false` and
//! the stores surface the message through their `error` field.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use client::core::error::AppError;
//!
//! fn validate_amount(amount: f64) -> Result<f64, AppError> {
//!     if amount <= 0.0 {
//!         return Err(AppError::Validation("Amount must be greater than 0".to_string()));
//!     }
//!     Ok(amount)
//! }
//! ```

use thiserror::Error;

/// Application-wide error type for the client state layer.
///
/// # Example
///
/// ```rust
/// use client::core::error::AppError;
///
/// let api_err = AppError::Api("Missing payload".to_string());
/// let validation_err = AppError::Validation("Amount must be greater than 0".to_string());
///
/// assert_eq!(api_err.to_string(), "API error: Missing payload");
/// assert_eq!(validation_err.to_string(), "Validation error: Amount must be greater than 0");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Gateway answered with something the client cannot use.
    #[error("API error: {0}")]
    Api(String),

    /// Network failure (connection refused, timeout, DNS) or a response body
    /// that is not a valid envelope.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Persistent key-value store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input validation error.
    ///
    /// Raised before any network call:
    /// - Missing required fields (email, password, names)
    /// - Invalid format (email)
    /// - Out of range values (non-positive amounts)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error (invalid environment variable).
    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// True for failures that say nothing about the user's request
    /// (network down, bad response). Used to pick the generic message.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

/// Convenience type alias for `Result<T, AppError>`.
///
/// ```rust
/// use client::core::error::Result;
///
/// fn operation() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Transport(format!("Failed to parse response: {}", err))
        } else {
            AppError::Transport(format!("Network error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("Corrupt record: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
