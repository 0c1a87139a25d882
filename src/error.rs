//! Common error types for the render sweep gateway

use thiserror::Error;

/// Application-wide error type
///
/// Per-unit backend failures never reach this type: they are folded into
/// [`crate::backend::UnitOutcome::Skipped`] by the backend client.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
