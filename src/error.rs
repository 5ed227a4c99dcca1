//! Error types for Estate.

use thiserror::Error;

use crate::auth::{PasswordError, PolicyError, TokenError, ValidationError};

/// Common error type for Estate.
#[derive(Error, Debug)]
pub enum EstateError {
    /// Malformed or missing input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A unique field (e.g. email) is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing, invalid or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role may not perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected failure (task join, token encoding, ...).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for EstateError {
    fn from(e: sqlx::Error) -> Self {
        EstateError::Database(e.to_string())
    }
}

impl From<ValidationError> for EstateError {
    fn from(e: ValidationError) -> Self {
        EstateError::Validation(e.to_string())
    }
}

impl From<PasswordError> for EstateError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooShort | PasswordError::TooLong => {
                EstateError::Validation(e.to_string())
            }
            other => EstateError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for EstateError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encode(msg) => EstateError::Internal(msg),
            _ => EstateError::Unauthorized("Token is not valid".to_string()),
        }
    }
}

impl From<PolicyError> for EstateError {
    fn from(e: PolicyError) -> Self {
        match e {
            PolicyError::NotAuthenticated => EstateError::Unauthorized(e.to_string()),
            PolicyError::Forbidden(_) => EstateError::Forbidden(e.to_string()),
        }
    }
}

/// Result type alias for Estate operations.
pub type Result<T> = std::result::Result<T, EstateError>;
