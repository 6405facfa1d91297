//! Error types for the bank service
//!
//! This module provides a unified error handling system for all crates in
//! the workspace. Core errors are always returned as typed results; only the
//! API gateway maps them to transport status codes and messages.

use std::fmt::Display;
use thiserror::Error;

/// Bank service error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error when an account cannot be found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Error when a transfer request is malformed (self-transfer,
    /// non-positive amount)
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),

    /// Error when an account has insufficient funds for a debit
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Error when a token fails signature or structural checks
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Error when a token is past its expiration instant
    #[error("Token expired: {0}")]
    TokenExpired(String),

    /// Error when a transfer was aborted after its debit leg and the debit
    /// was compensated
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// Error when the acting identity does not own the target resource
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Error when a storage call exceeded its deadline
    #[error("Storage timeout: {0}")]
    StorageTimeout(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::AccountNotFound(msg) => {
                    Error::AccountNotFound(format!("{}: {}", context, msg))
                }
                Error::InvalidTransfer(msg) => {
                    Error::InvalidTransfer(format!("{}: {}", context, msg))
                }
                Error::InsufficientFunds(msg) => {
                    Error::InsufficientFunds(format!("{}: {}", context, msg))
                }
                Error::InvalidToken(msg) => Error::InvalidToken(format!("{}: {}", context, msg)),
                Error::TokenExpired(msg) => Error::TokenExpired(format!("{}: {}", context, msg)),
                Error::TransferFailed(msg) => {
                    Error::TransferFailed(format!("{}: {}", context, msg))
                }
                Error::AuthorizationError(msg) => {
                    Error::AuthorizationError(format!("{}: {}", context, msg))
                }
                Error::ValidationError(msg) => {
                    Error::ValidationError(format!("{}: {}", context, msg))
                }
                Error::ConfigurationError(msg) => {
                    Error::ConfigurationError(format!("{}: {}", context, msg))
                }
                Error::StorageTimeout(msg) => {
                    Error::StorageTimeout(format!("{}: {}", context, msg))
                }
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                Error::Database(e) => Error::Database(e),
                Error::Serialization(e) => Error::Serialization(e),
            }
        })
    }
}

/// Convert string messages into an error
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Internal(message)
    }
}

/// Convert static string references into an error
impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Internal(message.to_string())
    }
}
