//! Error types for the DDNS updater
//!
//! This module defines all error types used throughout the workspace.
//!
//! Resolution and fetch errors are fatal to a run. Per-record update errors
//! never propagate; they are carried inside [`crate::UpdateOutcome::Failed`].

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transport failure or non-2xx HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not well-formed
    #[error("Decode error: {0}")]
    Decode(String),

    /// No IPv4 literal could be found among the provider records
    #[error("Not found: {0}")]
    NotFound(String),

    /// An operand of the address comparison was not an IPv4 address
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Precondition violation (e.g. unknown selection mode on strict parse)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a type mismatch error
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error is a contract violation rather than a runtime condition
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::TypeMismatch(_) | Self::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
