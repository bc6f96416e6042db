//! Domain error types
//!
//! This module defines the error hierarchy for hospital-sync.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main hospital-sync error type
///
/// This is the primary error type used throughout the crate.
/// It wraps backend-specific errors and provides context for error handling.
#[derive(Debug, Error)]
pub enum HospitalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backing store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Validation errors (identifiers, record shape)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record not present at the addressed path
    #[error("Hospital not found: {0}")]
    NotFound(String),

    /// Subscription lifecycle errors
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Backing store errors
///
/// Errors that occur when talking to the realtime store. These errors don't
/// expose HTTP client types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Failed to reach the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Security rules rejected the request
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx other than permission denial)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body could not be understood
    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The live event stream ended or was cancelled by the server
    #[error("Event stream closed: {0}")]
    StreamClosed(String),

    /// Path could not be built from the supplied segments
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Failure injected by a test backend
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl StoreError {
    /// Whether the error came from the store's access rules
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied(_))
    }
}

impl From<std::io::Error> for HospitalError {
    fn from(err: std::io::Error) -> Self {
        HospitalError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HospitalError {
    fn from(err: serde_json::Error) -> Self {
        HospitalError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for HospitalError {
    fn from(err: toml::de::Error) -> Self {
        HospitalError::Configuration(format!("TOML parse error: {err}"))
    }
}
