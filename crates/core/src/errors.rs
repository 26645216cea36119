//! Core error types for the QRPass application.
//!
//! This module defines storage- and transport-agnostic error types. Diesel and
//! reqwest errors are converted to these types by the `storage-sqlite` and
//! `connect` crates.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the QRPass application.
///
/// Nothing in this enum is fatal to the process: the self QR controller turns
/// fetch failures into a published error string and keeps retrying.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Device is not verified: {0}")]
    NotVerified(String),

    #[error("Failed to parse payload: {0}")]
    Parse(String),

    #[error("Invalid QR token: {0}")]
    Token(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the server rejected the device rather than the request failing.
    pub fn is_not_verified(&self) -> bool {
        matches!(self, Error::NotVerified(_))
    }
}

/// Storage-agnostic error type for key-value persistence.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert Diesel/r2d2 errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Token(err.to_string())
    }
}
