//! Error types for the invoicing core.

use std::fmt;

/// Result type for invoicing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the invoicing core.
///
/// All fallible operations return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`. Different variants represent different
/// failure modes:
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting records to stored bytes.
    ///
    /// This occurs when a record's `Serde` implementation fails.
    SerializationError(String),

    /// Deserialization failed when converting stored bytes to records.
    ///
    /// This indicates corrupted or malformed data in the store. The read of
    /// that collection is fatal: no truncation or partial recovery is
    /// attempted, since that could silently lose data.
    DeserializationError(String),

    /// A save-time or input validation rule was violated.
    ///
    /// Raised when an invoice is saved with no customer selected or an
    /// empty item list, or when the selected customer no longer exists.
    /// No state is mutated.
    ValidationError(String),

    /// Registration attempted with an email that already exists.
    ///
    /// Emails are compared by exact string equality; no normalization is
    /// applied.
    DuplicateEmail,

    /// Login failed: no user matched the supplied credentials.
    ///
    /// Intentionally generic. Whether the email was unknown or the password
    /// wrong is not disclosed.
    InvalidCredentials,

    /// Backend storage error (file system, remote store, etc).
    ///
    /// This indicates the storage backend is unavailable or returned an
    /// error.
    BackendError(String),

    /// External insight provider error.
    ///
    /// Raised by the low-level provider call. Public summarization entry
    /// points convert this to a fixed fallback message; it is never
    /// surfaced as a hard failure.
    ProviderError(String),

    /// Configuration error during initialization.
    ///
    /// Common causes: a required environment variable is missing or holds
    /// an unusable value.
    ConfigError(String),

    /// Password hashing or verification machinery failed.
    ///
    /// Distinct from [`Error::InvalidCredentials`]: this is an internal
    /// failure (e.g. a stored hash that does not parse), not a mismatch.
    CryptoError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::DuplicateEmail => write!(f, "Email already exists"),
            Error::InvalidCredentials => write!(f, "Invalid credentials"),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::CryptoError(msg) => write!(f, "Crypto error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
