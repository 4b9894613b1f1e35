//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Nothing is stored under the key
    #[display("key not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Access denied by the underlying medium
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Key contains characters that can't be safely mapped onto the medium
    #[display("invalid key: {_0:?}")]
    InvalidKey(#[error(not(source))] String),
    /// The medium refused the write because it ran out of space
    #[display("quota exceeded writing {key} ({needed} bytes, {limit} allowed)")]
    QuotaExceeded { key: String, needed: usize, limit: usize },
    /// The medium is not available at all (missing, disabled, locked)
    #[display("storage unavailable")]
    Unavailable,
    /// Backend-specific error
    #[display("backend error: {_0}")]
    Backend(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable | Self::Backend(_))
    }
}
