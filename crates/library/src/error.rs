//! Library Error Types
//!
//! The gateway itself never fails: remote and storage failures are recovered
//! locally and only surface as [`SyncMeta::fallback_used`](crate::SyncMeta).
//! What remains are errors raised for the presentation layer to show.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// User input was rejected; the error tree carries the individual
    /// [`validate`](crate::validate) failures.
    #[display("invalid input")]
    Validation,
    /// A record referenced by identifier does not exist locally.
    #[display("no {_0} with id {_1}")]
    NotFound(#[error(not(source))] &'static str, #[error(not(source))] u64),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Neither kind depends on the remote catalog, so the same call fails the
    /// same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation | Self::NotFound(..) => false,
        }
    }
}
