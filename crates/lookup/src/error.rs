//! Lookup Error Types

use derive_more::{Display, Error};

/// A lookup error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid lookup client configuration")]
    Client,
    #[display("metadata provider unreachable")]
    Network,
    #[display("metadata provider responded with HTTP {_0}")]
    Status(#[error(not(source))] u16),
    #[display("unexpected response from metadata provider")]
    Decode,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network => true,
            Self::Status(status) => *status >= 500 || *status == 429,
            Self::Client | Self::Decode => false,
        }
    }
}
