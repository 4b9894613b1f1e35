//! Remote Catalog Error Types

use derive_more::{Display, Error};

/// A remote catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant means the same thing to the gateway (fall back to the local
/// cache); the distinction is for logs and retries.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed.
    #[display("invalid remote client configuration")]
    Client,
    /// The request never produced a response.
    #[display("remote catalog unreachable")]
    Network,
    #[display("remote catalog timed out")]
    Timeout,
    /// The server answered with a non-2xx status.
    #[display("remote catalog responded with HTTP {_0}")]
    Status(#[error(not(source))] u16),
    /// The response body wasn't the expected JSON.
    #[display("unexpected response from remote catalog")]
    Decode,
    /// No remote catalog is configured, or it has been switched off.
    #[display("remote catalog unavailable")]
    Unavailable,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::Timeout | Self::Unavailable => true,
            Self::Status(status) => *status >= 500 || *status == 429,
            Self::Client | Self::Decode => false,
        }
    }
}
