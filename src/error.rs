//! CLI Error Types

use derive_more::{Display, Error};

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Configuration could not be loaded.
    #[display("could not load configuration")]
    Config,
    /// The local cache could not be opened.
    #[display("could not open the local cache")]
    Storage,
    /// An HTTP client could not be built.
    #[display("could not set up the {_0} client")]
    Client(#[error(not(source))] &'static str),
    /// The record to act on does not exist.
    #[display("nothing to {_0}")]
    NotFound(#[error(not(source))] &'static str),
    /// Input was rejected; details were printed already.
    #[display("{_0}")]
    Rejected(#[error(not(source))] String),
    /// A lookup result was requested that doesn't exist.
    #[display("no lookup result #{_0} (found {_1})")]
    NoSuchCandidate(#[error(not(source))] usize, #[error(not(source))] usize),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
