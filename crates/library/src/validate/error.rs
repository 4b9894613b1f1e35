//! Error types for the [`validate`](super) module.

use derive_more::{Display, Error};

/// A single rejected field, with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for validation checks.
pub type Result<T> = std::result::Result<T, Error>;

/// One problem with user input. The display text is meant for the user.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("Name is required")]
    NameRequired,
    #[display("Title is required")]
    TitleRequired,
    #[display("Please select an author")]
    AuthorRequired,
    /// The selected author does not exist.
    #[display("No author with id {_0}")]
    UnknownAuthor(#[error(not(source))] u64),
    #[display("ISBN is required")]
    IsbnRequired,
    #[display("ISBN should only contain numbers and hyphens")]
    IsbnFormat,
    /// Another book already carries this ISBN.
    #[display("ISBN {_0} is already in the library")]
    DuplicateIsbn(#[error(not(source))] String),
    #[display("Please enter a valid publication year (1000-{_0})")]
    PublishedYear(#[error(not(source))] i32),
    #[display("Please enter a valid birth year (1000-{_0})")]
    BirthYear(#[error(not(source))] i32),
    #[display("Please enter a valid URL (starting with http:// or https://)")]
    CoverUrl,
}
