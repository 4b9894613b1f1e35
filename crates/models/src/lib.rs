//! Domain types for the shelf catalog.
//!
//! Everything that crosses a crate boundary lives here: the persisted
//! [`Author`] and [`Book`] records, their id-less [`NewAuthor`]/[`NewBook`]
//! drafts (also the remote create/update payloads), the partial-update
//! [`AuthorPatch`]/[`BookPatch`] structs, and the [`SeedSource`] selector.
//!
//! The JSON shape (camelCase, optional fields omitted) is shared by the local
//! cache and the remote catalog, so a record read from one can be written to
//! the other untouched.

mod author;
mod book;
pub mod error;
mod seed;

pub use crate::author::{Author, AuthorId, AuthorPatch, NewAuthor};
pub use crate::book::{Book, BookId, BookMetadata, BookPatch, NewBook, normalize_isbn};
pub use crate::seed::SeedSource;

/// Placeholder name for records imported without any author.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Case-insensitive, whitespace-trimmed comparison key for names and titles.
pub fn match_key(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase()
}

/// Highest assigned identifier plus one (`1` for an empty collection).
pub fn next_id<I: IntoIterator<Item = Option<u64>>>(ids: I) -> u64 {
    ids.into_iter().flatten().max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id() {
        assert_eq!(next_id([]), 1);
        assert_eq!(next_id([Some(3), None, Some(7), Some(2)]), 8);
        assert_eq!(next_id([None, None]), 1);
        assert_eq!(next_id([Some(5001), Some(5002)]), 5003);
    }

    #[test]
    fn test_match_key() {
        assert_eq!(match_key("  Jane DOE "), "jane doe");
        assert_eq!(match_key("jane doe"), match_key("JANE DOE"));
    }
}
