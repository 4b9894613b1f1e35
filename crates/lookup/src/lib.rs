//! Book metadata lookup.
//!
//! Given an ISBN or a free-text title, a [`MetadataLookup`] returns zero or
//! more [`Candidate`] records for the user to accept into the catalog.
//! Lookups are a convenience: the non-`try` methods swallow every failure and
//! report it as "no results".

mod candidate;
pub mod error;
mod google;
#[cfg(feature = "mock")]
mod mock;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use crate::candidate::{Candidate, UNKNOWN_AUTHOR_LABEL};
pub use crate::google::GoogleBooks;
#[cfg(feature = "mock")]
pub use crate::mock::StaticLookup;

pub type LookupHandle = Arc<dyn MetadataLookup + Send + Sync>;

#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn try_by_isbn(&self, isbn: &str) -> Result<Vec<Candidate>>;

    async fn try_by_title(&self, title: &str) -> Result<Vec<Candidate>>;

    /// Candidates for `isbn`; empty on failure.
    async fn by_isbn(&self, isbn: &str) -> Vec<Candidate> {
        self.try_by_isbn(isbn).await.unwrap_or_else(|err| {
            tracing::warn!(isbn, error = ?err, "Metadata lookup failed");
            Vec::new()
        })
    }

    /// Candidates whose title matches `title`; empty on failure.
    async fn by_title(&self, title: &str) -> Vec<Candidate> {
        self.try_by_title(title).await.unwrap_or_else(|err| {
            tracing::warn!(title, error = ?err, "Metadata lookup failed");
            Vec::new()
        })
    }
}
