use shelf_models::{Author, Book};
use std::time::Duration;
use time::UtcDateTime;

/// How a gateway operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMeta {
    /// When the operation completed.
    pub timestamp: UtcDateTime,
    /// Time spent settling the operation: the remote round trip (when one
    /// was made) plus the artificial delay.
    pub latency: Duration,
    /// `true` if any remote call failed and cached data was used instead.
    pub fallback_used: bool,
}

impl SyncMeta {
    /// Metadata stamped with the current time.
    pub fn now(latency: Duration, fallback_used: bool) -> Self {
        Self { timestamp: UtcDateTime::now(), latency, fallback_used }
    }
}

/// The whole catalog as the presentation layer should render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub authors: Vec<Author>,
    pub books: Vec<Book>,
    pub meta: SyncMeta,
}

impl Snapshot {
    pub fn author(&self, id: u64) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == Some(id))
    }

    pub fn book(&self, id: u64) -> Option<&Book> {
        self.books.iter().find(|b| b.id == Some(id))
    }
}

/// A [`Snapshot`] after a write, along with the written record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult<T> {
    pub snapshot: Snapshot,
    pub entity: T,
}

impl<T> OperationResult<T> {
    pub fn meta(&self) -> &SyncMeta {
        &self.snapshot.meta
    }
}
