//! Typed access to the cached catalog.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shelf_models::{Author, Book, SeedSource};
use shelf_storage::BackendHandle;
use shelf_storage::error::ErrorKind as StorageErrorKind;

pub const AUTHORS_KEY: &str = "library_authors";
pub const BOOKS_KEY: &str = "library_books";
pub const SEED_SOURCE_KEY: &str = "library_seed_source";

/// The local cache: authors, books and the active seed selector.
///
/// Collections are always written whole; there is no merging at this layer.
/// Every operation has a `try_*` form that reports failures, and a plain form
/// that logs a warning and carries on (reads report the value as absent,
/// writes are dropped). The plain forms never fail.
#[derive(Clone)]
pub struct LibraryStore {
    backend: BackendHandle,
}

impl LibraryStore {
    pub fn new(backend: BackendHandle) -> Self {
        Self { backend }
    }

    /// Name of the underlying storage backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    async fn try_read(&self, key: &'static str) -> Result<Option<Vec<u8>>> {
        match self.backend.read(key).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if matches!(&*e, StorageErrorKind::NotFound(_)) => Ok(None),
            Err(e) => Err(e).or_raise(|| ErrorKind::Storage(key)),
        }
    }

    async fn try_load<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>> {
        let Some(bytes) = self.try_read(key).await? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(&bytes).or_raise(|| ErrorKind::InvalidData(key))?;
        Ok(Some(value))
    }

    async fn try_save<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value).or_raise(|| ErrorKind::InvalidData(key))?;
        self.backend.write(key, &bytes).await.or_raise(|| ErrorKind::Storage(key))
    }

    async fn try_remove(&self, key: &'static str) -> Result<()> {
        match self.backend.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) if matches!(&*e, StorageErrorKind::NotFound(_)) => Ok(()),
            Err(e) => Err(e).or_raise(|| ErrorKind::Storage(key)),
        }
    }

    fn swallow<T>(&self, key: &'static str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, backend = self.backend.name(), error = ?err, "Local cache unavailable");
                None
            },
        }
    }

    pub async fn try_load_authors(&self) -> Result<Option<Vec<Author>>> {
        self.try_load(AUTHORS_KEY).await
    }

    pub async fn try_load_books(&self) -> Result<Option<Vec<Book>>> {
        self.try_load(BOOKS_KEY).await
    }

    /// Persisted authors, or `None` if never written, unreadable or undecodable.
    pub async fn load_authors(&self) -> Option<Vec<Author>> {
        self.swallow(AUTHORS_KEY, self.try_load_authors().await).flatten()
    }

    /// Persisted books, or `None` if never written, unreadable or undecodable.
    pub async fn load_books(&self) -> Option<Vec<Book>> {
        self.swallow(BOOKS_KEY, self.try_load_books().await).flatten()
    }

    pub async fn try_save_authors(&self, authors: &[Author]) -> Result<()> {
        self.try_save(AUTHORS_KEY, authors).await
    }

    pub async fn try_save_books(&self, books: &[Book]) -> Result<()> {
        self.try_save(BOOKS_KEY, books).await
    }

    pub async fn save_authors(&self, authors: &[Author]) {
        self.swallow(AUTHORS_KEY, self.try_save_authors(authors).await);
    }

    pub async fn save_books(&self, books: &[Book]) {
        self.swallow(BOOKS_KEY, self.try_save_books(books).await);
    }

    /// Overwrite both collections. A failure writing one does not prevent
    /// writing the other.
    pub async fn save_all(&self, authors: &[Author], books: &[Book]) {
        self.save_authors(authors).await;
        self.save_books(books).await;
    }

    /// The persisted seed selector as a plain string.
    ///
    /// The value is not validated here; parse it with
    /// [`SeedSource::from_str`](std::str::FromStr).
    pub async fn try_seed_source(&self) -> Result<Option<String>> {
        let Some(bytes) = self.try_read(SEED_SOURCE_KEY).await? else {
            return Ok(None);
        };
        let value = String::from_utf8(bytes).or_raise(|| ErrorKind::InvalidData(SEED_SOURCE_KEY))?;
        Ok(Some(value))
    }

    pub async fn seed_source(&self) -> Option<String> {
        self.swallow(SEED_SOURCE_KEY, self.try_seed_source().await).flatten()
    }

    pub async fn try_set_seed_source(&self, source: SeedSource) -> Result<()> {
        self.backend
            .write(SEED_SOURCE_KEY, source.as_str().as_bytes())
            .await
            .or_raise(|| ErrorKind::Storage(SEED_SOURCE_KEY))
    }

    pub async fn set_seed_source(&self, source: SeedSource) {
        self.swallow(SEED_SOURCE_KEY, self.try_set_seed_source(source).await);
    }

    /// `true` iff both collections are present and non-empty.
    pub async fn has_persisted_data(&self) -> bool {
        let authors = self.load_authors().await;
        let books = self.load_books().await;
        authors.is_some_and(|a| !a.is_empty()) && books.is_some_and(|b| !b.is_empty())
    }

    /// Remove both collections. The seed selector is kept.
    pub async fn try_clear(&self) -> Result<()> {
        self.try_remove(AUTHORS_KEY).await?;
        self.try_remove(BOOKS_KEY).await
    }

    pub async fn clear(&self) {
        let authors = self.try_remove(AUTHORS_KEY).await;
        self.swallow(AUTHORS_KEY, authors);
        let books = self.try_remove(BOOKS_KEY).await;
        self.swallow(BOOKS_KEY, books);
    }
}
