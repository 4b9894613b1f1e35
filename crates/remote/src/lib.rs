//! Remote catalog collaborator.
//!
//! The remote catalog is an opaque CRUD service for authors and books. It may
//! be slow, it may fail, and it may not exist at all; callers are expected to
//! treat every error as "use the local cache instead".

pub mod error;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod offline;

use crate::error::Result;
use async_trait::async_trait;
use shelf_models::{Author, AuthorId, Book, BookId, NewAuthor, NewBook};
use std::sync::Arc;

pub use crate::http::HttpCatalog;
#[cfg(feature = "mock")]
pub use crate::mock::MockCatalog;
pub use crate::offline::OfflineCatalog;

pub type CatalogHandle = Arc<dyn RemoteCatalog + Send + Sync>;

/// CRUD interface of the remote catalog.
///
/// Create and update payloads never carry the identifier: it is assigned by
/// the server on create and travels out-of-band (in the URL) on update. The
/// returned record may or may not include an identifier.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Name of the remote (used for logging only).
    fn name(&self) -> &str;

    async fn list_authors(&self) -> Result<Vec<Author>>;
    async fn get_author(&self, id: AuthorId) -> Result<Author>;
    async fn create_author(&self, author: &NewAuthor) -> Result<Author>;
    async fn update_author(&self, id: AuthorId, author: &NewAuthor) -> Result<Author>;
    async fn delete_author(&self, id: AuthorId) -> Result<()>;

    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn get_book(&self, id: BookId) -> Result<Book>;
    async fn create_book(&self, book: &NewBook) -> Result<Book>;
    async fn update_book(&self, id: BookId, book: &NewBook) -> Result<Book>;
    async fn delete_book(&self, id: BookId) -> Result<()>;
}
