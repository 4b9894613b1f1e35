use crate::RemoteCatalog;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use shelf_models::{Author, AuthorId, Book, BookId, NewAuthor, NewBook};

/// Stand-in used when no remote catalog is configured: every call fails with
/// [`Unavailable`](ErrorKind::Unavailable), so the gateway always falls back
/// to the local cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCatalog;

#[async_trait]
impl RemoteCatalog for OfflineCatalog {
    fn name(&self) -> &str {
        "offline"
    }

    async fn list_authors(&self) -> Result<Vec<Author>> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn get_author(&self, _id: AuthorId) -> Result<Author> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn create_author(&self, _author: &NewAuthor) -> Result<Author> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn update_author(&self, _id: AuthorId, _author: &NewAuthor) -> Result<Author> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn delete_author(&self, _id: AuthorId) -> Result<()> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn get_book(&self, _id: BookId) -> Result<Book> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn create_book(&self, _book: &NewBook) -> Result<Book> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn update_book(&self, _id: BookId, _book: &NewBook) -> Result<Book> {
        exn::bail!(ErrorKind::Unavailable)
    }

    async fn delete_book(&self, _id: BookId) -> Result<()> {
        exn::bail!(ErrorKind::Unavailable)
    }
}
