//! In-memory remote catalog for testing.

use crate::RemoteCatalog;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use shelf_models::{Author, AuthorId, Book, BookId, NewAuthor, NewBook, next_id};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    authors: Vec<Author>,
    books: Vec<Book>,
}

/// In-memory remote catalog for testing.
///
/// Behaves like a well-mannered REST server until it's switched
/// [offline](MockCatalog::set_offline), at which point every call fails with
/// [`Unavailable`](ErrorKind::Unavailable). Calls are counted either way.
///
/// Identifiers are assigned as `max + 1`, but never below the configured
/// [base](MockCatalog::with_id_base), so tests can tell server-assigned
/// identifiers from locally-assigned ones.
pub struct MockCatalog {
    state: RwLock<State>,
    offline: AtomicBool,
    omit_ids: AtomicBool,
    calls: AtomicUsize,
    id_base: u64,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::with_data(Vec::new(), Vec::new())
    }
}

impl MockCatalog {
    pub fn with_data(authors: Vec<Author>, books: Vec<Book>) -> Self {
        Self {
            state: RwLock::new(State { authors, books }),
            offline: AtomicBool::new(false),
            omit_ids: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            id_base: 0,
        }
    }

    /// A catalog that's offline from the start.
    pub fn offline() -> Self {
        let catalog = Self::default();
        catalog.set_offline(true);
        catalog
    }

    /// Assign identifiers starting from at least `base + 1`.
    pub fn with_id_base(mut self, base: u64) -> Self {
        self.id_base = base;
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Respond to creates and updates without the record identifier.
    pub fn set_omit_ids(&self, omit: bool) {
        self.omit_ids.store(omit, Ordering::SeqCst);
    }

    /// Number of calls made so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn authors(&self) -> Vec<Author> {
        self.state.read().await.authors.clone()
    }

    pub async fn books(&self) -> Vec<Book> {
        self.state.read().await.books.clone()
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Unavailable);
        }
        Ok(())
    }

    fn next_id(&self, ids: impl IntoIterator<Item = Option<u64>>) -> u64 {
        next_id(ids).max(self.id_base + 1)
    }

    fn respond<T>(&self, mut record: T, clear_id: impl FnOnce(&mut T)) -> T {
        if self.omit_ids.load(Ordering::SeqCst) {
            clear_id(&mut record);
        }
        record
    }
}

fn not_found() -> ErrorKind {
    ErrorKind::Status(404)
}

#[async_trait]
impl RemoteCatalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_authors(&self) -> Result<Vec<Author>> {
        self.begin()?;
        Ok(self.authors().await)
    }

    async fn get_author(&self, id: AuthorId) -> Result<Author> {
        self.begin()?;
        let state = self.state.read().await;
        let author = state.authors.iter().find(|a| a.id == Some(id)).cloned();
        author.ok_or_else(|| exn::Exn::from(not_found()))
    }

    async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
        self.begin()?;
        let mut state = self.state.write().await;
        let id = self.next_id(state.authors.iter().map(|a| a.id));
        let created = author.clone().with_id(id);
        state.authors.push(created.clone());
        Ok(self.respond(created, |a| a.id = None))
    }

    async fn update_author(&self, id: AuthorId, author: &NewAuthor) -> Result<Author> {
        self.begin()?;
        let mut state = self.state.write().await;
        let Some(existing) = state.authors.iter_mut().find(|a| a.id == Some(id)) else {
            exn::bail!(not_found());
        };
        *existing = author.clone().with_id(id);
        let updated = existing.clone();
        Ok(self.respond(updated, |a| a.id = None))
    }

    async fn delete_author(&self, id: AuthorId) -> Result<()> {
        self.begin()?;
        let mut state = self.state.write().await;
        let before = state.authors.len();
        state.authors.retain(|a| a.id != Some(id));
        if state.authors.len() == before {
            exn::bail!(not_found());
        }
        Ok(())
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        self.begin()?;
        Ok(self.books().await)
    }

    async fn get_book(&self, id: BookId) -> Result<Book> {
        self.begin()?;
        let state = self.state.read().await;
        let book = state.books.iter().find(|b| b.id == Some(id)).cloned();
        book.ok_or_else(|| exn::Exn::from(not_found()))
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book> {
        self.begin()?;
        let mut state = self.state.write().await;
        let id = self.next_id(state.books.iter().map(|b| b.id));
        let created = book.clone().with_id(id);
        state.books.push(created.clone());
        Ok(self.respond(created, |b| b.id = None))
    }

    async fn update_book(&self, id: BookId, book: &NewBook) -> Result<Book> {
        self.begin()?;
        let mut state = self.state.write().await;
        let Some(existing) = state.books.iter_mut().find(|b| b.id == Some(id)) else {
            exn::bail!(not_found());
        };
        *existing = book.clone().with_id(id);
        let updated = existing.clone();
        Ok(self.respond(updated, |b| b.id = None))
    }

    async fn delete_book(&self, id: BookId) -> Result<()> {
        self.begin()?;
        let mut state = self.state.write().await;
        let before = state.books.len();
        state.books.retain(|b| b.id != Some(id));
        if state.books.len() == before {
            exn::bail!(not_found());
        }
        Ok(())
    }
}
