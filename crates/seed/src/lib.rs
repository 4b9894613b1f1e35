//! Bundled baseline catalogs.
//!
//! Two datasets ship with the binary and are used to (re)seed the local cache:
//! a small hand-picked demo library and a larger "server" catalog built from
//! an embedded book list. Both are immutable templates: consumers clone a
//! [`Catalog`] before mutating it.

mod compact;
mod consts;
mod server;

pub use crate::compact::RawBook;
use shelf_models::{Author, AuthorId, Book, SeedSource};

/// A self-contained set of authors and books.
///
/// Every book's primary `author_id` resolves to an author in the same catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub authors: Vec<Author>,
    pub books: Vec<Book>,
}
impl Catalog {
    pub fn author(&self, id: AuthorId) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == Some(id))
    }

    /// Build a catalog from raw catalogue entries with free-text author names.
    pub fn from_raw(entries: &[RawBook]) -> Self {
        compact::build(entries)
    }

    /// Build a catalog from a `Title - Author,ISBN` book list.
    pub fn from_csv(csv: &str) -> Self {
        server::build(&server::parse(csv))
    }
}

/// Both baseline catalogs, keyed by [`SeedSource`].
#[derive(Debug, Clone)]
pub struct SeedCatalogs {
    compact: Catalog,
    server: Catalog,
}
impl SeedCatalogs {
    pub fn new(compact: Catalog, server: Catalog) -> Self {
        Self { compact, server }
    }

    /// The catalogs shipped with the binary.
    pub fn bundled() -> Self {
        let catalogs = Self::new(Catalog::from_raw(compact::ENTRIES), Catalog::from_csv(server::BOOK_LIST));
        tracing::debug!(
            compact_books = catalogs.compact.books.len(),
            server_books = catalogs.server.books.len(),
            "Loaded bundled seed catalogs"
        );
        catalogs
    }

    pub fn get(&self, source: SeedSource) -> &Catalog {
        match source {
            SeedSource::Compact => &self.compact,
            SeedSource::Server => &self.server,
        }
    }
}
