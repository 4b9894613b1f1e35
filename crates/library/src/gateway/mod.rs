//! The synchronization gateway.
//!
//! Every read and write from the presentation layer goes through a
//! [`Gateway`], which keeps the local cache, the bundled seed catalogs and the
//! remote catalog in step:
//!
//! - the cache is seeded from the active seed catalog whenever it's empty,
//! - writes are applied to the cache before the remote catalog is consulted,
//! - identifiers assigned by the remote catalog replace the draft ones,
//! - any remote failure falls back to cached data, flagged in [`SyncMeta`],
//! - while the [`Server`](SeedSource::Server) seed is active the remote
//!   catalog is never consulted at all.
//!
//! None of the operations fail. Storage problems are logged by the
//! [`LibraryStore`] and treated as "nothing persisted", so the worst case is a
//! snapshot built from the seed catalog.

mod attempt;
mod authors;
mod books;
mod snapshot;

pub use self::attempt::{Attempted, LatencyRange, Outcome};
pub use self::snapshot::{OperationResult, Snapshot, SyncMeta};

use crate::error::{ErrorKind, Result};
use shelf_cache::LibraryStore;
use shelf_models::{Author, AuthorId, Book, BookId, SeedSource};
use shelf_remote::CatalogHandle;
use shelf_seed::SeedCatalogs;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::instrument;

pub struct Gateway {
    store: LibraryStore,
    remote: CatalogHandle,
    seeds: SeedCatalogs,
    latency: LatencyRange,
    default_seed: SeedSource,
    active_seed: RwLock<SeedSource>,
}

impl Gateway {
    /// Create a gateway over `store` and `remote`.
    ///
    /// The active seed is the one persisted in the store if it's valid,
    /// otherwise `default_seed`; either way it is written back so the store
    /// and the gateway agree from the start.
    pub async fn new(store: LibraryStore, remote: CatalogHandle, seeds: SeedCatalogs, default_seed: SeedSource) -> Self {
        let persisted = store.seed_source().await;
        let active = parse_seed(persisted.as_deref()).unwrap_or(default_seed);
        if persisted.as_deref() != Some(active.as_str()) {
            store.set_seed_source(active).await;
        }
        tracing::debug!(seed = %active, backend = store.backend_name(), remote = remote.name(), "Gateway ready");
        Self {
            store,
            remote,
            seeds,
            latency: LatencyRange::default(),
            default_seed,
            active_seed: RwLock::new(active),
        }
    }

    pub fn with_latency(mut self, latency: LatencyRange) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// Seed the local cache if nothing has been persisted yet. Idempotent.
    #[instrument(skip_all)]
    pub async fn initialize(&self) {
        self.ensure_seeded().await;
    }

    /// The active seed source, re-read from the store.
    ///
    /// An absent or unrecognised value is replaced by the default seed, which
    /// is persisted in its place.
    pub async fn seed_source(&self) -> SeedSource {
        let persisted = self.store.seed_source().await;
        let source = match parse_seed(persisted.as_deref()) {
            Some(source) => source,
            None => {
                if let Some(value) = &persisted {
                    tracing::warn!(value = %value, default = %self.default_seed, "Ignoring unrecognised seed source");
                }
                self.default_seed
            },
        };
        if persisted.as_deref() != Some(source.as_str()) {
            self.store.set_seed_source(source).await;
        }
        *self.active_seed.write().await = source;
        source
    }

    /// Replace the whole catalog with a fresh copy of a seed catalog and make
    /// it the active seed.
    #[instrument(skip(self))]
    pub async fn reset_demo_data(&self, seed: SeedSource) -> Snapshot {
        *self.active_seed.write().await = seed;
        self.store.set_seed_source(seed).await;
        self.store.clear().await;
        let catalog = self.seeds.get(seed).clone();
        self.store.save_all(&catalog.authors, &catalog.books).await;
        tracing::info!(seed = %seed, authors = catalog.authors.len(), books = catalog.books.len(), "Library reset");

        let attempted = self.attempt("reset", async { Ok::<_, shelf_remote::error::Error>(()) }, async {}).await;
        Snapshot {
            authors: catalog.authors,
            books: catalog.books,
            meta: SyncMeta::now(attempted.elapsed, attempted.outcome.fallback_used()),
        }
    }

    /// Refresh both collections from the remote catalog, falling back to the
    /// cache (or the seed catalog) independently for each, and persist the
    /// result.
    #[instrument(skip_all)]
    pub async fn sync_snapshot(&self) -> Snapshot {
        self.ensure_seeded().await;
        let (authors, books) = tokio::join!(
            self.attempt("list_authors", self.remote.list_authors(), self.local_authors()),
            self.attempt("list_books", self.remote.list_books(), self.local_books()),
        );
        let latency = authors.elapsed.max(books.elapsed);
        let fallback_used = authors.outcome.fallback_used() || books.outcome.fallback_used();
        let (authors, books) = (authors.outcome.into_inner(), books.outcome.into_inner());
        self.store.save_all(&authors, &books).await;
        Snapshot { authors, books, meta: SyncMeta::now(latency, fallback_used) }
    }

    /// The catalog as currently cached, without consulting the remote.
    pub async fn local_snapshot(&self) -> Snapshot {
        self.ensure_seeded().await;
        let authors = self.local_authors().await;
        let books = self.local_books().await;
        Snapshot { authors, books, meta: SyncMeta::now(Duration::ZERO, false) }
    }

    /// A cached author by identifier.
    pub async fn author(&self, id: AuthorId) -> Result<Author> {
        let authors = self.local_snapshot().await.authors;
        match authors.into_iter().find(|a| a.id == Some(id)) {
            Some(author) => Ok(author),
            None => exn::bail!(ErrorKind::NotFound("author", id)),
        }
    }

    /// A cached book by identifier.
    pub async fn book(&self, id: BookId) -> Result<Book> {
        let books = self.local_snapshot().await.books;
        match books.into_iter().find(|b| b.id == Some(id)) {
            Some(book) => Ok(book),
            None => exn::bail!(ErrorKind::NotFound("book", id)),
        }
    }

    async fn active_seed(&self) -> SeedSource {
        *self.active_seed.read().await
    }

    async fn ensure_seeded(&self) {
        let seed = self.seed_source().await;
        if self.store.has_persisted_data().await {
            return;
        }
        let catalog = self.seeds.get(seed);
        tracing::info!(seed = %seed, authors = catalog.authors.len(), books = catalog.books.len(), "Seeding local cache");
        self.store.save_all(&catalog.authors, &catalog.books).await;
    }

    /// Cached authors, or the active seed's if nothing is cached.
    async fn local_authors(&self) -> Vec<Author> {
        match self.store.load_authors().await {
            Some(authors) => authors,
            None => self.seeds.get(self.active_seed().await).authors.clone(),
        }
    }

    /// Cached books, or the active seed's if nothing is cached.
    async fn local_books(&self) -> Vec<Book> {
        match self.store.load_books().await {
            Some(books) => books,
            None => self.seeds.get(self.active_seed().await).books.clone(),
        }
    }

    /// Run `remote` unless the server seed is active, settling on `local`
    /// when it's skipped or fails.
    async fn attempt<T, E, R, L>(&self, operation: &'static str, remote: R, local: L) -> Attempted<T>
    where
        E: std::fmt::Debug,
        R: Future<Output = std::result::Result<T, E>>,
        L: Future<Output = T>,
    {
        match self.active_seed().await {
            SeedSource::Server => attempt::skip(self.latency, operation, local).await,
            SeedSource::Compact => attempt::attempt(self.latency, operation, remote, local).await,
        }
    }

    /// Snapshot after a write: whatever the store now holds, or the given
    /// in-memory collections where it can't be read back.
    async fn settle(&self, authors: Vec<Author>, books: Vec<Book>, latency: Duration, fallback_used: bool) -> Snapshot {
        let authors = self.store.load_authors().await.unwrap_or(authors);
        let books = self.store.load_books().await.unwrap_or(books);
        Snapshot { authors, books, meta: SyncMeta::now(latency, fallback_used) }
    }
}

fn parse_seed(value: Option<&str>) -> Option<SeedSource> {
    value.and_then(|v| SeedSource::from_str(v).ok())
}
