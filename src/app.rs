//! Wiring configuration into a gateway, and running commands against it.

use crate::cli::{Command, LookupArgs, LookupBy};
use crate::error::{ErrorKind, Result};
use crate::render::{self, Output};
use exn::ResultExt;
use shelf_cache::{Database, LibraryStore, SqliteBackend};
use shelf_config::{Config, StorageKind};
use shelf_library::import::import_problems;
use shelf_library::query::{AuthorQuery, BookQuery};
use shelf_library::validate::{author_problems, book_problems, error::ErrorKind as Problem};
use shelf_library::{Gateway, LatencyRange, current_year};
use shelf_lookup::{GoogleBooks, LookupHandle};
use shelf_models::{AuthorPatch, BookPatch, NewAuthor, NewBook};
use shelf_remote::{CatalogHandle, HttpCatalog, OfflineCatalog};
use shelf_seed::SeedCatalogs;
use shelf_storage::BackendHandle;
use shelf_storage::backend::{LocalBackend, ReadOnlyBackend};
use std::sync::Arc;

pub struct App {
    gateway: Gateway,
    lookup: LookupHandle,
    output: Output,
    /// Held so the pool can be closed cleanly on the way out.
    database: Option<Database>,
}

impl App {
    pub async fn build(config: &Config, dry_run: bool, output: Output) -> Result<Self> {
        let (backend, database) = open_backend(config).await?;
        let backend: BackendHandle = if dry_run { Arc::new(ReadOnlyBackend::new(backend)) } else { backend };
        let remote: CatalogHandle = match &config.remote.base_url {
            Some(url) => Arc::new(HttpCatalog::new(url.clone(), config.remote.timeout()).or_raise(|| ErrorKind::Client("remote catalog"))?),
            None => {
                tracing::info!("No remote catalog configured, working offline");
                Arc::new(OfflineCatalog)
            },
        };
        let lookup: LookupHandle = Arc::new(
            GoogleBooks::new(
                config.lookup.base_url.clone(),
                config.lookup.country.clone(),
                config.lookup.max_results,
                config.lookup.timeout(),
            )
            .or_raise(|| ErrorKind::Client("metadata lookup"))?,
        );
        let (min, max) = config.latency();
        let gateway = Gateway::new(LibraryStore::new(backend), remote, SeedCatalogs::bundled(), config.seed)
            .await
            .with_latency(LatencyRange::new(min, max));
        Ok(Self { gateway, lookup, output, database })
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        self.gateway.initialize().await;
        match command {
            Command::Sync => self.output.snapshot(&self.gateway.sync_snapshot().await),
            Command::Books(args) => {
                let snapshot = self.gateway.local_snapshot().await;
                let rows = BookQuery::from(&args).apply(&snapshot.authors, &snapshot.books, current_year());
                self.output.books(&rows);
            },
            Command::Authors(args) => {
                let snapshot = self.gateway.local_snapshot().await;
                let rows = AuthorQuery::from(&args).apply(&snapshot.authors, &snapshot.books);
                self.output.authors(&rows);
            },
            Command::AddAuthor(args) => {
                let draft = NewAuthor::from(args);
                reject(author_problems(&draft, current_year()), "author")?;
                self.output.author_result("Added", &self.gateway.create_author(draft).await);
            },
            Command::EditAuthor { id, fields } => {
                let patch = AuthorPatch::from(fields);
                let mut merged = self.gateway.author(id).await.or_raise(|| ErrorKind::NotFound("edit"))?;
                merged.apply(&patch);
                reject(author_problems(&NewAuthor::from(&merged), current_year()), "author")?;
                self.output.author_result("Updated", &self.gateway.update_author(Some(id), patch).await);
            },
            Command::RmAuthor { id } => {
                let author = self.gateway.author(id).await.or_raise(|| ErrorKind::NotFound("remove"))?;
                let snapshot = self.gateway.delete_author(Some(id)).await;
                tracing::info!(id, name = %author.name, "Removed author");
                self.output.snapshot(&snapshot);
            },
            Command::AddBook(args) => {
                let draft = NewBook::from(args);
                let snapshot = self.gateway.local_snapshot().await;
                reject(book_problems(&draft, &snapshot.authors, &snapshot.books, None, current_year()), "book")?;
                self.output.book_result("Added", &self.gateway.create_book(draft).await);
            },
            Command::EditBook { id, fields } => {
                let patch = BookPatch::from(fields);
                let mut merged = self.gateway.book(id).await.or_raise(|| ErrorKind::NotFound("edit"))?;
                merged.apply(&patch);
                let snapshot = self.gateway.local_snapshot().await;
                let problems = book_problems(&NewBook::from(&merged), &snapshot.authors, &snapshot.books, Some(id), current_year());
                reject(problems, "book")?;
                self.output.book_result("Updated", &self.gateway.update_book(Some(id), patch).await);
            },
            Command::RmBook { id } => {
                let book = self.gateway.book(id).await.or_raise(|| ErrorKind::NotFound("remove"))?;
                let snapshot = self.gateway.delete_book(Some(id)).await;
                tracing::info!(id, title = %book.title, "Removed book");
                self.output.snapshot(&snapshot);
            },
            Command::Reset { seed } => self.output.snapshot(&self.gateway.reset_demo_data(seed.into()).await),
            Command::Seed => self.output.seed(self.gateway.seed_source().await),
            Command::Lookup(args) => self.lookup(args).await?,
        }
        Ok(())
    }

    async fn lookup(&self, args: LookupArgs) -> Result<()> {
        let candidates = match args.by {
            LookupBy::Isbn => self.lookup.by_isbn(&args.query).await,
            LookupBy::Title => self.lookup.by_title(&args.query).await,
        };
        let Some(n) = args.accept else {
            self.output.candidates(&candidates);
            return Ok(());
        };
        let Some(mut candidate) = n.checked_sub(1).and_then(|index| candidates.get(index)).cloned() else {
            exn::bail!(ErrorKind::NoSuchCandidate(n, candidates.len()));
        };
        if let Some(isbn) = args.isbn {
            candidate.isbn = isbn;
        }
        if let Some(year) = args.year {
            candidate.published_year = year;
        }
        let snapshot = self.gateway.local_snapshot().await;
        reject(import_problems(&candidate, &snapshot.authors, &snapshot.books, current_year()), "book")?;
        self.output.import(&self.gateway.import_candidate(&candidate).await);
        Ok(())
    }

    pub async fn close(self) {
        if let Some(database) = self.database {
            database.close().await;
        }
    }
}

async fn open_backend(config: &Config) -> Result<(BackendHandle, Option<Database>)> {
    match config.storage.backend {
        StorageKind::Sqlite => {
            let path = config.database_path();
            let database = Database::connect(&path).await.or_raise(|| ErrorKind::Storage)?;
            tracing::debug!(path = %path.display(), "Opened SQLite cache");
            Ok((Arc::new(SqliteBackend::new("sqlite", &database)), Some(database)))
        },
        StorageKind::Local => {
            let root = std::path::absolute(&config.data_dir).or_raise(|| ErrorKind::Storage)?;
            let backend = LocalBackend::new("local", &root).or_raise(|| ErrorKind::Storage)?;
            tracing::debug!(path = %root.display(), "Opened file cache");
            Ok((Arc::new(backend), None))
        },
    }
}

/// Print every problem and fail if there were any.
fn reject(problems: Vec<Problem>, what: &str) -> Result<()> {
    if problems.is_empty() {
        return Ok(());
    }
    eprintln!("Invalid {what}:");
    render::problems(&problems);
    exn::bail!(ErrorKind::Rejected(format!("{} problem(s) with the {what}", problems.len())))
}
