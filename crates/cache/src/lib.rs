//! Local cache store for the shelf catalog.
//!
//! The cache is the offline copy of the catalog: the authors collection, the
//! books collection and the active seed selector, each stored under a fixed
//! key of a [`StorageBackend`](shelf_storage::StorageBackend). It is not the
//! source of truth when a remote catalog is reachable, but it is what the
//! gateway falls back to when one isn't.
//!
//! # Architecture
//! - [`LibraryStore`]: typed access to the three cached values. Reads and
//!   writes come in two flavours: `try_*` methods return explicit errors,
//!   plain methods log and swallow them (absent data, dropped writes).
//! - [`Database`] + [`SqliteBackend`]: the default persisted medium, a single
//!   key/value table in an SQLite file.

mod backend;
mod db;
pub mod error;
mod store;

pub use crate::backend::SqliteBackend;
pub use crate::db::Database;
pub use crate::store::{AUTHORS_KEY, BOOKS_KEY, LibraryStore, SEED_SOURCE_KEY};
