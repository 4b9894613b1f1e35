//! The shelf catalog library.
//!
//! [`Gateway`] is the entry point: it serves snapshots of the catalog and
//! applies writes, keeping the local cache, the bundled seed catalogs and the
//! remote catalog reconciled. [`query`] and [`validate`] are helpers for the
//! presentation layer; [`import`] turns metadata lookup results into catalog
//! records.

pub mod error;
mod gateway;
pub mod import;
pub mod query;
pub mod validate;

pub use crate::gateway::{Attempted, Gateway, LatencyRange, OperationResult, Outcome, Snapshot, SyncMeta};
pub use crate::import::Import;

/// The current calendar year (UTC).
pub fn current_year() -> i32 {
    time::UtcDateTime::now().year()
}
