//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, which provides a unified
//! key/value interface across different media (a local directory, an SQLite
//! table, process memory).

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use async_trait::async_trait;

/// Unified interface for storage backends.
///
/// All storage operations are asynchronous so that slow media (disk, a
/// database connection) don't block the caller. Values are opaque bytes;
/// serialization is the caller's concern.
///
/// # Key Handling
/// Keys are flat names and must be validated using
/// [`validate_key`](crate::validate_key) before use. Implementations should
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use shelf_storage::{StorageBackend, error::Result};
///
/// async fn size_of_entry(backend: &dyn StorageBackend) -> Result<u64> {
///     if backend.exists("library_books").await? {
///         let data = backend.read("library_books").await?;
///         Ok(data.len() as u64)
///     } else {
///         Ok(0)
///     }
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// Check if a value is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Read the value stored under `key`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if nothing is
    /// stored under the key.
    async fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Store `data` under `key`, replacing any previous value entirely.
    ///
    /// # Notes
    /// - Implementations should never leave a partially-written value behind.
    async fn write(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Remove the value stored under `key`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if nothing is
    /// stored under the key.
    async fn delete(&self, key: &str) -> Result<()>;
}
