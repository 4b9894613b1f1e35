//! In-memory storage backend for testing.

use crate::error::{ErrorKind, Result};
use crate::{StorageBackend, validate_key};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory storage backend for testing.
///
/// Values are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation. Two failure modes
/// can be simulated: a byte quota (writes that would exceed it fail with
/// [`QuotaExceeded`](ErrorKind::QuotaExceeded)) and a switch that makes the
/// whole medium [`Unavailable`](ErrorKind::Unavailable).
///
/// # Examples
///
/// ```
/// use shelf_storage::backend::{MockBackend, StorageBackend};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MockBackend::with_entries([("library_books", "[]")]);
/// assert!(backend.exists("library_books").await?);
///
/// backend.write("library_authors", b"[]").await?;
/// assert!(backend.exists("library_authors").await?);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
    unavailable: AtomicBool,
}

impl MockBackend {
    /// Create a mock backend pre-populated with values.
    ///
    /// Panics if any key fails validation. If test setup is wrong, then test
    /// should not pass.
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (key, data) in entries {
            let key = key.into();
            if validate_key(&key).is_err() {
                // The panic here is DELIBERATE. MockBackend is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockBackend::with_entries: invalid key {key:?}");
            }
            map.insert(key, data.into());
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
            quota: None,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Change the name of the mock backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Limit the total number of stored bytes (across all keys).
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Raw access for assertions, bypassing the failure switches.
    pub async fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.storage.read().await.get(key).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Unavailable);
        }
        Ok(())
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let entries: [(&str, &str); 0] = [];
        Self::with_entries(entries)
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.check_available()?;
        let key = validate_key(key)?;
        Ok(self.storage.read().await.contains_key(key))
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        self.check_available()?;
        let key = validate_key(key)?;
        self.storage.read().await.get(key).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.to_string())))
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        self.check_available()?;
        let key = validate_key(key)?;
        let mut guard = self.storage.write().await;
        if let Some(limit) = self.quota {
            let others: usize = guard.iter().filter(|(k, _)| k.as_str() != key).map(|(_, v)| v.len()).sum();
            let needed = others + data.len();
            if needed > limit {
                exn::bail!(ErrorKind::QuotaExceeded { key: key.to_string(), needed, limit });
            }
        }
        guard.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check_available()?;
        let key = validate_key(key)?;
        self.storage
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.to_string())))
    }
}
