//! Read-only storage backend.
//!
//! Wraps another implementation and prevents write operations from
//! executing, while still indicating success on return.

use async_trait::async_trait;

use crate::{BackendHandle, StorageBackend, error::Result};

/// Read-only storage backend.
///
/// Wraps another backend and silently drops all writes and deletes, logging
/// an [`info event`](tracing::Event). Used for dry runs.
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StorageBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        tracing::info!(key, bytes = data.len(), "Skipping write during read-only mode");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        tracing::info!(key, "Skipping delete during read-only mode");
        Ok(())
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_writes_are_dropped() {
        let inner = Arc::new(MockBackend::with_entries([("a", "original")]));
        let backend = ReadOnlyBackend::new(inner.clone());
        backend.write("a", b"changed").await.unwrap();
        backend.write("b", b"new").await.unwrap();
        backend.delete("a").await.unwrap();
        assert_eq!(backend.read("a").await.unwrap(), b"original");
        assert!(!backend.exists("b").await.unwrap());
        assert_eq!(inner.peek("a").await.as_deref(), Some(&b"original"[..]));
    }
}
