//! Local filesystem storage backend.
//!
//! Every key is stored as its own file inside a configured directory and
//! accessed via `tokio::fs` for async I/O.

use crate::error::{ErrorKind, Result};
use crate::{StorageBackend, validate_key};
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Suffix of the scratch file a value is written to before it's moved into
/// place.
const TEMP_SUFFIX: &str = ".partial";

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use shelf_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("local", "/home/me/.local/share/shelf")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    /// Directory holding one file per key
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKey`](ErrorKind::InvalidKey) if the root is not
    /// absolute or exists but isn't a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidKey(root.display().to_string()));
        }

        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidKey(root.display().to_string()));
            }
        } else {
            // Use non-async here; it'll only happen once on startup and it's
            // not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root.display().to_string()))?;
        }

        Ok(Self { name: name.into(), root })
    }

    /// Get the absolute file path for a key.
    fn file_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_key(key)?))
    }

    fn map_io_error(e: std::io::Error, key: &str) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(key.to_string()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(key.to_string()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.file_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => exn::bail!(Self::map_io_error(e, key)),
        }
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.file_path(key)?;
        Ok(fs::read(&path).await.map_err(|e| Self::map_io_error(e, key))?)
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.file_path(key)?;
        // The root may have been removed from under us since construction.
        fs::create_dir_all(&self.root).await.map_err(|e| Self::map_io_error(e, key))?;
        // Write next to the target then rename over it, so a crash mid-write
        // never leaves a truncated value behind.
        let scratch = self.root.join(format!("{key}{TEMP_SUFFIX}"));
        fs::write(&scratch, data).await.map_err(|e| Self::map_io_error(e, key))?;
        if let Err(e) = fs::rename(&scratch, &path).await {
            _ = fs::remove_file(&scratch).await;
            exn::bail!(Self::map_io_error(e, key));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.file_path(key)?;
        Ok(fs::remove_file(&path).await.map_err(|e| Self::map_io_error(e, key))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_root_rejected() {
        assert!(LocalBackend::new("name", "relative/dir").is_err());
    }

    #[test]
    fn test_root_is_created() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("nested").join("data");
        LocalBackend::new("name", &root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("file");
        std::fs::write(&file, b"data").unwrap();
        assert!(LocalBackend::new("name", &file).is_err());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        backend.write("library_books", b"[]").await.unwrap();
        assert_eq!(backend.read("library_books").await.unwrap(), b"[]");
        assert!(temp_dir.path().join("library_books").is_file());
    }

    #[tokio::test]
    async fn test_write_overwrites_and_leaves_no_scratch_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        backend.write("key", b"first value").await.unwrap();
        backend.write("key", b"second").await.unwrap();
        assert_eq!(backend.read("key").await.unwrap(), b"second");
        assert!(!temp_dir.path().join(format!("key{TEMP_SUFFIX}")).exists());
    }

    #[tokio::test]
    async fn test_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        assert!(!backend.exists("missing").await.unwrap());
        backend.write("present", b"data").await.unwrap();
        assert!(backend.exists("present").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        let err = backend.read("missing").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(key) if key == "missing"));
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        backend.write("key", b"data").await.unwrap();
        backend.delete("key").await.unwrap();
        assert!(!backend.exists("key").await.unwrap());
        // Deleting a missing key returns error
        let err = backend.delete("key").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_write_recreates_removed_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("data");
        let backend = LocalBackend::new("name", &root).unwrap();
        std::fs::remove_dir(&root).unwrap();
        backend.write("key", b"data").await.unwrap();
        assert_eq!(backend.read("key").await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_key_security() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("name", temp_dir.path()).unwrap();
        assert!(backend.read("../etc/passwd").await.is_err());
        assert!(backend.write("../escape", b"data").await.is_err());
        assert!(backend.delete("a/b").await.is_err());
    }
}
