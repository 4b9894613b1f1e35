//! SQLite-backed key/value storage.

use crate::Database;
use async_trait::async_trait;
use exn::ResultExt;
use shelf_storage::error::{ErrorKind, Result};
use shelf_storage::{StorageBackend, validate_key};
use sqlx::SqlitePool;
use time::UtcDateTime;

/// [`StorageBackend`] over the `kv_entries` table of a cache [`Database`].
///
/// Each write replaces the whole row inside a single statement, so a value is
/// never observed half-written.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    name: String,
    pool: SqlitePool,
}
impl SqliteBackend {
    pub fn new(name: impl Into<String>, db: &Database) -> Self {
        Self { name: name.into(), pool: db.pool().clone() }
    }
}

fn query_failed() -> ErrorKind {
    ErrorKind::Backend("sqlite query failed".to_string())
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let key = validate_key(key)?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .or_raise(query_failed)?;
        Ok(count > 0)
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let key = validate_key(key)?;
        let value: Option<Vec<u8>> = sqlx::query_scalar("SELECT value FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .or_raise(query_failed)?;
        value.ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(key.to_string())))
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let key = validate_key(key)?;
        sqlx::query(include_str!("../queries/upsert_entry.sql"))
            .bind(key)
            .bind(data)
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(query_failed)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let key = validate_key(key)?;
        let result = sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .or_raise(query_failed)?;
        if result.rows_affected() == 0 {
            exn::bail!(ErrorKind::NotFound(key.to_string()));
        }
        Ok(())
    }
}
