//! SQLite-backed cache store.
//!
//! Every operation opens its own connection and drops it before returning.
//! Expiry is stored as a unix timestamp in milliseconds; an entry is live
//! while `expires_at` is strictly in the future.

use super::CacheStore;
use crate::error::CacheError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cache store persisted in a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteCache {
    path: PathBuf,
}

impl SqliteCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn connect(path: &Path) -> Result<Connection, CacheError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CacheError::Transport(format!("failed to create cache directory: {}", e))
        })?;
    }

    let conn = Connection::open(path)?;
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS cache_entries (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            expires_at INTEGER NOT NULL
        );
        "#,
    )?;

    Ok(conn)
}

fn set_entry(path: &Path, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
    let conn = connect(path)?;
    let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    let expires_at = now_millis().saturating_add(ttl_millis);

    conn.execute(
        "INSERT OR REPLACE INTO cache_entries (key, value, expires_at) VALUES (?1, ?2, ?3)",
        params![key, value, expires_at],
    )?;

    Ok(())
}

fn get_entry(path: &Path, key: &str) -> Result<Option<String>, CacheError> {
    let conn = connect(path)?;

    let row: Option<(String, i64)> = conn
        .query_row(
            "SELECT value, expires_at FROM cache_entries WHERE key = ?1",
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match row {
        Some((value, expires_at)) if expires_at > now_millis() => Ok(Some(value)),
        Some(_) => {
            conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
            Ok(None)
        }
        None => Ok(None),
    }
}

#[async_trait::async_trait]
impl CacheStore for SqliteCache {
    fn backend_name(&self) -> &str {
        "sqlite"
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let path = self.path.clone();
        let key = key.to_string();
        let value = value.to_string();

        let outcome = tokio::task::spawn_blocking(move || set_entry(&path, &key, &value, ttl))
            .await
            .unwrap_or_else(|e| Err(CacheError::Transport(e.to_string())));

        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("[CACHE_ERROR] Failed to set cache: {}", e);
                false
            }
        }
    }

    async fn get(&self, key: &str) -> Option<String> {
        let path = self.path.clone();
        let key = key.to_string();

        let outcome = tokio::task::spawn_blocking(move || get_entry(&path, &key))
            .await
            .unwrap_or_else(|e| Err(CacheError::Transport(e.to_string())));

        outcome.unwrap_or_else(|e| {
            tracing::warn!("[CACHE_ERROR] Failed to get cache: {}", e);
            None
        })
    }
}
