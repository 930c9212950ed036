//! Key-value store holding the JSON documents the engine reads.

use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::collections::BTreeMap;

pub trait KvStore {
    /// Raw stored text, if the key exists.
    fn get_raw(&self, key: &str) -> AppResult<Option<String>>;

    fn set_raw(&mut self, key: &str, value: &str) -> AppResult<()>;

    /// Keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Parsed JSON value. Invalid JSON is an error; callers decide whether
    /// to degrade it to "absent".
    fn get_json(&self, key: &str) -> AppResult<Option<Value>> {
        match self.get_raw(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set_json(&mut self, key: &str, value: &Value) -> AppResult<()> {
        let text = serde_json::to_string(value)?;
        self.set_raw(key, &text)
    }
}

/// `kv` table of the application database.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> AppResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?)
    }
}

impl KvStore for SqliteStore<'_> {
    fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
        Ok(stmt.query_row([key], |row| row.get(0)).optional()?)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> AppResult<()> {
        let now = Local::now().to_rfc3339();
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )?;
        stmt.execute(params![key, value, now])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key")?;
        let rows = stmt.query_map([prefix], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value serialized as JSON.
    pub fn with_json(mut self, key: &str, value: Value) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Store raw text verbatim (may be invalid JSON).
    pub fn with_raw(mut self, key: &str, text: &str) -> Self {
        self.entries.insert(key.to_string(), text.to_string());
        self
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> AppResult<()> {
        if key.is_empty() {
            return Err(AppError::Store("empty key".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
