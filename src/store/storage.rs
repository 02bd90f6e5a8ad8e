use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

use crate::db::migrations::run_migrations;
use crate::db::repository::MetaRepo;

pub const PROGRESS_KEY: &str = "progress";
pub const DARK_MODE_KEY: &str = "dark_mode";

/// Durable home for named text blobs.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// False when writes only live as long as the process.
    fn is_durable(&self) -> bool {
        true
    }
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Opening database at {:?}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        MetaRepo::get(&self.conn, key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        MetaRepo::set(&self.conn, key, value)
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

/// Process-lifetime storage, used when the database cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_blob(mut self, key: &str, value: &str) -> Self {
        self.blobs.insert(key.to_string(), value.to_string());
        self
    }

    #[cfg(test)]
    /// Make every write fail, as a full or read-only disk would.
    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes {
            return Err(anyhow!("storage quota exceeded writing '{}'", key));
        }
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
