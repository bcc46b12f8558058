//! Entry store contract and the two stores shipped with the engine
//!
//! The engine only reads: `list_all_entries` feeds rebuilds and `get_entry`
//! resolves search hits. Writes exist for seeding and tests.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::entry::EntryRecord;

/// Read contract of the external journal entry store
pub trait EntryStore: Send + Sync {
    fn list_all_entries(&self) -> Result<Vec<EntryRecord>>;

    /// `Ok(None)` when the entry no longer exists
    fn get_entry(&self, entry_id: i64) -> Result<Option<EntryRecord>>;
}

/// In-process store keyed by entry id
#[derive(Default)]
pub struct MemoryEntryStore {
    entries: RwLock<BTreeMap<i64, EntryRecord>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = EntryRecord>) -> Self {
        let store = Self::new();
        for entry in entries {
            store.insert(entry);
        }
        store
    }

    pub fn insert(&self, entry: EntryRecord) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(entry.entry_id, entry);
    }

    pub fn remove(&self, entry_id: i64) -> Option<EntryRecord> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&entry_id)
    }
}

impl EntryStore for MemoryEntryStore {
    fn list_all_entries(&self) -> Result<Vec<EntryRecord>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("entry map lock poisoned"))?;
        Ok(entries.values().cloned().collect())
    }

    fn get_entry(&self, entry_id: i64) -> Result<Option<EntryRecord>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("entry map lock poisoned"))?;
        Ok(entries.get(&entry_id).cloned())
    }
}

/// SQLite-backed journal store
pub struct SqliteEntryStore {
    conn: Mutex<Connection>,
}

impl SqliteEntryStore {
    /// Open or create database at path
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open journal database {}", db_path.display()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("journal connection lock poisoned"))
    }

    fn init_schema(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS journal_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                text_content TEXT NOT NULL,
                sentiment TEXT,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_user ON journal_entries(user_id);
            "#,
        )?;

        Ok(())
    }

    /// Insert a new entry and return its id
    pub fn insert_entry(
        &self,
        owner_id: i64,
        text: &str,
        sentiment: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO journal_entries (user_id, text_content, sentiment, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![owner_id, text, sentiment, created_at.timestamp()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Remove every entry belonging to an owner; returns the number removed
    pub fn clear_owner(&self, owner_id: i64) -> Result<usize> {
        let removed = self.conn()?.execute(
            "DELETE FROM journal_entries WHERE user_id = ?1",
            params![owner_id],
        )?;
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM journal_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<EntryRecord> {
    let created_at: i64 = row.get(4)?;
    Ok(EntryRecord {
        entry_id: row.get(0)?,
        owner_id: row.get(1)?,
        text: row.get(2)?,
        sentiment_label: row.get(3)?,
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}

impl EntryStore for SqliteEntryStore {
    fn list_all_entries(&self) -> Result<Vec<EntryRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, text_content, sentiment, created_at FROM journal_entries ORDER BY id",
        )?;
        let rows = stmt.query_map([], entry_from_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn get_entry(&self, entry_id: i64) -> Result<Option<EntryRecord>> {
        let entry = self
            .conn()?
            .query_row(
                "SELECT id, user_id, text_content, sentiment, created_at FROM journal_entries WHERE id = ?1",
                params![entry_id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() -> Result<()> {
        let store = MemoryEntryStore::from_entries([
            EntryRecord::new(2, 1, "second"),
            EntryRecord::new(1, 1, "first"),
        ]);

        let ids: Vec<i64> = store.list_all_entries()?.iter().map(|e| e.entry_id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!(store.remove(1).is_some());
        assert!(store.remove(1).is_none());
        assert!(store.get_entry(1)?.is_none());
        assert_eq!(store.list_all_entries()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_sqlite_store_operations() -> Result<()> {
        let store = SqliteEntryStore::open_in_memory()?;
        let created = DateTime::from_timestamp(1_704_067_200, 0).unwrap();

        let id = store.insert_entry(7, "Had a wonderful dinner", Some("joy"), created)?;
        store.insert_entry(8, "Traffic was terrible", None, created)?;

        let entry = store.get_entry(id)?.expect("entry should exist");
        assert_eq!(entry.owner_id, 7);
        assert_eq!(entry.sentiment_label.as_deref(), Some("joy"));
        assert_eq!(entry.created_at, created);

        assert_eq!(store.list_all_entries()?.len(), 2);
        assert!(store.get_entry(id + 100)?.is_none());

        assert_eq!(store.clear_owner(8)?, 1);
        assert_eq!(store.count()?, 1);
        assert_eq!(store.clear_owner(7)?, 1);
        assert_eq!(store.count()?, 0);
        Ok(())
    }
}
