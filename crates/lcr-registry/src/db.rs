use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use tracing::trace;

use crate::entry::RegistryEntry;
use crate::seed_data::demo_entries;
use crate::{PartRegistry, RegistryError};

/// Create the entries table if it does not exist.
pub fn init_db(conn: &Connection) -> SqlResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS entries (
            id                TEXT PRIMARY KEY,
            name              TEXT NOT NULL,
            entry_type        TEXT NOT NULL,
            subtype           TEXT,
            short_description TEXT NOT NULL DEFAULT '',
            sequence          TEXT NOT NULL DEFAULT '',
            linked_parts      TEXT,
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_entries_subtype ON entries(subtype);",
    )
}

/// Insert or replace a registry entry.
pub fn insert_entry(conn: &Connection, entry: &RegistryEntry) -> Result<(), RegistryError> {
    let linked = entry
        .linked_parts
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        "INSERT OR REPLACE INTO entries
            (id, name, entry_type, subtype, short_description, sequence, linked_parts)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id,
            entry.name,
            entry.entry_type,
            entry.subtype,
            entry.short_description,
            entry.sequence,
            linked,
        ],
    )?;
    Ok(())
}

/// Seed the demo assemblies (idempotent via INSERT OR IGNORE).
/// Returns the number of newly inserted rows.
pub fn seed_demo(conn: &Connection) -> Result<usize, RegistryError> {
    let mut count = 0usize;
    for entry in demo_entries() {
        let linked = entry
            .linked_parts
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        count += conn.execute(
            "INSERT OR IGNORE INTO entries
                (id, name, entry_type, subtype, short_description, sequence, linked_parts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.name,
                entry.entry_type,
                entry.subtype,
                entry.short_description,
                entry.sequence,
                linked,
            ],
        )?;
    }
    Ok(count)
}

/// Get a single entry by registry id.
pub fn get_entry(conn: &Connection, id: &str) -> Result<Option<RegistryEntry>, RegistryError> {
    let row = conn
        .query_row(
            "SELECT id, name, entry_type, subtype, short_description, sequence, linked_parts
             FROM entries WHERE id = ?1",
            params![id],
            row_to_raw,
        )
        .optional()?;
    row.map(RawEntry::into_entry).transpose()
}

/// All entries, ordered by id.
pub fn list_entries(conn: &Connection) -> Result<Vec<RegistryEntry>, RegistryError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, entry_type, subtype, short_description, sequence, linked_parts
         FROM entries ORDER BY id",
    )?;
    let rows = stmt.query_map([], row_to_raw)?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.into_entry()?);
    }
    Ok(entries)
}

/// Row as stored, with `linked_parts` still JSON-encoded.
struct RawEntry {
    entry: RegistryEntry,
    linked_parts: Option<String>,
}

impl RawEntry {
    fn into_entry(self) -> Result<RegistryEntry, RegistryError> {
        let mut entry = self.entry;
        entry.linked_parts = self
            .linked_parts
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(entry)
    }
}

fn row_to_raw(row: &rusqlite::Row) -> SqlResult<RawEntry> {
    Ok(RawEntry {
        entry: RegistryEntry {
            id: row.get(0)?,
            name: row.get(1)?,
            entry_type: row.get(2)?,
            subtype: row.get(3)?,
            short_description: row.get(4)?,
            sequence: row.get(5)?,
            linked_parts: None,
        },
        linked_parts: row.get(6)?,
    })
}

/// Registry backed by a SQLite database file.
#[derive(Debug)]
pub struct SqliteRegistry {
    conn: Connection,
}

impl SqliteRegistry {
    /// Open (creating if needed) the registry at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, RegistryError> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl PartRegistry for SqliteRegistry {
    fn fetch(&self, id: &str) -> Result<RegistryEntry, RegistryError> {
        trace!(id, "sqlite registry lookup");
        get_entry(&self.conn, id)?.ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }
}
