use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub const DB_FILE: &str = "gradebook.sqlite3";

/// Key-value persistence for the entity stores: one row per collection,
/// values are JSON text. The database is never queried relationally; joins
/// happen over the in-memory mirrors.
pub struct Storage {
    conn: Connection,
}

pub fn open_storage(workspace: &Path) -> anyhow::Result<Storage> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(Storage { conn })
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS collections(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

impl Storage {
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        let text: Option<String> = self
            .conn
            .query_row("SELECT value FROM collections WHERE key = ?", [key], |r| {
                r.get(0)
            })
            .optional()
            .with_context(|| format!("failed to read collection {}", key))?;
        match text {
            Some(t) => {
                let value = serde_json::from_str(&t)
                    .with_context(|| format!("collection {} holds malformed JSON", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let text = serde_json::to_string(value)
            .with_context(|| format!("failed to serialize collection {}", key))?;
        self.conn
            .execute(
                "INSERT INTO collections(key, value) VALUES(?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (key, &text),
            )
            .with_context(|| format!("failed to write collection {}", key))?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM collections WHERE key = ?", [key])
            .with_context(|| format!("failed to remove collection {}", key))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn open_in_memory() -> anyhow::Result<Storage> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Storage { conn })
    }
}
