//! SQLite-backed dataset store

use std::path::Path;

use chrono::Utc;
use dv_core::Dataset;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use tracing::debug;

use super::DatasetStore;
use crate::DataError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS datasets (
        id       TEXT PRIMARY KEY,
        name     TEXT NOT NULL,
        payload  TEXT NOT NULL,
        saved_at TEXT NOT NULL
    );
";

/// Dataset store in a single SQLite table, one JSON payload per dataset
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let conn = Connection::open(path.as_ref())?;
        debug!("Opened dataset store at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, DataError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DataError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl DatasetStore for SqliteStore {
    fn save(&self, dataset: &Dataset) -> Result<(), DataError> {
        let payload = serde_json::to_string(dataset)?;
        let saved_at = Utc::now().to_rfc3339();

        // Upsert keeps the rowid, so list order stays first-saved order
        self.conn.lock().execute(
            "INSERT INTO datasets (id, name, payload, saved_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                payload = excluded.payload,
                saved_at = excluded.saved_at",
            params![dataset.id(), dataset.name(), payload, saved_at],
        )?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Dataset>, DataError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT payload FROM datasets ORDER BY rowid")?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        payloads
            .iter()
            .map(|payload| serde_json::from_str(payload).map_err(DataError::from))
            .collect()
    }

    fn delete(&self, id: &str) -> Result<(), DataError> {
        self.conn
            .lock()
            .execute("DELETE FROM datasets WHERE id = ?1", params![id])?;
        Ok(())
    }
}
