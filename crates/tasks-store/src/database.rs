use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::StoreError;
use crate::schema;

/// Thread-safe SQLite connection wrapper.
/// Uses parking_lot::Mutex for synchronous access (rusqlite is not Sync).
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("create dir: {e}")))?;
        }

        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute_batch(schema::PRAGMAS)
            .map_err(|e| StoreError::Database(format!("pragmas: {e}")))?;

        let seeded = initialize(&conn)?;

        info!(path = %path.display(), seeded, "database opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_owned(),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;

        initialize(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        })
    }

    /// Execute a closure with the database connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Create tables and, on first initialization only, record the schema
/// version and insert the seed rows. Returns whether seeding happened.
fn initialize(conn: &Connection) -> Result<bool, StoreError> {
    conn.execute_batch(schema::CREATE_TABLES)
        .map_err(|e| StoreError::Database(format!("schema: {e}")))?;

    let version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    if version.is_some() {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [schema::SCHEMA_VERSION],
    )
    .map_err(|e| StoreError::Database(format!("schema version: {e}")))?;
    tx.execute_batch(schema::SEED_TASKS)
        .map_err(|e| StoreError::Database(format!("seed: {e}")))?;
    tx.commit()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_tasks(db: &Database) -> i64 {
        db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM Tasks", [], |row| row.get(0))
                .map_err(StoreError::from)
        })
        .unwrap()
    }

    #[test]
    fn open_in_memory() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.path(), Path::new(":memory:"));
    }

    #[test]
    fn schema_version_set() {
        let db = Database::in_memory().unwrap();
        let version: u32 = db
            .with_conn(|conn| {
                conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))
                    .map_err(|e| StoreError::Database(e.to_string()))
            })
            .unwrap();
        assert_eq!(version, schema::SCHEMA_VERSION);
    }

    #[test]
    fn seed_rows_inserted() {
        let db = Database::in_memory().unwrap();
        assert_eq!(count_tasks(&db), 2);
    }

    #[test]
    fn title_length_enforced_by_schema() {
        let db = Database::in_memory().unwrap();
        let result = db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Tasks (Title, IsCompleted) VALUES (?1, 0)",
                ["x".repeat(101)],
            )
            .map_err(StoreError::from)
        });
        assert!(result.is_err());
    }

    #[test]
    fn reopen_does_not_reseed() {
        let dir = std::env::temp_dir().join(format!("tasks-store-test-{}", uuid::Uuid::now_v7()));
        let path = dir.join("test.db");

        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        db.with_conn(|conn| {
            conn.execute("DELETE FROM Tasks WHERE Id = 1", [])?;
            Ok(())
        })
        .unwrap();
        drop(db);

        let db2 = Database::open(&path).unwrap();
        assert_eq!(count_tasks(&db2), 1);
        drop(db2);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
