use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, StorageError};
use crate::ids::{self, IdGenerator};
use crate::migrations;

/// Relational backend on a single SQLite connection.
///
/// Uniqueness of slugs and confession ids, and the creator reference on
/// messages, are enforced by table constraints.
pub struct SqliteStorage {
    conn: Mutex<Option<Connection>>,
    pub(crate) next_id: IdGenerator,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let storage = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(storage)
    }

    /// A private database that disappears with the connection.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            next_id: ids::generate_confession_id,
        })
    }

    pub fn with_id_generator(mut self, next_id: IdGenerator) -> Self {
        self.next_id = next_id;
        self
    }

    /// Release the connection. Every later operation fails with
    /// [`StorageError::Unavailable`].
    pub fn close(&self) -> Result<()> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("DB lock poisoned: {}", e)))?;

        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StorageError::Database(e))?;
            info!("Database closed");
        }
        Ok(())
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("DB lock poisoned: {}", e)))?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("database is closed".into()))?;
        f(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InsertConfession;
    use crate::storage::Storage;

    #[test]
    fn closed_storage_is_unavailable() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.close().unwrap();

        let err = storage.get_confession("abcd1234").unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)), "{err:?}");

        let err = storage
            .create_confession(&InsertConfession {
                sender_name: "Sam".into(),
                intent_option: "A walk in the park".into(),
                message: "See you by the fountain".into(),
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)), "{err:?}");

        // closing twice is harmless
        storage.close().unwrap();
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valentine.db");

        let id = {
            let storage = SqliteStorage::open(&path).unwrap();
            let confession = storage
                .create_confession(&InsertConfession {
                    sender_name: "Robin".into(),
                    intent_option: "Getting to know you".into(),
                    message: "Coffee after the lecture?".into(),
                })
                .unwrap();
            storage.close().unwrap();
            confession.id
        };

        let storage = SqliteStorage::open(&path).unwrap();
        let found = storage.get_confession(&id).unwrap().expect("persisted");
        assert_eq!(found.sender_name, "Robin");
        assert_eq!(found.response, None);
    }
}
