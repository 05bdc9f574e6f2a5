//! Persistence for creators, inbox messages and confessions.
//!
//! [`Storage`] is the only way the rest of the service touches state. Two
//! backends implement it: [`SqliteStorage`] for durable deployments and
//! [`MemoryStorage`] as a non-durable fallback when no database is
//! configured. [`open`] picks one from a [`StorageBackend`] once at startup.

pub mod error;
pub mod ids;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod sqlite;
pub mod storage;


use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use models::{Confession, Creator, InsertConfession, InsertCreator, InsertMessage, Message};
pub use sqlite::SqliteStorage;
pub use storage::Storage;

/// Which backend serves the process. Chosen once, never switched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite(PathBuf),
    Memory,
}

/// Open the configured backend.
pub fn open(backend: &StorageBackend) -> Result<Arc<dyn Storage>> {
    match backend {
        StorageBackend::Sqlite(path) => Ok(Arc::new(SqliteStorage::open(path)?)),
        StorageBackend::Memory => {
            warn!("No database configured: using in-memory storage, all data is lost on restart");
            info!("In-memory storage ready");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
