use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use valentine_db::StorageBackend;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: StorageBackend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("VALENTINE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("VALENTINE_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("VALENTINE_PORT must be a port number")?;

        // No database path means the in-memory fallback.
        let backend = match lookup("VALENTINE_DB_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                info!("Using SQLite database at {}", path);
                StorageBackend::Sqlite(PathBuf::from(path))
            }
            None => StorageBackend::Memory,
        };

        Ok(Self { host, port, backend })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
