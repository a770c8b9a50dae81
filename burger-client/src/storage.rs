//! Optional SQLite storage connection handed to command handlers through the client.

use burger_core::{BurgerError, Result};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// Manages a single SQLite pool; creates the database file if missing.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Connects to `database_url` (`sqlite:` URL, `file:` path or plain path).
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!(database_url = %database_url, "Connecting to storage");

        let options = if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)
                .map_err(|e| BurgerError::Storage(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(database_url.trim_start_matches("file:"))
        }
        .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| BurgerError::Storage(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
