//! `SQLite` connection pool setup and schema initialization.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;
use crate::schema;

/// Upper bound on concurrently open connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Connections kept open even when idle.
pub const DEFAULT_MIN_CONNECTIONS: u32 = 5;
/// How long a caller waits for a free connection before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a connection waits on a locked database file.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the `SQLite` storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:api.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Maximum number of open connections.
    pub max_connections: u32,
    /// Minimum number of idle connections retained.
    pub min_connections: u32,
    /// Bounded wait for a connection when the pool is exhausted.
    pub acquire_timeout: Duration,
}

impl Config {
    /// Configuration for `database_url` with default pool bounds.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and creates any missing table.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the file cannot be opened or
    /// the schema cannot be created.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self).await
    }
}

/// Holds the `SQLite` connection pool and provides access to it.
///
/// Constructed once by the composition root; repositories receive clones of
/// its pool.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and create the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the connection or schema
    /// creation fails.
    async fn initialize(config: &Config) -> Result<Self, StorageError> {
        let url = config.database_url.as_str();
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|err| StorageError::unavailable(url, err))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|err| StorageError::unavailable(url, err))?;

        schema::create_tables(&pool)
            .await
            .map_err(|err| StorageError::unavailable(url, err))?;

        tracing::info!(
            database_url = url,
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "database ready"
        );
        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
