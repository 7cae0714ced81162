//! # Database Pool Management
//!
//! Connection pool creation and configuration for the response cache.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Companion startup                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + ensure schema             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐               │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ ...           │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘               │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├──► db.sales_cache()  ← dated reports                           │
//! │       └──► db.items_cache()  ← stock lists                             │
//! │                                                                         │
//! │  Every repository call borrows a connection and returns it on drop,   │
//! │  including when the call fails.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so a dashboard read
//! never waits on a sync write.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::items_cache::ItemsCacheRepository;
use crate::repository::sales_cache::SalesCacheRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/cache.db")
///     .max_connections(4)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 4
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to create or upgrade the schema on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to create the schema on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // each in-memory connection is its own database
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            // never let the only connection go idle and take the data with it
            idle_timeout: Duration::from_secs(24 * 60 * 60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new(path)).await?;
/// let fresh = db
///     .sales_cache()
///     .is_fresh("sales-summary", Period::ThisMonth, "2024-06", FreshnessPolicy::CURRENT)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    /// 3. Creates the connection pool
    /// 4. Creates or upgrades the schema (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing cache database"
        );

        // sqlite://path creates the file if it does not exist
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Creates the cache tables, dropping them first on a version mismatch.
    ///
    /// Called automatically by `new()` when `run_migrations` is true.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// For queries not covered by the repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the dated sales cache repository.
    pub fn sales_cache(&self) -> SalesCacheRepository {
        SalesCacheRepository::new(self.pool.clone())
    }

    /// Returns the items cache repository.
    pub fn items_cache(&self) -> ItemsCacheRepository {
        ItemsCacheRepository::new(self.pool.clone())
    }

    /// Deletes every row of both cache tables.
    ///
    /// ## Returns
    /// Total number of rows deleted. Irreversible.
    pub async fn clear_all(&self) -> DbResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let sales = sqlx::query("DELETE FROM sales_cache")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let items = sqlx::query("DELETE FROM items_cache")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sales, items, "Cleared response cache");
        Ok(sales + items)
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use candykush_core::Period;
    use serde_json::json;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(
            migrations::schema_version(db.pool()).await.unwrap(),
            migrations::SCHEMA_VERSION
        );
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/cache.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }

    #[tokio::test]
    async fn test_clear_all_empties_both_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.sales_cache()
            .put("sales-summary", Period::ThisMonth, "2024-06", None, None, &json!({"total": 1}))
            .await
            .unwrap();
        db.sales_cache()
            .put("sales-summary", Period::ThisMonth, "2024-05", None, None, &json!({"total": 2}))
            .await
            .unwrap();
        db.items_cache()
            .put_items("items-stock", &json!([1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(db.clear_all().await.unwrap(), 3);
        assert_eq!(db.sales_cache().entry_count().await.unwrap(), 0);
        assert!(db.items_cache().get_items("items-stock").await.unwrap().is_none());
        assert_eq!(db.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_version_mismatch_wipes_cache() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items_cache()
            .put_items("items-stock", &json!({"count": 5}))
            .await
            .unwrap();

        sqlx::query("PRAGMA user_version = 1")
            .execute(db.pool())
            .await
            .unwrap();
        db.run_migrations().await.unwrap();

        assert!(db.items_cache().get_items("items-stock").await.unwrap().is_none());
        assert_eq!(
            migrations::schema_version(db.pool()).await.unwrap(),
            migrations::SCHEMA_VERSION
        );
    }

    #[tokio::test]
    async fn test_matching_version_keeps_cache() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items_cache()
            .put_items("items-stock", &json!({"count": 5}))
            .await
            .unwrap();

        db.run_migrations().await.unwrap();

        assert!(db.items_cache().get_items("items-stock").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_closed_pool_reports_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
        assert!(db.sales_cache().entry_count().await.is_err());
    }
}
