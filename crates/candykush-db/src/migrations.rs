//! # Schema Management
//!
//! The cache schema is embedded in the binary and tracked with SQLite's
//! `PRAGMA user_version`.
//!
//! ## Upgrade Process
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Check on Startup                            │
//! │                                                                         │
//! │  PRAGMA user_version                                                   │
//! │       │                                                                 │
//! │       ├── == SCHEMA_VERSION  → CREATE ... IF NOT EXISTS (no-op)        │
//! │       │                                                                 │
//! │       └── != SCHEMA_VERSION  → DROP both tables                        │
//! │                                CREATE from 001_response_cache.sql      │
//! │                                PRAGMA user_version = SCHEMA_VERSION    │
//! │                                                                         │
//! │  Everything runs in one transaction. Cached data is disposable: it is  │
//! │  refetched from the REST backend on the next sync.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Changing the Schema
//!
//! 1. Edit `migrations/sqlite/001_response_cache.sql`
//! 2. Bump [`SCHEMA_VERSION`]
//! 3. Existing caches are wiped on the next start

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};

/// Current schema version; a mismatch wipes the cache.
pub const SCHEMA_VERSION: i64 = 2;

/// Embedded schema from the `migrations/sqlite` directory.
const SCHEMA_SQL: &str = include_str!("../../../migrations/sqlite/001_response_cache.sql");

const DROP_SQL: &str = r#"
    DROP TABLE IF EXISTS sales_cache;
    DROP TABLE IF EXISTS items_cache;
"#;

/// Creates the schema, wiping existing tables on a version mismatch.
///
/// ## Safety
/// - Idempotent: safe to run on every start
/// - Transactional: a failed upgrade leaves the old tables untouched
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let current = schema_version(pool).await?;
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    if current != SCHEMA_VERSION {
        if current != 0 {
            warn!(
                from = current,
                to = SCHEMA_VERSION,
                "Cache schema changed, dropping cached data"
            );
        }
        sqlx::raw_sql(DROP_SQL)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::SchemaFailed(e.to_string()))?;
    }

    sqlx::raw_sql(SCHEMA_SQL)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    // PRAGMA does not accept bound parameters
    sqlx::raw_sql(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    info!(version = SCHEMA_VERSION, "Cache schema ready");
    Ok(())
}

/// Returns the stored schema version (0 for a fresh database).
pub async fn schema_version(pool: &SqlitePool) -> DbResult<i64> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}
