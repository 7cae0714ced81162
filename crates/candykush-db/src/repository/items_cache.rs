//! # Items Cache Repository
//!
//! Stock and item lists keyed by a single string such as `items-stock`.
//! Same last-write-wins semantics as the sales table, without dates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::debug;

use candykush_core::freshness;
use candykush_core::validation::validate_items_key;

use super::{decode_payload, decode_stored_at, now_millis};
use crate::error::DbResult;

const TABLE: &str = "items_cache";

/// A cached item list as read back from the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedItems {
    pub payload: Value,
    pub stored_at: DateTime<Utc>,
}

/// Repository for the items cache.
#[derive(Debug, Clone)]
pub struct ItemsCacheRepository {
    pool: SqlitePool,
}

impl ItemsCacheRepository {
    /// Creates a new ItemsCacheRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemsCacheRepository { pool }
    }

    /// Stores a payload under `key`, replacing any previous one.
    pub async fn put_items(&self, key: &str, payload: &Value) -> DbResult<DateTime<Utc>> {
        validate_items_key(key)?;

        let body = serde_json::to_string(payload)?;
        let (stored_at, millis) = now_millis();

        sqlx::query(
            r#"
            INSERT INTO items_cache (key, payload, stored_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE SET
                payload = excluded.payload,
                stored_at = excluded.stored_at
            "#,
        )
        .bind(key)
        .bind(&body)
        .bind(millis)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = body.len(), "Cached items payload");
        Ok(stored_at)
    }

    /// Reads the payload stored under `key`.
    ///
    /// Corrupt JSON and keys that were never stored read as `None`.
    pub async fn get_items(&self, key: &str) -> DbResult<Option<CachedItems>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT payload, stored_at FROM items_cache WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        let Some((raw, millis)) = row else {
            return Ok(None);
        };

        let cached = decode_payload(&raw, TABLE, key).zip(decode_stored_at(millis, TABLE, key));
        Ok(cached.map(|(payload, stored_at)| CachedItems { payload, stored_at }))
    }

    /// Checks whether `key` exists and is younger than `max_age`.
    ///
    /// Stock lists are usually checked against
    /// [`FreshnessPolicy::STOCK`](candykush_core::FreshnessPolicy::STOCK).
    pub async fn is_items_fresh(&self, key: &str, max_age: Duration) -> DbResult<bool> {
        let fresh = self
            .get_items(key)
            .await?
            .is_some_and(|cached| freshness::is_fresh(cached.stored_at, Utc::now(), max_age));
        Ok(fresh)
    }

    /// Number of rows in the items table.
    pub async fn entry_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items_cache")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
