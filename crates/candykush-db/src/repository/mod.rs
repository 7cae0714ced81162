//! # Repository Module
//!
//! Cache repositories for the Candy Kush companion.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller (sync job, dashboard, CLI)                                     │
//! │       │                                                                 │
//! │       │  db.sales_cache().get("sales-summary", ThisMonth, "2024-06")   │
//! │       ▼                                                                 │
//! │  SalesCacheRepository              ItemsCacheRepository                │
//! │  ├── put / get                     ├── put_items / get_items           │
//! │  ├── is_fresh / cache_age          └── is_items_fresh                  │
//! │  ├── list_date_keys                                                    │
//! │  ├── evict_older_than / evict_exact                                    │
//! │  └── entry_count / sync_progress / has_month_data                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sales_cache table                 items_cache table                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SalesCacheRepository`] - Reports keyed by `(kind, period, date_key)`
//! - [`ItemsCacheRepository`] - Stock lists keyed by a single string

pub mod items_cache;
pub mod sales_cache;

pub use items_cache::{CachedItems, ItemsCacheRepository};
pub use sales_cache::{CachedPayload, SalesCacheRepository, SyncProgress};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

/// Decodes a stored payload, treating corrupt JSON as a cache miss.
pub(crate) fn decode_payload(raw: &str, table: &'static str, key: &str) -> Option<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(table, key, error = %e, "Discarding malformed cached payload");
            None
        }
    }
}

/// Decodes a stored Unix-millisecond timestamp.
pub(crate) fn decode_stored_at(millis: i64, table: &'static str, key: &str) -> Option<DateTime<Utc>> {
    let decoded = DateTime::from_timestamp_millis(millis);
    if decoded.is_none() {
        warn!(table, key, millis, "Discarding cached row with invalid timestamp");
    }
    decoded
}

/// Current time truncated to the millisecond precision stored on disk.
pub(crate) fn now_millis() -> (DateTime<Utc>, i64) {
    let millis = Utc::now().timestamp_millis();
    // in range by construction, fall back to the untruncated clock otherwise
    let now = DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now);
    (now, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_payload_rejects_garbage() {
        assert!(decode_payload("{\"total\":100}", "sales_cache", "k").is_some());
        assert!(decode_payload("{not json", "sales_cache", "k").is_none());
        assert!(decode_payload("", "sales_cache", "k").is_none());
    }

    #[test]
    fn test_decode_stored_at_bounds() {
        assert_eq!(
            decode_stored_at(0, "items_cache", "k"),
            DateTime::from_timestamp(0, 0)
        );
        assert!(decode_stored_at(i64::MAX, "items_cache", "k").is_none());
    }

    #[test]
    fn test_now_millis_is_truncated() {
        let (now, millis) = now_millis();
        assert_eq!(now.timestamp_millis(), millis);
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
