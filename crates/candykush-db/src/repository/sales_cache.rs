//! # Sales Cache Repository
//!
//! Stores report payloads keyed by what they cover.
//!
//! ## Composite Key
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   kind             period       date_key     →  payload, stored_at     │
//! │   ─────────────    ──────────   ──────────      ─────────────────────  │
//! │   sales-summary    this_month   2024-06         {"total": 100, ...}    │
//! │   sales-summary    this_month   2024-05         {"total": 870, ...}    │
//! │   sales-by-item    this_week    2024-W23        [...]                  │
//! │   sales-summary    today        2024-06-15      {...}                  │
//! │                                                                         │
//! │   One row per key. A second put replaces the first (last write wins).  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Freshness
//! The table keeps no TTL. Callers pass the max age they accept, usually
//! one of [`FreshnessPolicy`](candykush_core::FreshnessPolicy)'s constants,
//! and the repository compares it with `now - stored_at`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{debug, info};

use candykush_core::validation::{validate_cache_kind, validate_date_key, validate_max_age_days};
use candykush_core::{freshness, kinds, Period};

use super::{decode_payload, decode_stored_at, now_millis};
use crate::error::DbResult;

const TABLE: &str = "sales_cache";
const DATE_FORMAT: &str = "%Y-%m-%d";
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// =============================================================================
// Row Types
// =============================================================================

/// A cached report as read back from the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedPayload {
    /// The JSON body exactly as it was stored.
    pub payload: Value,
    /// First day covered, when the writer supplied one.
    pub start_date: Option<NaiveDate>,
    /// Last day covered, when the writer supplied one.
    pub end_date: Option<NaiveDate>,
    /// When the row was written (millisecond precision).
    pub stored_at: DateTime<Utc>,
}

/// How much history the background sync has cached for one kind/period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncProgress {
    /// Number of distinct date keys cached.
    pub count: usize,
    /// The cached date keys, newest first.
    pub date_keys: Vec<String>,
}

type SalesRow = (String, Option<String>, Option<String>, i64);

// =============================================================================
// Repository
// =============================================================================

/// Repository for the dated sales cache.
#[derive(Debug, Clone)]
pub struct SalesCacheRepository {
    pool: SqlitePool,
}

impl SalesCacheRepository {
    /// Creates a new SalesCacheRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesCacheRepository { pool }
    }

    /// Stores a payload, replacing any row with the same key.
    ///
    /// ## Arguments
    /// * `kind` - Report family, e.g. `sales-summary`
    /// * `period` - Period type the report was requested for
    /// * `date_key` - Key within `period`, usually canonical (`2024-06`, `2024-W23`)
    /// * `start_date` / `end_date` - Range the report covers, if known
    /// * `payload` - Response body
    ///
    /// ## Returns
    /// The `stored_at` timestamp written to the row. The write is committed
    /// before this returns.
    pub async fn put(
        &self,
        kind: &str,
        period: Period,
        date_key: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        payload: &Value,
    ) -> DbResult<DateTime<Utc>> {
        validate_cache_kind(kind)?;
        validate_date_key(date_key)?;
        if !period.is_valid_date_key(date_key) {
            debug!(period = %period, date_key = %date_key, "Storing non-canonical date key");
        }

        let body = serde_json::to_string(payload)?;
        let (stored_at, millis) = now_millis();

        sqlx::query(
            r#"
            INSERT INTO sales_cache (kind, period, date_key, payload, start_date, end_date, stored_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (kind, period, date_key) DO UPDATE SET
                payload = excluded.payload,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                stored_at = excluded.stored_at
            "#,
        )
        .bind(kind)
        .bind(period)
        .bind(date_key)
        .bind(&body)
        .bind(start_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(end_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(millis)
        .execute(&self.pool)
        .await?;

        debug!(
            kind = %kind,
            period = %period,
            date_key = %date_key,
            bytes = body.len(),
            "Cached sales payload"
        );

        Ok(stored_at)
    }

    /// Reads the payload stored under an exact key.
    ///
    /// Returns `None` when the row is missing or its JSON no longer parses.
    /// Keys are matched verbatim, so a key that was never stored is a miss.
    pub async fn get(
        &self,
        kind: &str,
        period: Period,
        date_key: &str,
    ) -> DbResult<Option<CachedPayload>> {
        let row: Option<SalesRow> = sqlx::query_as(
            r#"
            SELECT payload, start_date, end_date, stored_at
            FROM sales_cache
            WHERE kind = ? AND period = ? AND date_key = ?
            "#,
        )
        .bind(kind)
        .bind(period)
        .bind(date_key)
        .fetch_optional(&self.pool)
        .await?;

        let Some((raw, start_date, end_date, millis)) = row else {
            return Ok(None);
        };

        let Some(payload) = decode_payload(&raw, TABLE, date_key) else {
            return Ok(None);
        };
        let Some(stored_at) = decode_stored_at(millis, TABLE, date_key) else {
            return Ok(None);
        };

        Ok(Some(CachedPayload {
            payload,
            start_date: start_date.as_deref().and_then(parse_date),
            end_date: end_date.as_deref().and_then(parse_date),
            stored_at,
        }))
    }

    /// Checks whether a row exists and is younger than `max_age`.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let fresh = db
    ///     .sales_cache()
    ///     .is_fresh("sales-summary", Period::ThisMonth, "2024-06", FreshnessPolicy::CURRENT)
    ///     .await?;
    /// if !fresh {
    ///     // refetch from the API
    /// }
    /// ```
    pub async fn is_fresh(
        &self,
        kind: &str,
        period: Period,
        date_key: &str,
        max_age: Duration,
    ) -> DbResult<bool> {
        let fresh = self
            .get(kind, period, date_key)
            .await?
            .is_some_and(|cached| freshness::is_fresh(cached.stored_at, Utc::now(), max_age));
        Ok(fresh)
    }

    /// Age of a cached row, or `None` if it is absent.
    ///
    /// Rows stamped in the future (clock moved back) report zero.
    pub async fn cache_age(
        &self,
        kind: &str,
        period: Period,
        date_key: &str,
    ) -> DbResult<Option<Duration>> {
        let age = self.get(kind, period, date_key).await?.map(|cached| {
            freshness::age(cached.stored_at, Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO)
        });
        Ok(age)
    }

    /// Lists the distinct date keys cached for a kind and period, newest first.
    pub async fn list_date_keys(&self, kind: &str, period: Period) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT date_key
            FROM sales_cache
            WHERE kind = ? AND period = ?
            ORDER BY date_key DESC
            "#,
        )
        .bind(kind)
        .bind(period)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    /// Deletes sales rows stored more than `max_age_days` days ago.
    ///
    /// The items table is not touched. Returns the number of rows deleted.
    pub async fn evict_older_than(&self, max_age_days: i64) -> DbResult<u64> {
        validate_max_age_days(max_age_days)?;

        let (_, now) = now_millis();
        let cutoff = now - max_age_days * MILLIS_PER_DAY;

        let result = sqlx::query("DELETE FROM sales_cache WHERE stored_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        info!(
            max_age_days,
            evicted = result.rows_affected(),
            "Evicted stale sales cache rows"
        );
        Ok(result.rows_affected())
    }

    /// Deletes every sales row for `date_key`, across all kinds and periods.
    pub async fn evict_exact(&self, date_key: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sales_cache WHERE date_key = ?")
            .bind(date_key)
            .execute(&self.pool)
            .await?;

        info!(
            date_key = %date_key,
            evicted = result.rows_affected(),
            "Evicted sales cache rows"
        );
        Ok(result.rows_affected())
    }

    /// Total number of rows in the sales table.
    pub async fn entry_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_cache")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Months of `sales-summary` history cached by the background sync.
    pub async fn sync_progress(&self) -> DbResult<SyncProgress> {
        self.progress_for(kinds::SALES_SUMMARY, Period::ThisMonth)
            .await
    }

    /// Cached history for any kind and period.
    pub async fn progress_for(&self, kind: &str, period: Period) -> DbResult<SyncProgress> {
        let date_keys = self.list_date_keys(kind, period).await?;
        Ok(SyncProgress {
            count: date_keys.len(),
            date_keys,
        })
    }

    /// Checks whether the `sales-summary` for a calendar month is cached.
    ///
    /// Months outside 1..=12 are never cached.
    pub async fn has_month_data(&self, year: i32, month: u32) -> DbResult<bool> {
        let date_key = format!("{:04}-{:02}", year, month);
        let cached = self
            .get(kinds::SALES_SUMMARY, Period::ThisMonth, &date_key)
            .await?;
        Ok(cached.is_some())
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use candykush_core::FreshnessPolicy;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn backdate(db: &Database, date_key: &str, by: Duration) {
        let by_millis = i64::try_from(by.as_millis()).unwrap();
        sqlx::query("UPDATE sales_cache SET stored_at = stored_at - ? WHERE date_key = ?")
            .bind(by_millis)
            .bind(date_key)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let db = setup().await;
        let repo = db.sales_cache();
        let before = Utc::now() - chrono::TimeDelta::milliseconds(1);

        let stored_at = repo
            .put(
                "sales-summary",
                Period::ThisMonth,
                "2024-06",
                ymd(2024, 6, 1),
                ymd(2024, 6, 30),
                &json!({"total": 100}),
            )
            .await
            .unwrap();

        let cached = repo
            .get("sales-summary", Period::ThisMonth, "2024-06")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.payload, json!({"total": 100}));
        assert_eq!(cached.start_date, ymd(2024, 6, 1));
        assert_eq!(cached.end_date, ymd(2024, 6, 30));
        assert_eq!(cached.stored_at, stored_at);
        assert!(cached.stored_at >= before);
    }

    #[tokio::test]
    async fn test_get_is_exact_match() {
        let db = setup().await;
        let repo = db.sales_cache();
        repo.put("sales-summary", Period::ThisMonth, "2024-06", None, None, &json!(1))
            .await
            .unwrap();

        assert!(repo
            .get("sales-summary", Period::ThisMonth, "2024-05")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .get("sales-by-item", Period::ThisMonth, "2024-06")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .get("sales-summary", Period::ThisYear, "2024")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_second_put_replaces() {
        let db = setup().await;
        let repo = db.sales_cache();

        repo.put("sales-summary", Period::ThisMonth, "2024-06", None, None, &json!({"total": 1}))
            .await
            .unwrap();
        repo.put(
            "sales-summary",
            Period::ThisMonth,
            "2024-06",
            ymd(2024, 6, 1),
            None,
            &json!({"total": 2}),
        )
        .await
        .unwrap();

        let cached = repo
            .get("sales-summary", Period::ThisMonth, "2024-06")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.payload, json!({"total": 2}));
        assert_eq!(cached.start_date, ymd(2024, 6, 1));
        assert_eq!(repo.entry_count().await.unwrap(), 1);
        assert_eq!(
            repo.list_date_keys("sales-summary", Period::ThisMonth)
                .await
                .unwrap(),
            vec!["2024-06".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fresh_within_max_age_then_stale() {
        let db = setup().await;
        let repo = db.sales_cache();
        let five_minutes = Duration::from_millis(300_000);

        repo.put(
            "sales-summary",
            Period::ThisMonth,
            "2024-06",
            ymd(2024, 6, 1),
            ymd(2024, 6, 30),
            &json!({"total": 100}),
        )
        .await
        .unwrap();
        assert!(repo
            .is_fresh("sales-summary", Period::ThisMonth, "2024-06", five_minutes)
            .await
            .unwrap());

        backdate(&db, "2024-06", Duration::from_secs(10 * 60)).await;
        assert!(!repo
            .is_fresh("sales-summary", Period::ThisMonth, "2024-06", five_minutes)
            .await
            .unwrap());
        assert!(repo
            .is_fresh("sales-summary", Period::ThisMonth, "2024-06", FreshnessPolicy::HISTORICAL)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_absent_row_is_never_fresh() {
        let db = setup().await;
        let repo = db.sales_cache();

        assert!(!repo
            .is_fresh("sales-summary", Period::Today, "2024-06-15", FreshnessPolicy::HISTORICAL)
            .await
            .unwrap());
        assert!(repo
            .cache_age("sales-summary", Period::Today, "2024-06-15")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_cache_age_tracks_stored_at() {
        let db = setup().await;
        let repo = db.sales_cache();
        repo.put("sales-summary", Period::ThisWeek, "2024-W23", None, None, &json!({}))
            .await
            .unwrap();
        backdate(&db, "2024-W23", Duration::from_secs(90)).await;

        let age = repo
            .cache_age("sales-summary", Period::ThisWeek, "2024-W23")
            .await
            .unwrap()
            .unwrap();
        assert!(age >= Duration::from_secs(90));
        assert!(age < Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_malformed_payload_reads_as_absent() {
        let db = setup().await;
        let repo = db.sales_cache();
        repo.put("sales-summary", Period::ThisMonth, "2024-06", None, None, &json!({"total": 1}))
            .await
            .unwrap();

        sqlx::query("UPDATE sales_cache SET payload = '{broken' WHERE date_key = '2024-06'")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(repo
            .get("sales-summary", Period::ThisMonth, "2024-06")
            .await
            .unwrap()
            .is_none());
        assert!(!repo
            .is_fresh("sales-summary", Period::ThisMonth, "2024-06", FreshnessPolicy::HISTORICAL)
            .await
            .unwrap());
        assert!(!repo.has_month_data(2024, 6).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_date_keys_descending() {
        let db = setup().await;
        let repo = db.sales_cache();
        for key in ["2024-04", "2024-06", "2024-05"] {
            repo.put("sales-summary", Period::ThisMonth, key, None, None, &json!({}))
                .await
                .unwrap();
        }
        repo.put("sales-summary", Period::ThisYear, "2024", None, None, &json!({}))
            .await
            .unwrap();

        assert_eq!(
            repo.list_date_keys("sales-summary", Period::ThisMonth)
                .await
                .unwrap(),
            vec!["2024-06", "2024-05", "2024-04"]
        );
        assert!(repo
            .list_date_keys("sales-by-item", Period::ThisMonth)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_evict_older_than_only_removes_old_sales() {
        let db = setup().await;
        let repo = db.sales_cache();
        repo.put("sales-summary", Period::ThisMonth, "2024-01", None, None, &json!({}))
            .await
            .unwrap();
        repo.put("sales-summary", Period::ThisMonth, "2024-06", None, None, &json!({}))
            .await
            .unwrap();
        db.items_cache()
            .put_items("items-stock", &json!([]))
            .await
            .unwrap();
        sqlx::query("UPDATE items_cache SET stored_at = 0")
            .execute(db.pool())
            .await
            .unwrap();
        backdate(&db, "2024-01", Duration::from_secs(40 * 24 * 60 * 60)).await;

        assert_eq!(repo.evict_older_than(30).await.unwrap(), 1);
        assert_eq!(
            repo.list_date_keys("sales-summary", Period::ThisMonth)
                .await
                .unwrap(),
            vec!["2024-06"]
        );
        assert!(db.items_cache().get_items("items-stock").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_evict_older_than_rejects_negative_days() {
        let db = setup().await;
        let err = db.sales_cache().evict_older_than(-1).await.unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_evict_exact_spans_kinds() {
        let db = setup().await;
        let repo = db.sales_cache();
        repo.put("sales-summary", Period::ThisMonth, "2024-06", None, None, &json!({}))
            .await
            .unwrap();
        repo.put("sales-by-item", Period::ThisMonth, "2024-06", None, None, &json!([]))
            .await
            .unwrap();
        repo.put("sales-summary", Period::ThisMonth, "2024-05", None, None, &json!({}))
            .await
            .unwrap();

        assert_eq!(repo.evict_exact("2024-06").await.unwrap(), 2);
        assert_eq!(repo.evict_exact("2024-06").await.unwrap(), 0);
        assert_eq!(repo.entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sync_progress_counts_summary_months() {
        let db = setup().await;
        let repo = db.sales_cache();
        for key in ["2024-05", "2024-06"] {
            repo.put("sales-summary", Period::ThisMonth, key, None, None, &json!({}))
                .await
                .unwrap();
        }
        repo.put("sales-by-item", Period::ThisMonth, "2024-04", None, None, &json!({}))
            .await
            .unwrap();

        let progress = repo.sync_progress().await.unwrap();
        assert_eq!(progress.count, 2);
        assert_eq!(progress.date_keys, vec!["2024-06", "2024-05"]);

        let weekly = repo
            .progress_for("sales-summary", Period::ThisWeek)
            .await
            .unwrap();
        assert_eq!(weekly.count, 0);
    }

    #[tokio::test]
    async fn test_has_month_data() {
        let db = setup().await;
        let repo = db.sales_cache();
        repo.put("sales-summary", Period::ThisMonth, "2024-06", None, None, &json!({}))
            .await
            .unwrap();

        assert!(repo.has_month_data(2024, 6).await.unwrap());
        assert!(!repo.has_month_data(2024, 7).await.unwrap());
        assert!(!repo.has_month_data(2024, 13).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_blank_and_oversized_keys() {
        let db = setup().await;
        let repo = db.sales_cache();

        let err = repo
            .put(" ", Period::ThisMonth, "2024-06", None, None, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
        assert!(repo
            .put("sales-summary", Period::Custom, "", None, None, &json!({}))
            .await
            .is_err());
        assert!(repo
            .put("sales-summary", Period::Custom, &"k".repeat(65), None, None, &json!({}))
            .await
            .is_err());
        assert_eq!(repo.entry_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_canonical_lookup_is_a_miss() {
        let db = setup().await;
        let repo = db.sales_cache();

        assert!(repo
            .get("sales-summary", Period::ThisWeek, "2024-w23")
            .await
            .unwrap()
            .is_none());
        assert!(!repo
            .is_fresh("sales-summary", Period::ThisWeek, "2024-w23", FreshnessPolicy::HISTORICAL)
            .await
            .unwrap());
        assert!(repo
            .cache_age("Sales Summary", Period::ThisMonth, "")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .list_date_keys("Sales Summary", Period::ThisMonth)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_arbitrary_keys_round_trip() {
        let db = setup().await;
        let repo = db.sales_cache();

        repo.put("Invoices", Period::ThisWeek, "2024-w23", None, None, &json!({"n": 7}))
            .await
            .unwrap();
        repo.put("sales.by.item", Period::ThisMonth, "2024-06-15", None, None, &json!([]))
            .await
            .unwrap();

        let cached = repo
            .get("Invoices", Period::ThisWeek, "2024-w23")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.payload, json!({"n": 7}));
        assert!(repo
            .is_fresh("Invoices", Period::ThisWeek, "2024-w23", FreshnessPolicy::CURRENT)
            .await
            .unwrap());
        // Verbatim match: the canonical spelling is a different key
        assert!(repo
            .get("Invoices", Period::ThisWeek, "2024-W23")
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            repo.list_date_keys("sales.by.item", Period::ThisMonth)
                .await
                .unwrap(),
            vec!["2024-06-15"]
        );
    }

    #[tokio::test]
    async fn test_custom_period_accepts_free_form_keys() {
        let db = setup().await;
        let repo = db.sales_cache();
        repo.put(
            "sales-summary",
            Period::Custom,
            "2024-06-01_2024-06-10",
            ymd(2024, 6, 1),
            ymd(2024, 6, 10),
            &json!({"total": 42}),
        )
        .await
        .unwrap();

        let cached = repo
            .get("sales-summary", Period::Custom, "2024-06-01_2024-06-10")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.payload["total"], 42);
    }
}
