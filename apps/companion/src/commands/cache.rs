//! # Cache Commands
//!
//! Inspect and prune the response cache from the shell.
//!
//! Each command returns the text to print so the CLI layer stays a thin
//! wrapper and the output can be asserted in tests.

use chrono::{Datelike, NaiveDate};

use candykush_core::{format, FreshnessPolicy, Period};
use candykush_db::Database;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Default age threshold of `cache evict`, in days.
pub const DEFAULT_EVICT_DAYS: i64 = 30;

/// Summarises what the cache holds.
pub async fn stats(db: &Database, today: NaiveDate) -> AppResult<String> {
    let sales = db.sales_cache();
    let sales_count = sales.entry_count().await?;
    let items_count = db.items_cache().entry_count().await?;
    let progress = sales.sync_progress().await?;
    let current_month = sales.has_month_data(today.year(), today.month()).await?;

    let synced = match (progress.date_keys.first(), progress.date_keys.last()) {
        (Some(newest), Some(oldest)) => format!("{} ({} .. {})", progress.count, newest, oldest),
        _ => "0".to_string(),
    };
    let health = if db.health_check().await { "ok" } else { "unavailable" };

    let lines = [
        format!("Sales entries:  {}", format::integer(sales_count)),
        format!("Items entries:  {}", format::integer(items_count)),
        format!("Synced months:  {}", synced),
        format!(
            "Current month:  {}",
            if current_month { "cached" } else { "missing" }
        ),
        format!("Database:       {}", health),
    ];
    Ok(lines.join("\n"))
}

/// Deletes one date key, or everything older than `days`.
pub async fn evict(db: &Database, days: Option<i64>, date_key: Option<&str>) -> AppResult<String> {
    let sales = db.sales_cache();
    let evicted = match date_key {
        Some(key) => {
            if key.trim().is_empty() {
                return Err(AppError::validation("date key must not be empty"));
            }
            sales.evict_exact(key).await?
        }
        None => {
            sales
                .evict_older_than(days.unwrap_or(DEFAULT_EVICT_DAYS))
                .await?
        }
    };
    Ok(format!("Evicted {} rows", format::integer(evicted as i64)))
}

/// Empties both tables. Refuses without explicit confirmation.
pub async fn clear(db: &Database, confirmed: bool) -> AppResult<String> {
    if !confirmed {
        return Err(AppError::validation(
            "clearing the cache cannot be undone, pass --yes to confirm",
        ));
    }
    let removed = db.clear_all().await?;
    info!(removed, "Cache cleared from CLI");
    Ok(format!("Removed {} rows", format::integer(removed as i64)))
}

/// Lists cached date keys for a kind and period.
pub async fn keys(db: &Database, kind: &str, period: Period) -> AppResult<String> {
    let keys = db.sales_cache().list_date_keys(kind, period).await?;
    if keys.is_empty() {
        return Ok(format!("No {} entries for {}", kind, period));
    }
    Ok(keys.join("\n"))
}

/// Prints one cached report with its age and freshness.
///
/// Freshness uses the current-period threshold when `date_key` is the
/// period containing `today`, and the historical one otherwise.
pub async fn show(
    db: &Database,
    kind: &str,
    period: Period,
    date_key: &str,
    today: NaiveDate,
) -> AppResult<String> {
    let sales = db.sales_cache();
    let Some(cached) = sales.get(kind, period, date_key).await? else {
        return Ok(format!("No cached {} for {} {}", kind, period, date_key));
    };

    let max_age = FreshnessPolicy::max_age_for(period.is_current(date_key, today));
    let age = sales
        .cache_age(kind, period, date_key)
        .await?
        .unwrap_or_default();
    let fresh = age < max_age;

    let mut lines = vec![
        format!("Stored:  {}", cached.stored_at.to_rfc3339()),
        format!(
            "Age:     {}s ({}, limit {}s)",
            age.as_secs(),
            if fresh { "fresh" } else { "stale" },
            max_age.as_secs()
        ),
    ];
    if let (Some(start), Some(end)) = (cached.start_date, cached.end_date) {
        lines.push(format!("Range:   {} .. {}", start, end));
    }
    lines.push(serde_json::to_string_pretty(&cached.payload)?);
    Ok(lines.join("\n"))
}

/// Prints a cached item list and whether it is still fresh for stock use.
pub async fn items(db: &Database, key: &str) -> AppResult<String> {
    let repo = db.items_cache();
    let Some(cached) = repo.get_items(key).await? else {
        return Ok(format!("No cached items for {}", key));
    };
    let fresh = repo.is_items_fresh(key, FreshnessPolicy::STOCK).await?;

    Ok(format!(
        "Stored:  {} ({})\n{}",
        cached.stored_at.to_rfc3339(),
        if fresh { "fresh" } else { "stale" },
        serde_json::to_string_pretty(&cached.payload)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use candykush_db::DbConfig;
    use serde_json::json;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    async fn seed(db: &Database) {
        for key in ["2024-04", "2024-05", "2024-06"] {
            db.sales_cache()
                .put("sales-summary", Period::ThisMonth, key, None, None, &json!({"total": 1}))
                .await
                .unwrap();
        }
        db.items_cache()
            .put_items("items-stock", &json!([{"sku": "A1"}]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_stats_on_empty_cache() {
        let db = setup().await;
        let out = stats(&db, june_15()).await.unwrap();

        assert!(out.contains("Sales entries:  0"));
        assert!(out.contains("Synced months:  0"));
        assert!(out.contains("Current month:  missing"));
    }

    #[tokio::test]
    async fn test_stats_reports_progress() {
        let db = setup().await;
        seed(&db).await;
        let out = stats(&db, june_15()).await.unwrap();

        assert!(out.contains("Sales entries:  3"));
        assert!(out.contains("Items entries:  1"));
        assert!(out.contains("Synced months:  3 (2024-06 .. 2024-04)"));
        assert!(out.contains("Current month:  cached"));
        assert!(out.contains("Database:       ok"));
    }

    #[tokio::test]
    async fn test_evict_by_date_key() {
        let db = setup().await;
        seed(&db).await;

        assert_eq!(evict(&db, None, Some("2024-05")).await.unwrap(), "Evicted 1 rows");
        assert_eq!(
            keys(&db, "sales-summary", Period::ThisMonth).await.unwrap(),
            "2024-06\n2024-04"
        );
    }

    #[tokio::test]
    async fn test_evict_by_age_keeps_recent() {
        let db = setup().await;
        seed(&db).await;

        sqlx::query("UPDATE sales_cache SET stored_at = 0 WHERE date_key = '2024-04'")
            .execute(db.pool())
            .await
            .unwrap();

        assert_eq!(evict(&db, Some(30), None).await.unwrap(), "Evicted 1 rows");
        assert_eq!(evict(&db, None, None).await.unwrap(), "Evicted 0 rows");
    }

    #[tokio::test]
    async fn test_evict_rejects_bad_days() {
        let db = setup().await;
        let err = evict(&db, Some(-5), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let db = setup().await;
        seed(&db).await;

        let err = clear(&db, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.sales_cache().entry_count().await.unwrap(), 3);

        assert_eq!(clear(&db, true).await.unwrap(), "Removed 4 rows");
    }

    #[tokio::test]
    async fn test_keys_empty_message() {
        let db = setup().await;
        assert_eq!(
            keys(&db, "sales-by-item", Period::ThisWeek).await.unwrap(),
            "No sales-by-item entries for this_week"
        );
    }

    #[tokio::test]
    async fn test_show_current_and_historical() {
        let db = setup().await;
        seed(&db).await;

        let current = show(&db, "sales-summary", Period::ThisMonth, "2024-06", june_15())
            .await
            .unwrap();
        assert!(current.contains("fresh, limit 120s"));
        assert!(current.contains("\"total\": 1"));

        let historical = show(&db, "sales-summary", Period::ThisMonth, "2024-04", june_15())
            .await
            .unwrap();
        assert!(historical.contains("limit 86400s"));

        let missing = show(&db, "sales-summary", Period::ThisMonth, "2023-01", june_15())
            .await
            .unwrap();
        assert_eq!(missing, "No cached sales-summary for this_month 2023-01");
    }

    #[tokio::test]
    async fn test_show_reports_backdated_age() {
        let db = setup().await;
        seed(&db).await;
        sqlx::query("UPDATE sales_cache SET stored_at = stored_at - 200000 WHERE date_key = '2024-06'")
            .execute(db.pool())
            .await
            .unwrap();

        let out = show(&db, "sales-summary", Period::ThisMonth, "2024-06", june_15())
            .await
            .unwrap();
        assert!(out.contains("Age:     20"));
        assert!(out.contains("stale, limit 120s"));
    }

    #[tokio::test]
    async fn test_show_legacy_week_key() {
        let db = setup().await;
        db.sales_cache()
            .put("sales-summary", Period::ThisWeek, "2024-w23", None, None, &json!({"total": 9}))
            .await
            .unwrap();

        let out = show(&db, "sales-summary", Period::ThisWeek, "2024-w23", june_15())
            .await
            .unwrap();
        assert!(out.contains("\"total\": 9"));
        assert_eq!(
            show(&db, "sales-summary", Period::ThisWeek, "2024-w24", june_15())
                .await
                .unwrap(),
            "No cached sales-summary for this_week 2024-w24"
        );
    }

    #[tokio::test]
    async fn test_items_freshness() {
        let db = setup().await;
        seed(&db).await;

        let out = items(&db, "items-stock").await.unwrap();
        assert!(out.contains("(fresh)"));
        assert!(out.contains("\"sku\": \"A1\""));
        assert_eq!(
            items(&db, "items-other").await.unwrap(),
            "No cached items for items-other"
        );
    }
}
