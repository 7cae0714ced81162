//! # Reporting Periods
//!
//! Sales reports are cached per period type and per exact period. The
//! period type is a [`Period`]; the exact period is its *date key*.
//!
//! ## Date Key Shapes
//! ```text
//! ┌──────────────┬──────────────┬─────────────────────────────────────────┐
//! │ Period       │ Date key     │ Date range                              │
//! ├──────────────┼──────────────┼─────────────────────────────────────────┤
//! │ today        │ 2024-06-15   │ 2024-06-15 .. 2024-06-15                │
//! │ this_week    │ 2024-W24     │ Monday .. Sunday of ISO week 24         │
//! │ this_month   │ 2024-06      │ 2024-06-01 .. 2024-06-30                │
//! │ this_year    │ 2024         │ 2024-01-01 .. 2024-12-31                │
//! │ custom       │ caller-given │ caller-given (defaults to the day)      │
//! └──────────────┴──────────────┴─────────────────────────────────────────┘
//! ```

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Longest date key accepted for custom periods.
pub const MAX_CUSTOM_KEY_LEN: usize = 64;

// =============================================================================
// Period
// =============================================================================

/// The period type a cached report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    Custom,
}

impl Period {
    /// All periods, in display order.
    pub const ALL: [Period; 5] = [
        Period::Today,
        Period::ThisWeek,
        Period::ThisMonth,
        Period::ThisYear,
        Period::Custom,
    ];

    /// Returns the storage/wire name (`"this_month"` etc.).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::ThisWeek => "this_week",
            Period::ThisMonth => "this_month",
            Period::ThisYear => "this_year",
            Period::Custom => "custom",
        }
    }

    /// Derives the date key identifying the period that contains `date`.
    ///
    /// ## Example
    /// ```rust
    /// use candykush_core::Period;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    /// assert_eq!(Period::ThisMonth.date_key(date), "2024-06");
    /// assert_eq!(Period::ThisWeek.date_key(date), "2024-W24");
    /// ```
    pub fn date_key(&self, date: NaiveDate) -> String {
        match self {
            Period::Today | Period::Custom => date.format("%Y-%m-%d").to_string(),
            Period::ThisWeek => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::ThisMonth => date.format("%Y-%m").to_string(),
            Period::ThisYear => date.format("%Y").to_string(),
        }
    }

    /// Returns the first and last day of the period that contains `date`.
    pub fn date_range(&self, date: NaiveDate) -> DateRange {
        match self {
            Period::Today | Period::Custom => DateRange::single(date),
            Period::ThisWeek => {
                let offset = date.weekday().num_days_from_monday() as u64;
                let start = date - chrono::Days::new(offset);
                DateRange {
                    start,
                    end: start + chrono::Days::new(6),
                }
            }
            Period::ThisMonth => {
                let start = date.with_day(1).unwrap_or(date);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(date);
                DateRange { start, end }
            }
            Period::ThisYear => DateRange {
                start: NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
                end: NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date),
            },
        }
    }

    /// Parses a date key back to the first day of its period.
    ///
    /// Returns `None` for malformed keys and for custom keys, which are
    /// free-form.
    pub fn parse_date_key(&self, key: &str) -> Option<NaiveDate> {
        let date = match self {
            Period::Today => NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()?,
            Period::ThisWeek => {
                let (year, week) = key.split_once("-W")?;
                NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)?
            }
            Period::ThisMonth => {
                NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d").ok()?
            }
            Period::ThisYear => NaiveDate::from_ymd_opt(key.parse().ok()?, 1, 1)?,
            Period::Custom => return None,
        };

        // Reject non-canonical spellings such as "2024-6"
        (self.date_key(date) == key).then_some(date)
    }

    /// Checks that `key` is a canonical date key for this period.
    pub fn is_valid_date_key(&self, key: &str) -> bool {
        match self {
            Period::Custom => !key.trim().is_empty() && key.len() <= MAX_CUSTOM_KEY_LEN,
            _ => self.parse_date_key(key).is_some(),
        }
    }

    /// Checks whether `key` names the period containing `today`.
    ///
    /// Current periods are still changing and get a shorter cache lifetime.
    pub fn is_current(&self, key: &str, today: NaiveDate) -> bool {
        self.date_key(today) == key
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "day" => Ok(Period::Today),
            "this_week" | "week" => Ok(Period::ThisWeek),
            "this_month" | "month" => Ok(Period::ThisMonth),
            "this_year" | "year" => Ok(Period::ThisYear),
            "custom" => Ok(Period::Custom),
            other => Err(CoreError::UnknownPeriod(other.to_string())),
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive date range sent to the reports API and stored next to the
/// cached payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl DateRange {
    /// A range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        DateRange {
            start: date,
            end: date,
        }
    }

    /// Number of days in the range (inclusive).
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
