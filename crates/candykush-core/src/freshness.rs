//! # Cache Freshness
//!
//! The cache keeps no TTL state. Whether an entry is fresh is decided by the
//! caller, from the entry's `stored_at` and a maximum age:
//!
//! ```text
//!   stored_at                      now
//!      │◄──────────── age ───────────►│
//!      │◄──────── max_age ────────►│
//!                                  ▲
//!                    fresh while age < max_age
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Returns how long ago `stored_at` was, relative to `now`.
///
/// A `stored_at` in the future (clock moved backwards) yields a negative age.
pub fn age(stored_at: DateTime<Utc>, now: DateTime<Utc>) -> TimeDelta {
    now - stored_at
}

/// Checks whether an entry stored at `stored_at` is still fresh at `now`.
///
/// ## Example
/// ```rust
/// use candykush_core::freshness::is_fresh;
/// use chrono::{TimeDelta, Utc};
/// use std::time::Duration;
///
/// let now = Utc::now();
/// let five_minutes = Duration::from_secs(300);
/// assert!(is_fresh(now - TimeDelta::minutes(4), now, five_minutes));
/// assert!(!is_fresh(now - TimeDelta::minutes(10), now, five_minutes));
/// ```
pub fn is_fresh(stored_at: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    match TimeDelta::from_std(max_age) {
        Ok(max_age) => age(stored_at, now) < max_age,
        // Larger than chrono can represent: nothing is that old
        Err(_) => true,
    }
}

// =============================================================================
// Freshness Policy
// =============================================================================

/// Maximum ages used by the background sync.
pub struct FreshnessPolicy;

impl FreshnessPolicy {
    /// Reports for a period that is still running (today, this month).
    pub const CURRENT: Duration = Duration::from_secs(2 * 60);

    /// Reports for closed periods; they only change on late corrections.
    pub const HISTORICAL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Stock levels.
    pub const STOCK: Duration = Duration::from_secs(5 * 60);

    /// Picks the report max age depending on whether the period is current.
    pub const fn max_age_for(is_current: bool) -> Duration {
        if is_current {
            Self::CURRENT
        } else {
            Self::HISTORICAL
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
