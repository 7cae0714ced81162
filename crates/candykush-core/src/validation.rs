//! # Validation Module
//!
//! Input validation for cache keys and maintenance arguments.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / caller                                                 │
//! │  └── Type validation (clap, serde)                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Keys are present and bounded                                      │
//! │  └── Eviction window is sane                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  └── UNIQUE(kind, period, date_key), NOT NULL                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest cache kind, date key or items key accepted, in bytes.
pub const MAX_KEY_LEN: usize = 64;

/// Upper bound for `evict --days`; ten years of history.
pub const MAX_EVICT_DAYS: i64 = 3650;

// =============================================================================
// Key Validators
// =============================================================================
//
// Keys are opaque to the cache. Any non-blank string up to MAX_KEY_LEN is
// stored as given; lookups never validate, they simply miss.

/// Validates a cache kind such as `sales-summary`.
///
/// ## Rules
/// - Must not be blank
/// - At most 64 bytes
///
/// ## Example
/// ```rust
/// use candykush_core::validation::validate_cache_kind;
///
/// assert!(validate_cache_kind("Invoices").is_ok());
/// assert!(validate_cache_kind("  ").is_err());
/// ```
pub fn validate_cache_kind(kind: &str) -> ValidationResult<()> {
    validate_key("kind", kind)
}

/// Validates a key of the singular items table.
pub fn validate_items_key(key: &str) -> ValidationResult<()> {
    validate_key("key", key)
}

/// Validates a date key before it is written.
///
/// Canonical keys (`2024-06`, `2024-W23`) and legacy spellings such as
/// `2024-w23` are both accepted.
///
/// ## Example
/// ```rust
/// use candykush_core::validation::validate_date_key;
///
/// assert!(validate_date_key("2024-w23").is_ok());
/// assert!(validate_date_key("").is_err());
/// ```
pub fn validate_date_key(key: &str) -> ValidationResult<()> {
    validate_key("date_key", key)
}

fn validate_key(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_KEY_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the age threshold of a bulk eviction.
pub fn validate_max_age_days(days: i64) -> ValidationResult<()> {
    if !(0..=MAX_EVICT_DAYS).contains(&days) {
        return Err(ValidationError::OutOfRange {
            field: "days".to_string(),
            min: 0,
            max: MAX_EVICT_DAYS,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
