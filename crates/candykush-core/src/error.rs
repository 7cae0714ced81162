//! # Error Types
//!
//! Domain-specific error types for candykush-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  candykush-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  candykush-db errors (separate crate)                                  │
//! │  └── DbError          - Cache storage failures                         │
//! │                                                                         │
//! │  candykush-print errors (separate crate)                               │
//! │  └── PrintError       - Rendering, config and device failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError/PrintError → AppError     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A period name that is not one of the five known periods.
    ///
    /// ## When This Occurs
    /// - CLI argument or stored row carries an unknown period string
    #[error("Unknown period: '{0}'")]
    UnknownPeriod(String),

    /// A date key that does not match the shape its period requires.
    #[error("Invalid date key '{key}' for period {period}")]
    InvalidDateKey { period: String, key: String },

    /// An amount from the cart API that cannot be represented in satang.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(f64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before a value reaches the cache or a printer.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid date key, invalid kind).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidDateKey {
            period: "this_month".to_string(),
            key: "2024-6".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date key '2024-6' for period this_month"
        );
        assert_eq!(
            CoreError::UnknownPeriod("fortnight".into()).to_string(),
            "Unknown period: 'fortnight'"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "kind".to_string(),
        };
        assert_eq!(err.to_string(), "kind is required");

        let err = ValidationError::TooLong {
            field: "kind".to_string(),
            max: 64,
        };
        assert_eq!(err.to_string(), "kind must be at most 64 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "date_key".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
