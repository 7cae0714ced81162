//! # CLI Error Type
//!
//! Unified error type for companion commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Companion CLI                      │
//! │                                                                         │
//! │  Command function → AppResult<String>                                  │
//! │         │                                                               │
//! │         ├── DbError    ──┐                                              │
//! │         ├── PrintError ──┤                                              │
//! │         ├── CoreError  ──┼──► AppError { code, message }               │
//! │         ├── io::Error  ──┤           │                                  │
//! │         └── serde_json ──┘           ▼                                  │
//! │                              main(): eprintln + exit code              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use candykush_core::CoreError;
use candykush_db::DbError;
use candykush_print::PrintError;
use serde::Serialize;

/// Error returned from companion commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, each mapped to a process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad argument or key
    ValidationError,

    /// Input file missing or unreadable
    InputError,

    /// Printer configuration is invalid
    ConfigError,

    /// Rendering or device failure
    PrintError,

    /// Cache database failure
    DatabaseError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Exit status reported to the shell.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::InputError => 3,
            ErrorCode::ConfigError => 4,
            ErrorCode::PrintError => 5,
            ErrorCode::DatabaseError => 6,
            ErrorCode::Internal => 1,
        }
    }
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an input error.
    pub fn input(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::InputError, message)
    }
}

/// Converts database errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Invalid(e) => AppError::from(e),
            DbError::ConnectionFailed(e) => {
                AppError::new(ErrorCode::DatabaseError, format!("Cache database unavailable: {}", e))
            }
            DbError::SchemaFailed(e) => {
                tracing::error!("Schema setup failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Cache schema setup failed")
            }
            DbError::QueryFailed(e) | DbError::TransactionFailed(e) | DbError::Internal(e) => {
                tracing::error!("Cache operation failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Cache operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Cache connection pool exhausted")
            }
            DbError::Serialization(e) => {
                AppError::new(ErrorCode::Internal, format!("Could not serialize payload: {}", e))
            }
        }
    }
}

/// Converts core errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => AppError::validation(e.to_string()),
            CoreError::UnknownPeriod(_) | CoreError::InvalidDateKey { .. } => {
                AppError::validation(err.to_string())
            }
            CoreError::AmountOutOfRange(_) => AppError::input(err.to_string()),
        }
    }
}

/// Converts printing errors.
impl From<PrintError> for AppError {
    fn from(err: PrintError) -> Self {
        if err.is_config_error() {
            return AppError::new(ErrorCode::ConfigError, err.to_string());
        }
        match err {
            PrintError::Core(e) => AppError::from(e),
            other => AppError::new(ErrorCode::PrintError, other.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::input(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::input(format!("Invalid JSON: {}", err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for companion commands.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use candykush_core::ValidationError;

    #[test]
    fn test_db_validation_maps_to_validation_code() {
        let err: AppError = DbError::from(ValidationError::Required {
            field: "kind".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.code.exit_code(), 2);
    }

    #[test]
    fn test_query_failure_hides_details() {
        let err: AppError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Cache operation failed");
    }

    #[test]
    fn test_print_config_error_code() {
        let err: AppError = PrintError::InvalidConfig("footer too long".into()).into();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = AppError::input("cart.json not found");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INPUT_ERROR");
        assert_eq!(json["message"], "cart.json not found");
    }
}
