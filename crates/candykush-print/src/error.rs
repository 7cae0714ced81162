//! # Print Error Types
//!
//! Error types for rendering, configuration and printer devices.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Print Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Encoding     │  │        Device           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  ImageTooLarge  │  │  NotInitialized         │ │
//! │  │  ConfigLoad...  │  │  Core           │  │  Device                 │ │
//! │  │  ConfigSave...  │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  A QR payload that cannot be encoded is NOT an error: the block is     │
//! │  omitted and a warning is logged.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use candykush_core::CoreError;
use thiserror::Error;

/// Result type alias for print operations.
pub type PrintResult<T> = Result<T, PrintError>;

/// Errors raised while producing or sending printer data.
#[derive(Debug, Error)]
pub enum PrintError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid printer configuration.
    #[error("Invalid printer configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Encoding Errors
    // =========================================================================
    /// The raster header stores width and height as 16-bit values.
    #[error("Image {width}x{height} exceeds the raster header limits")]
    ImageTooLarge { width: u32, height: u32 },

    /// Cart data could not be turned into receipt lines.
    #[error("Invalid receipt data: {0}")]
    Core(#[from] CoreError),

    // =========================================================================
    // Device Errors
    // =========================================================================
    /// A print was requested before the printer was initialized.
    #[error("Printer not initialized or not available")]
    NotInitialized,

    /// The printer rejected a command.
    #[error("Printer device error: {0}")]
    Device(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for PrintError {
    fn from(err: std::io::Error) -> Self {
        PrintError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for PrintError {
    fn from(err: toml::de::Error) -> Self {
        PrintError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for PrintError {
    fn from(err: toml::ser::Error) -> Self {
        PrintError::ConfigSaveFailed(err.to_string())
    }
}

impl PrintError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PrintError::InvalidConfig(_)
                | PrintError::ConfigLoadFailed(_)
                | PrintError::ConfigSaveFailed(_)
        )
    }
}
