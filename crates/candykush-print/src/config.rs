//! # Printer Configuration
//!
//! Settings the shop can change without a rebuild: which printer is used,
//! the footer line and the QR link printed on image receipts.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CANDYKUSH_PRINTER_KIND=peripage                                    │
//! │     CANDYKUSH_PRINTER_NAME="PeriPage A6"                               │
//! │     CANDYKUSH_RECEIPT_FOOTER="Thank you!"                              │
//! │     CANDYKUSH_QR_LINK=https://candykush.shop/review                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/candykush/printer.toml (Linux)                           │
//! │     ~/Library/Application Support/shop.candykush.candykush/... (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     PeriPage, "Thank you!", no QR link                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # printer.toml
//! [printer]
//! kind = "peripage"      # peripage | bluetooth | smartpos
//! name = "PeriPage A6"   # paired device name (bluetooth)
//! connection = "serial"  # serial | usb (smartpos)
//!
//! [receipt]
//! footer = "Thank you!"
//! qr_link = "https://candykush.shop/review"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{PrintError, PrintResult};
use crate::receipt::{ReceiptOptions, DEFAULT_FOOTER};
use crate::smartpos::ConnectionKind;
use crate::text::TextReceipt;

/// Longest footer accepted; longer lines would not fit the 384 px raster.
pub const MAX_FOOTER_LEN: usize = 42;

// =============================================================================
// Printer Kind
// =============================================================================

/// Which printer family receives receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterKind {
    /// PeriPage image printer (raster receipts).
    #[default]
    Peripage,
    /// Generic 32-column thermal printer over Bluetooth serial.
    Bluetooth,
    /// Built-in or USB printer of a SmartPos terminal.
    Smartpos,
}

impl fmt::Display for PrinterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterKind::Peripage => write!(f, "peripage"),
            PrinterKind::Bluetooth => write!(f, "bluetooth"),
            PrinterKind::Smartpos => write!(f, "smartpos"),
        }
    }
}

impl std::str::FromStr for PrinterKind {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "peripage" | "image" => Ok(PrinterKind::Peripage),
            "bluetooth" | "text" | "thermal" => Ok(PrinterKind::Bluetooth),
            "smartpos" | "sdk" => Ok(PrinterKind::Smartpos),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown printer kind: '{}'. Valid options: peripage, bluetooth, smartpos",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Printer selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterSettings {
    /// Printer family.
    #[serde(default)]
    pub kind: PrinterKind,

    /// Paired device name; required for Bluetooth printers.
    #[serde(default)]
    pub name: Option<String>,

    /// How a SmartPos printer is attached.
    #[serde(default)]
    pub connection: ConnectionKind,
}

/// Receipt content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// Line printed above the timestamp.
    #[serde(default = "default_footer")]
    pub footer: String,

    /// Link encoded as a QR code on image receipts.
    #[serde(default)]
    pub qr_link: Option<String>,
}

fn default_footer() -> String {
    DEFAULT_FOOTER.to_string()
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            footer: default_footer(),
            qr_link: None,
        }
    }
}

// =============================================================================
// Printer Configuration
// =============================================================================

/// Complete printer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterConfig {
    #[serde(default)]
    pub printer: PrinterSettings,

    #[serde(default)]
    pub receipt: ReceiptSettings,
}

impl PrinterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (printer.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> PrintResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading printer config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Printer config not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load printer config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> PrintResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| PrintError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Printer config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PrintResult<()> {
        if self.receipt.footer.chars().count() > MAX_FOOTER_LEN {
            return Err(PrintError::InvalidConfig(format!(
                "footer must be at most {} characters",
                MAX_FOOTER_LEN
            )));
        }

        if self.printer.kind == PrinterKind::Bluetooth
            && self.printer.name.as_deref().map_or(true, |n| n.trim().is_empty())
        {
            return Err(PrintError::InvalidConfig(
                "Bluetooth printers need a paired device name".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(kind) = std::env::var("CANDYKUSH_PRINTER_KIND") {
            match kind.parse() {
                Ok(parsed) => {
                    debug!(kind = %kind, "Overriding printer kind from environment");
                    self.printer.kind = parsed;
                }
                Err(_) => warn!(kind = %kind, "Unknown printer kind in environment"),
            }
        }

        if let Ok(name) = std::env::var("CANDYKUSH_PRINTER_NAME") {
            self.printer.name = Some(name);
        }

        if let Ok(footer) = std::env::var("CANDYKUSH_RECEIPT_FOOTER") {
            self.receipt.footer = footer;
        }

        if let Ok(link) = std::env::var("CANDYKUSH_QR_LINK") {
            debug!(link = %link, "Overriding QR link from environment");
            self.receipt.qr_link = Some(link).filter(|l| !l.is_empty());
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("shop", "candykush", "candykush")
            .map(|dirs| dirs.config_dir().join("printer.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Options for the image receipt encoder.
    pub fn receipt_options(&self) -> ReceiptOptions {
        let options = ReceiptOptions::default().with_footer(self.receipt.footer.clone());
        match &self.receipt.qr_link {
            Some(link) => options.with_qr_link(link.clone()),
            None => options,
        }
    }

    /// Builder for 32-column text receipts.
    pub fn text_receipt(&self) -> TextReceipt {
        TextReceipt::new().with_footer(self.receipt.footer.clone())
    }
}
