//! # Render Commands
//!
//! Turn a cart from the web POS into the bytes a printer expects.
//!
//! ## Output Selection
//! ```text
//! printer.kind (printer.toml)      --text       output
//! ───────────────────────────      ──────       ─────────────────────────
//! peripage                         no           PeriPage raster stream
//! bluetooth                        any          32-column text + ESC i
//! smartpos                         no           SDK command transcript
//! any                              yes          32-column text + ESC i
//! ```

use std::path::Path;

use candykush_core::{Cart, CartResponse, Money};
use candykush_print::{
    peripage, PrinterConfig, PrinterKind, ReceiptEncoder, RecordingPrinter,
    SmartPosPrinter,
};
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ErrorCode};

/// Timestamp format printed at the bottom of receipts.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// What the render command writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// PeriPage raster byte stream.
    Peripage,
    /// Plain text for 32-column thermal printers.
    Text,
    /// Command transcript of the SmartPos driver.
    Smartpos,
}

impl OutputFormat {
    /// Picks the output for the configured printer.
    pub fn select(kind: PrinterKind, force_text: bool) -> Self {
        if force_text {
            return OutputFormat::Text;
        }
        match kind {
            PrinterKind::Peripage => OutputFormat::Peripage,
            PrinterKind::Bluetooth => OutputFormat::Text,
            PrinterKind::Smartpos => OutputFormat::Smartpos,
        }
    }
}

/// Reads a cart from a JSON file.
///
/// Accepts either the bare cart object or the `{ success, cart, ... }`
/// envelope returned by the cart endpoint.
pub fn load_cart(path: &Path) -> AppResult<Cart> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::input(format!("Could not read {}: {}", path.display(), e)))?;
    parse_cart(&contents)
}

/// Parses cart JSON in either accepted shape.
pub fn parse_cart(contents: &str) -> AppResult<Cart> {
    let value: serde_json::Value = serde_json::from_str(contents)?;

    if value.get("success").is_some() {
        let response: CartResponse = serde_json::from_value(value)?;
        let error = response.error.clone();
        return response.into_cart().ok_or_else(|| {
            AppError::input(format!(
                "Cart request failed: {}",
                error.as_deref().unwrap_or("no cart in response")
            ))
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Renders a cart as printer bytes.
pub fn render_cart(
    cart: &Cart,
    config: &PrinterConfig,
    format: OutputFormat,
    timestamp: &str,
) -> AppResult<Vec<u8>> {
    let lines = cart.receipt_lines()?;
    let total = cart.total_money()?;
    debug!(items = lines.len(), total = %total.to_decimal_string(), ?format, "Rendering cart");

    let bytes = match format {
        OutputFormat::Peripage => {
            ReceiptEncoder::new(config.receipt_options()).encode(&lines, total, timestamp)?
        }
        OutputFormat::Text => config.text_receipt().encode(&lines, total, timestamp),
        OutputFormat::Smartpos => {
            let mut printer = smartpos_driver(config)?;
            printer.print_receipt(&lines, total, timestamp)?;
            transcript(&mut printer)?
        }
    };

    info!(bytes = bytes.len(), ?format, "Receipt rendered");
    Ok(bytes)
}

/// Renders a test page for the configured printer.
pub fn render_test_page(
    config: &PrinterConfig,
    format: OutputFormat,
    timestamp: &str,
) -> AppResult<Vec<u8>> {
    let bytes = match format {
        OutputFormat::Peripage => {
            let encoder = ReceiptEncoder::new(config.receipt_options());
            peripage::pack(&encoder.render_test_print())?
        }
        // an empty receipt exercises every text row except items
        OutputFormat::Text => config.text_receipt().encode(&[], Money::zero(), timestamp),
        OutputFormat::Smartpos => {
            let mut printer = smartpos_driver(config)?;
            printer.test_print()?;
            transcript(&mut printer)?
        }
    };
    Ok(bytes)
}

/// Writes rendered bytes, creating parent directories.
pub fn write_output(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "Printer data written");
    Ok(())
}

/// Local time in the receipt timestamp format.
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn smartpos_driver(config: &PrinterConfig) -> AppResult<SmartPosPrinter<RecordingPrinter>> {
    let device = RecordingPrinter::new(config.printer.connection);
    let mut printer =
        SmartPosPrinter::new(Some(device)).with_footer(config.receipt.footer.clone());
    printer.initialize()?;
    Ok(printer)
}

fn transcript(printer: &mut SmartPosPrinter<RecordingPrinter>) -> AppResult<Vec<u8>> {
    let device = printer
        .release()
        .ok_or_else(|| AppError::new(ErrorCode::Internal, "SmartPos device lost"))?;
    Ok(device.transcript().into_bytes())
}
