//! # SmartPos Printer Driver
//!
//! Built-in and USB thermal printers on SmartPos terminals are driven
//! through the vendor SDK's command surface. That surface is modelled by
//! the [`PosPrinter`] trait so the receipt sequence can be tested with
//! [`RecordingPrinter`] instead of real hardware.
//!
//! ## Receipt Command Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  align(Center)  mode(double h/w + bold)  "CANDY KUSH\n"  feed(1)       │
//! │  mode(normal)   align(Left)                                             │
//! │  "====...\n\n"  "ITEM  QTY  TOTAL"  "----...\n"                         │
//! │  one "%-20s %4s %6s" row per line                                       │
//! │  "----...\n"    "               TOTAL: 132.50\n"  feed(1)               │
//! │  align(Center)  footer  timestamp  "====...\n"  feed(3)                 │
//! │  cut(Full)      ← USB printers only; failures are logged, not raised    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use candykush_core::{Money, ReceiptLine};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{PrintError, PrintResult};
use crate::receipt::{DEFAULT_FOOTER, DEFAULT_TITLE};
use crate::text::{LINE_WIDTH, NAME_BUDGET};

// =============================================================================
// Command Vocabulary
// =============================================================================

/// How the printer is attached to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Built-in printer on a serial port.
    #[default]
    Serial,
    /// External USB printer.
    Usb,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::Serial => write!(f, "serial"),
            ConnectionKind::Usb => write!(f, "usb"),
        }
    }
}

impl std::str::FromStr for ConnectionKind {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "serial" | "builtin" => Ok(ConnectionKind::Serial),
            "usb" => Ok(ConnectionKind::Usb),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown printer connection: '{}'. Valid options: serial, usb",
                other
            ))),
        }
    }
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Character mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrintMode {
    pub double_height: bool,
    pub double_width: bool,
    pub emphasized: bool,
}

impl PrintMode {
    pub const NORMAL: PrintMode = PrintMode {
        double_height: false,
        double_width: false,
        emphasized: false,
    };

    /// Double height and width.
    pub const LARGE: PrintMode = PrintMode {
        double_height: true,
        double_width: true,
        emphasized: false,
    };

    /// Double height and width, emphasized.
    pub const HEADLINE: PrintMode = PrintMode {
        double_height: true,
        double_width: true,
        emphasized: true,
    };
}

/// Paper cut style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutMode {
    Full,
    Partial,
}

/// The printer command surface of the vendor SDK.
pub trait PosPrinter {
    fn connect(&mut self) -> PrintResult<()>;
    fn set_align(&mut self, align: Align) -> PrintResult<()>;
    fn set_print_mode(&mut self, mode: PrintMode) -> PrintResult<()>;
    fn send_text(&mut self, text: &str) -> PrintResult<()>;
    fn line_feed(&mut self, lines: u8) -> PrintResult<()>;
    fn cut_paper(&mut self, mode: CutMode) -> PrintResult<()>;
    fn connection_kind(&self) -> ConnectionKind;
    /// Closes the connection; `power_off` also powers down serial printers.
    fn disconnect(&mut self, power_off: bool) -> PrintResult<()>;
}

// =============================================================================
// Driver
// =============================================================================

/// Issues receipt and test-print sequences through a [`PosPrinter`].
///
/// The driver is unusable until [`initialize`](Self::initialize) succeeds,
/// and again after [`release`](Self::release).
#[derive(Debug)]
pub struct SmartPosPrinter<P: PosPrinter> {
    device: Option<P>,
    initialized: bool,
    footer: String,
}

impl<P: PosPrinter> SmartPosPrinter<P> {
    /// Wraps a device handle; `None` when the SDK is not present.
    pub fn new(device: Option<P>) -> Self {
        SmartPosPrinter {
            device,
            initialized: false,
            footer: DEFAULT_FOOTER.to_string(),
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Connects to the printer.
    pub fn initialize(&mut self) -> PrintResult<()> {
        let Some(device) = self.device.as_mut() else {
            warn!("SmartPos SDK not available");
            return Err(PrintError::Device("SmartPos SDK not available".into()));
        };

        debug!(kind = %device.connection_kind(), "Initializing SmartPos printer");
        match device.connect() {
            Ok(()) => {
                self.initialized = true;
                info!("SmartPos printer initialized");
                Ok(())
            }
            Err(e) => {
                self.initialized = false;
                error!(error = %e, "Failed to initialize SmartPos printer");
                Err(e)
            }
        }
    }

    /// Checks whether the printer can accept jobs.
    ///
    /// The SDK has no status query, so an initialized printer is ready.
    pub fn is_ready(&self) -> bool {
        self.initialized && self.device.is_some()
    }

    fn ready_device(&mut self) -> PrintResult<&mut P> {
        if !self.initialized {
            return Err(PrintError::NotInitialized);
        }
        self.device.as_mut().ok_or(PrintError::NotInitialized)
    }

    /// Prints a receipt.
    pub fn print_receipt(
        &mut self,
        lines: &[ReceiptLine],
        total: Money,
        timestamp: &str,
    ) -> PrintResult<()> {
        let footer = self.footer.clone();
        let device = self.ready_device()?;
        debug!(items = lines.len(), "Printing receipt via SmartPos");

        let rule = "-".repeat(LINE_WIDTH);
        let double_rule = "=".repeat(LINE_WIDTH);

        device.set_align(Align::Center)?;
        device.set_print_mode(PrintMode::HEADLINE)?;
        device.send_text(&format!("{}\n", DEFAULT_TITLE))?;
        device.line_feed(1)?;

        device.set_print_mode(PrintMode::NORMAL)?;
        device.set_align(Align::Left)?;
        device.send_text(&format!("{}\n\n", double_rule))?;
        device.send_text(&format!("{:<20} {:>4} {:>6}\n", "ITEM", "QTY", "TOTAL"))?;
        device.send_text(&format!("{}\n", rule))?;

        for line in lines {
            device.send_text(&format!(
                "{:<20} {:>4} {:>6}\n",
                line.display_name(NAME_BUDGET),
                line.quantity.to_fixed(2),
                line.line_total.to_decimal_string()
            ))?;
        }

        device.send_text(&format!("{}\n", rule))?;
        device.send_text(&format!("{:>20}: {}\n", "TOTAL", total.to_decimal_string()))?;
        device.line_feed(1)?;

        device.set_align(Align::Center)?;
        device.send_text(&format!("{}\n", footer))?;
        device.send_text(&format!("{}\n", timestamp))?;
        device.send_text(&format!("{}\n", double_rule))?;
        device.line_feed(3)?;

        cut_if_supported(device);
        info!(items = lines.len(), "Receipt printed via SmartPos");
        Ok(())
    }

    /// Sends pre-rendered bytes as text.
    pub fn print_raw(&mut self, data: &[u8]) -> PrintResult<()> {
        let device = self.ready_device()?;
        debug!(bytes = data.len(), "Printing raw data via SmartPos");
        device.send_text(&String::from_utf8_lossy(data))
    }

    /// Prints a short page confirming the printer works.
    pub fn test_print(&mut self) -> PrintResult<()> {
        let device = self.ready_device()?;

        device.set_align(Align::Center)?;
        device.set_print_mode(PrintMode::LARGE)?;
        device.send_text("Test Print\n")?;
        device.set_print_mode(PrintMode::NORMAL)?;
        device.send_text(&format!("{}\n", DEFAULT_TITLE))?;
        device.send_text("Test successful\n")?;
        device.line_feed(3)?;

        cut_if_supported(device);
        info!("SmartPos test print completed");
        Ok(())
    }

    /// Disconnects and hands back the device handle.
    ///
    /// Serial printers are powered off. Errors are logged; the driver is
    /// released either way.
    pub fn release(&mut self) -> Option<P> {
        self.initialized = false;
        let mut device = self.device.take()?;
        let power_off = device.connection_kind() == ConnectionKind::Serial;
        match device.disconnect(power_off) {
            Ok(()) => debug!(power_off, "SmartPos printer disconnected"),
            Err(e) => error!(error = %e, "Failed to release SmartPos printer"),
        }
        Some(device)
    }
}

/// Cuts the paper on USB printers; built-in printers have no cutter.
fn cut_if_supported<P: PosPrinter>(device: &mut P) {
    if device.connection_kind() != ConnectionKind::Usb {
        return;
    }
    if let Err(e) = device.cut_paper(CutMode::Full) {
        warn!(error = %e, "Paper cut not supported or failed");
    }
}

// =============================================================================
// Recording Printer
// =============================================================================

/// A command issued to a [`RecordingPrinter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    Align(Align),
    Mode(PrintMode),
    Text(String),
    Feed(u8),
    Cut(CutMode),
    Disconnect { power_off: bool },
}

/// In-memory [`PosPrinter`] that records every command.
///
/// Used by tests and by the CLI to show what a SmartPos terminal would
/// print.
#[derive(Debug, Clone, Default)]
pub struct RecordingPrinter {
    kind: ConnectionKind,
    commands: Vec<Command>,
    fail_connect: bool,
    fail_cut: bool,
}

impl RecordingPrinter {
    pub fn new(kind: ConnectionKind) -> Self {
        RecordingPrinter {
            kind,
            ..Default::default()
        }
    }

    /// Makes `connect` fail.
    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Makes `cut_paper` fail.
    pub fn failing_cut(mut self) -> Self {
        self.fail_cut = true;
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// All text sent, concatenated.
    pub fn text(&self) -> String {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Renders the command log one command per line.
    pub fn transcript(&self) -> String {
        self.commands
            .iter()
            .map(|c| match c {
                Command::Text(text) => format!("TEXT {:?}", text),
                other => format!("{:?}", other).to_uppercase(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PosPrinter for RecordingPrinter {
    fn connect(&mut self) -> PrintResult<()> {
        if self.fail_connect {
            return Err(PrintError::Device("connection refused".into()));
        }
        self.commands.push(Command::Connect);
        Ok(())
    }

    fn set_align(&mut self, align: Align) -> PrintResult<()> {
        self.commands.push(Command::Align(align));
        Ok(())
    }

    fn set_print_mode(&mut self, mode: PrintMode) -> PrintResult<()> {
        self.commands.push(Command::Mode(mode));
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> PrintResult<()> {
        self.commands.push(Command::Text(text.to_string()));
        Ok(())
    }

    fn line_feed(&mut self, lines: u8) -> PrintResult<()> {
        self.commands.push(Command::Feed(lines));
        Ok(())
    }

    fn cut_paper(&mut self, mode: CutMode) -> PrintResult<()> {
        if self.fail_cut {
            return Err(PrintError::Device("cutter jammed".into()));
        }
        self.commands.push(Command::Cut(mode));
        Ok(())
    }

    fn connection_kind(&self) -> ConnectionKind {
        self.kind
    }

    fn disconnect(&mut self, power_off: bool) -> PrintResult<()> {
        self.commands.push(Command::Disconnect { power_off });
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
