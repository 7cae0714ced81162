//! # candykush-print: Receipt Rendering
//!
//! Turns receipt lines into the bytes each of the shop's printers expects.
//! Sending those bytes (Bluetooth sockets, USB, the vendor SDK) is the
//! caller's business.
//!
//! ## Printer Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                    &[ReceiptLine], total, timestamp                     │
//! │                                  │                                      │
//! │        ┌─────────────────────────┼──────────────────────────┐           │
//! │        ▼                         ▼                          ▼           │
//! │  ReceiptEncoder            TextReceipt              SmartPosPrinter     │
//! │  384 px raster             32 columns               SDK commands        │
//! │        │                         │                          │           │
//! │        ▼                         ▼                          ▼           │
//! │  peripage::pack            UTF-8 + ESC i           impl PosPrinter      │
//! │  PeriPage image printer    Bluetooth thermal       built-in / USB       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`receipt`] - Image receipt encoder
//! - [`layout`] - Receipt geometry and the height formula
//! - [`raster`] - Drawing canvas and monochrome bit matrix
//! - [`peripage`] - PeriPage byte stream packing
//! - [`qr`] - QR glyph for the link block
//! - [`text`] - 32-column text receipts
//! - [`smartpos`] - SmartPos command sequences
//! - [`config`] - Printer configuration
//! - [`error`] - Error types
//!
//! ## Example
//! ```rust
//! use candykush_core::{Money, Quantity, ReceiptLine};
//! use candykush_print::{ReceiptEncoder, ReceiptOptions};
//!
//! let lines = vec![ReceiptLine::new("Gummy Bears", Quantity::from_units(2), Money::from_satang(4500))];
//! let encoder = ReceiptEncoder::new(ReceiptOptions::default());
//! let bytes = encoder.encode(&lines, Money::from_satang(9000), "15/06/2024 10:30").unwrap();
//! assert_eq!(&bytes[..4], &[0x10, 0xFF, 0xFE, 0x01]);
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod peripage;
pub mod qr;
pub mod raster;
pub mod receipt;
pub mod smartpos;
pub mod text;

pub use config::{PrinterConfig, PrinterKind};
pub use error::{PrintError, PrintResult};
pub use layout::ReceiptLayout;
pub use raster::MonochromeImage;
pub use receipt::{ReceiptEncoder, ReceiptOptions};
pub use smartpos::{ConnectionKind, PosPrinter, RecordingPrinter, SmartPosPrinter};
pub use text::TextReceipt;
