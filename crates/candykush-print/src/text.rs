//! # Text Receipts
//!
//! Plain-text receipts for generic 32-column thermal printers reached over
//! Bluetooth serial or USB.
//!
//! ```text
//!           CANDY KUSH
//! ================================
//!
//! ITEM                      QTY TOTAL
//! --------------------------------
//! Gummy Bears              2.00 ฿90.00
//! --------------------------------
//!                   TOTAL: ฿90.00
//!
//!           Thank you!
//!        15/06/2024 10:30
//! ================================
//!
//!
//! <ESC i>
//! ```
//!
//! Lines may run past 32 columns; the printer wraps them.

use candykush_core::{Money, ReceiptLine};

use crate::receipt::{DEFAULT_FOOTER, DEFAULT_TITLE};

/// Printer line width in characters.
pub const LINE_WIDTH: usize = 32;

/// Character budget of the item name column.
pub const NAME_BUDGET: usize = 20;

/// `ESC i`, partial cut.
pub const PARTIAL_CUT: [u8; 2] = [0x1B, 0x69];

/// Builds text receipts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReceipt {
    title: String,
    footer: String,
    width: usize,
}

impl Default for TextReceipt {
    fn default() -> Self {
        TextReceipt {
            title: DEFAULT_TITLE.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            width: LINE_WIDTH,
        }
    }
}

impl TextReceipt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Renders the receipt text, without the cut command.
    pub fn render(&self, lines: &[ReceiptLine], total: Money, timestamp: &str) -> String {
        let double_rule = "=".repeat(self.width);
        let rule = "-".repeat(self.width);
        let mut out = String::new();

        out.push_str(&center(&self.title, self.width));
        out.push('\n');
        out.push_str(&double_rule);
        out.push_str("\n\n");

        out.push_str(&format!("{:<20} {:>8} {}\n", "ITEM", "QTY", "TOTAL"));
        out.push_str(&rule);
        out.push('\n');

        for line in lines {
            out.push_str(&format!(
                "{:<20} {:>8} {}\n",
                line.display_name(NAME_BUDGET),
                line.quantity.to_fixed(2),
                line.line_total
            ));
        }

        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("{:>24} {}\n", "TOTAL:", total));

        out.push('\n');
        out.push_str(&center(&self.footer, self.width));
        out.push('\n');
        out.push_str(&center(timestamp, self.width));
        out.push('\n');
        out.push_str(&double_rule);
        out.push_str("\n\n\n");
        out
    }

    /// Renders the receipt as UTF-8 bytes followed by a partial cut.
    pub fn encode(&self, lines: &[ReceiptLine], total: Money, timestamp: &str) -> Vec<u8> {
        let mut bytes = self.render(lines, total, timestamp).into_bytes();
        bytes.extend_from_slice(&PARTIAL_CUT);
        bytes
    }
}

/// Left-pads `text` to centre it in `width` columns.
///
/// Text at least as wide as the line is cut to `width` characters.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.chars().take(width).collect()
    } else {
        format!("{}{}", " ".repeat((width - len) / 2), text)
    }
}
