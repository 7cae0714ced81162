//! # Receipt Layout
//!
//! Vertical geometry of the image receipt. All positions are text
//! baselines or rule rows, in pixels from the top of the image.
//!
//! ```text
//!  y
//!   40 ┤            CANDY KUSH               (bold, centred)
//!   80 ┤ ─────────────────────────────────── rule
//!  110 ┤ ITEM            QTY      TOTAL
//!  135 ┤ ─────────────────────────────────── rule
//!  ─── header_height = 141 ────────────────────────────────────────
//!  165 ┤ Gummy Bears     2.0      ฿90.00     item 0
//!  201 ┤ Sour Belts      1.5      ฿42.50     item 1   (+36 per item)
//!  ─── f = header_height + n × 36 ─────────────────────────────────
//! f+34 ┤ ─────────────────────────────────── rule
//! f+64 ┤                 TOTAL:   ฿132.50    (bold)
//! f+104┤            ┌──────────┐
//!      │            │  QR 150  │             optional, +170
//!      │            └──────────┘
//!   q  ┤            Thank you!               q = f+104 (+170 with QR)
//! q+25 ┤         15/06/2024 10:30
//!  ─── footer_height = 160 (+170 with QR) ─────────────────────────
//! ```

use crate::qr::QR_SIZE;

/// Paper width of the PeriPage printer in pixels.
pub const PAPER_WIDTH: u32 = 384;

/// Geometry of the image receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptLayout {
    /// Image width in pixels.
    pub width: u32,
    /// Title, rules and column header.
    pub header_height: u32,
    /// Vertical advance per item row.
    pub per_item_height: u32,
    /// Rule, total row, footer and timestamp.
    pub footer_height: u32,
    /// QR glyph plus the gap below it.
    pub qr_block_height: u32,
    /// Left margin; rules end the same distance from the right edge.
    pub margin: i32,
    /// x of the quantity column.
    pub qty_x: i32,
    /// x of the total column.
    pub total_x: i32,
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        ReceiptLayout {
            width: PAPER_WIDTH,
            header_height: 141,
            per_item_height: 36,
            footer_height: 160,
            qr_block_height: QR_SIZE + 20,
            margin: 20,
            qty_x: 200,
            total_x: 280,
        }
    }
}

impl ReceiptLayout {
    /// Layout for a given paper width.
    pub fn with_width(width: u32) -> Self {
        ReceiptLayout {
            width,
            ..Default::default()
        }
    }

    /// Total image height for `item_count` rows.
    ///
    /// ## Example
    /// ```rust
    /// use candykush_print::ReceiptLayout;
    ///
    /// let layout = ReceiptLayout::default();
    /// assert_eq!(layout.image_height(0, false), 301);
    /// assert_eq!(layout.image_height(2, false), 373);
    /// assert_eq!(layout.image_height(2, true), 543);
    /// ```
    pub fn image_height(&self, item_count: usize, qr_present: bool) -> u32 {
        self.header_height + self.per_item_height * item_count as u32 + self.footer_height(qr_present)
    }

    /// Footer height, including the QR block when one was produced.
    pub fn footer_height(&self, qr_present: bool) -> u32 {
        if qr_present {
            self.footer_height + self.qr_block_height
        } else {
            self.footer_height
        }
    }

    // =========================================================================
    // Header positions
    // =========================================================================

    pub fn title_baseline(&self) -> i32 {
        40
    }

    pub fn top_rule_y(&self) -> i32 {
        80
    }

    pub fn column_header_baseline(&self) -> i32 {
        110
    }

    pub fn header_rule_y(&self) -> i32 {
        135
    }

    /// Right end of every rule.
    pub fn rule_end_x(&self) -> i32 {
        self.width as i32 - self.margin
    }

    // =========================================================================
    // Item and footer positions
    // =========================================================================

    /// Baseline of item row `index`.
    pub fn item_baseline(&self, index: usize) -> i32 {
        self.header_height as i32 + 24 + (self.per_item_height as usize * index) as i32
    }

    /// Top of the footer block for `item_count` rows.
    pub fn footer_top(&self, item_count: usize) -> i32 {
        (self.header_height + self.per_item_height * item_count as u32) as i32
    }

    pub fn footer_rule_y(&self, item_count: usize) -> i32 {
        self.footer_top(item_count) + 34
    }

    pub fn total_baseline(&self, item_count: usize) -> i32 {
        self.footer_top(item_count) + 64
    }

    /// Top edge of the QR glyph.
    pub fn qr_top(&self, item_count: usize) -> i32 {
        self.footer_top(item_count) + 104
    }

    pub fn footer_text_baseline(&self, item_count: usize, qr_present: bool) -> i32 {
        let qr = if qr_present { self.qr_block_height as i32 } else { 0 };
        self.qr_top(item_count) + qr
    }

    pub fn timestamp_baseline(&self, item_count: usize, qr_present: bool) -> i32 {
        self.footer_text_baseline(item_count, qr_present) + 25
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_formula() {
        let layout = ReceiptLayout::default();
        for n in 0..50 {
            assert_eq!(layout.image_height(n, false), 141 + 36 * n as u32 + 160);
            assert_eq!(layout.image_height(n, true), 141 + 36 * n as u32 + 330);
        }
    }

    #[test]
    fn test_height_is_monotonic() {
        let layout = ReceiptLayout::default();
        let heights: Vec<u32> = (0..20).map(|n| layout.image_height(n, false)).collect();
        assert!(heights.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_positions_follow_item_count() {
        let layout = ReceiptLayout::default();
        assert_eq!(layout.item_baseline(0), 165);
        assert_eq!(layout.item_baseline(2), 237);
        assert_eq!(layout.footer_rule_y(0), 175);
        assert_eq!(layout.total_baseline(1), 241);
        assert_eq!(layout.footer_text_baseline(0, false), 245);
        assert_eq!(layout.footer_text_baseline(0, true), 415);
        assert_eq!(layout.rule_end_x(), 364);
    }

    #[test]
    fn test_everything_fits() {
        let layout = ReceiptLayout::default();
        for n in [0, 1, 10] {
            for qr in [false, true] {
                // Timestamp descenders stay on the image
                assert!(layout.timestamp_baseline(n, qr) + 4 < layout.image_height(n, qr) as i32);
            }
        }
    }
}
