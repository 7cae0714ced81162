//! # Receipt Image Encoder
//!
//! Renders receipt lines, a grand total and a pre-formatted timestamp into
//! a fixed-width monochrome raster for the PeriPage image printer.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  &[ReceiptLine], total, timestamp                                       │
//! │            │                                                            │
//! │            ▼  QrGlyph::encode(link)      (optional, failures omitted)   │
//! │  ReceiptLayout::image_height(n, qr)                                     │
//! │            │                                                            │
//! │            ▼  draw title, rules, columns, rows, total, QR, footer       │
//! │  Canvas (Rgb888)                                                        │
//! │            │  to_monochrome()                                           │
//! │            ▼                                                            │
//! │  MonochromeImage ──► peripage::pack ──► Vec<u8>                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The encoder keeps no state between calls: the same input always renders
//! the same pixels.

use candykush_core::{types::lines_total, Money, ReceiptLine};
use tracing::debug;

use crate::error::PrintResult;
use crate::layout::{ReceiptLayout, PAPER_WIDTH};
use crate::peripage;
use crate::qr::QrGlyph;
use crate::raster::{Canvas, MonochromeImage, Weight};

/// Default receipt title.
pub const DEFAULT_TITLE: &str = "CANDY KUSH";

/// Default footer message.
pub const DEFAULT_FOOTER: &str = "Thank you!";

/// Character budget of the item name column.
pub const NAME_BUDGET: usize = 15;

/// Vertical advance between lines of a plain-text raster.
pub const TEXT_LINE_HEIGHT: u32 = 24;

// =============================================================================
// Options
// =============================================================================

/// What goes on the receipt besides the cart itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOptions {
    /// Raster width in pixels.
    pub width: u32,
    /// Bold heading at the top.
    pub title: String,
    /// Message printed above the timestamp.
    pub footer: String,
    /// Link encoded as a QR code above the footer; empty or `None` skips it.
    pub qr_link: Option<String>,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        ReceiptOptions {
            width: PAPER_WIDTH,
            title: DEFAULT_TITLE.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            qr_link: None,
        }
    }
}

impl ReceiptOptions {
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    pub fn with_qr_link(mut self, link: impl Into<String>) -> Self {
        self.qr_link = Some(link.into());
        self
    }

    fn qr_link(&self) -> Option<&str> {
        self.qr_link.as_deref().filter(|link| !link.trim().is_empty())
    }
}

// =============================================================================
// Encoder
// =============================================================================

/// Renders receipts for the image printer.
#[derive(Debug, Clone)]
pub struct ReceiptEncoder {
    options: ReceiptOptions,
    layout: ReceiptLayout,
}

impl ReceiptEncoder {
    pub fn new(options: ReceiptOptions) -> Self {
        let layout = ReceiptLayout::with_width(options.width);
        ReceiptEncoder { options, layout }
    }

    pub fn options(&self) -> &ReceiptOptions {
        &self.options
    }

    pub fn layout(&self) -> &ReceiptLayout {
        &self.layout
    }

    /// Renders the receipt raster.
    ///
    /// Zero lines is valid and renders the header, the total row and the
    /// footer only. Names longer than the column budget are shortened with
    /// `...`; anything else that overruns the right edge is clipped.
    pub fn render(&self, lines: &[ReceiptLine], total: Money, timestamp: &str) -> MonochromeImage {
        let layout = &self.layout;
        let qr = self.options.qr_link().and_then(QrGlyph::encode);
        let n = lines.len();
        let height = layout.image_height(n, qr.is_some());

        debug!(
            items = n,
            qr = qr.is_some(),
            width = layout.width,
            height,
            "Rendering receipt image"
        );

        let mut canvas = Canvas::new(layout.width, height);
        let left = layout.margin;
        let right = layout.rule_end_x();

        // Header
        canvas.draw_centered(&self.options.title, layout.title_baseline(), Weight::Bold);
        canvas.draw_rule(left, right, layout.top_rule_y());
        canvas.draw_text("ITEM", left, layout.column_header_baseline(), Weight::Regular);
        canvas.draw_text("QTY", layout.qty_x, layout.column_header_baseline(), Weight::Regular);
        canvas.draw_text("TOTAL", layout.total_x, layout.column_header_baseline(), Weight::Regular);
        canvas.draw_rule(left, right, layout.header_rule_y());

        // Items
        for (index, line) in lines.iter().enumerate() {
            let y = layout.item_baseline(index);
            canvas.draw_text(&line.display_name(NAME_BUDGET), left, y, Weight::Regular);
            canvas.draw_text(&line.quantity.to_fixed(1), layout.qty_x, y, Weight::Regular);
            canvas.draw_text(&line.line_total.to_string(), layout.total_x, y, Weight::Regular);
        }

        // Total
        canvas.draw_rule(left, right, layout.footer_rule_y(n));
        canvas.draw_text("TOTAL:", layout.qty_x, layout.total_baseline(n), Weight::Bold);
        canvas.draw_text(&total.to_string(), layout.total_x, layout.total_baseline(n), Weight::Bold);

        // QR, footer, timestamp
        if let Some(glyph) = &qr {
            let x = (layout.width as i32 - glyph.size() as i32) / 2;
            canvas.draw_qr(glyph, x, layout.qr_top(n));
        }
        canvas.draw_centered(
            &self.options.footer,
            layout.footer_text_baseline(n, qr.is_some()),
            Weight::Regular,
        );
        canvas.draw_centered(
            timestamp,
            layout.timestamp_baseline(n, qr.is_some()),
            Weight::Regular,
        );

        canvas.to_monochrome()
    }

    /// Renders the receipt and packs it for the PeriPage printer.
    pub fn encode(&self, lines: &[ReceiptLine], total: Money, timestamp: &str) -> PrintResult<Vec<u8>> {
        peripage::pack(&self.render(lines, total, timestamp))
    }

    /// Renders a receipt whose total is the sum of its lines.
    pub fn render_lines(&self, lines: &[ReceiptLine], timestamp: &str) -> MonochromeImage {
        self.render(lines, lines_total(lines), timestamp)
    }

    /// Renders the fixed test page: three centred bold lines.
    pub fn render_test_print(&self) -> MonochromeImage {
        let mut canvas = Canvas::new(self.layout.width, 200);
        for (text, baseline) in [("Test Print", 40), (DEFAULT_TITLE, 80), ("Success!", 120)] {
            canvas.draw_centered(text, baseline, Weight::Bold);
        }
        canvas.to_monochrome()
    }

    /// Renders pre-formatted text, one line per 24 px row.
    ///
    /// Used to send a text receipt to the image printer.
    pub fn render_text(&self, text: &str) -> MonochromeImage {
        let lines: Vec<&str> = text.split('\n').collect();
        let height = lines.len() as u32 * TEXT_LINE_HEIGHT + 40;
        let mut canvas = Canvas::new(self.layout.width, height);

        let mut baseline = 30;
        for line in lines {
            if !line.is_empty() {
                canvas.draw_text(line, self.layout.margin, baseline, Weight::Regular);
            }
            baseline += TEXT_LINE_HEIGHT as i32;
        }
        canvas.to_monochrome()
    }
}

impl Default for ReceiptEncoder {
    fn default() -> Self {
        ReceiptEncoder::new(ReceiptOptions::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use candykush_core::Quantity;

    fn sample_lines(n: usize) -> Vec<ReceiptLine> {
        (0..n)
            .map(|i| {
                ReceiptLine::new(
                    format!("Candy #{i}"),
                    Quantity::from_units(i as i64 + 1),
                    Money::from_satang(4_500),
                )
            })
            .collect()
    }

    /// Ink anywhere in the 12 rows ending at `baseline`.
    fn text_at(image: &MonochromeImage, baseline: i32) -> bool {
        (baseline - 11..=baseline).any(|y| image.row_has_ink(y as u32))
    }

    #[test]
    fn test_height_matches_layout_for_every_count() {
        let encoder = ReceiptEncoder::default();
        for n in 0..8 {
            let image = encoder.render(&sample_lines(n), Money::zero(), "15/06/2024 10:30");
            assert_eq!(image.width(), 384);
            assert_eq!(image.height(), 141 + 36 * n as u32 + 160);
        }
    }

    #[test]
    fn test_zero_items_renders_frame_only() {
        let encoder = ReceiptEncoder::default();
        let image = encoder.render(&[], Money::zero(), "15/06/2024 10:30");
        let layout = encoder.layout();

        assert!(text_at(&image, layout.title_baseline()));
        assert!(image.row_has_ink(layout.top_rule_y() as u32));
        assert!(text_at(&image, layout.column_header_baseline()));
        assert!(image.row_has_ink(layout.header_rule_y() as u32));
        assert!(image.row_has_ink(layout.footer_rule_y(0) as u32));
        assert!(text_at(&image, layout.total_baseline(0)));
        assert!(text_at(&image, layout.footer_text_baseline(0, false)));
        assert!(text_at(&image, layout.timestamp_baseline(0, false)));

        // Nothing between the two rules where item rows would go
        for y in (layout.header_rule_y() + 1)..layout.footer_rule_y(0) {
            assert!(!image.row_has_ink(y as u32), "unexpected ink at row {y}");
        }
    }

    #[test]
    fn test_items_render_at_their_rows() {
        let encoder = ReceiptEncoder::default();
        let image = encoder.render(&sample_lines(2), Money::from_satang(13_500), "t");
        let layout = encoder.layout();

        assert!(text_at(&image, layout.item_baseline(0)));
        assert!(text_at(&image, layout.item_baseline(1)));
    }

    #[test]
    fn test_qr_block_adds_height() {
        let encoder = ReceiptEncoder::new(
            ReceiptOptions::default().with_qr_link("https://candykush.shop/review"),
        );
        let image = encoder.render(&sample_lines(1), Money::from_satang(4_500), "t");
        assert_eq!(image.height(), 141 + 36 + 160 + 170);

        let layout = encoder.layout();
        let qr_mid = layout.qr_top(1) + 75;
        assert!(image.row_has_ink(qr_mid as u32));
        assert!(text_at(&image, layout.footer_text_baseline(1, true)));
    }

    #[test]
    fn test_unencodable_qr_is_omitted() {
        let encoder = ReceiptEncoder::new(ReceiptOptions::default().with_qr_link("x".repeat(5_000)));
        let image = encoder.render(&sample_lines(1), Money::zero(), "t");
        assert_eq!(image.height(), 141 + 36 + 160);
    }

    #[test]
    fn test_blank_qr_link_is_ignored() {
        let encoder = ReceiptEncoder::new(ReceiptOptions::default().with_qr_link("  "));
        let image = encoder.render(&[], Money::zero(), "t");
        assert_eq!(image.height(), 301);
    }

    #[test]
    fn test_render_is_deterministic() {
        let encoder = ReceiptEncoder::default();
        let lines = sample_lines(3);
        let a = encoder.encode(&lines, Money::from_satang(27_000), "15/06/2024").unwrap();
        let b = encoder.encode(&lines, Money::from_satang(27_000), "15/06/2024").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_header_carries_dimensions() {
        let encoder = ReceiptEncoder::default();
        let bytes = encoder.encode(&sample_lines(2), Money::zero(), "t").unwrap();
        // 373 = 0x0175
        assert_eq!(&bytes[..10], &[0x10, 0xFF, 0xFE, 0x01, 0x1D, 0x76, 0x30, 0x00, 48, 0x00]);
        assert_eq!(&bytes[10..12], &[0x75, 0x01]);
        assert_eq!(bytes.len(), 12 + 48 * 373 + 6);
    }

    #[test]
    fn test_render_lines_sums_totals() {
        let encoder = ReceiptEncoder::default();
        let lines = sample_lines(2);
        assert_eq!(
            encoder.render_lines(&lines, "t"),
            encoder.render(&lines, Money::from_satang(13_500), "t")
        );
    }

    #[test]
    fn test_test_print() {
        let image = ReceiptEncoder::default().render_test_print();
        assert_eq!(image.height(), 200);
        for baseline in [40, 80, 120] {
            assert!(text_at(&image, baseline));
        }
        assert!(!image.row_has_ink(160));
    }

    #[test]
    fn test_render_text_rows() {
        let image = ReceiptEncoder::default().render_text("line one\n\nline three");
        assert_eq!(image.height(), 3 * 24 + 40);
        assert!(text_at(&image, 30));
        assert!(!text_at(&image, 54));
        assert!(text_at(&image, 78));
    }
}
