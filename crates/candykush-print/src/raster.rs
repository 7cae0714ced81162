//! # Raster Surfaces
//!
//! Receipts are drawn onto an RGB [`Canvas`] with `embedded-graphics`, then
//! thresholded into a [`MonochromeImage`] that the byte packers consume.
//!
//! ```text
//!   draw_text / draw_rule / draw_qr
//!                │
//!                ▼
//!   Canvas (Rgb888, white background)
//!                │  truncated luminance < 128  →  ink
//!                ▼
//!   MonochromeImage (bit matrix)  ──►  peripage::pack
//! ```

use std::convert::Infallible;

use candykush_core::CURRENCY_SYMBOL;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_9X18, FONT_9X18_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::qr::QrGlyph;

/// Truncated luminance at or above this value is paper; below it is ink.
///
/// Mid gray (128, 128, 128) weighs in at 127.99999999999999 in `f64` and
/// truncates to 127, so it prints as ink, same as the PeriPage app.
pub const INK_THRESHOLD: u8 = 128;

/// Perceived brightness of a pixel.
///
/// The ITU-R BT.601 weighted sum is computed in `f64` and truncated toward
/// zero to an integer, matching the PeriPage bitmap conversion.
pub fn luminance(color: Rgb888) -> u8 {
    let gray = color.r() as f64 * 0.299 + color.g() as f64 * 0.587 + color.b() as f64 * 0.114;
    gray as u8
}

/// Checks whether a pixel prints as a black dot.
pub fn is_ink(color: Rgb888) -> bool {
    luminance(color) < INK_THRESHOLD
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

// =============================================================================
// Font Weight
// =============================================================================

/// Text weight; both weights share the 9×18 cell so columns line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

impl Weight {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            Weight::Regular => &FONT_9X18,
            Weight::Bold => &FONT_9X18_BOLD,
        }
    }

    fn stroke(self) -> u32 {
        match self {
            Weight::Regular => 1,
            Weight::Bold => 2,
        }
    }
}

/// Width of one character cell in pixels.
pub fn char_width(weight: Weight) -> u32 {
    let font = weight.font();
    font.character_size.width + font.character_spacing
}

/// Width of `text` in pixels when drawn with `weight`.
pub fn text_width(text: &str, weight: Weight) -> u32 {
    text.chars().count() as u32 * char_width(weight)
}

// =============================================================================
// Canvas
// =============================================================================

/// An RGB drawing surface with a white background.
///
/// Drawing outside the surface is clipped silently.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl Canvas {
    /// Creates a white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![Rgb888::WHITE; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Draws `text` with its alphabetic baseline at `baseline`.
    ///
    /// The bitmap fonts only cover ASCII; the baht sign is drawn as a `B`
    /// with a vertical stroke through it. Other non-ASCII characters print
    /// as the font's replacement glyph.
    pub fn draw_text(&mut self, text: &str, x: i32, baseline: i32, weight: Weight) {
        let style = MonoTextStyle::new(weight.font(), Rgb888::BLACK);
        let ascii: String = text
            .chars()
            .map(|c| if c == CURRENCY_SYMBOL { 'B' } else { c })
            .collect();
        infallible(
            Text::with_baseline(&ascii, Point::new(x, baseline), style, Baseline::Alphabetic)
                .draw(self),
        );

        let cell = char_width(weight) as i32;
        let stroke = PrimitiveStyle::with_stroke(Rgb888::BLACK, weight.stroke());
        for (index, _) in text.chars().enumerate().filter(|(_, c)| *c == CURRENCY_SYMBOL) {
            let cx = x + index as i32 * cell + cell / 2 - 1;
            infallible(
                Line::new(Point::new(cx, baseline - 15), Point::new(cx, baseline + 2))
                    .into_styled(stroke)
                    .draw(self),
            );
        }
    }

    /// Draws `text` horizontally centred on the canvas.
    pub fn draw_centered(&mut self, text: &str, baseline: i32, weight: Weight) {
        let x = (self.width as i32 - text_width(text, weight) as i32) / 2;
        self.draw_text(text, x, baseline, weight);
    }

    /// Draws a one-pixel horizontal rule from `x_start` to `x_end`.
    pub fn draw_rule(&mut self, x_start: i32, x_end: i32, y: i32) {
        infallible(
            Line::new(Point::new(x_start, y), Point::new(x_end, y))
                .into_styled(PrimitiveStyle::with_stroke(Rgb888::BLACK, 1))
                .draw(self),
        );
    }

    /// Paints a QR glyph with its top-left corner at `(x, y)`.
    pub fn draw_qr(&mut self, glyph: &QrGlyph, x: i32, y: i32) {
        let fill = PrimitiveStyle::with_fill(Rgb888::BLACK);
        let module = Size::new(glyph.module_px(), glyph.module_px());
        for (mx, my) in glyph.dark_modules() {
            let origin = Point::new(
                x + (glyph.padding() + mx * glyph.module_px()) as i32,
                y + (glyph.padding() + my * glyph.module_px()) as i32,
            );
            infallible(Rectangle::new(origin, module).into_styled(fill).draw(self));
        }
    }

    /// Thresholds the canvas into a bit matrix.
    pub fn to_monochrome(&self) -> MonochromeImage {
        MonochromeImage {
            width: self.width,
            height: self.height,
            ink: self.pixels.iter().map(|&c| is_ink(c)).collect(),
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.width
                && (point.y as u32) < self.height
            {
                let index = point.y as u32 * self.width + point.x as u32;
                self.pixels[index as usize] = color;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Monochrome Image
// =============================================================================

/// A fixed-size bit matrix; `true` is ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeImage {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl MonochromeImage {
    /// Creates a blank (all paper) image.
    pub fn new(width: u32, height: u32) -> Self {
        MonochromeImage {
            width,
            height,
            ink: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether `(x, y)` is ink. Out of bounds reads as paper.
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.ink[(y * self.width + x) as usize]
    }

    /// Sets `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, ink: bool) {
        if x < self.width && y < self.height {
            self.ink[(y * self.width + x) as usize] = ink;
        }
    }

    /// Returns one row of pixels, left to right.
    pub fn row(&self, y: u32) -> &[bool] {
        let start = (y * self.width) as usize;
        &self.ink[start..start + self.width as usize]
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.ink.chunks(self.width.max(1) as usize)
    }

    /// Checks whether any pixel of row `y` is ink.
    pub fn row_has_ink(&self, y: u32) -> bool {
        y < self.height && self.row(y).iter().any(|&ink| ink)
    }

    /// Number of ink pixels.
    pub fn ink_count(&self) -> usize {
        self.ink.iter().filter(|&&ink| ink).count()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_threshold() {
        assert_eq!(luminance(Rgb888::WHITE), 255);
        assert_eq!(luminance(Rgb888::BLACK), 0);
        assert!(is_ink(Rgb888::new(127, 127, 127)));
        // The weighted sum lands a hair under 128 and truncates
        assert_eq!(luminance(Rgb888::new(128, 128, 128)), 127);
        assert!(is_ink(Rgb888::new(128, 128, 128)));
        assert!(!is_ink(Rgb888::new(129, 129, 129)));
        // Pure red is dark enough (0.299 × 255 = 76)
        assert!(is_ink(Rgb888::new(255, 0, 0)));
        // Pure green is not (0.587 × 255 = 149)
        assert!(!is_ink(Rgb888::new(0, 255, 0)));
    }

    #[test]
    fn test_text_lands_above_baseline() {
        let mut canvas = Canvas::new(200, 40);
        canvas.draw_text("TOTAL", 10, 30, Weight::Regular);
        let image = canvas.to_monochrome();

        assert!((18..=30).any(|y| image.row_has_ink(y)));
        assert!(!image.row_has_ink(5));
        assert!(!image.row_has_ink(39));
    }

    #[test]
    fn test_baht_sign_has_stroke() {
        let mut plain = Canvas::new(40, 40);
        plain.draw_text("B", 0, 30, Weight::Regular);
        let mut baht = Canvas::new(40, 40);
        baht.draw_text("฿", 0, 30, Weight::Regular);

        let plain = plain.to_monochrome();
        let baht = baht.to_monochrome();
        assert!(baht.ink_count() > plain.ink_count());
        // The stroke pokes out below the baseline
        assert!(baht.row_has_ink(32));
    }

    #[test]
    fn test_clipping_never_panics() {
        let mut canvas = Canvas::new(50, 20);
        canvas.draw_text("A very long line that runs off the edge", 30, 15, Weight::Bold);
        canvas.draw_text("left", -100, 15, Weight::Regular);
        canvas.draw_rule(-10, 100, 25);
        assert_eq!(canvas.to_monochrome().width(), 50);
    }

    #[test]
    fn test_rule_spans_range() {
        let mut canvas = Canvas::new(100, 10);
        canvas.draw_rule(20, 80, 5);
        let image = canvas.to_monochrome();
        assert!(!image.get(19, 5));
        assert!(image.get(20, 5));
        assert!(image.get(80, 5));
        assert!(!image.get(81, 5));
        assert_eq!(image.ink_count(), 61);
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("CANDY KUSH", Weight::Bold), 90);
        assert_eq!(text_width("฿1.00", Weight::Regular), 45);
    }

    #[test]
    fn test_image_accessors() {
        let mut image = MonochromeImage::new(10, 3);
        image.set(9, 2, true);
        image.set(10, 2, true); // ignored
        assert!(image.get(9, 2));
        assert!(!image.get(10, 2));
        assert_eq!(image.rows().count(), 3);
        assert_eq!(image.row(2).len(), 10);
        assert_eq!(image.ink_count(), 1);
    }
}
