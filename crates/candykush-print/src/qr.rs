//! QR glyph for the optional link block at the bottom of the receipt.
//!
//! The glyph is a square of `QR_SIZE` pixels. The code is scaled by an
//! integer factor so that it plus a 4-module quiet zone on each side fits,
//! and is centred inside the square.

use qrcode::{Color, QrCode};
use tracing::{debug, warn};

/// Side length of the QR block in pixels.
pub const QR_SIZE: u32 = 150;

/// Quiet zone around the code, in modules.
pub const QUIET_ZONE: u32 = 4;

/// A QR code scaled to fit a `QR_SIZE` square.
#[derive(Debug, Clone)]
pub struct QrGlyph {
    modules: u32,
    module_px: u32,
    dark: Vec<bool>,
}

impl QrGlyph {
    /// Encodes `link`, returning `None` when it cannot be printed.
    ///
    /// Payloads too long for a QR code, or producing a code too dense to
    /// scale into the block, are logged and skipped.
    pub fn encode(link: &str) -> Option<Self> {
        let code = match QrCode::new(link.as_bytes()) {
            Ok(code) => code,
            Err(err) => {
                warn!(error = %err, link_len = link.len(), "QR generation failed, omitting QR block");
                return None;
            }
        };

        let modules = code.width() as u32;
        let module_px = QR_SIZE / (modules + 2 * QUIET_ZONE);
        if module_px == 0 {
            warn!(modules, "QR code too dense for the receipt, omitting QR block");
            return None;
        }

        debug!(modules, module_px, "Encoded receipt QR code");
        let dark = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        Some(QrGlyph {
            modules,
            module_px,
            dark,
        })
    }

    /// Side of the glyph in pixels (always `QR_SIZE`).
    pub fn size(&self) -> u32 {
        QR_SIZE
    }

    /// Number of modules per side.
    pub fn modules(&self) -> u32 {
        self.modules
    }

    /// Pixels per module.
    pub fn module_px(&self) -> u32 {
        self.module_px
    }

    /// Offset of the first module from the glyph's top-left corner.
    pub fn padding(&self) -> u32 {
        (QR_SIZE - self.modules * self.module_px) / 2
    }

    /// Coordinates `(x, y)` of every dark module.
    pub fn dark_modules(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let modules = self.modules;
        self.dark
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i as u32 % modules, i as u32 / modules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link_scales_into_block() {
        let glyph = QrGlyph::encode("https://candykush.shop/review").unwrap();
        // Version 3 (29 modules) at EC level M: 150 / (29 + 8) = 4 px
        assert!(glyph.modules() >= 21);
        assert!(glyph.module_px() >= 3);
        assert!(glyph.modules() * glyph.module_px() + 2 * glyph.padding() <= QR_SIZE);
        assert!(glyph.dark_modules().count() > 0);
    }

    #[test]
    fn test_overlong_link_is_omitted() {
        let link = "x".repeat(5_000);
        assert!(QrGlyph::encode(&link).is_none());
    }

    #[test]
    fn test_too_dense_link_is_omitted() {
        // Encodable, but needs well over 142 modules per side
        let link = "a".repeat(2_000);
        assert!(QrGlyph::encode(&link).is_none());
    }
}
