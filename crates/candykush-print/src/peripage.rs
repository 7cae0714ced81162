//! # PeriPage Byte Stream
//!
//! PeriPage printers are image printers: every receipt is sent as one
//! raster block.
//!
//! ## Stream Layout
//! ```text
//! ┌──────────────┬──────────────┬─────────┬─────────┬────────────┬──────────┐
//! │ 10 FF FE 01  │ 1D 76 30 00  │ wB (LE) │ h (LE)  │ row data   │ 1B 4A 40 │
//! │ init         │ raster cmd   │ u16     │ u16     │ wB × h     │ 1B 64 02 │
//! └──────────────┴──────────────┴─────────┴─────────┴────────────┴──────────┘
//!   wB = ceil(width / 8)
//! ```
//!
//! Each row is packed 8 pixels per byte, most significant bit first; a set
//! bit is ink. The last byte of a row is padded with zero bits.

use crate::error::{PrintError, PrintResult};
use crate::raster::MonochromeImage;

/// Printer wake-up sequence.
pub const INIT: [u8; 4] = [0x10, 0xFF, 0xFE, 0x01];

/// `GS v 0`, normal density raster image.
pub const RASTER_HEADER: [u8; 4] = [0x1D, 0x76, 0x30, 0x00];

/// Feed paper, then feed two lines.
pub const TRAILER: [u8; 6] = [0x1B, 0x4A, 0x40, 0x1B, 0x64, 0x02];

/// Offset of the first row byte in a packed stream.
pub const DATA_OFFSET: usize = INIT.len() + RASTER_HEADER.len() + 4;

/// Bytes per packed row for `width` pixels.
pub fn row_bytes(width: u32) -> usize {
    width.div_ceil(8) as usize
}

/// Packs an image into the PeriPage byte stream.
///
/// ## Errors
/// [`PrintError::ImageTooLarge`] when the width in bytes or the height do
/// not fit the 16-bit header fields.
pub fn pack(image: &MonochromeImage) -> PrintResult<Vec<u8>> {
    let width_bytes = row_bytes(image.width());
    let (Ok(wb), Ok(h)) = (u16::try_from(width_bytes), u16::try_from(image.height())) else {
        return Err(PrintError::ImageTooLarge {
            width: image.width(),
            height: image.height(),
        });
    };

    let mut out = Vec::with_capacity(DATA_OFFSET + width_bytes * image.height() as usize + TRAILER.len());
    out.extend_from_slice(&INIT);
    out.extend_from_slice(&RASTER_HEADER);
    out.extend_from_slice(&wb.to_le_bytes());
    out.extend_from_slice(&h.to_le_bytes());

    for row in image.rows() {
        for chunk in row.chunks(8) {
            let byte = chunk
                .iter()
                .enumerate()
                .filter(|(_, ink)| **ink)
                .fold(0u8, |acc, (bit, _)| acc | (0x80 >> bit));
            out.push(byte);
        }
    }

    out.extend_from_slice(&TRAILER);
    Ok(out)
}

/// Recovers the ink matrix from a packed stream.
///
/// Returns `None` when the stream is too short or its header does not
/// match `width` and `height`.
pub fn unpack(bytes: &[u8], width: u32, height: u32) -> Option<MonochromeImage> {
    let width_bytes = row_bytes(width);
    if bytes.len() < DATA_OFFSET + width_bytes * height as usize
        || bytes[..4] != INIT
        || bytes[4..8] != RASTER_HEADER
        || u16::from_le_bytes([bytes[8], bytes[9]]) as usize != width_bytes
        || u16::from_le_bytes([bytes[10], bytes[11]]) as u32 != height
    {
        return None;
    }

    let mut image = MonochromeImage::new(width, height);
    let data = &bytes[DATA_OFFSET..];
    for y in 0..height {
        let row = &data[y as usize * width_bytes..(y as usize + 1) * width_bytes];
        for x in 0..width {
            let byte = row[(x / 8) as usize];
            image.set(x, y, byte & (0x80 >> (x % 8)) != 0);
        }
    }
    Some(image)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{is_ink, Canvas};
    use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

    #[test]
    fn test_msb_first() {
        let mut image = MonochromeImage::new(8, 1);
        image.set(0, 0, true);
        image.set(7, 0, true);
        let bytes = pack(&image).unwrap();
        assert_eq!(bytes[DATA_OFFSET], 0b1000_0001);
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let mut image = MonochromeImage::new(10, 2);
        for x in 0..10 {
            image.set(x, 0, true);
        }
        let bytes = pack(&image).unwrap();

        assert_eq!(&bytes[8..12], &[2, 0, 2, 0]);
        assert_eq!(&bytes[DATA_OFFSET..DATA_OFFSET + 4], &[0xFF, 0b1100_0000, 0, 0]);
        assert_eq!(&bytes[bytes.len() - 6..], &TRAILER);
    }

    #[test]
    fn test_exact_stream_for_tiny_image() {
        let mut image = MonochromeImage::new(16, 1);
        image.set(8, 0, true);
        let bytes = pack(&image).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x10, 0xFF, 0xFE, 0x01, 0x1D, 0x76, 0x30, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x80,
                0x1B, 0x4A, 0x40, 0x1B, 0x64, 0x02
            ]
        );
    }

    #[test]
    fn test_too_tall_image_is_rejected() {
        let image = MonochromeImage::new(8, 70_000);
        assert!(matches!(pack(&image), Err(PrintError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_roundtrip_preserves_luminance_decision() {
        // Stripes of grays around the threshold plus some colours
        let palette = [
            Rgb888::new(127, 127, 127),
            Rgb888::new(128, 128, 128),
            Rgb888::new(255, 0, 0),
            Rgb888::new(0, 255, 0),
            Rgb888::new(0, 0, 255),
            Rgb888::BLACK,
            Rgb888::WHITE,
        ];
        let (width, height) = (21, 9);
        let mut canvas = Canvas::new(width, height);
        let pixels = (0..height as i32).flat_map(|y| {
            (0..width as i32).map(move |x| {
                Pixel(Point::new(x, y), palette[(x as usize * 3 + y as usize) % palette.len()])
            })
        });
        canvas.draw_iter(pixels).unwrap();

        let bytes = pack(&canvas.to_monochrome()).unwrap();
        let unpacked = unpack(&bytes, width, height).unwrap();

        for y in 0..height {
            for x in 0..width {
                let expected = is_ink(canvas.pixel(x, y).unwrap());
                assert_eq!(unpacked.get(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_unpack_rejects_mismatched_header() {
        let bytes = pack(&MonochromeImage::new(16, 2)).unwrap();
        assert!(unpack(&bytes, 16, 2).is_some());
        assert!(unpack(&bytes, 16, 3).is_none());
        assert!(unpack(&bytes, 24, 2).is_none());
        assert!(unpack(&bytes[..10], 16, 2).is_none());
    }
}
