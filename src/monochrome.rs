//! Threshold an RGB raster down to the packed 1-bit bitmap printers expect.
//!
//! Rows are packed most-significant-bit first, `ceil(width / 8)` bytes per
//! row, and a set bit means ink. Trailing bits past `width` are always zero.

use crate::raster::{RasterImage, Rgb, BLACK, WHITE};
use log::{debug, info, warn};

/// Pixels with a luma below this value are printed.
pub const LUMA_THRESHOLD: u8 = 128;

/// Images larger than this on either side are still encoded, but many
/// printers silently truncate payloads that big.
pub const SIZE_WARNING_LIMIT: u32 = 1500;

/// Below this share of ink the printed label is likely to look blank.
const LOW_INK_PERCENT: f64 = 1.0;

/// Luma of an RGB pixel, `(299 R + 587 G + 114 B) / 1000`, truncated.
pub fn luma([r, g, b]: Rgb) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    (weighted / 1000) as u8
}

/// A packed 1-bit-per-pixel bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    width: u32,
    height: u32,
    bytes_per_row: usize,
    data: Vec<u8>,
}

impl MonochromeBitmap {
    /// Wrap already packed rows.
    ///
    /// Returns `None` when `data` is not `ceil(width / 8) * height` bytes or a
    /// padding bit is set.
    pub fn from_packed(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let bytes_per_row = bytes_per_row(width);
        if data.len() != bytes_per_row * height as usize {
            return None;
        }
        let padding = padding_mask(width);
        if padding != 0
            && data
                .chunks(bytes_per_row)
                .any(|row| row[bytes_per_row - 1] & padding != 0)
        {
            return None;
        }
        Some(MonochromeBitmap {
            width,
            height,
            bytes_per_row,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Total packed size, `bytes_per_row * height`.
    pub fn byte_count(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether the pixel at `(x, y)` is ink.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        assert!(x < self.width && y < self.height);
        let byte = self.data[y as usize * self.bytes_per_row + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    pub fn ink_pixels(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Share of ink pixels, in percent.
    pub fn ink_percentage(&self) -> f64 {
        let total = self.width as f64 * self.height as f64;
        self.ink_pixels() as f64 / total * 100.0
    }

    /// Packed bytes as uppercase hex, two digits per byte, no separators.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.data)
    }

    /// Render back to black and white pixels, for inspection.
    pub fn to_raster_image(&self) -> RasterImage {
        let pixels = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| if self.is_ink(x, y) { BLACK } else { WHITE })
            .collect();
        match RasterImage::from_pixels(self.width, self.height, pixels) {
            Ok(image) => image,
            Err(_) => unreachable!("bitmap dimensions are validated at construction"),
        }
    }
}

/// Threshold `image` at [`LUMA_THRESHOLD`] and pack the result.
///
/// Logs the ink share and size advisories; they never affect the output.
pub fn encode(image: &RasterImage) -> MonochromeBitmap {
    let (width, height) = image.dimensions();
    debug!("Encoding {}x{} image to monochrome", width, height);

    if width > SIZE_WARNING_LIMIT || height > SIZE_WARNING_LIMIT {
        warn!(
            "Image is very large ({}x{}), the printer may truncate or reject it",
            width, height
        );
    }

    let bytes_per_row = bytes_per_row(width);
    let mut data = vec![0u8; bytes_per_row * height as usize];

    for (y, row_bytes) in data.chunks_mut(bytes_per_row).enumerate() {
        for (x, pixel) in image.row(y as u32).iter().enumerate() {
            if luma(*pixel) < LUMA_THRESHOLD {
                row_bytes[x / 8] |= 0x80 >> (x % 8);
            }
        }
    }

    let bitmap = MonochromeBitmap {
        width,
        height,
        bytes_per_row,
        data,
    };

    let percentage = bitmap.ink_percentage();
    info!("Ink coverage: {:.2}%", percentage);
    if percentage < LOW_INK_PERCENT {
        warn!("Ink coverage is very low, the printed label may look blank");
    }
    debug!(
        "Packed {} bytes ({} per row)",
        bitmap.byte_count(),
        bitmap.bytes_per_row
    );

    bitmap
}

fn bytes_per_row(width: u32) -> usize {
    (width as usize + 7) / 8
}

/// Bits of the last byte in a row that lie past `width`.
fn padding_mask(width: u32) -> u8 {
    match width % 8 {
        0 => 0,
        used => 0xFF >> used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> RasterImage {
        RasterImage::new(width, height).unwrap()
    }

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma(BLACK), 0);
        assert_eq!(luma(WHITE), 255);
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma([0, 255, 0]), 149);
        assert_eq!(luma([0, 0, 255]), 29);
        assert_eq!(luma([128, 128, 128]), 128);
        assert_eq!(luma([127, 127, 127]), 127);
    }

    #[test]
    fn test_encode_single_black_pixel_4x2() {
        let mut img = white(4, 2);
        img.put_pixel(0, 0, BLACK);
        let bitmap = encode(&img);
        assert_eq!(bitmap.bytes_per_row(), 1);
        assert_eq!(bitmap.as_bytes(), &[0x80, 0x00]);
        assert_eq!(bitmap.to_hex(), "8000");
    }

    #[test]
    fn test_encode_byte_length() {
        for &(w, h) in [(1, 1), (7, 3), (8, 2), (9, 5), (16, 1), (17, 4)].iter() {
            let bitmap = encode(&white(w, h));
            assert_eq!(bitmap.byte_count(), ((w as usize + 7) / 8) * h as usize);
        }
    }

    #[test]
    fn test_to_hex_is_uppercase() {
        let bitmap = MonochromeBitmap::from_packed(24, 1, vec![0xAB, 0x0F, 0xE0]).unwrap();
        assert_eq!(bitmap.to_hex(), "AB0FE0");
    }

    #[test]
    fn test_encode_single_pixel_position() {
        let (w, h) = (19, 4);
        let bpr = 3;
        for y in 0..h {
            for x in 0..w {
                let mut img = white(w, h);
                img.put_pixel(x, y, BLACK);
                let bitmap = encode(&img);
                for (i, byte) in bitmap.as_bytes().iter().enumerate() {
                    let expected = if i == (y * bpr + x / 8) as usize {
                        1u8 << (7 - x % 8)
                    } else {
                        0
                    };
                    assert_eq!(*byte, expected, "pixel ({}, {}) byte {}", x, y, i);
                }
            }
        }
    }

    #[test]
    fn test_encode_padding_bits_zero() {
        let img = RasterImage::from_pixels(10, 2, vec![BLACK; 20]).unwrap();
        let bitmap = encode(&img);
        assert_eq!(bitmap.as_bytes(), &[0xFF, 0xC0, 0xFF, 0xC0]);
        assert_eq!(bitmap.ink_pixels(), 20);
    }

    #[test]
    fn test_encode_threshold_boundary() {
        let img =
            RasterImage::from_pixels(2, 1, vec![[127, 127, 127], [128, 128, 128]]).unwrap();
        let bitmap = encode(&img);
        assert!(bitmap.is_ink(0, 0));
        assert!(!bitmap.is_ink(1, 0));
    }

    #[test]
    fn test_hex_round_trip_matches_luma() {
        let (w, h) = (13, 5);
        let mut img = white(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = ((x * 31 + y * 57) % 256) as u8;
                img.put_pixel(x, y, [v, v.wrapping_mul(3), 255 - v]);
            }
        }
        let bitmap = encode(&img);
        let hex = bitmap.to_hex();
        assert_eq!(hex.len(), bitmap.byte_count() * 2);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

        let bytes = hex::decode(&hex).unwrap();
        let bpr = bitmap.bytes_per_row();
        for y in 0..h as usize {
            for x in 0..w as usize {
                let bit = bytes[y * bpr + x / 8] & (0x80 >> (x % 8)) != 0;
                let expected = luma(img.get_pixel(x as u32, y as u32)) < LUMA_THRESHOLD;
                assert_eq!(bit, expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_ink_percentage() {
        let mut img = white(4, 1);
        img.put_pixel(1, 0, BLACK);
        assert!((encode(&img).ink_percentage() - 25.0).abs() < f64::EPSILON);
        assert_eq!(encode(&white(4, 4)).ink_percentage(), 0.0);
    }

    #[test]
    fn test_encode_oversized_image_still_encodes() {
        let bitmap = encode(&white(SIZE_WARNING_LIMIT + 1, 1));
        assert_eq!(bitmap.byte_count(), 188);
    }

    #[test]
    fn test_from_packed_validates() {
        assert!(MonochromeBitmap::from_packed(8, 1, vec![0x00]).is_some());
        assert!(MonochromeBitmap::from_packed(8, 2, vec![0x00]).is_none());
        assert!(MonochromeBitmap::from_packed(0, 1, vec![]).is_none());
        // bit 7 of a 7-pixel row is padding
        assert!(MonochromeBitmap::from_packed(7, 1, vec![0x01]).is_none());
        assert!(MonochromeBitmap::from_packed(7, 1, vec![0xFE]).is_some());
    }

    #[test]
    fn test_to_raster_image() {
        let mut img = white(3, 2);
        img.put_pixel(2, 1, [10, 10, 10]);
        let back = encode(&img).to_raster_image();
        assert_eq!(back.get_pixel(2, 1), BLACK);
        assert_eq!(back.get_pixel(0, 0), WHITE);
    }
}
