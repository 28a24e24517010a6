//! In-memory RGB raster shared by every pipeline stage.
//!
//! Decoding goes through the `image` crate; once decoded the pixels live in a
//! flat row-major buffer of RGB triples. Transparent pixels are composited onto
//! white paper on the way in.

use crate::error::{Error, Result};
use image::{DynamicImage, RgbImage, Rgba};
use log::debug;
use std::path::Path;

/// One RGB pixel.
pub type Rgb = [u8; 3];

/// Paper colour, used for every canvas background.
pub const WHITE: Rgb = [0xFF, 0xFF, 0xFF];

/// Full ink.
pub const BLACK: Rgb = [0x00, 0x00, 0x00];

/// A decoded raster image.
///
/// `pixels.len()` is always `width * height`. Stages never mutate an image
/// they received; they return it unchanged or build a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl RasterImage {
    /// Allocate a white canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(RasterImage {
            width,
            height,
            pixels: vec![WHITE; width as usize * height as usize],
        })
    }

    /// Wrap an existing row-major pixel buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(RasterImage {
            width,
            height,
            pixels,
        })
    }

    /// Convert a decoded image, blending any alpha channel over white.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self> {
        if !image.color().has_alpha() {
            return Self::from_rgb_image(&image.to_rgb8());
        }
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(blend_over_white).collect();
        Self::from_pixels(width, height, pixels)
    }

    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Decode an encoded image (PNG, JPEG, BMP, GIF) held in memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?;
        debug!("Decoded image: {}x{}", image.width(), image.height());
        Self::from_dynamic_image(&image)
    }

    /// Read and decode an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading image: {}", path.display());
        let image = image::open(path)?;
        debug!("Decoded image: {}x{}", image.width(), image.height());
        Self::from_dynamic_image(&image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like `image::ImageBuffer`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgb) {
        let i = self.index(x, y);
        self.pixels[i] = pixel;
    }

    /// Row `y` as a slice of `width` pixels.
    pub fn row(&self, y: u32) -> &[Rgb] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [Rgb] {
        let start = y as usize * self.width as usize;
        let end = start + self.width as usize;
        &mut self.pixels[start..end]
    }

    /// Copy out into an `image` buffer, for resampling or saving.
    pub fn to_rgb_image(&self) -> RgbImage {
        let raw = self.pixels.iter().flat_map(|p| p.iter().copied()).collect();
        // Length is width * height * 3 by construction.
        RgbImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

/// `c * a + 255 * (1 - a)` per channel, rounded.
fn blend_over_white(pixel: &Rgba<u8>) -> Rgb {
    let alpha = u32::from(pixel[3]);
    let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
    [blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension(format!(
            "image size must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}
