//! Resampling stage.
//!
//! Both operations use nearest-neighbour sampling so a given input always
//! yields the same output; the result is thresholded later, so smoother
//! filters buy nothing.

use crate::{
    error::{Error, Result},
    raster::{check_dimensions, RasterImage},
};
use image::imageops::{self, FilterType};
use log::debug;

/// Resample `image` by `factor`.
///
/// The new size is `round(width * factor) x round(height * factor)`. A factor
/// that is not a positive finite number, or one that rounds either side down
/// to zero, is rejected.
pub fn scale(image: &RasterImage, factor: f64) -> Result<RasterImage> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(Error::InvalidDimension(format!(
            "scale factor must be positive, got {}",
            factor
        )));
    }

    let width = scaled_side(image.width(), factor)?;
    let height = scaled_side(image.height(), factor)?;
    debug!(
        "Scaling image: {}x{} => {}x{} (factor {:.2})",
        image.width(),
        image.height(),
        width,
        height,
        factor
    );

    resample(image, width, height)
}

/// Resize `image` to the largest size that fits inside `max_width x max_height`
/// while keeping its aspect ratio. May enlarge.
pub fn scale_to_fit(image: &RasterImage, max_width: u32, max_height: u32) -> Result<RasterImage> {
    check_dimensions(max_width, max_height)?;

    let (src_width, src_height) = (u64::from(image.width()), u64::from(image.height()));
    let (box_width, box_height) = (u64::from(max_width), u64::from(max_height));

    // The limiting side fills the box, the other one is truncated.
    let (width, height) = if box_width * src_height <= box_height * src_width {
        (box_width, src_height * box_width / src_width)
    } else {
        (src_width * box_height / src_height, box_height)
    };
    let (width, height) = (width.max(1) as u32, height.max(1) as u32);
    debug!(
        "Resizing proportionally: {}x{} => {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );

    resample(image, width, height)
}

fn scaled_side(side: u32, factor: f64) -> Result<u32> {
    let scaled = (f64::from(side) * factor).round();
    if scaled < 1.0 || scaled > f64::from(u32::MAX) {
        return Err(Error::InvalidDimension(format!(
            "scaling {} by {} gives an unusable size {}",
            side, factor, scaled
        )));
    }
    Ok(scaled as u32)
}

fn resample(image: &RasterImage, width: u32, height: u32) -> Result<RasterImage> {
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    let resized = imageops::resize(&image.to_rgb_image(), width, height, FilterType::Nearest);
    RasterImage::from_rgb_image(&resized)
}
