//! Fit a scaled image onto a label-sized canvas.

use crate::{
    error::{Error, Result},
    raster::RasterImage,
};
use log::debug;

/// Fit `image` into exactly `target_width x target_height` pixels.
///
/// An image no larger than the target in both directions is pasted onto a
/// white canvas, centred when `centered` is set and at the top-left corner
/// otherwise. Anything larger is cropped to a target-sized window taken from
/// the centre (or the top-left corner); a side that is already short enough
/// is padded with white rather than stretched.
pub fn fit(
    image: &RasterImage,
    target_width: u32,
    target_height: u32,
    centered: bool,
) -> Result<RasterImage> {
    if target_width == 0 || target_height == 0 {
        return Err(Error::InvalidDimension(format!(
            "label size must be positive, got {}x{}",
            target_width, target_height
        )));
    }

    let (width, height) = image.dimensions();
    debug!(
        "Fitting image: {}x{} => {}x{} (centered: {})",
        width, height, target_width, target_height, centered
    );

    let mut canvas = RasterImage::new(target_width, target_height)?;

    if width <= target_width && height <= target_height {
        let (dst_x, dst_y) = if centered {
            ((target_width - width) / 2, (target_height - height) / 2)
        } else {
            (0, 0)
        };
        debug!("Image fits, padding onto white canvas at ({}, {})", dst_x, dst_y);
        copy_region(image, (0, 0), (width, height), &mut canvas, (dst_x, dst_y));
    } else {
        let (src_x, src_y) = if centered {
            (
                width.saturating_sub(target_width) / 2,
                height.saturating_sub(target_height) / 2,
            )
        } else {
            (0, 0)
        };
        let crop_width = target_width.min(width - src_x);
        let crop_height = target_height.min(height - src_y);
        debug!(
            "Cropping {}x{} window at ({}, {})",
            crop_width, crop_height, src_x, src_y
        );
        copy_region(
            image,
            (src_x, src_y),
            (crop_width, crop_height),
            &mut canvas,
            (0, 0),
        );
    }

    Ok(canvas)
}

/// Copy a `size` region starting at `src_origin` onto `dst` at `dst_origin`.
/// The caller guarantees both rectangles are in bounds.
fn copy_region(
    src: &RasterImage,
    (src_x, src_y): (u32, u32),
    (width, height): (u32, u32),
    dst: &mut RasterImage,
    (dst_x, dst_y): (u32, u32),
) {
    let (src_x, dst_x, width) = (src_x as usize, dst_x as usize, width as usize);
    for row in 0..height {
        let from = &src.row(src_y + row)[src_x..src_x + width];
        dst.row_mut(dst_y + row)[dst_x..dst_x + width].copy_from_slice(from);
    }
}
