//! ZPL Label Printer Driver
//!
//! This crate turns an arbitrary raster image into a Zebra (ZPL) graphic label
//! and sends it to the printer over a raw TCP socket (port 9100).
//!
//! The image goes through a fixed pipeline: scale, fit onto the label canvas
//! (pad or crop), threshold to 1 bit per pixel, then wrap the packed rows in a
//! `^GFA` graphic field.
//!
//! # Example
//!
//! ```rust,no_run
//! use zpl_label::{Config, Job, NoopSink, Printer, RasterImage};
//!
//! let image = RasterImage::open("label_capture.png").unwrap();
//! let job = Job::new(6 * 120, 3 * 120).scale(2.0).centered(true);
//! let command = job.render(&image, &mut NoopSink).unwrap();
//!
//! let printer = Printer::new(Config::new("192.168.0.243").port(9100));
//! printer.print(&command).unwrap();
//! ```

mod canvas;
mod error;
mod monochrome;
mod pipeline;
mod printer;
mod raster;
mod scale;
mod settings;
mod zpl;

pub use crate::{
    canvas::fit,
    error::{Error, Result},
    monochrome::{encode, luma, MonochromeBitmap, LUMA_THRESHOLD, SIZE_WARNING_LIMIT},
    pipeline::{
        Checkpoint, DebugSink, Job, NoopSink, PngDirSink, DEFAULT_LABEL_HEIGHT,
        DEFAULT_LABEL_WIDTH,
    },
    printer::{send, Config, Printer, DEFAULT_PORT},
    raster::{RasterImage, Rgb, BLACK, WHITE},
    scale::{scale, scale_to_fit},
    settings::Settings,
    zpl::{frame, LabelCommand},
};
