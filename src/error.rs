//! Error types for label rendering and delivery.
//!
//! Every pipeline stage fails fast with one of these variants and hands it to
//! its caller unchanged.

use std::io;
use thiserror::Error;

/// Main error type for ZPL label operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The source image could not be decoded.
    ///
    /// Wraps the underlying `image` error (unknown format, truncated data,
    /// unreadable file).
    #[error("Failed to decode source image: {0}")]
    Decode(#[from] image::ImageError),

    /// A scale factor, image size or label size is not strictly positive.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A pixel buffer does not hold exactly `width * height` pixels.
    #[error("Pixel buffer holds {actual} pixels, expected {expected}")]
    PixelCount { expected: usize, actual: usize },

    /// The printer endpoint could not be resolved or connected to.
    #[error("Can't connect to printer at {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The connection was established but the command was not written in full.
    #[error("Failed to transmit label to printer: {0}")]
    Transmission(#[source] io::Error),

    /// The debug image sink failed at a checkpoint.
    #[error("Debug sink failed: {0}")]
    DebugSink(String),

    /// Invalid configuration value.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),
}

/// Result type alias for ZPL label operations.
pub type Result<T> = std::result::Result<T, Error>;
