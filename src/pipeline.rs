//! Image to label pipeline.
//!
//! `scale -> (proportional resize) -> fit -> encode -> frame`, each stage
//! consuming the previous stage's output. Intermediate images can be handed
//! to a [`DebugSink`] at fixed checkpoints.

use crate::{
    canvas::fit,
    error::{Error, Result},
    monochrome::{encode, MonochromeBitmap},
    printer::Printer,
    raster::RasterImage,
    scale::{scale, scale_to_fit},
    zpl::{frame, LabelCommand},
};
use log::debug;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

/// Default label width: 6in at 120 dpi.
pub const DEFAULT_LABEL_WIDTH: u32 = 6 * 120;

/// Default label height: 3in at 120 dpi.
pub const DEFAULT_LABEL_HEIGHT: u32 = 3 * 120;

/// Points in the pipeline where intermediate images are observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// After scaling (and the optional proportional resize).
    Scaled,
    /// After fitting onto the label canvas.
    Fitted,
    /// After thresholding, rendered back to black and white.
    Binarized,
}

impl Checkpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scaled => "scaled",
            Self::Fitted => "fitted",
            Self::Binarized => "binarized",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives intermediate images while a label is rendered.
pub trait DebugSink {
    /// Whether the sink wants images at all. Skips building the binarized
    /// preview when it returns `false`.
    fn enabled(&self) -> bool {
        true
    }

    fn checkpoint(&mut self, checkpoint: Checkpoint, image: &RasterImage) -> Result<()>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DebugSink for NoopSink {
    fn enabled(&self) -> bool {
        false
    }

    fn checkpoint(&mut self, _checkpoint: Checkpoint, _image: &RasterImage) -> Result<()> {
        Ok(())
    }
}

/// Writes `<checkpoint>.png` files into a directory.
#[derive(Debug, Clone)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        PngDirSink { dir: dir.into() }
    }

    pub fn path_for(&self, checkpoint: Checkpoint) -> PathBuf {
        self.dir.join(format!("{}.png", checkpoint.name()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DebugSink for PngDirSink {
    fn checkpoint(&mut self, checkpoint: Checkpoint, image: &RasterImage) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            Error::DebugSink(format!("can't create {}: {}", self.dir.display(), err))
        })?;
        let path = self.path_for(checkpoint);
        image
            .to_rgb_image()
            .save(&path)
            .map_err(|err| Error::DebugSink(format!("can't write {}: {}", path.display(), err)))?;
        debug!("Saved {} image to {}", checkpoint, path.display());
        Ok(())
    }
}

/// Parameters for rendering one label.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    scale: f64,
    label_width: u32,
    label_height: u32,
    centered: bool,
    fit_proportionally: bool,
    origin: (u32, u32),
}

impl Default for Job {
    fn default() -> Self {
        Job::new(DEFAULT_LABEL_WIDTH, DEFAULT_LABEL_HEIGHT)
    }
}

impl Job {
    /// A job for a `label_width x label_height` dot label with default values:
    /// scale 2.0, centred, proportional resize on, origin (10, 10).
    pub fn new(label_width: u32, label_height: u32) -> Job {
        Job {
            scale: 2.0,
            label_width,
            label_height,
            centered: true,
            fit_proportionally: true,
            origin: (10, 10),
        }
    }

    pub fn scale(self, scale: f64) -> Self {
        Job { scale, ..self }
    }

    pub fn label_size(self, label_width: u32, label_height: u32) -> Self {
        Job {
            label_width,
            label_height,
            ..self
        }
    }

    /// Centre the image on the label (pad or crop evenly) instead of anchoring
    /// it at the top-left corner.
    pub fn centered(self, centered: bool) -> Self {
        Job { centered, ..self }
    }

    /// Resize the scaled image to fit the label before cropping.
    pub fn fit_proportionally(self, flag: bool) -> Self {
        Job {
            fit_proportionally: flag,
            ..self
        }
    }

    /// Position of the graphic on the print canvas, in dots.
    pub fn origin(self, x: u32, y: u32) -> Self {
        Job {
            origin: (x, y),
            ..self
        }
    }

    pub fn label_width(&self) -> u32 {
        self.label_width
    }

    pub fn label_height(&self) -> u32 {
        self.label_height
    }

    /// Run every stage up to the packed bitmap.
    pub fn rasterize(
        &self,
        image: &RasterImage,
        sink: &mut dyn DebugSink,
    ) -> Result<MonochromeBitmap> {
        debug!("Rendering label: {:?}", self);

        let mut scaled = scale(image, self.scale)?;
        if self.fit_proportionally {
            scaled = scale_to_fit(&scaled, self.label_width, self.label_height)?;
        }
        if sink.enabled() {
            sink.checkpoint(Checkpoint::Scaled, &scaled)?;
        }

        let fitted = fit(&scaled, self.label_width, self.label_height, self.centered)?;
        if sink.enabled() {
            sink.checkpoint(Checkpoint::Fitted, &fitted)?;
        }

        let bitmap = encode(&fitted);
        if sink.enabled() {
            sink.checkpoint(Checkpoint::Binarized, &bitmap.to_raster_image())?;
        }

        Ok(bitmap)
    }

    /// Render `image` into a finished ZPL command.
    pub fn render(&self, image: &RasterImage, sink: &mut dyn DebugSink) -> Result<LabelCommand> {
        let bitmap = self.rasterize(image, sink)?;
        Ok(frame(&bitmap, self.origin.0, self.origin.1))
    }

    /// Render `image` and send it to `printer`.
    pub fn render_and_send(
        &self,
        image: &RasterImage,
        sink: &mut dyn DebugSink,
        printer: &Printer,
    ) -> Result<LabelCommand> {
        let command = self.render(image, sink)?;
        printer.print(&command)?;
        Ok(command)
    }
}
