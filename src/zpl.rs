//! ZPL command framing.
//!
//! A label is a single format holding one graphic field:
//!
//! ```text
//! ^XA^FO<x>,<y>^GFA,<bytes>,<bytes>,<bytes per row>,<HEX>^FS^XZ
//! ```

use crate::monochrome::MonochromeBitmap;
use log::debug;
use std::fmt;

const START_FORMAT: &str = "^XA";
const FIELD_ORIGIN: &str = "^FO";
const GRAPHIC_FIELD_ASCII: &str = "^GFA";
const FIELD_SEPARATOR: &str = "^FS";
const END_FORMAT: &str = "^XZ";

/// A finished ZPL command, ready to be written to the printer as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCommand(Vec<u8>);

impl LabelCommand {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for LabelCommand {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for LabelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only ever built from ASCII.
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Wrap `bitmap` in a ZPL format with its top-left corner at `(origin_x, origin_y)`.
///
/// The whole bitmap goes out as one field, so the total and per-field byte
/// counts of `^GFA` are the same number.
pub fn frame(bitmap: &MonochromeBitmap, origin_x: u32, origin_y: u32) -> LabelCommand {
    let byte_count = bitmap.byte_count();
    let header = format!(
        "{}{}{},{}{},{},{},{},",
        START_FORMAT,
        FIELD_ORIGIN,
        origin_x,
        origin_y,
        GRAPHIC_FIELD_ASCII,
        byte_count,
        byte_count,
        bitmap.bytes_per_row()
    );

    let mut buf: Vec<u8> =
        Vec::with_capacity(header.len() + byte_count * 2 + FIELD_SEPARATOR.len() + END_FORMAT.len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(bitmap.to_hex().as_bytes());
    buf.extend_from_slice(FIELD_SEPARATOR.as_bytes());
    buf.extend_from_slice(END_FORMAT.as_bytes());

    debug!(
        "Built ZPL command: {}x{} graphic, {} data bytes, {} bytes total",
        bitmap.width(),
        bitmap.height(),
        byte_count,
        buf.len()
    );

    LabelCommand(buf)
}
