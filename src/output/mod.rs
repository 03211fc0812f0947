//! # Document Output
//!
//! Serializers that turn a finished [`Document`] into bytes.
//!
//! | Format | Module | Pages |
//! |--------|--------|-------|
//! | PDF 1.4 | [`pdf`] | one file, one page object per sheet |
//! | SVG | [`svg`] | one file per sheet, or all sheets stacked |
//!
//! Both work in points (1/72 inch). Paper-space y grows downward; PDF flips
//! it at serialization, SVG keeps it.

pub mod font;
pub mod pdf;
pub mod svg;

use std::io::{self, Write};

use crate::page::{Color, Document};

pub use font::FontResource;
pub use pdf::{PdfOptions, PdfWriter};

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Font size of struck glyphs (points)
pub const GLYPH_SIZE_PT: f32 = 12.0;

/// Target container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Svg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Sink wrapper that counts the bytes written through it.
///
/// The count is the absolute position within the output, which is what PDF
/// cross-reference entries record.
#[derive(Debug)]
pub struct OffsetWriter<W> {
    inner: W,
    offset: u64,
}

impl<W: Write> OffsetWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes written so far.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for OffsetWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.offset += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Page size in points, including any tractor strips.
pub(crate) fn media_size_pt(document: &Document) -> (f32, f32) {
    (
        document.media_width() * POINTS_PER_INCH,
        document.media_height() * POINTS_PER_INCH,
    )
}

/// `#rrggbb` form of a color.
pub(crate) fn hex_color(color: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.0),
        channel(color.1),
        channel(color.2)
    )
}
