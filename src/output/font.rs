//! # Text Font Resource
//!
//! The face used for [`DrawOp::Glyph`](crate::page::DrawOp::Glyph) ops:
//! either the PDF base-14 Courier or a TrueType file embedded in the output.
//!
//! Embedded fonts are parsed with `ab_glyph` once, when loaded. A file that
//! cannot be read or parsed is not an error for the run: the document falls
//! back to Courier and a warning is logged.

use std::path::Path;

use ab_glyph::{Font, FontRef as TtfFont};

use crate::error::ImpactoError;

/// First character code with a width entry
pub const FIRST_CHAR: u8 = 32;

/// Last character code with a width entry
pub const LAST_CHAR: u8 = 126;

/// Advance of every Courier glyph (1/1000 em)
const COURIER_WIDTH: u16 = 600;

/// Name used when a font file gives no usable one
const FALLBACK_NAME: &str = "CustomFont";

/// Glyph metrics in PDF text space units (1/1000 em).
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Advances of `FIRST_CHAR..=LAST_CHAR`
    pub widths: Vec<u16>,
    pub ascent: i32,
    pub descent: i32,
}

impl FontMetrics {
    fn courier() -> Self {
        Self {
            widths: vec![COURIER_WIDTH; (LAST_CHAR - FIRST_CHAR + 1) as usize],
            ascent: 800,
            descent: -200,
        }
    }
}

/// Font used for struck glyphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FontResource {
    /// Built-in Courier, referenced by name only
    #[default]
    Builtin,
    /// TrueType bytes embedded in the document
    Embedded {
        name: String,
        data: Vec<u8>,
        metrics: FontMetrics,
    },
}

impl FontResource {
    /// Validate `data` as a TrueType font and measure it.
    pub fn embedded(name: &str, data: Vec<u8>) -> Result<Self, ImpactoError> {
        let metrics = measure(&data).map_err(|e| ImpactoError::Font(format!("{}: {}", name, e)))?;
        Ok(FontResource::Embedded {
            name: pdf_name(name),
            data,
            metrics,
        })
    }

    /// Load a TrueType file, falling back to Courier if it is unusable.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let loaded = std::fs::read(path)
            .map_err(ImpactoError::from)
            .and_then(|data| Self::embedded(&name, data));
        match loaded {
            Ok(font) => {
                log::info!("loaded font {} ({} bytes)", path.display(), font.data().len());
                font
            }
            Err(e) => {
                log::warn!("could not use font {}: {}; using built-in Courier", path.display(), e);
                FontResource::Builtin
            }
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, FontResource::Embedded { .. })
    }

    /// PDF base font name.
    pub fn name(&self) -> &str {
        match self {
            FontResource::Builtin => "Courier",
            FontResource::Embedded { name, .. } => name,
        }
    }

    /// Raw font file bytes (empty for the built-in font).
    pub fn data(&self) -> &[u8] {
        match self {
            FontResource::Builtin => &[],
            FontResource::Embedded { data, .. } => data,
        }
    }

    pub fn metrics(&self) -> FontMetrics {
        match self {
            FontResource::Builtin => FontMetrics::courier(),
            FontResource::Embedded { metrics, .. } => metrics.clone(),
        }
    }
}

/// Parse a TrueType font and convert its metrics to 1/1000 em.
fn measure(data: &[u8]) -> Result<FontMetrics, ab_glyph::InvalidFont> {
    let font = TtfFont::try_from_slice(data)?;
    let units = font.units_per_em().unwrap_or(1000.0);
    let scale = |v: f32| (v * 1000.0 / units).round();

    let widths = (FIRST_CHAR..=LAST_CHAR)
        .map(|code| {
            let id = font.glyph_id(char::from(code));
            scale(font.h_advance_unscaled(id)).clamp(0.0, f32::from(u16::MAX)) as u16
        })
        .collect();

    Ok(FontMetrics {
        widths,
        ascent: scale(font.ascent_unscaled()) as i32,
        descent: scale(font.descent_unscaled()) as i32,
    })
}

/// Reduce `name` to characters allowed in a PDF name object.
fn pdf_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_courier() {
        let font = FontResource::default();
        assert_eq!(font.name(), "Courier");
        assert!(!font.is_embedded());
        assert!(font.data().is_empty());

        let metrics = font.metrics();
        assert_eq!(metrics.widths.len(), 95);
        assert!(metrics.widths.iter().all(|w| *w == 600));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = FontResource::embedded("junk", b"not a font".to_vec()).unwrap_err();
        assert!(matches!(err, ImpactoError::Font(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let font = FontResource::from_file("/nonexistent/dir/typewriter.ttf");
        assert_eq!(font, FontResource::Builtin);
    }

    #[test]
    fn test_pdf_name_sanitized() {
        assert_eq!(pdf_name("IBM Plex Mono (1)"), "IBMPlexMono1");
        assert_eq!(pdf_name("()"), FALLBACK_NAME);
    }
}
