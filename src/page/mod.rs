//! # Page Buffer
//!
//! Ordered, append-only storage for everything the head strikes.
//!
//! ```text
//! PageBuffer
//!  ├── Page 0: [decoration ops...] [content ops...]
//!  ├── Page 1: [decoration ops...] [content ops...]
//!  └── Page n  ← append() always targets the last page
//! ```
//!
//! Later ops paint over earlier ones, so decoration (guide bands, tractor
//! holes) is laid down when a page is created, before any content.
//!
//! Coordinates are paper-space inches with the origin at the top-left of the
//! sheet. The serializers flip to their own conventions.

pub mod decoration;

use serde::{Deserialize, Serialize};

use crate::printer::PageGeometry;
pub use decoration::{BandColor, Decorations, GuideBands};

/// Fill color as RGB components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0);

    /// Gray ink of the given strike intensity (1.0 = black).
    pub fn ink(intensity: f32) -> Self {
        let level = (1.0 - intensity).clamp(0.0, 1.0);
        Color(level, level, level)
    }
}

/// Which typeface a glyph op refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRef {
    /// The document's text face (built-in Courier or an embedded font)
    Text,
}

/// One drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// A filled circle centered at (x, y); radius in points.
    Dot {
        x: f32,
        y: f32,
        radius: f32,
        intensity: f32,
    },
    /// A character whose cell top-left is (x, y).
    Glyph {
        x: f32,
        y: f32,
        font: FontRef,
        code: u8,
        intensity: f32,
    },
    /// A filled rectangle with top-left (x, y).
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
}

/// One sheet of output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    ops: Vec<DrawOp>,
    /// Number of leading decoration ops
    decoration_len: usize,
}

impl Page {
    fn with_decoration(decoration: &[DrawOp]) -> Self {
        Self {
            ops: decoration.to_vec(),
            decoration_len: decoration.len(),
        }
    }

    /// All ops in paint order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Ops struck by the head, without the decoration underlay.
    pub fn content(&self) -> &[DrawOp] {
        &self.ops[self.decoration_len..]
    }

    /// Number of glyph ops on the page.
    pub fn glyph_count(&self) -> usize {
        self.content()
            .iter()
            .filter(|op| matches!(op, DrawOp::Glyph { .. }))
            .count()
    }

    /// Number of dot ops struck by the head.
    pub fn dot_count(&self) -> usize {
        self.content()
            .iter()
            .filter(|op| matches!(op, DrawOp::Dot { .. }))
            .count()
    }
}

/// Growable arena of pages under construction.
#[derive(Debug, Clone)]
pub struct PageBuffer {
    pages: Vec<Page>,
    geometry: PageGeometry,
    decorations: Decorations,
    decoration: Vec<DrawOp>,
}

impl PageBuffer {
    /// Create an empty buffer. No page exists until the first draw or form feed.
    pub fn new(geometry: PageGeometry, decorations: Decorations) -> Self {
        let decoration = decorations.ops(&geometry);
        Self {
            pages: Vec::new(),
            geometry,
            decorations,
            decoration,
        }
    }

    /// Start a new page after the current one.
    ///
    /// On an empty buffer the implicit first page is materialized first, so
    /// a form feed always leaves exactly one more page than before.
    pub fn new_page(&mut self) {
        self.ensure_page();
        self.push_page();
    }

    /// Append an op to the current (last) page.
    pub fn append(&mut self, op: DrawOp) {
        self.ensure_page();
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Zero-based index of the current page.
    pub fn current_index(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    /// Number of pages created so far.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages created so far.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Hand the pages over as an immutable document (at least one page).
    pub fn finalize(mut self) -> Document {
        self.ensure_page();
        Document {
            pages: self.pages,
            geometry: self.geometry,
            decorations: self.decorations,
        }
    }

    fn ensure_page(&mut self) {
        if self.pages.is_empty() {
            self.push_page();
        }
    }

    fn push_page(&mut self) {
        self.pages.push(Page::with_decoration(&self.decoration));
        log::debug!("page {} started", self.pages.len());
    }
}

/// A finished, immutable sequence of pages ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pages: Vec<Page>,
    geometry: PageGeometry,
    decorations: Decorations,
}

impl Document {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Paper width including any tractor strips (inches).
    pub fn media_width(&self) -> f32 {
        self.geometry.width + self.decorations.strip_width() * 2.0
    }

    /// Paper height (inches).
    pub fn media_height(&self) -> f32 {
        self.geometry.height
    }

    /// Any page carries a glyph op, so the text font must be declared.
    pub fn needs_font(&self) -> bool {
        self.pages.iter().any(|page| page.glyph_count() > 0)
    }

    /// Serialize the buffered ops as pretty JSON, for inspection and golden files.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
