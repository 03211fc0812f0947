//! # Continuous Form Decoration
//!
//! Cosmetic underlay for fan-fold paper: "green bar" guide bands and
//! tractor-feed edge strips. None of it affects text layout except that the
//! printable area shifts right by the strip width when strips are drawn.
//!
//! ```text
//! ├ 0.5in ┼──────── printable width ────────┼ 0.5in ┤
//! │ o   : │█████████████████████████████████│ :   o │  ← band
//! │     : │                                 │ :     │
//! │ o   : │█████████████████████████████████│ :   o │
//!   ↑   ↑
//!   │   seam (micro-perforation)
//!   sprocket hole
//! ```

use serde::{Deserialize, Serialize};

use super::{Color, DrawOp};
use crate::printer::PageGeometry;

/// Width of each tractor strip (inches)
pub const TRACTOR_WIDTH: f32 = 0.5;

/// Distance between sprocket hole centers (inches)
pub const HOLE_SPACING: f32 = 0.5;

/// Distance from the top of the form to the first hole (inches)
pub const HOLE_MARGIN: f32 = 0.25;

/// Sprocket hole radius (points)
pub const HOLE_RADIUS_PT: f32 = 7.0;

/// Seam distance inside the strip's inner edge (inches)
const SEAM_INSET: f32 = 0.125;

/// Spacing of the micro-perforation dots (inches)
const PERFORATION_SPACING: f32 = 1.0 / 32.0;

/// Radius of one micro-perforation dot (points)
const PERFORATION_RADIUS_PT: f32 = 0.45;

/// Height of a standard guide band (inches)
const BAND_HEIGHT: f32 = 0.5;

/// Ink of the guide bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandColor {
    #[default]
    Green,
    Blue,
}

impl BandColor {
    pub fn color(self) -> Color {
        match self {
            BandColor::Green => Color(0.85, 1.0, 0.85),
            BandColor::Blue => Color(0.85, 0.92, 1.0),
        }
    }
}

/// Alternating horizontal guide bands.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GuideBands {
    pub color: BandColor,
    /// One print line per band instead of half an inch
    pub single_line: bool,
}

impl GuideBands {
    /// Band height for `geometry` (inches).
    pub fn band_height(&self, geometry: &PageGeometry) -> f32 {
        if self.single_line {
            1.0 / geometry.lpi.max(1) as f32
        } else {
            BAND_HEIGHT
        }
    }
}

/// Decoration drawn beneath every page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Decorations {
    pub guide_bands: Option<GuideBands>,
    pub tractor_edges: bool,
}

impl Decorations {
    /// Width of one tractor strip, or zero when strips are off.
    pub fn strip_width(&self) -> f32 {
        if self.tractor_edges { TRACTOR_WIDTH } else { 0.0 }
    }

    /// Horizontal offset from the paper edge to the printable origin.
    pub fn content_offset(&self) -> f32 {
        self.strip_width()
    }

    /// Ops laid down at the start of every page, in paint order.
    pub fn ops(&self, geometry: &PageGeometry) -> Vec<DrawOp> {
        let mut ops = Vec::new();
        let full_width = geometry.width + self.strip_width() * 2.0;

        if let Some(bands) = self.guide_bands {
            let band = bands.band_height(geometry);
            let color = bands.color.color();
            let mut y = 0.0;
            while y < geometry.height - 1e-6 {
                ops.push(DrawOp::Rect {
                    x: 0.0,
                    y,
                    width: full_width,
                    height: band.min(geometry.height - y),
                    color,
                });
                y += band * 2.0;
            }
        }

        if self.tractor_edges {
            let seam_left = TRACTOR_WIDTH - SEAM_INSET;
            let seam_right = full_width - TRACTOR_WIDTH + SEAM_INSET;

            let perforations = (geometry.height / PERFORATION_SPACING).floor() as usize;
            for i in 0..=perforations {
                let y = i as f32 * PERFORATION_SPACING;
                ops.push(dot(seam_left, y, PERFORATION_RADIUS_PT));
                ops.push(dot(seam_right, y, PERFORATION_RADIUS_PT));
            }

            let left_center = seam_left / 2.0;
            let right_center = (seam_right + full_width) / 2.0;
            let mut y = HOLE_MARGIN;
            while y <= geometry.height - HOLE_MARGIN + 1e-4 {
                ops.push(dot(left_center, y, HOLE_RADIUS_PT));
                ops.push(dot(right_center, y, HOLE_RADIUS_PT));
                y += HOLE_SPACING;
            }
        }

        ops
    }
}

fn dot(x: f32, y: f32, radius: f32) -> DrawOp {
    DrawOp::Dot {
        x,
        y,
        radius,
        intensity: 1.0,
    }
}
