//! # Printer Configuration
//!
//! This module defines the hardware profiles of the emulated printers and the
//! paper geometry they print onto.
//!
//! ## Supported Printers
//!
//! | Profile | Head | Column unit | Auto CR | Top margin |
//! |---------|------|-------------|---------|------------|
//! | LX80 | 9-pin dot matrix | 1/52.9 in | off | 0.025 in |
//! | IBM1403 | line hammer | 1/60 in | on | 0 |
//!
//! ## Usage
//!
//! ```
//! use impacto::printer::{PrinterConfig, WrapPolicy};
//!
//! let config = PrinterConfig::LX80.with_wrap(WrapPolicy::Wrap);
//! let geometry = config.geometry();
//! assert_eq!(geometry.lines_per_page(), 66);
//! ```

use serde::{Deserialize, Serialize};

/// Standard carriage printable width (inches)
pub const STANDARD_WIDTH: f32 = 8.5;

/// Wide carriage printable width (inches)
pub const WIDE_CARRIAGE_WIDTH: f32 = 13.875;

/// Form length (inches)
pub const PAGE_HEIGHT: f32 = 11.0;

/// Default characters per inch
pub const DEFAULT_CPI: u32 = 10;

/// Default lines per inch
pub const DEFAULT_LPI: u32 = 6;

/// Default tab interval in character cells
pub const DEFAULT_TAB_INTERVAL: u32 = 8;

/// Dot radius of a 9-pin head (points)
pub const DOT_RADIUS_PT: f32 = 0.5;

/// How the head renders a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadKind {
    /// Characters are fired as 9-pin dot columns from the built-in charset.
    DotMatrix,
    /// Characters are struck whole from a type slug (one glyph primitive).
    LineHammer,
}

/// What happens to a character that would cross the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    /// Drop the character without drawing or advancing.
    #[default]
    Discard,
    /// Move to the start of the next line (paginating if needed) and print.
    Wrap,
}

/// # Page Geometry
///
/// Printable area of the form, all distances in inches.
///
/// ```text
/// ├─ left_margin ─┼──────────── width ────────────┤
/// ┬               │                               │
/// top_margin      │   cursor starts here          │
/// ┴               │                               │
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Printable width
    pub width: f32,
    /// Form height
    pub height: f32,
    /// Left margin (cursor x after CR)
    pub left_margin: f32,
    /// Top margin (cursor y after FF)
    pub top_margin: f32,
    /// Characters per inch at pica pitch
    pub cpi: u32,
    /// Lines per inch at the default line spacing
    pub lpi: u32,
}

impl PageGeometry {
    /// Standard 8.5in x 11in continuous form.
    pub const fn standard(top_margin: f32) -> Self {
        Self {
            width: STANDARD_WIDTH,
            height: PAGE_HEIGHT,
            left_margin: 0.0,
            top_margin,
            cpi: DEFAULT_CPI,
            lpi: DEFAULT_LPI,
        }
    }

    /// Wide carriage 13.875in x 11in form.
    pub const fn wide(top_margin: f32) -> Self {
        Self {
            width: WIDE_CARRIAGE_WIDTH,
            ..Self::standard(top_margin)
        }
    }

    /// Right edge of the printable area.
    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.left_margin + self.width
    }

    /// Number of line feeds before an automatic page break (66 for 11in at 6 lpi).
    #[inline]
    pub fn lines_per_page(&self) -> u32 {
        (self.height * self.lpi as f32) as u32
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::standard(0.0)
    }
}

/// # Printer Configuration
///
/// Hardware characteristics and operator switches of an emulated printer.
///
/// ## Column Unit
///
/// Horizontal motion is counted in half-units of `column_unit`. At pica
/// pitch a character cell is 12 half-units:
///
/// ```text
/// cell = 12 * 0.5 * column_unit
///
/// LX80:    12 * 0.5 / 52.9 ≈ 0.1134 in
/// IBM1403: 12 * 0.5 / 60   = 0.1    in  (exactly 1/cpi)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Rendering strategy of the head
    pub head: HeadKind,

    /// Size of one horizontal motion unit (inches)
    pub column_unit: f32,

    /// Top margin the carriage returns to on form feed (inches)
    pub top_margin: f32,

    /// LF also performs CR
    pub auto_cr: bool,

    /// Right-edge overflow behaviour
    pub wrap: WrapPolicy,

    /// Tab stop interval in character cells
    pub tab_interval: u32,

    /// 13.875in carriage instead of 8.5in
    pub wide_carriage: bool,

    /// Radius of one fired dot (points)
    pub dot_radius: f32,
}

impl PrinterConfig {
    /// # Epson LX-80 style 9-pin dot matrix
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Head | 9 pins, 1/72in pitch |
    /// | Pica cell | 12 half-columns |
    /// | Form | 8.5in x 11in, 66 lines |
    /// | Line feed | LF only (no implicit CR) |
    pub const LX80: Self = Self {
        name: "Epson LX-80",
        head: HeadKind::DotMatrix,
        column_unit: 1.0 / 52.9,
        top_margin: 0.025,
        auto_cr: false,
        wrap: WrapPolicy::Discard,
        tab_interval: DEFAULT_TAB_INTERVAL,
        wide_carriage: false,
        dot_radius: DOT_RADIUS_PT,
    };

    /// # IBM 1403 style line printer
    ///
    /// Whole characters struck from a print chain at 10 cpi, 6 lpi.
    pub const IBM1403: Self = Self {
        name: "IBM 1403",
        head: HeadKind::LineHammer,
        column_unit: 1.0 / 60.0,
        top_margin: 0.0,
        auto_cr: true,
        wrap: WrapPolicy::Discard,
        tab_interval: DEFAULT_TAB_INTERVAL,
        wide_carriage: false,
        dot_radius: DOT_RADIUS_PT,
    };

    /// Override the overflow policy.
    pub const fn with_wrap(mut self, wrap: WrapPolicy) -> Self {
        self.wrap = wrap;
        self
    }

    /// Override the implicit carriage return on line feed.
    pub const fn with_auto_cr(mut self, auto_cr: bool) -> Self {
        self.auto_cr = auto_cr;
        self
    }

    /// Select the wide carriage.
    pub const fn with_wide_carriage(mut self, wide: bool) -> Self {
        self.wide_carriage = wide;
        self
    }

    /// Override the tab interval (clamped to at least one cell).
    pub const fn with_tab_interval(mut self, cells: u32) -> Self {
        self.tab_interval = if cells == 0 { 1 } else { cells };
        self
    }

    /// Whole pica cells that fit across the carriage.
    pub fn columns(&self) -> usize {
        let cell = 12.0 * 0.5 * self.column_unit;
        (self.geometry().width / cell + 1e-3).floor() as usize
    }

    /// Power-on page geometry for this printer.
    pub fn geometry(&self) -> PageGeometry {
        if self.wide_carriage {
            PageGeometry::wide(self.top_margin)
        } else {
            PageGeometry::standard(self.top_margin)
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::LX80
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lx80_geometry() {
        let geometry = PrinterConfig::LX80.geometry();
        assert_eq!(geometry.width, 8.5);
        assert_eq!(geometry.height, 11.0);
        assert_eq!(geometry.top_margin, 0.025);
        assert_eq!(geometry.lines_per_page(), 66);
    }

    #[test]
    fn test_wide_carriage() {
        let geometry = PrinterConfig::IBM1403.with_wide_carriage(true).geometry();
        assert_eq!(geometry.width, WIDE_CARRIAGE_WIDTH);
        assert_eq!(geometry.right_edge(), WIDE_CARRIAGE_WIDTH);
    }

    #[test]
    fn test_tab_interval_clamped() {
        assert_eq!(PrinterConfig::LX80.with_tab_interval(0).tab_interval, 1);
        assert_eq!(PrinterConfig::LX80.with_tab_interval(4).tab_interval, 4);
    }

    #[test]
    fn test_columns_per_head() {
        assert_eq!(PrinterConfig::LX80.columns(), 74);
        assert_eq!(PrinterConfig::IBM1403.columns(), 85);
        assert_eq!(PrinterConfig::IBM1403.with_wide_carriage(true).columns(), 138);
    }

    #[test]
    fn test_hammer_cell_is_one_over_cpi() {
        let config = PrinterConfig::IBM1403;
        let cell = 12.0 * 0.5 * config.column_unit;
        assert!((cell - 1.0 / DEFAULT_CPI as f32).abs() < 1e-6);
    }
}
