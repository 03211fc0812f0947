//! # Print-Head Engine
//!
//! Turns characters and raw pin patterns into draw ops and moves the
//! carriage.
//!
//! ## Horizontal Motion
//!
//! The head moves in column steps. A character cell is twelve of them:
//!
//! ```text
//! col:  0 1 2 3 4 5 6 7 8 | 9 10 11
//!       └── glyph columns ┘ └ gap ┘
//! ```
//!
//! A column step is `column_step × column_unit` inches, where
//! `column_step` comes from the pitch table in [`ModeState`] and
//! `column_unit` from the [`PrinterConfig`]. Wide print doubles every step.
//!
//! ## Re-striking
//!
//! | Mode | Extra strike per column |
//! |------|-------------------------|
//! | Bold | +1 column step right |
//! | Double-strike | +½ pin pitch down |
//! | Both | one strike at both offsets |
//! | Wide | +2 column steps right (and the column pitch doubles) |
//!
//! Re-strikes never change how far the carriage advances.
//!
//! ## State
//!
//! The head itself holds only configuration. Everything that changes while
//! a stream is printed lives in a [`Carriage`], passed in by the caller.

pub mod wear;

use crate::glyph::{Charset, GlyphSource, MATRIX_SIZE, UNDERLINE_BIT};
use crate::page::{Color, Decorations, DrawOp, FontRef, PageBuffer};
use crate::printer::{CursorState, HeadKind, ModeState, PageGeometry, PrinterConfig, WrapPolicy};

pub use wear::{DEFAULT_SEED, HeadWear, NoWear, WornHead};

/// Vertical distance between adjacent pins (inches)
pub const PIN_PITCH: f32 = 1.0 / 72.0;

/// Distance from the cursor to a struck glyph's baseline (inches)
pub const GLYPH_BASELINE: f32 = 12.0 / 72.0;

/// Column steps in one character cell
const CELL_COLUMNS: usize = 12;

/// Slack allowed when comparing a position against the right edge (inches)
const EDGE_TOLERANCE: f32 = 1e-4;

/// Underline rule of a struck glyph, below its baseline (inches)
const RULE_DROP: f32 = 1.5 / 72.0;
const RULE_WEIGHT: f32 = 0.6 / 72.0;

/// Horizontal density of a bit-image stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsDensity {
    /// 60 dpi (ESC K)
    Single,
    /// 120 dpi (ESC L, ESC Y)
    Double,
}

impl GraphicsDensity {
    /// Column step taken after each graphics byte, in column units.
    pub fn column_step(self) -> f32 {
        match self {
            GraphicsDensity::Single => 1.0,
            GraphicsDensity::Double => 0.5,
        }
    }
}

/// Everything a running printer mutates: head position, modes, form and pages.
#[derive(Debug, Clone)]
pub struct Carriage {
    pub cursor: CursorState,
    pub modes: ModeState,
    pub geometry: PageGeometry,
    pub pages: PageBuffer,
}

impl Carriage {
    /// Power-on carriage: cursor home, default modes, no pages yet.
    pub fn new(geometry: PageGeometry, decorations: Decorations) -> Self {
        Self {
            cursor: CursorState::home(&geometry),
            modes: ModeState::default(),
            geometry,
            pages: PageBuffer::new(geometry, decorations),
        }
    }
}

/// Strike parameters shared by every column of one character.
#[derive(Debug, Clone, Copy)]
struct Ink {
    intensity: f32,
    dx: f32,
    dy: f32,
}

impl Ink {
    const FULL: Ink = Ink {
        intensity: 1.0,
        dx: 0.0,
        dy: 0.0,
    };
}

/// # Print Head
///
/// A dot-matrix or line-hammer head bound to one printer profile.
///
/// ## Example
///
/// ```
/// use impacto::engine::{Carriage, NoWear, PrintHead};
/// use impacto::page::Decorations;
/// use impacto::printer::PrinterConfig;
///
/// let config = PrinterConfig::LX80;
/// let head = PrintHead::new(config, &Decorations::default(), NoWear);
/// let mut carriage = Carriage::new(config.geometry(), Decorations::default());
///
/// head.print_char(&mut carriage, b'A');
/// assert!((carriage.cursor.x - head.cell_width(&carriage.modes)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct PrintHead<W = NoWear> {
    config: PrinterConfig,
    glyphs: Charset,
    wear: W,
    /// Paper-space x of the printable origin
    origin: f32,
    /// Drop dots that land outside the printable strip
    clip: bool,
}

impl<W: HeadWear> PrintHead<W> {
    pub fn new(config: PrinterConfig, decorations: &Decorations, wear: W) -> Self {
        Self {
            config,
            glyphs: Charset::new(),
            wear,
            origin: decorations.content_offset(),
            clip: decorations.tractor_edges,
        }
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Width of one column step under the current modes (inches).
    #[inline]
    pub fn column_width(&self, modes: &ModeState) -> f32 {
        modes.column_step() * self.config.column_unit
    }

    /// Width of one character cell under the current modes (inches).
    #[inline]
    pub fn cell_width(&self, modes: &ModeState) -> f32 {
        let cell = CELL_COLUMNS as f32 * self.column_width(modes);
        if modes.is_wide() { cell * 2.0 } else { cell }
    }

    /// Print one character at the cursor and advance one cell.
    ///
    /// A character that would cross the right edge is handled by the
    /// configured [`WrapPolicy`] first.
    pub fn print_char(&self, carriage: &mut Carriage, code: u8) {
        let cell = self.cell_width(&carriage.modes);
        if !self.make_room(carriage, cell) {
            log::trace!("discarded {:#04x} at the right edge", code);
            return;
        }

        match self.config.head {
            HeadKind::DotMatrix => self.strike_dots(carriage, code, cell),
            HeadKind::LineHammer => self.strike_slug(carriage, code, cell),
        }
    }

    /// Fire the pins set in `bits` (bit 0 = top) at the cursor without moving.
    pub fn print_bit_column(&self, carriage: &mut Carriage, bits: u16) {
        let x = carriage.cursor.x;
        self.strike_column(carriage, bits, x, 0.0, Ink::FULL);
    }

    /// Print a run of bit-image bytes, one column per byte.
    ///
    /// Bytes arrive with the top pin in the most significant bit. Columns
    /// that would start past the right edge are dropped.
    pub fn print_graphics(&self, carriage: &mut Carriage, data: &[u8], density: GraphicsDensity) {
        let step = density.column_step() * self.config.column_unit;
        let right = carriage.geometry.right_edge();

        for (i, byte) in data.iter().enumerate() {
            if carriage.cursor.x > right + EDGE_TOLERANCE {
                log::trace!("dropped {} graphics columns", data.len() - i);
                break;
            }
            self.print_bit_column(carriage, u16::from(byte.reverse_bits()));
            carriage.cursor.x += step;
        }
        carriage.cursor.x = carriage.cursor.x.min(right);
    }

    /// LF: advance one line, returning the carriage when auto-CR is on.
    pub fn line_feed(&self, carriage: &mut Carriage) {
        if self.config.auto_cr {
            carriage.cursor.x = carriage.geometry.left_margin;
        }
        carriage.modes.wide_one_line = false;
        self.advance_line(carriage);
    }

    /// CR: back to the left margin.
    pub fn carriage_return(&self, carriage: &mut Carriage) {
        carriage.cursor.x = carriage.geometry.left_margin;
        carriage.modes.wide_one_line = false;
    }

    /// FF: start a new page with the cursor at home.
    pub fn form_feed(&self, carriage: &mut Carriage) {
        carriage.pages.new_page();
        carriage.cursor = CursorState::home(&carriage.geometry);
    }

    /// BS: back one cell, never past the left margin.
    pub fn backspace(&self, carriage: &mut Carriage) {
        let cell = self.cell_width(&carriage.modes);
        let left = carriage.geometry.left_margin;
        carriage.cursor.x = (carriage.cursor.x - cell).max(left);
    }

    /// HT: forward to the next tab stop.
    ///
    /// Stops sit every `tab_interval` cells from the left margin. A stop past
    /// the right edge either starts a new line ([`WrapPolicy::Wrap`]) or
    /// parks the carriage at the edge ([`WrapPolicy::Discard`]).
    pub fn tab(&self, carriage: &mut Carriage) {
        let cell = self.cell_width(&carriage.modes);
        let interval = self.config.tab_interval.max(1) as f32;
        let left = carriage.geometry.left_margin;
        let right = carriage.geometry.right_edge();

        let column = (carriage.cursor.x - left) / cell;
        let stop = ((column + 1e-3) / interval).floor() * interval + interval;
        let x = left + stop * cell;

        if x <= right + EDGE_TOLERANCE {
            carriage.cursor.x = x;
            return;
        }
        match self.config.wrap {
            WrapPolicy::Wrap => {
                carriage.cursor.x = left;
                self.advance_line(carriage);
            }
            WrapPolicy::Discard => carriage.cursor.x = right,
        }
    }

    /// Check that `cell` fits before the right edge, wrapping if allowed.
    fn make_room(&self, carriage: &mut Carriage, cell: f32) -> bool {
        if carriage.cursor.x + cell <= carriage.geometry.right_edge() + EDGE_TOLERANCE {
            return true;
        }
        match self.config.wrap {
            WrapPolicy::Discard => false,
            WrapPolicy::Wrap => {
                carriage.cursor.x = carriage.geometry.left_margin;
                self.advance_line(carriage);
                true
            }
        }
    }

    fn advance_line(&self, carriage: &mut Carriage) {
        carriage.cursor.y += carriage.modes.line_step;
        carriage.cursor.line_count += 1;

        let full = carriage.cursor.line_count >= carriage.geometry.lines_per_page()
            || carriage.cursor.y >= carriage.geometry.height;
        if full {
            log::debug!("page full after {} lines", carriage.cursor.line_count);
            self.form_feed(carriage);
        }
    }

    /// Character column under the cursor, for wear lookup.
    fn cell_index(&self, carriage: &Carriage) -> usize {
        let cell = CELL_COLUMNS as f32 * self.column_width(&carriage.modes);
        let column = (carriage.cursor.x - carriage.geometry.left_margin) / cell + 0.001;
        column.max(0.0) as usize
    }

    fn ink_for(&self, carriage: &Carriage, code: u8) -> Ink {
        let (dx, dy) = self.wear.jitter(code);
        Ink {
            intensity: self.wear.intensity(self.cell_index(carriage)),
            dx,
            dy,
        }
    }

    fn strike_dots(&self, carriage: &mut Carriage, code: u8, cell: f32) {
        let modes = carriage.modes;
        let code = if modes.italic { code | 0x80 } else { code };
        let ink = self.ink_for(carriage, code & 0x7F);

        let xs = self.column_width(&modes);
        let pitch = if modes.is_wide() { xs * 2.0 } else { xs };
        let underline = if modes.underline { UNDERLINE_BIT } else { 0 };
        let restrike_x = if modes.bold { xs } else { 0.0 };
        let restrike_y = if modes.double_strike {
            modes.row_step * PIN_PITCH / 2.0
        } else {
            0.0
        };

        let start = carriage.cursor.x;
        for (i, column) in self.glyphs.glyph(code).into_iter().enumerate() {
            let bits = column | underline;
            let x = start + i as f32 * pitch;
            self.strike_column(carriage, bits, x, 0.0, ink);
            if modes.bold || modes.double_strike {
                self.strike_column(carriage, bits, x + restrike_x, restrike_y, ink);
            }
            if modes.is_wide() {
                self.strike_column(carriage, bits, x + xs * 2.0, 0.0, ink);
            }
        }
        carriage.cursor.x = start + cell;
    }

    fn strike_column(&self, carriage: &mut Carriage, bits: u16, x: f32, dy: f32, ink: Ink) {
        let half_pin = PIN_PITCH * 0.5;
        let pin_step = carriage.modes.row_step * PIN_PITCH;
        let x = self.origin + x + half_pin + ink.dx;

        if self.clip {
            let width = carriage.geometry.width;
            if x < self.origin - 1e-6 || x > self.origin + width + 1e-6 {
                return;
            }
        }

        let top = carriage.cursor.y + carriage.modes.y_offset + half_pin + dy + ink.dy;
        for pin in 0..MATRIX_SIZE {
            if bits & (1 << pin) != 0 {
                carriage.pages.append(DrawOp::Dot {
                    x,
                    y: top + pin as f32 * pin_step,
                    radius: self.config.dot_radius,
                    intensity: ink.intensity,
                });
            }
        }
    }

    fn strike_slug(&self, carriage: &mut Carriage, code: u8, cell: f32) {
        let modes = carriage.modes;
        let code = if (0x20..=0x7E).contains(&code) { code } else { b'?' };
        let ink = self.ink_for(carriage, code);

        let x = self.origin + carriage.cursor.x + ink.dx;
        let y = carriage.cursor.y + modes.y_offset + ink.dy;
        let glyph = |x: f32, y: f32| DrawOp::Glyph {
            x,
            y,
            font: FontRef::Text,
            code,
            intensity: ink.intensity,
        };

        carriage.pages.append(glyph(x, y));
        if modes.bold || modes.double_strike {
            let dx = if modes.bold { self.column_width(&modes) } else { 0.0 };
            let dy = if modes.double_strike {
                modes.row_step * PIN_PITCH / 2.0
            } else {
                0.0
            };
            carriage.pages.append(glyph(x + dx, y + dy));
        }
        if modes.underline {
            carriage.pages.append(DrawOp::Rect {
                x,
                y: y + GLYPH_BASELINE + RULE_DROP,
                width: cell,
                height: RULE_WEIGHT,
                color: Color::ink(ink.intensity),
            });
        }

        carriage.cursor.x += cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(config: PrinterConfig) -> (PrintHead, Carriage) {
        let head = PrintHead::new(config, &Decorations::default(), NoWear);
        let carriage = Carriage::new(config.geometry(), Decorations::default());
        (head, carriage)
    }

    fn content_len(carriage: &Carriage) -> usize {
        carriage
            .pages
            .pages()
            .last()
            .map(|page| page.content().len())
            .unwrap_or(0)
    }

    #[test]
    fn test_char_advances_one_cell() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        let cell = head.cell_width(&carriage.modes);
        assert!((cell - 6.0 / 52.9).abs() < 1e-6);

        head.print_char(&mut carriage, b'H');
        assert!((carriage.cursor.x - cell).abs() < 1e-6);
        assert!(content_len(&carriage) > 0);
    }

    #[test]
    fn test_bold_doubles_dots_not_advance() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        head.print_char(&mut carriage, b'X');
        let plain = content_len(&carriage);
        let x = carriage.cursor.x;

        carriage.modes.bold = true;
        head.print_char(&mut carriage, b'X');
        assert_eq!(content_len(&carriage) - plain, plain * 2);
        assert!((carriage.cursor.x - 2.0 * x).abs() < 1e-6);
    }

    #[test]
    fn test_wide_advances_two_cells() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        let cell = head.cell_width(&carriage.modes);
        carriage.modes.wide_one_line = true;
        head.print_char(&mut carriage, b'W');
        assert!((carriage.cursor.x - 2.0 * cell).abs() < 1e-6);

        head.carriage_return(&mut carriage);
        assert!(!carriage.modes.is_wide());
    }

    #[test]
    fn test_underlined_space_strikes_the_rule() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        carriage.modes.underline = true;
        head.print_char(&mut carriage, b' ');
        assert_eq!(content_len(&carriage), MATRIX_SIZE);
    }

    #[test]
    fn test_discard_at_right_edge() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        carriage.cursor.x = carriage.geometry.right_edge() - 0.05;
        let x = carriage.cursor.x;
        head.print_char(&mut carriage, b'Z');
        assert_eq!(carriage.cursor.x, x);
        assert!(carriage.pages.is_empty());
    }

    #[test]
    fn test_wrap_at_right_edge() {
        let config = PrinterConfig::LX80.with_wrap(WrapPolicy::Wrap);
        let (head, mut carriage) = setup(config);
        let y = carriage.cursor.y;
        carriage.cursor.x = carriage.geometry.right_edge() - 0.05;
        head.print_char(&mut carriage, b'Z');

        let cell = head.cell_width(&carriage.modes);
        assert!((carriage.cursor.x - cell).abs() < 1e-6);
        assert!((carriage.cursor.y - (y + 1.0 / 6.0)).abs() < 1e-6);
        assert_eq!(carriage.cursor.line_count, 1);
    }

    #[test]
    fn test_graphics_bits_are_reversed() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        head.print_graphics(&mut carriage, &[0b1000_0000], GraphicsDensity::Single);

        let page = &carriage.pages.pages()[0];
        assert_eq!(page.content().len(), 1);
        match page.content()[0] {
            DrawOp::Dot { y, .. } => {
                let top = carriage.geometry.top_margin + PIN_PITCH * 0.5;
                assert!((y - top).abs() < 1e-6);
            }
            _ => panic!("expected a dot"),
        }
        assert!((carriage.cursor.x - 1.0 / 52.9).abs() < 1e-6);
    }

    #[test]
    fn test_graphics_density_step() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        head.print_graphics(&mut carriage, &[0; 4], GraphicsDensity::Double);
        assert!((carriage.cursor.x - 2.0 / 52.9).abs() < 1e-6);
    }

    #[test]
    fn test_line_feed_without_auto_cr_keeps_x() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        carriage.cursor.x = 1.0;
        head.line_feed(&mut carriage);
        assert_eq!(carriage.cursor.x, 1.0);
        assert_eq!(carriage.cursor.line_count, 1);
    }

    #[test]
    fn test_line_feed_paginates() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        for _ in 0..66 {
            head.line_feed(&mut carriage);
        }
        assert_eq!(carriage.pages.len(), 2);
        assert_eq!(carriage.cursor.line_count, 0);
        assert_eq!(carriage.cursor.y, carriage.geometry.top_margin);
    }

    #[test]
    fn test_backspace_clamps() {
        let (head, mut carriage) = setup(PrinterConfig::LX80);
        head.print_char(&mut carriage, b'a');
        head.backspace(&mut carriage);
        assert!(carriage.cursor.x.abs() < 1e-6);
        head.backspace(&mut carriage);
        assert_eq!(carriage.cursor.x, 0.0);
    }

    #[test]
    fn test_tab_stops() {
        let (head, mut carriage) = setup(PrinterConfig::IBM1403);
        head.tab(&mut carriage);
        assert!((carriage.cursor.x - 0.8).abs() < 1e-5);
        head.tab(&mut carriage);
        assert!((carriage.cursor.x - 1.6).abs() < 1e-5);
    }

    #[test]
    fn test_tab_past_edge() {
        let (head, mut carriage) = setup(PrinterConfig::IBM1403);
        carriage.cursor.x = 8.1;
        head.tab(&mut carriage);
        assert_eq!(carriage.cursor.x, carriage.geometry.right_edge());

        let (head, mut carriage) = setup(PrinterConfig::IBM1403.with_wrap(WrapPolicy::Wrap));
        carriage.cursor.x = 8.1;
        head.tab(&mut carriage);
        assert_eq!(carriage.cursor.x, 0.0);
        assert_eq!(carriage.cursor.line_count, 1);
    }

    #[test]
    fn test_hammer_strikes_one_glyph() {
        let (head, mut carriage) = setup(PrinterConfig::IBM1403);
        head.print_char(&mut carriage, b'Q');
        head.print_char(&mut carriage, 0xE9);

        let page = &carriage.pages.pages()[0];
        assert_eq!(page.glyph_count(), 2);
        match page.content()[1] {
            DrawOp::Glyph { code, x, .. } => {
                assert_eq!(code, b'?');
                assert!((x - 0.1).abs() < 1e-6);
            }
            _ => panic!("expected a glyph"),
        }
    }

    #[test]
    fn test_hammer_underline_rule() {
        let (head, mut carriage) = setup(PrinterConfig::IBM1403);
        carriage.modes.underline = true;
        head.print_char(&mut carriage, b'u');
        let page = &carriage.pages.pages()[0];
        assert!(matches!(page.content()[1], DrawOp::Rect { .. }));
    }

    #[test]
    fn test_tractor_edges_shift_content() {
        let decorations = Decorations {
            guide_bands: None,
            tractor_edges: true,
        };
        let config = PrinterConfig::IBM1403;
        let head = PrintHead::new(config, &decorations, NoWear);
        let mut carriage = Carriage::new(config.geometry(), decorations);
        head.print_char(&mut carriage, b'A');

        let page = &carriage.pages.pages()[0];
        match page.content()[0] {
            DrawOp::Glyph { x, .. } => assert_eq!(x, 0.5),
            _ => panic!("expected a glyph"),
        }
    }

    #[test]
    fn test_worn_head_dims_dots() {
        let config = PrinterConfig::LX80;
        let head = PrintHead::new(config, &Decorations::default(), WornHead::seeded(3, 75));
        let mut carriage = Carriage::new(config.geometry(), Decorations::default());
        head.print_char(&mut carriage, b'M');
        let page = &carriage.pages.pages()[0];
        for op in page.content() {
            if let DrawOp::Dot { intensity, .. } = op {
                assert!((0.7..=1.0).contains(intensity));
            }
        }
    }
}
