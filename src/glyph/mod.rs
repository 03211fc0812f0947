//! # Glyph Source
//!
//! Supplies the 9-pin firing pattern of every character code.
//!
//! ## Orientation
//!
//! Glyphs are authored the way they look on paper (row by row, "at rest")
//! and rotated once, when the [`Charset`] is built, into the column order
//! the head fires them in:
//!
//! ```text
//! at rest (rows)          print order (columns)
//!  .###.                   col 0: pins 1..=6
//!  #...#        rotate     col 2: pins 0, 4
//!  #...#       ───────►    col 4: pins 0, 4
//!  #...#                   ...
//!  #####
//!  #...#                   bit 0 = top pin
//!  #...#                   bit 8 = bottom pin (underline)
//! ```
//!
//! The five authored pixel columns land on the even head columns (0, 2, 4,
//! 6, 8), as on a real 9-pin printer where adjacent half-columns cannot both
//! fire. Codes 0x80..=0xFF are the italic forms of 0x00..=0x7F.

mod charset;

use charset::{DESCENDERS, PRINTABLE};

/// Number of pins (rows) and dot columns in a character matrix
pub const MATRIX_SIZE: usize = 9;

/// Firing pattern of one character: one `u16` per column, bit 0 = top pin.
pub type GlyphBitmap = [u16; MATRIX_SIZE];

/// Pin bit that strikes the underline rule at the bottom of the cell.
pub const UNDERLINE_BIT: u16 = 1 << 8;

const ROW_MASK: u16 = (1 << MATRIX_SIZE) - 1;

/// Anything that can hand the head a firing pattern for a code.
pub trait GlyphSource {
    /// Column bitmap for `code`.
    fn glyph(&self, code: u8) -> GlyphBitmap;
}

/// The built-in 256-entry character set.
#[derive(Debug, Clone)]
pub struct Charset {
    glyphs: Vec<GlyphBitmap>,
}

impl Default for Charset {
    fn default() -> Self {
        Self::new()
    }
}

impl Charset {
    /// Build the charset, rotating every at-rest bitmap into print order.
    pub fn new() -> Self {
        let glyphs = (0..=255u8).map(|code| rotate(&at_rest(code))).collect();
        Self { glyphs }
    }

    /// Render a glyph as text (`O` for a dot, `.` for none), one row per line.
    ///
    /// Used to eyeball the type when debugging.
    pub fn render_ascii(&self, code: u8) -> String {
        let columns = self.glyph(code);
        let mut out = String::with_capacity(MATRIX_SIZE * (MATRIX_SIZE + 1));
        for row in 0..MATRIX_SIZE {
            for column in columns {
                out.push(if column & (1 << row) != 0 { 'O' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl GlyphSource for Charset {
    #[inline]
    fn glyph(&self, code: u8) -> GlyphBitmap {
        self.glyphs[code as usize]
    }
}

/// At-rest raster for `code`: nine rows, bit 8 = leftmost column.
fn at_rest(code: u8) -> [u16; MATRIX_SIZE] {
    let mut rows = [0u16; MATRIX_SIZE];
    let base = code & 0x7F;
    if !(0x20..=0x7E).contains(&base) {
        return rows;
    }

    let top = if DESCENDERS.contains(&base) { 2 } else { 0 };
    for (i, pixels) in PRINTABLE[(base - 0x20) as usize].iter().enumerate() {
        let mut row = 0u16;
        for pixel in 0..5 {
            if pixels & (1 << (4 - pixel)) != 0 {
                row |= 1 << (8 - 2 * pixel);
            }
        }
        rows[top + i] = row;
    }

    if code & 0x80 != 0 {
        italicize(&mut rows);
    }
    rows
}

/// Lean a glyph to the right: top rows move right, bottom rows move left.
///
/// Dots pushed off the matrix edge are kept in the edge column.
fn italicize(rows: &mut [u16; MATRIX_SIZE]) {
    for (i, row) in rows.iter_mut().enumerate() {
        *row = match i {
            0..=2 => (*row >> 1) | (*row & 0x001),
            6..=8 => ((*row << 1) & ROW_MASK) | (*row & 0x100),
            _ => *row,
        };
    }
}

/// Rotate an at-rest raster 90° clockwise into column order.
fn rotate(rows: &[u16; MATRIX_SIZE]) -> GlyphBitmap {
    let mut columns = [0u16; MATRIX_SIZE];
    for (j, row) in rows.iter().enumerate() {
        for k in 0..MATRIX_SIZE {
            if row & (1 << k) != 0 {
                columns[MATRIX_SIZE - 1 - k] |= 1 << j;
            }
        }
    }
    columns
}
