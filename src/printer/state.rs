//! # Printer State
//!
//! The two pieces of mutable state a running printer carries: where the head
//! is ([`CursorState`]) and how it strikes ([`ModeState`]). Both are created
//! once when the stream opens and mutated in place for the whole run.
//!
//! ## Pitch Table
//!
//! Horizontal steps are measured in half-units of the printer's column unit.
//! The step is a pure function of the pitch flags:
//!
//! | Pitch | Compressed | Step | Nominal CPI |
//! |-------|-----------|------|-------------|
//! | Pica  | no  | 0.5 | 10 |
//! | Pica  | yes | 10 / 17.16 / 2 | 17.16 |
//! | Elite | no  | 10 / 12 / 2 | 12 |
//! | Elite | yes | 10 / 20 / 2 | 20 |
//!
//! Elite and compressed combine through this table, not by multiplying or
//! adding their individual effects.

use super::config::PageGeometry;

/// Default line step: 1/6 inch
pub const DEFAULT_LINE_STEP: f32 = 1.0 / 6.0;

/// Vertical offset applied to subscript dots (inches)
pub const SUBSCRIPT_OFFSET: f32 = 0.05;

/// Base character pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pitch {
    /// 10 cpi
    #[default]
    Pica,
    /// 12 cpi
    Elite,
}

/// Sub/superscript selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Script {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

/// Look up the column step for a pitch/compressed combination.
pub fn pitch_step(pitch: Pitch, compressed: bool) -> f32 {
    match (pitch, compressed) {
        (Pitch::Pica, false) => 0.5,
        (Pitch::Pica, true) => 10.0 / 17.16 / 2.0,
        (Pitch::Elite, false) => 10.0 / 12.0 / 2.0,
        (Pitch::Elite, true) => 10.0 / 20.0 / 2.0,
    }
}

/// Position of the print head on the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    /// Horizontal position (inches from the printable origin)
    pub x: f32,
    /// Vertical position (inches from the top of the form)
    pub y: f32,
    /// Line feeds since the last page change
    pub line_count: u32,
}

impl CursorState {
    /// Cursor parked at the top-left margin of `geometry`.
    pub fn home(geometry: &PageGeometry) -> Self {
        Self {
            x: geometry.left_margin,
            y: geometry.top_margin,
            line_count: 0,
        }
    }
}

/// Print modes and the step sizes derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeState {
    pub bold: bool,
    pub italic: bool,
    pub double_strike: bool,
    /// Expanded print set by ESC W, lasts until cancelled
    pub wide: bool,
    /// Expanded print set by SO, cancelled at end of line
    pub wide_one_line: bool,
    pub underline: bool,
    pub script: Script,
    pub compressed: bool,
    pub pitch: Pitch,

    column_step: f32,
    /// Vertical distance between pins, in 1/72in units
    pub row_step: f32,
    /// Line feed distance (inches)
    pub line_step: f32,
    /// Vertical shift of the dot pattern (inches)
    pub y_offset: f32,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            double_strike: false,
            wide: false,
            wide_one_line: false,
            underline: false,
            script: Script::Normal,
            compressed: false,
            pitch: Pitch::Pica,
            column_step: pitch_step(Pitch::Pica, false),
            row_step: 1.0,
            line_step: DEFAULT_LINE_STEP,
            y_offset: 0.0,
        }
    }
}

impl ModeState {
    /// Horizontal step per dot column, in half-units of the column unit.
    #[inline]
    pub fn column_step(&self) -> f32 {
        self.column_step
    }

    /// Either wide variant is active.
    #[inline]
    pub fn is_wide(&self) -> bool {
        self.wide || self.wide_one_line
    }

    /// Select elite or pica pitch, keeping compressed as is.
    pub fn set_pitch(&mut self, pitch: Pitch) {
        self.pitch = pitch;
        self.column_step = pitch_step(self.pitch, self.compressed);
        debug_assert!(self.is_consistent());
    }

    /// Turn compressed print on or off, keeping the pitch as is.
    pub fn set_compressed(&mut self, compressed: bool) {
        self.compressed = compressed;
        self.column_step = pitch_step(self.pitch, self.compressed);
        debug_assert!(self.is_consistent());
    }

    /// Select sub/superscript and the half-height rows that go with it.
    pub fn set_script(&mut self, script: Script) {
        self.script = script;
        match script {
            Script::Normal => {
                self.y_offset = 0.0;
                self.row_step = 1.0;
            }
            Script::Superscript => {
                self.y_offset = 0.0;
                self.row_step = 0.5;
            }
            Script::Subscript => {
                self.y_offset = SUBSCRIPT_OFFSET;
                self.row_step = 0.5;
            }
        }
    }

    /// Pitch flags and column step agree with the pitch table.
    pub fn is_consistent(&self) -> bool {
        (self.column_step - pitch_step(self.pitch, self.compressed)).abs() < f32::EPSILON
    }
}
