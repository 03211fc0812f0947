//! # ESC/P Text Styling Commands
//!
//! Print-mode switches of a 9-pin dot-matrix printer.
//!
//! ## Text Styling Overview
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Bold | ESC E / ESC F | Each column struck twice, one step apart |
//! | Italic | ESC 4 / ESC 5 | Slanted upper-half glyphs |
//! | Double-strike | ESC G / ESC H | Each column struck twice, half a pin apart |
//! | Underline | ESC - n | Bottom pin fires in every column |
//! | Superscript | ESC S 0 | Half-height rows at the top of the line |
//! | Subscript | ESC S 1 | Half-height rows at the bottom of the line |
//! | Expanded | ESC W n / SO | 2x horizontal size |
//!
//! ## Pitch
//!
//! | Pitch | Command | CPI | With SI (compressed) |
//! |-------|---------|-----|----------------------|
//! | Pica | ESC P | 10 | 17.16 |
//! | Elite | ESC M | 12 | 20 |

use super::commands::{DC2, DC4, ESC, SI, SO};
use crate::printer::{Pitch, Script};

// ============================================================================
// EMPHASIS
// ============================================================================

/// # Enable Bold (ESC E)
///
/// Every dot column is struck a second time one column step to the right.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC E |
/// | Hex     | 1B 45 |
/// | Decimal | 27 69 |
///
/// ## Example
///
/// ```
/// use impacto::protocol::text::{bold_on, bold_off};
///
/// let mut data = Vec::new();
/// data.extend(bold_on());
/// data.extend(b"IMPORTANT");
/// data.extend(bold_off());
/// ```
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E']
}

/// # Disable Bold (ESC F)
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'F']
}

/// # Enable Italic (ESC 4)
///
/// Selects the upper half of the character set.
#[inline]
pub fn italic_on() -> Vec<u8> {
    vec![ESC, b'4']
}

/// # Disable Italic (ESC 5)
#[inline]
pub fn italic_off() -> Vec<u8> {
    vec![ESC, b'5']
}

/// # Enable Double-Strike (ESC G)
///
/// Every dot column is struck a second time half a pin lower, filling the
/// gaps between dots.
#[inline]
pub fn double_strike_on() -> Vec<u8> {
    vec![ESC, b'G']
}

/// # Disable Double-Strike (ESC H)
#[inline]
pub fn double_strike_off() -> Vec<u8> {
    vec![ESC, b'H']
}

// ============================================================================
// UNDERLINE
// ============================================================================

/// # Set Underline Mode (ESC - n)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC - n |
/// | Hex     | 1B 2D n |
///
/// ## Parameters
///
/// - `n = 0` or `'0'`: Underline OFF
/// - `n = 1` or `'1'`: Underline ON
///
/// ## Note
///
/// Unlike most printers, spaces are underlined too: the rule is the bottom
/// pin, fired in every column of every cell.
#[inline]
pub fn underline_on() -> Vec<u8> {
    vec![ESC, b'-', 1]
}

/// Disable underline
#[inline]
pub fn underline_off() -> Vec<u8> {
    vec![ESC, b'-', 0]
}

// ============================================================================
// SCRIPTS
// ============================================================================

/// # Superscript (ESC S 0)
///
/// Pins fire at half pitch from the top of the line.
#[inline]
pub fn superscript() -> Vec<u8> {
    vec![ESC, b'S', 0]
}

/// # Subscript (ESC S 1)
///
/// Pins fire at half pitch, 0.05 inch below the top of the line.
#[inline]
pub fn subscript() -> Vec<u8> {
    vec![ESC, b'S', 1]
}

/// # Cancel Super/Subscript (ESC T)
#[inline]
pub fn script_off() -> Vec<u8> {
    vec![ESC, b'T']
}

// ============================================================================
// PITCH AND WIDTH
// ============================================================================

/// # Elite Pitch (ESC M)
///
/// 12 characters per inch (20 when compressed).
#[inline]
pub fn elite() -> Vec<u8> {
    vec![ESC, b'M']
}

/// # Pica Pitch (ESC P)
///
/// 10 characters per inch (17.16 when compressed). The power-on default.
#[inline]
pub fn pica() -> Vec<u8> {
    vec![ESC, b'P']
}

/// # Compressed Print (SI)
#[inline]
pub fn compressed_on() -> Vec<u8> {
    vec![SI]
}

/// # Cancel Compressed Print (DC2)
#[inline]
pub fn compressed_off() -> Vec<u8> {
    vec![DC2]
}

/// # Expanded Print (ESC W n)
///
/// Stays on until cancelled by `ESC W 0` or DC4.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC W n |
/// | Hex     | 1B 57 n |
#[inline]
pub fn expanded_on() -> Vec<u8> {
    vec![ESC, b'W', 1]
}

/// Disable expanded print
#[inline]
pub fn expanded_off() -> Vec<u8> {
    vec![ESC, b'W', 0]
}

/// # One-Line Expanded Print (SO)
///
/// Cancelled by the next CR or LF.
#[inline]
pub fn expanded_line() -> Vec<u8> {
    vec![SO]
}

/// # Cancel Expanded Print (DC4)
///
/// Cancels both the one-line and the persistent variant.
#[inline]
pub fn expanded_cancel() -> Vec<u8> {
    vec![DC4]
}

// ============================================================================
// TEXT STYLE BUILDER
// ============================================================================

/// Combined text style for convenient command generation
///
/// ## Example
///
/// ```
/// use impacto::printer::Pitch;
/// use impacto::protocol::text::TextStyle;
///
/// let style = TextStyle::new().pitch(Pitch::Elite).bold(true);
///
/// let commands = style.to_commands();
/// assert_eq!(commands, vec![0x1B, b'M', 0x1B, b'E']);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextStyle {
    pub pitch: Option<Pitch>,
    pub compressed: Option<bool>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub double_strike: Option<bool>,
    pub underline: Option<bool>,
    pub expanded: Option<bool>,
    pub script: Option<Script>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pitch(mut self, p: Pitch) -> Self {
        self.pitch = Some(p);
        self
    }

    pub fn compressed(mut self, enabled: bool) -> Self {
        self.compressed = Some(enabled);
        self
    }

    pub fn bold(mut self, enabled: bool) -> Self {
        self.bold = Some(enabled);
        self
    }

    pub fn italic(mut self, enabled: bool) -> Self {
        self.italic = Some(enabled);
        self
    }

    pub fn double_strike(mut self, enabled: bool) -> Self {
        self.double_strike = Some(enabled);
        self
    }

    pub fn underline(mut self, enabled: bool) -> Self {
        self.underline = Some(enabled);
        self
    }

    pub fn expanded(mut self, enabled: bool) -> Self {
        self.expanded = Some(enabled);
        self
    }

    pub fn script(mut self, s: Script) -> Self {
        self.script = Some(s);
        self
    }

    /// Generate command bytes for this style
    pub fn to_commands(&self) -> Vec<u8> {
        let mut cmds = Vec::new();

        if let Some(p) = self.pitch {
            cmds.extend(match p {
                Pitch::Pica => pica(),
                Pitch::Elite => elite(),
            });
        }
        if let Some(c) = self.compressed {
            cmds.extend(if c { compressed_on() } else { compressed_off() });
        }
        if let Some(b) = self.bold {
            cmds.extend(if b { bold_on() } else { bold_off() });
        }
        if let Some(i) = self.italic {
            cmds.extend(if i { italic_on() } else { italic_off() });
        }
        if let Some(d) = self.double_strike {
            cmds.extend(if d {
                double_strike_on()
            } else {
                double_strike_off()
            });
        }
        if let Some(u) = self.underline {
            cmds.extend(if u { underline_on() } else { underline_off() });
        }
        if let Some(e) = self.expanded {
            cmds.extend(if e { expanded_on() } else { expanded_off() });
        }
        if let Some(s) = self.script {
            cmds.extend(match s {
                Script::Normal => script_off(),
                Script::Superscript => superscript(),
                Script::Subscript => subscript(),
            });
        }

        cmds
    }

    /// Turn every style off without resetting line spacing
    pub fn reset() -> Vec<u8> {
        Self::new()
            .pitch(Pitch::Pica)
            .compressed(false)
            .bold(false)
            .italic(false)
            .double_strike(false)
            .underline(false)
            .expanded(false)
            .script(Script::Normal)
            .to_commands()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold() {
        assert_eq!(bold_on(), vec![0x1B, 0x45]);
        assert_eq!(bold_off(), vec![0x1B, 0x46]);
    }

    #[test]
    fn test_italic_and_double_strike() {
        assert_eq!(italic_on(), vec![0x1B, 0x34]);
        assert_eq!(italic_off(), vec![0x1B, 0x35]);
        assert_eq!(double_strike_on(), vec![0x1B, 0x47]);
        assert_eq!(double_strike_off(), vec![0x1B, 0x48]);
    }

    #[test]
    fn test_underline() {
        assert_eq!(underline_on(), vec![0x1B, 0x2D, 0x01]);
        assert_eq!(underline_off(), vec![0x1B, 0x2D, 0x00]);
    }

    #[test]
    fn test_scripts() {
        assert_eq!(superscript(), vec![0x1B, 0x53, 0x00]);
        assert_eq!(subscript(), vec![0x1B, 0x53, 0x01]);
        assert_eq!(script_off(), vec![0x1B, 0x54]);
    }

    #[test]
    fn test_pitch_and_width() {
        assert_eq!(elite(), vec![0x1B, 0x4D]);
        assert_eq!(pica(), vec![0x1B, 0x50]);
        assert_eq!(compressed_on(), vec![0x0F]);
        assert_eq!(compressed_off(), vec![0x12]);
        assert_eq!(expanded_on(), vec![0x1B, 0x57, 0x01]);
        assert_eq!(expanded_line(), vec![0x0E]);
        assert_eq!(expanded_cancel(), vec![0x14]);
    }

    #[test]
    fn test_text_style_builder() {
        let style = TextStyle::new().underline(true).script(Script::Subscript);
        let cmds = style.to_commands();

        assert!(cmds.windows(3).any(|w| w == [0x1B, 0x2D, 0x01]));
        assert!(cmds.windows(3).any(|w| w == [0x1B, 0x53, 0x01]));
    }

    #[test]
    fn test_text_style_reset() {
        let reset = TextStyle::reset();
        assert!(reset.starts_with(&pica()));
        assert!(reset.ends_with(&script_off()));
    }

    #[test]
    fn test_text_style_replays_into_printer_modes() {
        use crate::engine::NoWear;
        use crate::interpreter::Interpreter;
        use crate::page::Decorations;
        use crate::printer::PrinterConfig;

        let style = TextStyle::new()
            .pitch(Pitch::Elite)
            .compressed(true)
            .script(Script::Superscript);
        let mut interpreter = Interpreter::new(PrinterConfig::LX80, Decorations::default(), NoWear);
        interpreter.run(&mut style.to_commands().into_iter());

        let modes = interpreter.carriage().modes;
        assert_eq!(modes.pitch, Pitch::Elite);
        assert!(modes.compressed);
        assert_eq!(modes.script, Script::Superscript);
    }
}
