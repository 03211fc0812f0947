//! # Command Decoding
//!
//! Closed sets of the single-byte control codes and ESC selectors the
//! interpreter acts on. Anything else decodes to an `Unknown` variant so the
//! dispatcher can match exhaustively and ignore it explicitly.

use super::commands::{BS, CR, DC2, DC4, ESC, FF, HT, LF, SI, SO};

/// A byte in `0x00..=0x1F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    Backspace,
    HorizontalTab,
    LineFeed,
    FormFeed,
    CarriageReturn,
    /// SO: expanded print for the rest of the line
    ShiftOut,
    /// SI: compressed print
    ShiftIn,
    /// DC2: cancel compressed print
    DeviceControl2,
    /// DC4: cancel expanded print
    DeviceControl4,
    Escape,
    Unknown(u8),
}

impl ControlCode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            BS => ControlCode::Backspace,
            HT => ControlCode::HorizontalTab,
            LF => ControlCode::LineFeed,
            FF => ControlCode::FormFeed,
            CR => ControlCode::CarriageReturn,
            SO => ControlCode::ShiftOut,
            SI => ControlCode::ShiftIn,
            DC2 => ControlCode::DeviceControl2,
            DC4 => ControlCode::DeviceControl4,
            ESC => ControlCode::Escape,
            other => ControlCode::Unknown(other),
        }
    }
}

/// ASCII mnemonic of a control byte, for debug logs.
pub fn control_name(byte: u8) -> &'static str {
    const NAMES: [&str; 32] = [
        "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "HT", "LF", "VT", "FF", "CR",
        "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB",
        "ESC", "FS", "GS", "RS", "US",
    ];
    NAMES.get(byte as usize).copied().unwrap_or("?")
}

/// The selector byte after ESC.
///
/// | Selector | Command | Parameters |
/// |----------|---------|------------|
/// | `@` | Reset | |
/// | `E` / `F` | Bold on / off | |
/// | `4` / `5` | Italic on / off | |
/// | `G` / `H` | Double-strike on / off | |
/// | `S` | Sub/superscript | n |
/// | `T` | Cancel sub/superscript | |
/// | `-` | Underline | n |
/// | `M` / `P` | Elite / pica | |
/// | `W` | Expanded print | n |
/// | `0` `1` `2` | 1/8, 7/72, 1/6 inch spacing | |
/// | `A` | n/72 inch spacing | n |
/// | `3` | n/216 inch spacing | n |
/// | `K` | 60 dpi bit image | nL nH data |
/// | `L` `Y` | 120 dpi bit image | nL nH data |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeCommand {
    Reset,
    BoldOn,
    BoldOff,
    ItalicOn,
    ItalicOff,
    DoubleStrikeOn,
    DoubleStrikeOff,
    Script,
    ScriptOff,
    Underline,
    Elite,
    Pica,
    Expanded,
    EighthInchSpacing,
    SevenSeventyTwoSpacing,
    SixthInchSpacing,
    Spacing72,
    Spacing216,
    BitImageSingle,
    BitImageDouble,
    Unknown(u8),
}

impl EscapeCommand {
    pub fn from_byte(selector: u8) -> Self {
        match selector {
            b'@' => EscapeCommand::Reset,
            b'E' => EscapeCommand::BoldOn,
            b'F' => EscapeCommand::BoldOff,
            b'4' => EscapeCommand::ItalicOn,
            b'5' => EscapeCommand::ItalicOff,
            b'G' => EscapeCommand::DoubleStrikeOn,
            b'H' => EscapeCommand::DoubleStrikeOff,
            b'S' => EscapeCommand::Script,
            b'T' => EscapeCommand::ScriptOff,
            b'-' => EscapeCommand::Underline,
            b'M' => EscapeCommand::Elite,
            b'P' => EscapeCommand::Pica,
            b'W' => EscapeCommand::Expanded,
            b'0' => EscapeCommand::EighthInchSpacing,
            b'1' => EscapeCommand::SevenSeventyTwoSpacing,
            b'2' => EscapeCommand::SixthInchSpacing,
            b'A' => EscapeCommand::Spacing72,
            b'3' => EscapeCommand::Spacing216,
            b'K' => EscapeCommand::BitImageSingle,
            b'L' | b'Y' => EscapeCommand::BitImageDouble,
            other => EscapeCommand::Unknown(other),
        }
    }

    /// Commands followed by exactly one parameter byte.
    pub fn takes_parameter(self) -> bool {
        matches!(
            self,
            EscapeCommand::Script
                | EscapeCommand::Underline
                | EscapeCommand::Expanded
                | EscapeCommand::Spacing72
                | EscapeCommand::Spacing216
        )
    }
}

/// Read an on/off switch parameter: `0`/`'0'` is off, `1`/`'1'` is on.
pub fn switch(n: u8) -> Option<bool> {
    match n {
        0 | b'0' => Some(false),
        1 | b'1' => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_codes() {
        assert_eq!(ControlCode::from_byte(0x0A), ControlCode::LineFeed);
        assert_eq!(ControlCode::from_byte(0x1B), ControlCode::Escape);
        assert_eq!(ControlCode::from_byte(0x07), ControlCode::Unknown(0x07));
    }

    #[test]
    fn test_control_names() {
        assert_eq!(control_name(0x0C), "FF");
        assert_eq!(control_name(0x1B), "ESC");
        assert_eq!(control_name(0x41), "?");
    }

    #[test]
    fn test_escape_selectors() {
        assert_eq!(EscapeCommand::from_byte(b'Y'), EscapeCommand::BitImageDouble);
        assert_eq!(EscapeCommand::from_byte(b'L'), EscapeCommand::BitImageDouble);
        assert_eq!(EscapeCommand::from_byte(b'3'), EscapeCommand::Spacing216);
        assert_eq!(EscapeCommand::from_byte(b'z'), EscapeCommand::Unknown(b'z'));
    }

    #[test]
    fn test_switch_accepts_digit_and_ascii() {
        assert_eq!(switch(0), Some(false));
        assert_eq!(switch(b'1'), Some(true));
        assert_eq!(switch(2), None);
    }
}
