//! # ESC/P Control Commands
//!
//! Byte builders for the carriage, line spacing and bit-image commands of
//! 9-pin dot-matrix printers. The interpreter understands every sequence
//! produced here; the builders exist so that tools and tests can write
//! streams without spelling out raw bytes.
//!
//! ## Escape Sequence Structure
//!
//! - Single byte: `LF`, `FF`, `CR`, `HT`, `BS`, `SO`, `SI`
//! - Two bytes: `ESC @`, `ESC 0`
//! - With parameters: `ESC A n`, `ESC K nL nH data...`
//!
//! ## Byte Order
//!
//! Multi-byte counts are **little-endian**: 300 is sent as `[0x2C, 0x01]`.

// ============================================================================
// CONTROL CODES
// ============================================================================

/// BS (Backspace) - Move back one character cell
pub const BS: u8 = 0x08;

/// HT (Horizontal Tab) - Advance to the next tab stop
pub const HT: u8 = 0x09;

/// LF (Line Feed) - Advance paper by the current line spacing
pub const LF: u8 = 0x0A;

/// FF (Form Feed) - Eject to the top of the next form
pub const FF: u8 = 0x0C;

/// CR (Carriage Return) - Return the head to the left margin
pub const CR: u8 = 0x0D;

/// SO (Shift Out) - Expanded print until the end of the line
pub const SO: u8 = 0x0E;

/// SI (Shift In) - Compressed print
pub const SI: u8 = 0x0F;

/// DC2 (Device Control 2) - Cancel compressed print
pub const DC2: u8 = 0x12;

/// DC4 (Device Control 4) - Cancel expanded print
pub const DC4: u8 = 0x14;

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// Lead byte of the two-byte accented Latin letters
pub const ACCENT_LEAD: u8 = 0xC3;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Returns every print mode, the line spacing and the form geometry to their
/// power-on defaults.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## What Does NOT Reset
///
/// - The head position
/// - Pages already printed
///
/// ## Example
///
/// ```
/// use impacto::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// CARRIAGE MOTION
// ============================================================================

/// Return the carriage and feed one line (CR LF)
#[inline]
pub fn new_line() -> Vec<u8> {
    vec![CR, LF]
}

/// Eject the current form (FF)
#[inline]
pub fn form_feed() -> Vec<u8> {
    vec![FF]
}

// ============================================================================
// LINE SPACING
// ============================================================================

/// # Select 1/8 Inch Line Spacing (ESC 0)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC 0 |
/// | Hex     | 1B 30 |
#[inline]
pub fn spacing_eighth() -> Vec<u8> {
    vec![ESC, b'0']
}

/// # Select 7/72 Inch Line Spacing (ESC 1)
///
/// Seven pins tall: consecutive lines of text touch.
#[inline]
pub fn spacing_seven_72() -> Vec<u8> {
    vec![ESC, b'1']
}

/// # Select 1/6 Inch Line Spacing (ESC 2)
///
/// The power-on default (6 lines per inch).
#[inline]
pub fn spacing_sixth() -> Vec<u8> {
    vec![ESC, b'2']
}

/// # Set n/72 Inch Line Spacing (ESC A n)
///
/// ## Protocol Details
///
/// | Format  | Bytes     |
/// |---------|-----------|
/// | ASCII   | ESC A n   |
/// | Hex     | 1B 41 n   |
///
/// ## Typical Use
///
/// `ESC A 8` makes nine-pin bit-image strips abut vertically.
///
/// ```
/// use impacto::protocol::commands;
///
/// assert_eq!(commands::spacing_72(8), vec![0x1B, 0x41, 8]);
/// ```
#[inline]
pub fn spacing_72(n: u8) -> Vec<u8> {
    vec![ESC, b'A', n]
}

/// # Set n/216 Inch Line Spacing (ESC 3 n)
#[inline]
pub fn spacing_216(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

/// Line spacing in inches, rounded to the nearest 1/216 inch.
///
/// ```
/// use impacto::protocol::commands;
///
/// assert_eq!(commands::spacing_inches(1.0 / 6.0), vec![0x1B, 0x33, 36]);
/// ```
#[inline]
pub fn spacing_inches(inches: f32) -> Vec<u8> {
    let units = (inches * 216.0).round().clamp(0.0, 255.0) as u8;
    spacing_216(units)
}

// ============================================================================
// BIT IMAGE
// ============================================================================

/// # 60 DPI Bit Image (ESC K nL nH d1...dk)
///
/// Prints `data.len()` columns of eight pins each.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC K nL nH d1...dk |
/// | Hex     | 1B 4B nL nH d1...dk |
///
/// ## Data Format
///
/// One byte per column, **MSB = top pin**:
///
/// ```text
/// 0x80 = 10000000 → top pin only
/// 0x01 = 00000001 → eighth pin only
/// ```
///
/// ## Parameters
///
/// - `nL + nH × 256`: number of columns (at most 65535; longer data is cut)
#[inline]
pub fn bit_image_single(data: &[u8]) -> Vec<u8> {
    bit_image(b'K', data)
}

/// # 120 DPI Bit Image (ESC L nL nH d1...dk)
///
/// Same as [`bit_image_single`] with half the column pitch.
#[inline]
pub fn bit_image_double(data: &[u8]) -> Vec<u8> {
    bit_image(b'L', data)
}

fn bit_image(selector: u8, data: &[u8]) -> Vec<u8> {
    let count = data.len().min(u16::MAX as usize);
    let mut cmd = Vec::with_capacity(4 + count);
    cmd.extend([ESC, selector]);
    cmd.extend(u16_le(count as u16));
    cmd.extend(&data[..count]);
    cmd
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use impacto::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(480), [0xE0, 0x01]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_new_line() {
        assert_eq!(new_line(), vec![0x0D, 0x0A]);
        assert_eq!(form_feed(), vec![0x0C]);
    }

    #[test]
    fn test_fixed_spacing() {
        assert_eq!(spacing_eighth(), vec![0x1B, 0x30]);
        assert_eq!(spacing_seven_72(), vec![0x1B, 0x31]);
        assert_eq!(spacing_sixth(), vec![0x1B, 0x32]);
    }

    #[test]
    fn test_spacing_inches_clamps() {
        assert_eq!(spacing_inches(0.125), vec![0x1B, 0x33, 27]);
        assert_eq!(spacing_inches(5.0), vec![0x1B, 0x33, 255]);
        assert_eq!(spacing_inches(-1.0), vec![0x1B, 0x33, 0]);
    }

    #[test]
    fn test_bit_image_header() {
        let cmd = bit_image_single(&[0xAA; 300]);
        assert_eq!(&cmd[..4], &[0x1B, b'K', 0x2C, 0x01]);
        assert_eq!(cmd.len(), 304);

        let cmd = bit_image_double(&[0x80]);
        assert_eq!(cmd, vec![0x1B, b'L', 1, 0, 0x80]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
    }
}
