//! # Accented Latin Letters
//!
//! The printer has no accented glyphs. A two-byte `0xC3 xx` sequence (the
//! UTF-8 form of U+00C0..=U+00FF) is printed as its base letter, a backspace,
//! and an accent mark struck over it:
//!
//! ```text
//! é  →  'e'  BS  '\''
//! ç  →  'c'  BS  ','
//! ```

use super::commands::ACCENT_LEAD;

/// Base letter and overstrike mark for the byte following `0xC3`.
///
/// Returns `None` for letters the printer cannot compose.
pub fn decompose(second: u8) -> Option<(u8, u8)> {
    let pair = match second {
        // Acute
        0x81 => (b'A', b'\''), // Á
        0xA1 => (b'a', b'\''), // á
        0x89 => (b'E', b'\''), // É
        0xA9 => (b'e', b'\''), // é
        0x8D => (b'I', b'\''), // Í
        0xAD => (b'i', b'\''), // í
        0x93 => (b'O', b'\''), // Ó
        0xB3 => (b'o', b'\''), // ó
        0x9A => (b'U', b'\''), // Ú
        0xBA => (b'u', b'\''), // ú

        // Grave
        0x80 => (b'A', b'`'), // À
        0xA0 => (b'a', b'`'), // à
        0x88 => (b'E', b'`'), // È
        0xA8 => (b'e', b'`'), // è
        0x8C => (b'I', b'`'), // Ì
        0xAC => (b'i', b'`'), // ì
        0x92 => (b'O', b'`'), // Ò
        0xB2 => (b'o', b'`'), // ò
        0x99 => (b'U', b'`'), // Ù
        0xB9 => (b'u', b'`'), // ù

        // Tilde
        0x83 => (b'A', b'~'), // Ã
        0xA3 => (b'a', b'~'), // ã
        0x95 => (b'O', b'~'), // Õ
        0xB5 => (b'o', b'~'), // õ

        // Circumflex
        0x82 => (b'A', b'^'), // Â
        0xA2 => (b'a', b'^'), // â
        0x8A => (b'E', b'^'), // Ê
        0xAA => (b'e', b'^'), // ê
        0x94 => (b'O', b'^'), // Ô
        0xB4 => (b'o', b'^'), // ô

        // Cedilla
        0x87 => (b'C', b','), // Ç
        0xA7 => (b'c', b','), // ç

        _ => return None,
    };
    Some(pair)
}

/// Encode text for the printer.
///
/// - ASCII: passed through as-is
/// - Composable accented letters: their two-byte `0xC3 xx` form
/// - Anything else: replaced with `?` and logged
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        let bytes = ch.encode_utf8(&mut buf).as_bytes();
        match bytes {
            [ascii] => out.push(*ascii),
            [ACCENT_LEAD, second] if decompose(*second).is_some() => {
                out.extend([ACCENT_LEAD, *second]);
            }
            _ => {
                log::warn!(
                    "unprintable character '{}' (U+{:04X}), replacing with '?'",
                    ch,
                    ch as u32
                );
                out.push(b'?');
            }
        }
    }
    out
}
