//! # ESC/P Protocol
//!
//! The byte-level language of 9-pin impact printers: builders that produce
//! command sequences and decoders that classify them.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control bytes, line spacing, bit images
//! - [`text`]: Print-mode switches (bold, italic, pitch, scripts)
//! - [`codes`]: Decoding of control codes and ESC selectors
//! - [`accents`]: Two-byte accented Latin letters
//!
//! ## Usage Example
//!
//! ```
//! use impacto::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::bold_on());
//! data.extend(b"INVOICE");
//! data.extend(text::bold_off());
//! data.extend(commands::new_line());
//!
//! // An eight-pin strip, 60 dpi
//! data.extend(commands::bit_image_single(&[0xFF, 0x81, 0x81, 0xFF]));
//! data.extend(commands::form_feed());
//! ```

pub mod accents;
pub mod codes;
pub mod commands;
pub mod text;
