//! # Impacto - Impact Printer Emulator
//!
//! Impacto replays the byte stream you would send to a 1980s impact printer
//! and produces the paper it would have printed, as PDF or SVG. It provides:
//!
//! - **Interpreter**: ESC/P control codes, escape sequences and accents
//! - **Print heads**: 9-pin dot matrix and whole-character line hammer
//! - **Paper**: continuous forms with guide bands and tractor edges
//! - **Output**: byte-exact PDF 1.4 and SVG serializers
//! - **Tools**: command builders and a bit-image converter for writing streams
//!
//! ## Quick Start
//!
//! ```
//! use impacto::{
//!     engine::NoWear,
//!     output::{FontResource, PdfWriter},
//!     page::Decorations,
//!     printer::PrinterConfig,
//!     protocol::text,
//! };
//!
//! let mut stream = Vec::new();
//! stream.extend(text::bold_on());
//! stream.extend(b"HELLO\r\n");
//!
//! let document = impacto::interpret(
//!     PrinterConfig::LX80,
//!     Decorations::default(),
//!     NoWear,
//!     stream,
//! );
//!
//! let mut pdf = Vec::new();
//! PdfWriter::new(&document, &FontResource::Builtin).write(&mut pdf)?;
//! assert!(pdf.ends_with(b"%%EOF\n"));
//!
//! # Ok::<(), impacto::ImpactoError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`interpreter`] | Byte stream state machine |
//! | [`engine`] | Print head, carriage motion, head wear |
//! | [`glyph`] | 9x9 dot-matrix character set |
//! | [`page`] | Page buffer, draw ops, form decoration |
//! | [`output`] | PDF and SVG serializers, fonts |
//! | [`protocol`] | ESC/P command builders and decoding |
//! | [`render`] | Image to bit-image conversion |
//! | [`printer`] | Printer profiles and mode state |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! - Epson LX-80 (9-pin dot matrix, [`PrinterConfig::LX80`])
//! - IBM 1403 (line printer, [`PrinterConfig::IBM1403`])

pub mod engine;
pub mod error;
pub mod glyph;
pub mod interpreter;
pub mod output;
pub mod page;
pub mod printer;
pub mod protocol;
pub mod render;

// Re-exports for convenience
pub use error::ImpactoError;
pub use interpreter::Interpreter;
pub use page::Document;
pub use printer::PrinterConfig;

use engine::HeadWear;
use page::Decorations;

/// Run a whole byte stream through a fresh printer and return its pages.
pub fn interpret<W, I>(config: PrinterConfig, decorations: Decorations, wear: W, bytes: I) -> Document
where
    W: HeadWear,
    I: IntoIterator<Item = u8>,
{
    let mut interpreter = Interpreter::new(config, decorations, wear);
    interpreter.run(&mut bytes.into_iter());
    interpreter.finish()
}
