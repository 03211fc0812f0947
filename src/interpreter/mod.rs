//! # Control-Stream Interpreter
//!
//! Reads a printer byte stream one logical unit at a time and drives the
//! [`PrintHead`].
//!
//! ## Byte Classes
//!
//! | Bytes | Meaning |
//! |-------|---------|
//! | `0x00..=0x1F` | Control code (see [`ControlCode`]) |
//! | `0x1B` | ESC, followed by a selector and its parameters |
//! | `0x20..=0x7E` | Printable character |
//! | `0x7F` | DEL, ignored |
//! | `0xC3 xx` | Accented letter, composed by overstrike |
//! | `0x80..=0xFF` | Upper-half character (italic set) |
//!
//! ## End of Stream
//!
//! A stream that ends inside a sequence stops the interpreter without
//! applying that sequence. Bit-image data in particular is read in full
//! before the first column is printed. Whatever was printed before stays in
//! the buffer and [`Interpreter::finish`] still yields a valid document.

use std::io::{self, BufReader, Bytes, Read};

use crate::engine::{Carriage, GraphicsDensity, HeadWear, NoWear, PrintHead};
use crate::page::{Decorations, Document};
use crate::printer::{ModeState, Pitch, PrinterConfig, Script};
use crate::protocol::accents;
use crate::protocol::codes::{self, ControlCode, EscapeCommand};
use crate::protocol::commands::ACCENT_LEAD;

/// A sequential supply of input bytes. `None` marks the end of the stream.
pub trait ByteSource {
    fn next_byte(&mut self) -> Option<u8>;
}

impl<I: Iterator<Item = u8>> ByteSource for I {
    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        self.next()
    }
}

/// Byte source over any [`Read`], buffered.
///
/// A read error ends the stream; the error is kept for the caller.
pub struct ReaderSource<R> {
    bytes: Bytes<BufReader<R>>,
    error: Option<io::Error>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            error: None,
        }
    }

    /// The error that ended the stream, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: Read> Iterator for ReaderSource<R> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.error.is_some() {
            return None;
        }
        match self.bytes.next()? {
            Ok(byte) => Some(byte),
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

/// Outcome of one interpreter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    /// The stream ended
    Stop,
}

/// # Interpreter
///
/// ## Example
///
/// ```
/// use impacto::engine::NoWear;
/// use impacto::interpreter::Interpreter;
/// use impacto::page::Decorations;
/// use impacto::printer::PrinterConfig;
///
/// let mut interpreter = Interpreter::new(PrinterConfig::LX80, Decorations::default(), NoWear);
/// interpreter.run(&mut b"AB\x0C".iter().copied());
///
/// let document = interpreter.finish();
/// assert_eq!(document.pages().len(), 2);
/// ```
pub struct Interpreter<W = NoWear> {
    head: PrintHead<W>,
    carriage: Carriage,
}

impl<W: HeadWear> Interpreter<W> {
    pub fn new(config: PrinterConfig, decorations: Decorations, wear: W) -> Self {
        Self {
            head: PrintHead::new(config, &decorations, wear),
            carriage: Carriage::new(config.geometry(), decorations),
        }
    }

    /// Current printer state.
    pub fn carriage(&self) -> &Carriage {
        &self.carriage
    }

    pub fn head(&self) -> &PrintHead<W> {
        &self.head
    }

    /// Consume and act on one logical unit from `source`.
    pub fn step<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Signal {
        let Some(byte) = source.next_byte() else {
            return Signal::Stop;
        };

        match byte {
            0x20..=0x7E => self.head.print_char(&mut self.carriage, byte),
            0x7F => {}
            ACCENT_LEAD => return self.accent(source),
            0x80..=0xFF => self.head.print_char(&mut self.carriage, byte),
            _ => return self.control(byte, source),
        }
        Signal::Continue
    }

    /// Step until the stream ends.
    pub fn run<S: ByteSource + ?Sized>(&mut self, source: &mut S) {
        while self.step(source) == Signal::Continue {}
    }

    /// Hand over everything printed so far.
    pub fn finish(self) -> Document {
        self.carriage.pages.finalize()
    }

    fn accent<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Signal {
        let Some(second) = source.next_byte() else {
            return Signal::Stop;
        };

        match accents::decompose(second) {
            Some((base, mark)) => {
                self.head.print_char(&mut self.carriage, base);
                self.head.backspace(&mut self.carriage);
                self.head.print_char(&mut self.carriage, mark);
            }
            None => {
                log::trace!("no composition for 0xC3 {:#04x}", second);
                self.head.print_char(&mut self.carriage, b'?');
            }
        }
        Signal::Continue
    }

    fn control<S: ByteSource + ?Sized>(&mut self, byte: u8, source: &mut S) -> Signal {
        let carriage = &mut self.carriage;
        let code = ControlCode::from_byte(byte);
        if code != ControlCode::Escape {
            log::debug!("<{}>", codes::control_name(byte));
        }

        match code {
            ControlCode::Backspace => self.head.backspace(carriage),
            ControlCode::HorizontalTab => self.head.tab(carriage),
            ControlCode::LineFeed => self.head.line_feed(carriage),
            ControlCode::FormFeed => self.head.form_feed(carriage),
            ControlCode::CarriageReturn => self.head.carriage_return(carriage),
            ControlCode::ShiftOut => carriage.modes.wide_one_line = true,
            ControlCode::ShiftIn => carriage.modes.set_compressed(true),
            ControlCode::DeviceControl2 => carriage.modes.set_compressed(false),
            ControlCode::DeviceControl4 => {
                carriage.modes.wide = false;
                carriage.modes.wide_one_line = false;
            }
            ControlCode::Escape => return self.escape(source),
            ControlCode::Unknown(other) => {
                log::trace!("ignored control {}", codes::control_name(other));
            }
        }
        Signal::Continue
    }

    fn escape<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Signal {
        let Some(selector) = source.next_byte() else {
            log::debug!("stream ended after ESC");
            return Signal::Stop;
        };
        let command = EscapeCommand::from_byte(selector);
        log::debug!("<ESC>{:?}", command);

        match command {
            EscapeCommand::BitImageSingle => return self.graphics(source, GraphicsDensity::Single),
            EscapeCommand::BitImageDouble => return self.graphics(source, GraphicsDensity::Double),
            _ => {}
        }

        let param = if command.takes_parameter() {
            let Some(n) = source.next_byte() else {
                log::debug!("stream ended inside {:?}", command);
                return Signal::Stop;
            };
            n
        } else {
            0
        };

        self.apply(command, param);
        debug_assert!(self.carriage.modes.is_consistent());
        Signal::Continue
    }

    fn apply(&mut self, command: EscapeCommand, n: u8) {
        let modes = &mut self.carriage.modes;
        match command {
            EscapeCommand::Reset => self.reset(),
            EscapeCommand::BoldOn => modes.bold = true,
            EscapeCommand::BoldOff => modes.bold = false,
            EscapeCommand::ItalicOn => modes.italic = true,
            EscapeCommand::ItalicOff => modes.italic = false,
            EscapeCommand::DoubleStrikeOn => modes.double_strike = true,
            EscapeCommand::DoubleStrikeOff => modes.double_strike = false,
            EscapeCommand::Script => modes.set_script(match codes::switch(n) {
                Some(false) => Script::Superscript,
                Some(true) => Script::Subscript,
                None => Script::Normal,
            }),
            EscapeCommand::ScriptOff => modes.set_script(Script::Normal),
            EscapeCommand::Underline => {
                if let Some(on) = codes::switch(n) {
                    modes.underline = on;
                }
            }
            EscapeCommand::Elite => modes.set_pitch(Pitch::Elite),
            EscapeCommand::Pica => modes.set_pitch(Pitch::Pica),
            EscapeCommand::Expanded => {
                if let Some(on) = codes::switch(n) {
                    modes.wide = on;
                }
            }
            EscapeCommand::EighthInchSpacing => modes.line_step = 1.0 / 8.0,
            EscapeCommand::SevenSeventyTwoSpacing => modes.line_step = 7.0 / 72.0,
            EscapeCommand::SixthInchSpacing => modes.line_step = 1.0 / 6.0,
            EscapeCommand::Spacing72 => modes.line_step = f32::from(n) / 72.0,
            EscapeCommand::Spacing216 => modes.line_step = f32::from(n) / 216.0,
            EscapeCommand::BitImageSingle | EscapeCommand::BitImageDouble => {}
            EscapeCommand::Unknown(selector) => {
                log::trace!("ignored ESC {:#04x}", selector);
            }
        }
    }

    /// ESC @: modes and form back to power-on; head position and pages stay.
    fn reset(&mut self) {
        self.carriage.modes = ModeState::default();
        self.carriage.geometry = self.head.config().geometry();
        self.carriage.cursor.line_count = 0;
    }

    fn graphics<S: ByteSource + ?Sized>(&mut self, source: &mut S, density: GraphicsDensity) -> Signal {
        let Some(lo) = source.next_byte() else {
            return Signal::Stop;
        };
        let Some(hi) = source.next_byte() else {
            return Signal::Stop;
        };

        let count = usize::from(u16::from_le_bytes([lo, hi]));
        let mut data = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(byte) = source.next_byte() else {
                log::debug!("stream ended after {} of {} graphics bytes", data.len(), count);
                return Signal::Stop;
            };
            data.push(byte);
        }
        log::debug!("<{} columns>", count);

        self.head.print_graphics(&mut self.carriage, &data, density);
        Signal::Continue
    }
}
