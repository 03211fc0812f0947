//! # Printer Module
//!
//! This module provides printer profiles, paper geometry and the mutable
//! head/mode state of a running printer.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware profiles and page geometry
//! - [`state`]: Cursor and print mode state

pub mod config;
pub mod state;

pub use config::{HeadKind, PageGeometry, PrinterConfig, WrapPolicy};
pub use state::{CursorState, ModeState, Pitch, Script};
