//! # Rendering Module
//!
//! Tools that produce printer input rather than consume it.
//!
//! ## Modules
//!
//! - [`bitimage`]: Raster images and ASCII art to ESC K / ESC L graphics strips
//!
//! ## Usage Example
//!
//! ```
//! use impacto::engine::GraphicsDensity;
//! use impacto::render::bitimage::{Bitmap, to_escp};
//!
//! let logo = Bitmap::from_ascii(" * \n***\n * \n").unwrap().scaled(2);
//! let stream = to_escp(&logo, GraphicsDensity::Double);
//!
//! // stream is ready to feed to the interpreter or a real printer
//! assert_eq!(stream.last(), Some(&b'@'));
//! ```

pub mod bitimage;
