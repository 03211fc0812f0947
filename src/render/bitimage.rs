//! # Bit-Image Conversion
//!
//! Turns a raster image or an ASCII-art grid into an ESC/P byte stream that
//! prints it as 8-dot graphics strips.
//!
//! ## Stream Layout
//!
//! ```text
//! ESC A 8                      line spacing = 8/72in (one strip)
//! ESC K nL nH d1..dw  CR LF    strip 0: rows 0..8
//! ESC K nL nH d1..dw  CR LF    strip 1: rows 8..16
//! ...
//! ESC @                        back to power-on defaults
//! ```
//!
//! Each data byte is one column of a strip, **MSB = top row**. Rows below
//! the bottom of the image are left blank.
//!
//! ## Binarization
//!
//! Photos are reduced to black and white either by a fixed threshold on
//! luminance or by 8x8 Bayer ordered dithering:
//!
//! ```text
//!     0   1   2   3   4   5   6   7   (x mod 8)
//! 0 │ 0  32   8  40   2  34  10  42
//! 1 │48  16  56  24  50  18  58  26
//! 2 │12  44   4  36  14  46   6  38
//! 3 │60  28  52  20  62  30  54  22
//! 4 │ 3  35  11  43   1  33   9  41
//! 5 │51  19  59  27  49  17  57  25
//! 6 │15  47   7  39  13  45   5  37
//! 7 │63  31  55  23  61  29  53  21
//! ```
//!
//! ## Example
//!
//! ```
//! use impacto::engine::GraphicsDensity;
//! use impacto::render::bitimage::{Bitmap, to_escp};
//!
//! let bitmap = Bitmap::from_ascii("**\n* \n").unwrap();
//! let stream = to_escp(&bitmap, GraphicsDensity::Single);
//!
//! assert_eq!(&stream[..3], &[0x1B, b'A', 8]);
//! assert_eq!(&stream[3..9], &[0x1B, b'K', 2, 0, 0b1100_0000, 0b1000_0000]);
//! ```

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;

use crate::engine::GraphicsDensity;
use crate::error::ImpactoError;
use crate::protocol::commands;

/// Rows in one graphics strip
pub const STRIP_HEIGHT: usize = 8;

/// Widest image accepted before resizing (columns at 60 dpi across 8in)
pub const DEFAULT_MAX_WIDTH: u32 = 480;

/// Default luminance threshold
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Largest integer scale factor for ASCII art
pub const MAX_SCALE: usize = 10;

/// Bayer 8x8 ordered dithering matrix
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Bayer threshold at a pixel position, in (0, 1).
#[inline]
pub fn bayer_threshold(x: usize, y: usize) -> f32 {
    (BAYER8[y & 7][x & 7] as f32 + 0.5) / 64.0
}

/// How grayscale pixels become dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binarize {
    /// Luminance below the value prints
    Threshold(u8),
    /// Ordered dithering
    Bayer,
}

impl Default for Binarize {
    fn default() -> Self {
        Binarize::Threshold(DEFAULT_THRESHOLD)
    }
}

impl Binarize {
    #[inline]
    fn prints(self, x: usize, y: usize, luma: u8) -> bool {
        match self {
            Binarize::Threshold(level) => luma < level,
            Binarize::Bayer => {
                let intensity = 1.0 - luma as f32 / 255.0;
                intensity > bayer_threshold(x, y)
            }
        }
    }
}

/// A black-and-white raster, row-major, `true` = dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// Blank bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at (x, y); out-of-range positions are blank.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = on;
        }
    }

    /// Binarize an image, first shrinking it to `max_width` if it is wider.
    pub fn from_image(image: &DynamicImage, max_width: u32, binarize: Binarize) -> Self {
        let image = if image.width() > max_width && max_width > 0 {
            let ratio = max_width as f32 / image.width() as f32;
            let height = ((image.height() as f32 * ratio) as u32).max(1);
            log::info!("resizing {}x{} to {}x{}", image.width(), image.height(), max_width, height);
            image.resize_exact(max_width, height, FilterType::Lanczos3)
        } else {
            image.clone()
        };

        let gray = image.to_luma8();
        let mut bitmap = Bitmap::new(gray.width() as usize, gray.height() as usize);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            bitmap.set(x, y, binarize.prints(x, y, pixel.0[0]));
        }
        bitmap
    }

    /// Parse ASCII art: any character other than space or tab is a dot.
    ///
    /// Lines are padded on the right to the longest one.
    pub fn from_ascii(text: &str) -> Result<Self, ImpactoError> {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return Err(ImpactoError::Image("ASCII art is empty".to_string()));
        }

        let mut bitmap = Bitmap::new(width, lines.len());
        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.chars().enumerate() {
                bitmap.set(x, y, !matches!(c, ' ' | '\t'));
            }
        }
        Ok(bitmap)
    }

    /// Enlarge by an integer factor in both directions.
    pub fn scaled(&self, factor: usize) -> Self {
        let factor = factor.max(1);
        let mut scaled = Bitmap::new(self.width * factor, self.height * factor);
        for y in 0..scaled.height {
            for x in 0..scaled.width {
                scaled.set(x, y, self.get(x / factor, y / factor));
            }
        }
        scaled
    }

    /// Surround with a one-pixel solid frame.
    pub fn bordered(&self) -> Self {
        let (width, height) = (self.width + 2, self.height + 2);
        let mut framed = Bitmap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                framed.set(x, y, edge || self.get(x.wrapping_sub(1), y.wrapping_sub(1)));
            }
        }
        framed
    }

    /// Column byte of the strip starting at row `top`, MSB = top row.
    fn column_byte(&self, x: usize, top: usize) -> u8 {
        (0..STRIP_HEIGHT).fold(0u8, |byte, bit| {
            if self.get(x, top + bit) {
                byte | (0x80 >> bit)
            } else {
                byte
            }
        })
    }
}

/// Load and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage, ImpactoError> {
    let path = path.as_ref();
    image::open(path)
        .map_err(|e| ImpactoError::Image(format!("Failed to decode {}: {}", path.display(), e)))
}

/// Encode a bitmap as a printable ESC/P stream.
pub fn to_escp(bitmap: &Bitmap, density: GraphicsDensity) -> Vec<u8> {
    let strips = bitmap.height().div_ceil(STRIP_HEIGHT);
    let mut out = Vec::with_capacity(strips * (bitmap.width() + 6) + 5);

    out.extend(commands::spacing_72(STRIP_HEIGHT as u8));
    for strip in 0..strips {
        let top = strip * STRIP_HEIGHT;
        let data: Vec<u8> = (0..bitmap.width())
            .map(|x| bitmap.column_byte(x, top))
            .collect();
        out.extend(match density {
            GraphicsDensity::Single => commands::bit_image_single(&data),
            GraphicsDensity::Double => commands::bit_image_double(&data),
        });
        out.extend(commands::new_line());
    }
    out.extend(commands::init());

    log::debug!(
        "encoded {}x{} bitmap as {} strips, {} bytes",
        bitmap.width(),
        bitmap.height(),
        strips,
        out.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_bayer_extremes() {
        for y in 0..8 {
            for x in 0..8 {
                assert!(Binarize::Bayer.prints(x, y, 0));
                assert!(!Binarize::Bayer.prints(x, y, 255));
            }
        }
    }

    #[test]
    fn test_bayer_half_gray_is_about_half() {
        let count = (0..64)
            .filter(|i| Binarize::Bayer.prints(i % 8, i / 8, 128))
            .count();
        assert!(count > 20 && count < 44);
    }

    #[test]
    fn test_threshold() {
        let binarize = Binarize::default();
        assert!(binarize.prints(0, 0, 127));
        assert!(!binarize.prints(0, 0, 128));
    }

    #[test]
    fn test_ascii_pads_short_lines() {
        let bitmap = Bitmap::from_ascii("***\n*\n").unwrap();
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
        assert!(bitmap.get(0, 1));
        assert!(!bitmap.get(2, 1));
    }

    #[test]
    fn test_empty_ascii_is_an_error() {
        assert!(matches!(Bitmap::from_ascii("\n\n"), Err(ImpactoError::Image(_))));
    }

    #[test]
    fn test_scaled_and_bordered() {
        let bitmap = Bitmap::from_ascii("* \n").unwrap();
        let scaled = bitmap.scaled(2);
        assert_eq!((scaled.width(), scaled.height()), (4, 2));
        assert!(scaled.get(1, 1));
        assert!(!scaled.get(2, 0));

        let framed = bitmap.bordered();
        assert_eq!((framed.width(), framed.height()), (4, 3));
        assert!(framed.get(0, 0));
        assert!(framed.get(1, 1));
        assert!(!framed.get(2, 1));
    }

    #[test]
    fn test_strip_bytes_msb_top() {
        let mut bitmap = Bitmap::new(1, 10);
        bitmap.set(0, 0, true);
        bitmap.set(0, 7, true);
        bitmap.set(0, 8, true);
        let stream = to_escp(&bitmap, GraphicsDensity::Double);

        let expected: Vec<u8> = [
            &[0x1B, b'A', 8][..],
            &[0x1B, b'L', 1, 0, 0x81, 0x0D, 0x0A],
            &[0x1B, b'L', 1, 0, 0x80, 0x0D, 0x0A],
            &[0x1B, b'@'],
        ]
        .concat();
        assert_eq!(stream, expected);
    }

    #[test]
    fn test_image_is_resized_to_max_width() {
        let mut gray = GrayImage::from_pixel(20, 10, Luma([255]));
        gray.put_pixel(0, 0, Luma([0]));
        let image = DynamicImage::ImageLuma8(gray);

        let bitmap = Bitmap::from_image(&image, 10, Binarize::default());
        assert_eq!((bitmap.width(), bitmap.height()), (10, 5));

        let full = Bitmap::from_image(&image, 100, Binarize::default());
        assert!(full.get(0, 0));
        assert!(!full.get(1, 0));
    }
}
