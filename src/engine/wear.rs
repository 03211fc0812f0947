//! # Head Wear
//!
//! Worn ribbon and misaligned type, supplied to the head from outside.
//!
//! A fresh machine strikes every character at full intensity exactly where
//! the cursor is ([`NoWear`]). An old one has a ribbon that is lighter in
//! some columns than others, and a few type slugs that sit slightly off
//! their baseline ([`WornHead`]).

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seed used by `--vintage` when none is given
pub const DEFAULT_SEED: u64 = 0xDEAD_BEEF;

/// Number of character codes with a jitter entry (0..=126)
const JITTER_CODES: usize = 127;

/// Share of printable codes that get a misaligned slug (percent)
const JITTER_CHANCE: u32 = 20;

/// Maximum horizontal slug offset (inches)
const MAX_JITTER_X: f32 = 0.02;

/// Maximum vertical slug offset (inches)
const MAX_JITTER_Y: f32 = 0.012;

/// Per-column intensity and per-character offset applied by the head.
pub trait HeadWear {
    /// Ink intensity of character column `column` (1.0 = full black).
    fn intensity(&self, column: usize) -> f32;

    /// Offset `(dx, dy)` in inches of the slug for `code`.
    fn jitter(&self, code: u8) -> (f32, f32);
}

/// A head in perfect condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWear;

impl HeadWear for NoWear {
    #[inline]
    fn intensity(&self, _column: usize) -> f32 {
        1.0
    }

    #[inline]
    fn jitter(&self, _code: u8) -> (f32, f32) {
        (0.0, 0.0)
    }
}

/// Deterministic worn-equipment tables.
#[derive(Debug, Clone)]
pub struct WornHead {
    column_intensity: Vec<f32>,
    jitter: [(f32, f32); JITTER_CODES],
}

impl WornHead {
    /// Build the tables for a line of `columns` characters from `seed`.
    ///
    /// The same seed always yields the same tables.
    pub fn seeded(seed: u64, columns: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let columns = columns.max(1);

        let column_intensity = (0..columns)
            .map(|_| {
                let r: f32 = rng.random();
                let r2: f32 = rng.random();
                0.7 + 0.3 * (0.7 * r + 0.3 * r2)
            })
            .collect();

        let mut jitter = [(0.0, 0.0); JITTER_CODES];
        for entry in jitter.iter_mut().skip(0x20) {
            if rng.random_range(0..100) < JITTER_CHANCE {
                *entry = (
                    rng.random_range(-MAX_JITTER_X..=MAX_JITTER_X),
                    rng.random_range(-MAX_JITTER_Y..=MAX_JITTER_Y),
                );
            }
        }

        log::debug!("worn head: {} columns, seed {:#x}", columns, seed);
        Self {
            column_intensity,
            jitter,
        }
    }

    /// Number of columns with their own intensity.
    pub fn columns(&self) -> usize {
        self.column_intensity.len()
    }
}

impl HeadWear for WornHead {
    fn intensity(&self, column: usize) -> f32 {
        let last = self.column_intensity.len() - 1;
        self.column_intensity[column.min(last)]
    }

    fn jitter(&self, code: u8) -> (f32, f32) {
        self.jitter
            .get(code as usize)
            .copied()
            .unwrap_or((0.0, 0.0))
    }
}

impl<W: HeadWear + ?Sized> HeadWear for Box<W> {
    fn intensity(&self, column: usize) -> f32 {
        (**self).intensity(column)
    }

    fn jitter(&self, code: u8) -> (f32, f32) {
        (**self).jitter(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_wear_is_neutral() {
        assert_eq!(NoWear.intensity(42), 1.0);
        assert_eq!(NoWear.jitter(b'A'), (0.0, 0.0));
    }

    #[test]
    fn test_worn_head_is_deterministic() {
        let a = WornHead::seeded(DEFAULT_SEED, 85);
        let b = WornHead::seeded(DEFAULT_SEED, 85);
        for column in 0..85 {
            assert_eq!(a.intensity(column), b.intensity(column));
        }
        for code in 0..=255u8 {
            assert_eq!(a.jitter(code), b.jitter(code));
        }
    }

    #[test]
    fn test_worn_head_ranges() {
        let head = WornHead::seeded(7, 85);
        for column in 0..85 {
            let i = head.intensity(column);
            assert!((0.7..=1.0).contains(&i), "column {column}: {i}");
        }
        for code in 0..=255u8 {
            let (dx, dy) = head.jitter(code);
            assert!(dx.abs() <= MAX_JITTER_X);
            assert!(dy.abs() <= MAX_JITTER_Y);
        }
        // control codes and the upper half never move
        assert_eq!(head.jitter(b'\n'), (0.0, 0.0));
        assert_eq!(head.jitter(0xC1), (0.0, 0.0));
    }

    #[test]
    fn test_column_clamped_to_last() {
        let head = WornHead::seeded(1, 3);
        assert_eq!(head.columns(), 3);
        assert_eq!(head.intensity(100), head.intensity(2));
    }

    #[test]
    fn test_some_codes_jitter() {
        let head = WornHead::seeded(DEFAULT_SEED, 1);
        let moved = (0x20..0x7F)
            .filter(|code| head.jitter(*code) != (0.0, 0.0))
            .count();
        assert!(moved > 0 && moved < 60, "moved {moved}");
    }
}
