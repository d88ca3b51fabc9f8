//! Image comparison operations
//!
//! Exact, sample-by-sample comparison over the active regions of two
//! images. There is no tolerance: conformance requires bit-identical
//! output.

use super::Image;
use crate::error::{Error, Result};
use std::fmt;

/// A single differing sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelMismatch {
    /// ROI-relative x coordinate
    pub x: u32,
    /// ROI-relative y coordinate
    pub y: u32,
    /// Sample in the expected (reference) image
    pub expected: i32,
    /// Sample in the actual (candidate) image
    pub actual: i32,
}

impl fmt::Display for PixelMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}): expected {}, actual {}",
            self.x, self.y, self.expected, self.actual
        )
    }
}

/// Result of an exact comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDiff {
    /// Width of the compared region
    pub width: u32,
    /// Height of the compared region
    pub height: u32,
    /// Total number of differing samples
    pub n_diff: u64,
    /// First differing samples in row-major order, at most the
    /// requested number
    pub mismatches: Vec<PixelMismatch>,
}

impl ImageDiff {
    /// Whether the compared regions are identical.
    pub fn is_equal(&self) -> bool {
        self.n_diff == 0
    }

    /// Fraction of differing samples (0.0 to 1.0).
    pub fn fract_diff(&self) -> f64 {
        let total = self.width as u64 * self.height as u64;
        if total == 0 {
            0.0
        } else {
            self.n_diff as f64 / total as f64
        }
    }
}

impl Image {
    /// Compare the active region of `self` (expected) against `actual`.
    ///
    /// Every sample of the region is visited; `max_reported` bounds how
    /// many mismatch locations are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatMismatch`] if the formats differ, or
    /// [`Error::DimensionMismatch`] if the active regions differ in size.
    pub fn compare_exact(&self, actual: &Image, max_reported: usize) -> Result<ImageDiff> {
        if self.format() != actual.format() {
            return Err(Error::FormatMismatch {
                expected: self.format(),
                actual: actual.format(),
            });
        }
        if self.width() != actual.width() || self.height() != actual.height() {
            return Err(Error::DimensionMismatch {
                expected: (self.width(), self.height()),
                actual: (actual.width(), actual.height()),
            });
        }

        let mut diff = ImageDiff {
            width: self.width(),
            height: self.height(),
            n_diff: 0,
            mismatches: Vec::new(),
        };
        let mut record = |x: usize, y: usize, e: i32, a: i32| {
            diff.n_diff += 1;
            if diff.mismatches.len() < max_reported {
                diff.mismatches.push(PixelMismatch {
                    x: x as u32,
                    y: y as u32,
                    expected: e,
                    actual: a,
                });
            }
        };

        match self.format() {
            super::PixelFormat::U8 => {
                for (y, (re, ra)) in self.rows_u8().zip(actual.rows_u8()).enumerate() {
                    for (x, (&e, &a)) in re.iter().zip(ra).enumerate() {
                        if e != a {
                            record(x, y, e.into(), a.into());
                        }
                    }
                }
            }
            super::PixelFormat::S16 => {
                for (y, (re, ra)) in self.rows_s16().zip(actual.rows_s16()).enumerate() {
                    for (x, (&e, &a)) in re.iter().zip(ra).enumerate() {
                        if e != a {
                            record(x, y, e.into(), a.into());
                        }
                    }
                }
            }
        }
        Ok(diff)
    }

    /// Check if two images have equal format, active size and samples.
    pub fn equals(&self, other: &Image) -> bool {
        self.compare_exact(other, 0)
            .map(|d| d.is_equal())
            .unwrap_or(false)
    }
}
