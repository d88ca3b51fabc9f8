//! Seeded random image generation
//!
//! Inputs for randomized conformance cases. Generation is driven by an
//! explicit seed so that a failing case can be reproduced exactly.

use super::{Image, PixelFormat};
use crate::error::{Error, Result};
use rand::prelude::*;

impl Image {
    /// Create an image of uniformly distributed samples in `[min, max)`.
    ///
    /// Samples are drawn in row-major order from a `StdRng` seeded with
    /// `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the range is empty or does not
    /// fit the format, [`Error::InvalidDimension`] for a zero size.
    pub fn random(
        width: u32,
        height: u32,
        format: PixelFormat,
        seed: u64,
        min: i32,
        max: i32,
    ) -> Result<Image> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random_with(&mut rng, width, height, format, min, max)
    }

    /// Like [`Image::random`], drawing from a caller-owned generator.
    pub fn random_with(
        rng: &mut StdRng,
        width: u32,
        height: u32,
        format: PixelFormat,
        min: i32,
        max: i32,
    ) -> Result<Image> {
        let (lo, hi) = match format {
            PixelFormat::U8 => (0, 256),
            PixelFormat::S16 => (i32::from(i16::MIN), i32::from(i16::MAX) + 1),
        };
        if min >= max || min < lo || max > hi {
            return Err(Error::InvalidParameter(format!(
                "random range [{min}, {max}) invalid for {format:?}"
            )));
        }
        let mut img = Image::new(width, height, format)?.to_mut();
        match format {
            PixelFormat::U8 => img.fill_u8(|_, _| rng.random_range(min..max) as u8)?,
            PixelFormat::S16 => img.fill_s16(|_, _| rng.random_range(min..max) as i16)?,
        }
        Ok(img.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_reproducible() {
        let a = Image::random(32, 17, PixelFormat::U8, 42, 0, 256).unwrap();
        let b = Image::random(32, 17, PixelFormat::U8, 42, 0, 256).unwrap();
        let c = Image::random(32, 17, PixelFormat::U8, 43, 0, 256).unwrap();
        assert!(a.equals(&b));
        assert!(!a.equals(&c));
    }

    #[test]
    fn test_random_range_respected() {
        let img = Image::random(64, 64, PixelFormat::S16, 7, -5, 5).unwrap();
        assert!(img.rows_s16().flatten().all(|&v| (-5..5).contains(&v)));
    }

    #[test]
    fn test_random_rejects_bad_range() {
        assert!(Image::random(4, 4, PixelFormat::U8, 0, 0, 257).is_err());
        assert!(Image::random(4, 4, PixelFormat::U8, 0, 10, 10).is_err());
    }
}
