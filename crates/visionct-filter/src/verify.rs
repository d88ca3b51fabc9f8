//! Sobel 3x3 output verification
//!
//! Compares a candidate gradient pair against the reference over the
//! region where the border mode defines the output.

use crate::border::BorderMode;
use crate::sobel::{GradientPair, sobel3x3_reference};
use crate::{FilterError, FilterResult};
use std::fmt;
use visionct_core::{Image, ImageDiff};

/// Default cap on recorded mismatch locations per channel
pub const DEFAULT_MAX_REPORTED: usize = 16;

/// Outcome of comparing one candidate pair
#[derive(Debug, Clone)]
pub struct SobelVerdict {
    /// Border mode the comparison was made under
    pub border: BorderMode,
    /// Reference pair at full extent
    pub reference: GradientPair,
    /// Horizontal channel differences
    pub x: ImageDiff,
    /// Vertical channel differences
    pub y: ImageDiff,
}

impl SobelVerdict {
    /// Whether both channels match exactly.
    pub fn is_match(&self) -> bool {
        self.x.is_equal() && self.y.is_equal()
    }

    /// Total number of differing samples over both channels.
    pub fn n_diff(&self) -> u64 {
        self.x.n_diff + self.y.n_diff
    }
}

impl fmt::Display for SobelVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            return write!(
                f,
                "{}: {}x{} region matches",
                self.border, self.x.width, self.x.height
            );
        }
        write!(
            f,
            "{}: {} of {}x{} samples differ",
            self.border,
            self.n_diff(),
            self.x.width,
            self.x.height
        )?;
        for (name, diff) in [("x", &self.x), ("y", &self.y)] {
            for m in &diff.mismatches {
                write!(f, "\n  {name} {m}")?;
            }
            let shown = diff.mismatches.len() as u64;
            if diff.n_diff > shown {
                write!(f, "\n  {name} ... {} more", diff.n_diff - shown)?;
            }
        }
        Ok(())
    }
}

fn check_shape(channel: &'static str, reference: &Image, actual: &Image) -> FilterResult<()> {
    if reference.width() != actual.width() || reference.height() != actual.height() {
        return Err(FilterError::ShapeMismatch {
            channel,
            expected_w: reference.width(),
            expected_h: reference.height(),
            actual_w: actual.width(),
            actual_h: actual.height(),
        });
    }
    Ok(())
}

/// Verify a candidate pair against the reference for `src`.
///
/// Uses [`DEFAULT_MAX_REPORTED`] as the mismatch cap.
pub fn sobel3x3_verify(
    src: &Image,
    candidate: &GradientPair,
    border: BorderMode,
) -> FilterResult<SobelVerdict> {
    sobel3x3_verify_with(src, candidate, border, DEFAULT_MAX_REPORTED)
}

/// Verify a candidate pair against the reference for `src`.
///
/// Under [`BorderMode::Undefined`] the active regions of both the
/// candidate and the reference are shrunk by one pixel per side, once,
/// before comparing. Other modes compare the full extent.
///
/// # Errors
///
/// Returns [`FilterError::ShapeMismatch`] if a candidate channel does not
/// have the source's active size, and a core format error if a channel is
/// not S16.
pub fn sobel3x3_verify_with(
    src: &Image,
    candidate: &GradientPair,
    border: BorderMode,
    max_reported: usize,
) -> FilterResult<SobelVerdict> {
    let reference = sobel3x3_reference(src, border)?;
    check_shape("x", &reference.x, &candidate.x)?;
    check_shape("y", &reference.y, &candidate.y)?;

    let expected = reference.valid_region(border)?;
    let actual = candidate.valid_region(border)?;

    let x = expected.x.compare_exact(&actual.x, max_reported)?;
    let y = expected.y.compare_exact(&actual.y, max_reported)?;

    let verdict = SobelVerdict {
        border,
        reference,
        x,
        y,
    };
    if verdict.is_match() {
        log::debug!("{verdict}");
    } else {
        log::debug!("sobel3x3 mismatch, {} samples", verdict.n_diff());
    }
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visionct_core::PixelFormat;

    fn source() -> Image {
        Image::random(12, 9, PixelFormat::U8, 42, 0, 256).unwrap()
    }

    fn poke(img: &Image, x: u32, y: u32, v: i16) -> Image {
        let mut m = img.to_mut();
        m.set_s16(x, y, v).unwrap();
        m.into()
    }

    #[test]
    fn test_reference_verifies_against_itself() {
        let src = source();
        for border in [
            BorderMode::Undefined,
            BorderMode::Replicate,
            BorderMode::Constant(255),
        ] {
            let cand = sobel3x3_reference(&src, border).unwrap();
            let verdict = sobel3x3_verify(&src, &cand, border).unwrap();
            assert!(verdict.is_match(), "{verdict}");
        }
    }

    #[test]
    fn test_undefined_ignores_frame() {
        let src = source();
        let mut cand = sobel3x3_reference(&src, BorderMode::Undefined).unwrap();
        for (x, y) in [(0, 0), (11, 0), (0, 8), (11, 8), (5, 0), (0, 4)] {
            cand.x = poke(&cand.x, x, y, 1234);
            cand.y = poke(&cand.y, x, y, -1234);
        }
        let verdict = sobel3x3_verify(&src, &cand, BorderMode::Undefined).unwrap();
        assert!(verdict.is_match());
        assert_eq!((verdict.x.width, verdict.x.height), (10, 7));
    }

    #[test]
    fn test_undefined_checks_first_inner_ring() {
        let src = source();
        let mut cand = sobel3x3_reference(&src, BorderMode::Undefined).unwrap();
        let orig = cand.y.get_s16(1, 1).unwrap();
        cand.y = poke(&cand.y, 1, 1, orig.wrapping_add(1));
        let verdict = sobel3x3_verify(&src, &cand, BorderMode::Undefined).unwrap();
        assert!(!verdict.is_match());
        assert_eq!(verdict.y.n_diff, 1);
        let m = verdict.y.mismatches[0];
        assert_eq!((m.x, m.y), (0, 0));
        assert_eq!(m.expected, i32::from(orig));
    }

    #[test]
    fn test_replicate_checks_frame() {
        let src = source();
        let mut cand = sobel3x3_reference(&src, BorderMode::Replicate).unwrap();
        let orig = cand.x.get_s16(0, 0).unwrap();
        cand.x = poke(&cand.x, 0, 0, orig.wrapping_sub(3));
        let verdict = sobel3x3_verify(&src, &cand, BorderMode::Replicate).unwrap();
        assert_eq!(verdict.x.n_diff, 1);
        assert!(verdict.y.is_equal());
    }

    #[test]
    fn test_mismatch_cap() {
        let src = source();
        let cand = GradientPair::new(
            Image::new(12, 9, PixelFormat::S16).unwrap(),
            Image::new(12, 9, PixelFormat::S16).unwrap(),
        );
        let reference = sobel3x3_reference(&src, BorderMode::Replicate).unwrap();
        let nonzero = reference
            .x
            .rows_s16()
            .flatten()
            .filter(|&&v| v != 0)
            .count() as u64;
        let verdict = sobel3x3_verify_with(&src, &cand, BorderMode::Replicate, 3).unwrap();
        assert_eq!(verdict.x.n_diff, nonzero);
        assert!(verdict.x.mismatches.len() <= 3);
        assert!(verdict.to_string().contains("more"));
    }

    #[test]
    fn test_shape_mismatch() {
        let src = source();
        let cand = GradientPair::new(
            Image::new(11, 9, PixelFormat::S16).unwrap(),
            Image::new(12, 9, PixelFormat::S16).unwrap(),
        );
        assert!(matches!(
            sobel3x3_verify(&src, &cand, BorderMode::Undefined),
            Err(FilterError::ShapeMismatch { channel: "x", .. })
        ));
    }

    #[test]
    fn test_format_mismatch() {
        let src = source();
        let cand = GradientPair::new(src.clone(), src.clone());
        assert!(matches!(
            sobel3x3_verify(&src, &cand, BorderMode::Replicate),
            Err(FilterError::Core(_))
        ));
    }
}
