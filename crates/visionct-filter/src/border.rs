//! Border modes and pixel sampling
//!
//! A border mode decides what a neighborhood read returns when it falls
//! outside the source image. The gradient kernel never sees the policy:
//! it only consumes samples produced by a [`Sampler`].
//!
//! Coordinates are relative to the source's active region.

use crate::{FilterError, FilterResult};
use std::fmt;
use visionct_core::Image;

/// Raw tag for [`BorderMode::Undefined`] in the API's enum space
pub const BORDER_MODE_UNDEFINED: u32 = 0xC000;
/// Raw tag for [`BorderMode::Constant`]
pub const BORDER_MODE_CONSTANT: u32 = 0xC001;
/// Raw tag for [`BorderMode::Replicate`]
pub const BORDER_MODE_REPLICATE: u32 = 0xC002;

/// Border handling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderMode {
    /// Out-of-bounds samples are never computed; the valid output shrinks
    Undefined,
    /// Out-of-bounds coordinates clamp to the nearest edge pixel
    Replicate,
    /// Out-of-bounds coordinates read a fixed value
    Constant(u32),
}

impl fmt::Display for BorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorderMode::Undefined => write!(f, "BORDER_UNDEFINED"),
            BorderMode::Replicate => write!(f, "BORDER_REPLICATE"),
            BorderMode::Constant(v) => write!(f, "BORDER_CONSTANT={v}"),
        }
    }
}

/// Border mode as exchanged with the API under test
///
/// Mirrors the API's `{ mode, constant_value }` attribute struct. The
/// constant is ignored unless `mode` is [`BORDER_MODE_CONSTANT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawBorderMode {
    /// Mode tag
    pub mode: u32,
    /// Fill value for constant mode
    pub constant_value: u32,
}

impl From<BorderMode> for RawBorderMode {
    fn from(border: BorderMode) -> Self {
        match border {
            BorderMode::Undefined => RawBorderMode {
                mode: BORDER_MODE_UNDEFINED,
                constant_value: 0,
            },
            BorderMode::Replicate => RawBorderMode {
                mode: BORDER_MODE_REPLICATE,
                constant_value: 0,
            },
            BorderMode::Constant(v) => RawBorderMode {
                mode: BORDER_MODE_CONSTANT,
                constant_value: v,
            },
        }
    }
}

impl TryFrom<RawBorderMode> for BorderMode {
    type Error = FilterError;

    fn try_from(raw: RawBorderMode) -> FilterResult<Self> {
        match raw.mode {
            BORDER_MODE_UNDEFINED => Ok(BorderMode::Undefined),
            BORDER_MODE_REPLICATE => Ok(BorderMode::Replicate),
            BORDER_MODE_CONSTANT => Ok(BorderMode::Constant(raw.constant_value)),
            mode => Err(FilterError::UnsupportedBorder { mode }),
        }
    }
}

/// Source of neighborhood samples for one border policy
pub trait Sampler {
    /// Sample at `(x, y)`, widened to `i32`.
    fn sample(&self, x: i32, y: i32) -> i32;
}

/// Direct reads for [`BorderMode::Undefined`]
///
/// The caller guarantees every coordinate is inside the image.
pub struct InBoundsSampler<'a> {
    src: &'a Image,
}

impl<'a> InBoundsSampler<'a> {
    pub fn new(src: &'a Image) -> Self {
        Self { src }
    }
}

impl Sampler for InBoundsSampler<'_> {
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    fn sample(&self, x: i32, y: i32) -> i32 {
        assert!(
            x >= 0 && y >= 0,
            "undefined border: sample ({x}, {y}) outside image"
        );
        i32::from(self.src.get_u8_unchecked(x as u32, y as u32))
    }
}

/// Clamped reads for [`BorderMode::Replicate`]
pub struct ReplicateSampler<'a> {
    src: &'a Image,
    max_x: i32,
    max_y: i32,
}

impl<'a> ReplicateSampler<'a> {
    pub fn new(src: &'a Image) -> Self {
        Self {
            src,
            max_x: src.width() as i32 - 1,
            max_y: src.height() as i32 - 1,
        }
    }
}

impl Sampler for ReplicateSampler<'_> {
    #[inline]
    fn sample(&self, x: i32, y: i32) -> i32 {
        let x = x.clamp(0, self.max_x);
        let y = y.clamp(0, self.max_y);
        i32::from(self.src.get_u8_unchecked(x as u32, y as u32))
    }
}

/// Fill-value reads for [`BorderMode::Constant`]
pub struct ConstantSampler<'a> {
    src: &'a Image,
    value: u8,
}

impl<'a> ConstantSampler<'a> {
    /// The fill value is narrowed to the 8-bit sample type.
    pub fn new(src: &'a Image, value: u32) -> Self {
        Self {
            src,
            value: value as u8,
        }
    }
}

impl Sampler for ConstantSampler<'_> {
    #[inline]
    fn sample(&self, x: i32, y: i32) -> i32 {
        let inside =
            x >= 0 && y >= 0 && (x as u32) < self.src.width() && (y as u32) < self.src.height();
        if inside {
            i32::from(self.src.get_u8_unchecked(x as u32, y as u32))
        } else {
            i32::from(self.value)
        }
    }
}

/// Sample a U8 image at `(x, y)` under `border`.
///
/// Convenience for single reads; the reference builder constructs one
/// sampler per image instead.
///
/// # Panics
///
/// Panics under [`BorderMode::Undefined`] if `(x, y)` is outside the image,
/// or if the image is not U8.
pub fn sample(src: &Image, x: i32, y: i32, border: BorderMode) -> i32 {
    match border {
        BorderMode::Undefined => InBoundsSampler::new(src).sample(x, y),
        BorderMode::Replicate => ReplicateSampler::new(src).sample(x, y),
        BorderMode::Constant(v) => ConstantSampler::new(src, v).sample(x, y),
    }
}
