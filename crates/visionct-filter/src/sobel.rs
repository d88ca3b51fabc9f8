//! Sobel 3x3 gradient kernel and reference builder
//!
//! Horizontal and vertical responses use the usual 3x3 masks:
//!
//! ```text
//!   x:  -1  0  1      y:  -1 -2 -1
//!       -2  0  2           0  0  0
//!       -1  0  1           1  2  1
//! ```
//!
//! The neighborhood is passed as nine samples in row-major order,
//! `v0..v8`, with `v4` at the center.

use crate::border::{
    BorderMode, ConstantSampler, InBoundsSampler, RawBorderMode, ReplicateSampler, Sampler,
};
use crate::{FilterError, FilterResult};
use visionct_core::{Image, PixelFormat, Rect};

/// Horizontal Sobel response, narrowed to `i16` by truncation.
#[inline]
pub fn sobel_x(v: &[i32; 9]) -> i16 {
    (-v[0] + v[2] - 2 * v[3] + 2 * v[5] - v[6] + v[8]) as i16
}

/// Vertical Sobel response, narrowed to `i16` by truncation.
#[inline]
pub fn sobel_y(v: &[i32; 9]) -> i16 {
    (-v[0] - 2 * v[1] - v[2] + v[6] + 2 * v[7] + v[8]) as i16
}

/// Collect the 3x3 neighborhood centered on `(x, y)`.
#[inline]
pub fn gather<S: Sampler>(sampler: &S, x: i32, y: i32) -> [i32; 9] {
    [
        sampler.sample(x - 1, y - 1),
        sampler.sample(x, y - 1),
        sampler.sample(x + 1, y - 1),
        sampler.sample(x - 1, y),
        sampler.sample(x, y),
        sampler.sample(x + 1, y),
        sampler.sample(x - 1, y + 1),
        sampler.sample(x, y + 1),
        sampler.sample(x + 1, y + 1),
    ]
}

/// Horizontal and vertical gradient images
///
/// Both channels are S16 and share the source's active size.
#[derive(Debug, Clone)]
pub struct GradientPair {
    /// Horizontal gradient
    pub x: Image,
    /// Vertical gradient
    pub y: Image,
}

impl GradientPair {
    /// Pair two gradient images.
    pub fn new(x: Image, y: Image) -> Self {
        Self { x, y }
    }

    /// Restrict both channels to the region holding defined values.
    ///
    /// Under [`BorderMode::Undefined`] the outer 1-pixel frame is dropped;
    /// this is applied to the current active region, so calling it twice
    /// drops two pixels per side. Other modes return the pair unchanged.
    pub fn valid_region(&self, border: BorderMode) -> FilterResult<GradientPair> {
        match border {
            BorderMode::Undefined => Ok(GradientPair {
                x: drop_frame(&self.x)?,
                y: drop_frame(&self.y)?,
            }),
            BorderMode::Replicate | BorderMode::Constant(_) => Ok(self.clone()),
        }
    }
}

/// Shrink the active region by one pixel per side; regions smaller than
/// 2x2 collapse to empty.
fn drop_frame(img: &Image) -> FilterResult<Image> {
    if img.width() >= 2 && img.height() >= 2 {
        Ok(img.adjust_roi(1, 1, 1, 1)?)
    } else {
        let roi = img.roi();
        Ok(img.with_roi(Rect::new(roi.x, roi.y, 0, 0))?)
    }
}

fn fill_pair<S: Sampler>(sampler: &S, x_img: &mut Image, y_img: &mut Image) -> FilterResult<()> {
    let mut gx = x_img.to_mut();
    gx.fill_s16(|x, y| sobel_x(&gather(sampler, x as i32, y as i32)))?;
    let mut gy = y_img.to_mut();
    gy.fill_s16(|x, y| sobel_y(&gather(sampler, x as i32, y as i32)))?;
    *x_img = gx.into();
    *y_img = gy.into();
    Ok(())
}

/// Compute the reference Sobel 3x3 gradients of a U8 image.
///
/// The result has the active size of `src`. Under
/// [`BorderMode::Undefined`] only `x` in `[1, w-2]`, `y` in `[1, h-2]` is
/// computed and the outer frame stays zero; images narrower or shorter
/// than 3 give an all-zero pair. The other modes compute every pixel.
///
/// # Errors
///
/// Returns [`FilterError::UnsupportedFormat`] if `src` is not U8.
pub fn sobel3x3_reference(src: &Image, border: BorderMode) -> FilterResult<GradientPair> {
    if src.format() != PixelFormat::U8 {
        return Err(FilterError::UnsupportedFormat {
            expected: PixelFormat::U8,
            actual: src.format(),
        });
    }

    let (w, h) = (src.width(), src.height());
    log::debug!("sobel3x3 reference: {w}x{h}, {border}");

    let mut gx = src.create_similar(PixelFormat::S16)?;
    let mut gy = src.create_similar(PixelFormat::S16)?;

    match border {
        BorderMode::Undefined => {
            if w >= 3 && h >= 3 {
                let interior = Rect::new(1, 1, w - 2, h - 2);
                let mut ix = gx.with_roi(interior)?;
                let mut iy = gy.with_roi(interior)?;
                // Sample coordinates are relative to the shrunk output, so
                // shift them back onto the source.
                let sampler = Offset {
                    inner: InBoundsSampler::new(src),
                    dx: 1,
                    dy: 1,
                };
                fill_pair(&sampler, &mut ix, &mut iy)?;
                gx = ix.full_roi();
                gy = iy.full_roi();
            }
        }
        BorderMode::Replicate => {
            fill_pair(&ReplicateSampler::new(src), &mut gx, &mut gy)?;
        }
        BorderMode::Constant(value) => {
            fill_pair(&ConstantSampler::new(src, value), &mut gx, &mut gy)?;
        }
    }

    Ok(GradientPair::new(gx, gy))
}

/// Like [`sobel3x3_reference`], taking the border in its raw encoding.
///
/// # Errors
///
/// Returns [`FilterError::UnsupportedBorder`] for an unknown mode tag,
/// before any pixel is computed.
pub fn sobel3x3_reference_raw(src: &Image, border: RawBorderMode) -> FilterResult<GradientPair> {
    let border = BorderMode::try_from(border)?;
    sobel3x3_reference(src, border)
}

/// Sampler translated by a fixed offset
struct Offset<S> {
    inner: S,
    dx: i32,
    dy: i32,
}

impl<S: Sampler> Sampler for Offset<S> {
    #[inline]
    fn sample(&self, x: i32, y: i32) -> i32 {
        self.inner.sample(x + self.dx, y + self.dy)
    }
}
