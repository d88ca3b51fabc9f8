//! Image - The single-channel image container
//!
//! `Image` holds one channel of either unsigned 8-bit or signed 16-bit
//! samples, plus an active region of interest (ROI).
//!
//! # Coordinates
//!
//! All pixel accessors take coordinates relative to the active region:
//! `(0, 0)` is the top-left pixel of the ROI and `width()` / `height()`
//! report the ROI size. The allocated extent is available through
//! [`Image::full_width`] and [`Image::full_height`].
//!
//! # Ownership model
//!
//! `Image` uses `Arc` for cheap cloning (shared, immutable storage).
//! Adjusting the ROI produces a new `Image` sharing the same storage.
//! To modify pixel data, convert to [`ImageMut`] via [`Image::try_into_mut`]
//! or [`Image::to_mut`], then convert back with `Into<Image>`.

mod access;
pub mod compare;
mod dump;
mod random;
mod roi;

pub use compare::{ImageDiff, PixelMismatch};

use crate::Rect;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel format of a single-channel image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit unsigned
    U8,
    /// 16-bit signed
    S16,
}

impl PixelFormat {
    /// Size of one sample in bytes.
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::U8 => 1,
            PixelFormat::S16 => 2,
        }
    }

    /// Four-character code used by the API under test.
    pub fn fourcc(self) -> &'static str {
        match self {
            PixelFormat::U8 => "U008",
            PixelFormat::S16 => "S016",
        }
    }
}

/// Sample storage, one variant per format
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PixelBuffer {
    U8(Vec<u8>),
    S16(Vec<i16>),
}

impl PixelBuffer {
    fn zeroed(format: PixelFormat, len: usize) -> Self {
        match format {
            PixelFormat::U8 => PixelBuffer::U8(vec![0; len]),
            PixelFormat::S16 => PixelBuffer::S16(vec![0; len]),
        }
    }

    fn format(&self) -> PixelFormat {
        match self {
            PixelBuffer::U8(_) => PixelFormat::U8,
            PixelBuffer::S16(_) => PixelFormat::S16,
        }
    }
}

/// Internal image data
#[derive(Debug, Clone)]
pub(crate) struct ImageData {
    /// Allocated width in pixels (also the row stride)
    width: u32,
    /// Allocated height in pixels
    height: u32,
    /// Text string associated with the image (e.g. source file name)
    text: Option<String>,
    /// The samples, row-major
    data: PixelBuffer,
}

/// Image - single-channel image with an active region of interest
///
/// # Examples
///
/// ```
/// use visionct_core::{Image, PixelFormat};
///
/// let img = Image::new(128, 96, PixelFormat::U8).unwrap();
/// assert_eq!(img.width(), 128);
/// assert_eq!(img.height(), 96);
///
/// let inner = img.adjust_roi(1, 1, 1, 1).unwrap();
/// assert_eq!(inner.width(), 126);
/// assert_eq!(inner.full_width(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<ImageData>,
    roi: Rect,
}

impl Image {
    /// Create a new image with the specified dimensions and format.
    ///
    /// The image data is initialized to zero and the ROI covers the whole
    /// allocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = (width as usize) * (height as usize);
        let inner = ImageData {
            width,
            height,
            text: None,
            data: PixelBuffer::zeroed(format, len),
        };
        Ok(Image {
            inner: Arc::new(inner),
            roi: Rect::new(0, 0, width, height),
        })
    }

    /// Create an image from row-major 8-bit samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `data.len() != width * height`.
    pub fn from_u8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::check_len(width, height, data.len())?;
        Ok(Self::from_buffer(width, height, PixelBuffer::U8(data)))
    }

    /// Create an image from row-major signed 16-bit samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `data.len() != width * height`.
    pub fn from_s16(width: u32, height: u32, data: Vec<i16>) -> Result<Self> {
        Self::check_len(width, height, data.len())?;
        Ok(Self::from_buffer(width, height, PixelBuffer::S16(data)))
    }

    fn check_len(width: u32, height: u32, len: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if len != expected {
            return Err(Error::InvalidParameter(format!(
                "{width}x{height} image needs {expected} samples, got {len}"
            )));
        }
        Ok(())
    }

    fn from_buffer(width: u32, height: u32, data: PixelBuffer) -> Self {
        Image {
            inner: Arc::new(ImageData {
                width,
                height,
                text: None,
                data,
            }),
            roi: Rect::new(0, 0, width, height),
        }
    }

    /// Width of the active region.
    #[inline]
    pub fn width(&self) -> u32 {
        self.roi.w
    }

    /// Height of the active region.
    #[inline]
    pub fn height(&self) -> u32 {
        self.roi.h
    }

    /// Allocated width.
    #[inline]
    pub fn full_width(&self) -> u32 {
        self.inner.width
    }

    /// Allocated height.
    #[inline]
    pub fn full_height(&self) -> u32 {
        self.inner.height
    }

    /// Active region in allocated-image coordinates.
    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.data.format()
    }

    /// Associated text.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.inner.text.as_deref()
    }

    /// Number of strong references to the storage.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Create a zeroed image with the active size of this one and the
    /// given format.
    ///
    /// The new image's ROI covers its whole allocation.
    pub fn create_similar(&self, format: PixelFormat) -> Result<Image> {
        Image::new(self.width(), self.height(), format)
    }

    /// Create a deep copy of the active region.
    ///
    /// Unlike `clone()`, which shares storage, the result owns a fresh
    /// allocation exactly the size of the ROI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the active region is empty.
    pub fn crop_to_roi(&self) -> Result<Image> {
        let (w, h) = (self.width(), self.height());
        let mut img = match self.format() {
            PixelFormat::U8 => Image::from_u8(w, h, self.rows_u8().flatten().copied().collect())?,
            PixelFormat::S16 => {
                Image::from_s16(w, h, self.rows_s16().flatten().copied().collect())?
            }
        };
        if let Some(text) = self.text() {
            Arc::make_mut(&mut img.inner).text = Some(text.to_string());
        }
        Ok(img)
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the storage.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        let roi = self.roi;
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(ImageMut { inner, roi }),
            Err(arc) => Err(Image { inner: arc, roi }),
        }
    }

    /// Create a mutable copy of this image.
    ///
    /// Always copies the storage; the ROI is preserved.
    pub fn to_mut(&self) -> ImageMut {
        ImageMut {
            inner: (*self.inner).clone(),
            roi: self.roi,
        }
    }

    /// Index into the flat buffer for ROI-relative `(x, y)`.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (self.roi.y + y) as usize * self.inner.width as usize + (self.roi.x + x) as usize
    }

    /// Iterate over the rows of the active region of an 8-bit image.
    ///
    /// Yields nothing for S16 images.
    pub fn rows_u8(&self) -> impl Iterator<Item = &[u8]> {
        let stride = self.inner.width as usize;
        let (x0, w) = (self.roi.x as usize, self.roi.w as usize);
        let data: &[u8] = match &self.inner.data {
            PixelBuffer::U8(d) => d.as_slice(),
            PixelBuffer::S16(_) => &[],
        };
        let rows = if data.is_empty() { 0 } else { self.roi.h };
        (self.roi.y..self.roi.y + rows).map(move |y| {
            let start = y as usize * stride + x0;
            &data[start..start + w]
        })
    }

    /// Iterate over the rows of the active region of a 16-bit image.
    ///
    /// Yields nothing for U8 images.
    pub fn rows_s16(&self) -> impl Iterator<Item = &[i16]> {
        let stride = self.inner.width as usize;
        let (x0, w) = (self.roi.x as usize, self.roi.w as usize);
        let data: &[i16] = match &self.inner.data {
            PixelBuffer::S16(d) => d.as_slice(),
            PixelBuffer::U8(_) => &[],
        };
        let rows = if data.is_empty() { 0 } else { self.roi.h };
        (self.roi.y..self.roi.y + rows).map(move |y| {
            let start = y as usize * stride + x0;
            &data[start..start + w]
        })
    }
}

/// Mutable image
///
/// Allows modification of sample data. Convert back to an immutable
/// [`Image`] using `Into<Image>`.
#[derive(Debug)]
pub struct ImageMut {
    inner: ImageData,
    roi: Rect,
}

impl ImageMut {
    /// Width of the active region.
    #[inline]
    pub fn width(&self) -> u32 {
        self.roi.w
    }

    /// Height of the active region.
    #[inline]
    pub fn height(&self) -> u32 {
        self.roi.h
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.data.format()
    }

    /// Active region in allocated-image coordinates.
    #[inline]
    pub fn roi(&self) -> Rect {
        self.roi
    }

    /// Set the text.
    pub fn set_text(&mut self, text: Option<String>) {
        self.inner.text = text;
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (self.roi.y + y) as usize * self.inner.width as usize + (self.roi.x + x) as usize
    }

    /// Fill every pixel of the active region of an S16 image.
    ///
    /// `f` receives ROI-relative `(x, y)` and returns the new sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatMismatch`] if the image is not S16.
    pub fn fill_s16<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(u32, u32) -> i16,
    {
        let roi = self.roi;
        let stride = self.inner.width as usize;
        let PixelBuffer::S16(data) = &mut self.inner.data else {
            return Err(Error::FormatMismatch {
                expected: PixelFormat::S16,
                actual: PixelFormat::U8,
            });
        };
        for y in 0..roi.h {
            let start = (roi.y + y) as usize * stride + roi.x as usize;
            for (x, v) in data[start..start + roi.w as usize].iter_mut().enumerate() {
                *v = f(x as u32, y);
            }
        }
        Ok(())
    }

    /// Fill every pixel of the active region of a U8 image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatMismatch`] if the image is not U8.
    pub fn fill_u8<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(u32, u32) -> u8,
    {
        let roi = self.roi;
        let stride = self.inner.width as usize;
        let PixelBuffer::U8(data) = &mut self.inner.data else {
            return Err(Error::FormatMismatch {
                expected: PixelFormat::U8,
                actual: PixelFormat::S16,
            });
        };
        for y in 0..roi.h {
            let start = (roi.y + y) as usize * stride + roi.x as usize;
            for (x, v) in data[start..start + roi.w as usize].iter_mut().enumerate() {
                *v = f(x as u32, y);
            }
        }
        Ok(())
    }
}

impl From<ImageMut> for Image {
    fn from(img: ImageMut) -> Self {
        Image {
            inner: Arc::new(img.inner),
            roi: img.roi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert!(Image::new(0, 4, PixelFormat::U8).is_err());
        assert!(Image::new(4, 0, PixelFormat::S16).is_err());
    }

    #[test]
    fn test_from_u8_length_check() {
        assert!(Image::from_u8(3, 2, vec![0; 6]).is_ok());
        assert!(Image::from_u8(3, 2, vec![0; 5]).is_err());
    }

    #[test]
    fn test_try_into_mut_shared() {
        let img = Image::new(4, 4, PixelFormat::U8).unwrap();
        let shared = img.clone();
        assert_eq!(img.ref_count(), 2);
        let img = img.try_into_mut().unwrap_err();
        drop(shared);
        assert!(img.try_into_mut().is_ok());
    }

    #[test]
    fn test_fill_s16_respects_roi() {
        let img = Image::new(4, 3, PixelFormat::S16).unwrap();
        let inner = img.adjust_roi(1, 1, 1, 1).unwrap();
        drop(img);
        let mut m = inner.try_into_mut().unwrap();
        m.fill_s16(|_, _| 7).unwrap();
        let filled: Image = m.into();
        let full = filled.adjust_roi(-1, -1, -1, -1).unwrap();
        let rows: Vec<Vec<i16>> = full.rows_s16().map(|r| r.to_vec()).collect();
        assert_eq!(
            rows,
            vec![vec![0, 0, 0, 0], vec![0, 7, 7, 0], vec![0, 0, 0, 0]]
        );
    }

    #[test]
    fn test_fill_wrong_format() {
        let mut m = Image::new(2, 2, PixelFormat::U8).unwrap().to_mut();
        assert!(m.fill_s16(|_, _| 1).is_err());
    }

    #[test]
    fn test_crop_to_roi() {
        let img = Image::from_u8(3, 3, (0..9).collect()).unwrap();
        let c = img.adjust_roi(1, 1, 0, 0).unwrap().crop_to_roi().unwrap();
        assert_eq!(c.full_width(), 2);
        let values: Vec<u8> = c.rows_u8().flatten().copied().collect();
        assert_eq!(values, vec![4, 5, 7, 8]);
    }
}
