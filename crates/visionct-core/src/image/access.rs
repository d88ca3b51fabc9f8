//! Pixel access functions
//!
//! Getters and setters for individual samples. Coordinates are relative to
//! the active region of interest.

use super::{Image, ImageMut, PixelBuffer, PixelFormat};
use crate::error::{Error, Result};

impl Image {
    /// Get an 8-bit sample at (x, y).
    ///
    /// Returns `None` if the coordinates are outside the active region or
    /// the image is not U8.
    pub fn get_u8(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        match &self.inner.data {
            PixelBuffer::U8(d) => Some(d[self.offset(x, y)]),
            PixelBuffer::S16(_) => None,
        }
    }

    /// Get a signed 16-bit sample at (x, y).
    ///
    /// Returns `None` if the coordinates are outside the active region or
    /// the image is not S16.
    pub fn get_s16(&self, x: u32, y: u32) -> Option<i16> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        match &self.inner.data {
            PixelBuffer::S16(d) => Some(d[self.offset(x, y)]),
            PixelBuffer::U8(_) => None,
        }
    }

    /// Get a sample of either format, widened to `i32`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<i32> {
        match self.format() {
            PixelFormat::U8 => self.get_u8(x, y).map(i32::from),
            PixelFormat::S16 => self.get_s16(x, y).map(i32::from),
        }
    }

    /// Get an 8-bit sample without the ROI bounds check.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the active region or the image is not
    /// U8.
    #[inline]
    pub fn get_u8_unchecked(&self, x: u32, y: u32) -> u8 {
        assert!(
            x < self.width() && y < self.height(),
            "pixel ({x}, {y}) outside {}x{} region",
            self.width(),
            self.height()
        );
        match &self.inner.data {
            PixelBuffer::U8(d) => d[self.offset(x, y)],
            PixelBuffer::S16(_) => panic!("get_u8_unchecked on S16 image"),
        }
    }
}

impl ImageMut {
    /// Get a sample of either format, widened to `i32`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<i32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = self.offset(x, y);
        Some(match &self.inner.data {
            PixelBuffer::U8(d) => i32::from(d[idx]),
            PixelBuffer::S16(d) => i32::from(d[idx]),
        })
    }

    /// Set an 8-bit sample at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside
    /// the active region, [`Error::FormatMismatch`] if the image is not U8.
    pub fn set_u8(&mut self, x: u32, y: u32, val: u8) -> Result<()> {
        self.check_bounds(x, y)?;
        let idx = self.offset(x, y);
        match &mut self.inner.data {
            PixelBuffer::U8(d) => {
                d[idx] = val;
                Ok(())
            }
            PixelBuffer::S16(_) => Err(Error::FormatMismatch {
                expected: PixelFormat::U8,
                actual: PixelFormat::S16,
            }),
        }
    }

    /// Set a signed 16-bit sample at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside
    /// the active region, [`Error::FormatMismatch`] if the image is not S16.
    pub fn set_s16(&mut self, x: u32, y: u32, val: i16) -> Result<()> {
        self.check_bounds(x, y)?;
        let idx = self.offset(x, y);
        match &mut self.inner.data {
            PixelBuffer::S16(d) => {
                d[idx] = val;
                Ok(())
            }
            PixelBuffer::U8(_) => Err(Error::FormatMismatch {
                expected: PixelFormat::S16,
                actual: PixelFormat::U8,
            }),
        }
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }
}
