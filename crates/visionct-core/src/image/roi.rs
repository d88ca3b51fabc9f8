//! Region-of-interest operations
//!
//! The active region restricts pixel access, fills and comparisons without
//! copying storage.

use super::Image;
use crate::Rect;
use crate::error::{Error, Result};

impl Image {
    /// Move the sides of the active region.
    ///
    /// Positive values shrink the region, negative values grow it back
    /// toward the allocated extent. Each call applies on top of the current
    /// ROI, so shrinking twice by one pixel removes two pixels per side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoi`] if the result would cross itself or
    /// leave the allocation.
    pub fn adjust_roi(&self, left: i32, top: i32, right: i32, bottom: i32) -> Result<Image> {
        let roi = self.roi.adjusted(left, top, right, bottom)?;
        self.with_roi(roi)
    }

    /// Replace the active region.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoi`] if `roi` is not inside the allocation.
    pub fn with_roi(&self, roi: Rect) -> Result<Image> {
        let full = Rect::new(0, 0, self.full_width(), self.full_height());
        if !full.contains_rect(&roi) {
            return Err(Error::InvalidRoi(format!(
                "{roi:?} outside allocated {}x{}",
                self.full_width(),
                self.full_height()
            )));
        }
        Ok(Image {
            inner: self.inner.clone(),
            roi,
        })
    }

    /// Reset the active region to the whole allocation.
    pub fn full_roi(&self) -> Image {
        Image {
            inner: self.inner.clone(),
            roi: Rect::new(0, 0, self.full_width(), self.full_height()),
        }
    }
}
