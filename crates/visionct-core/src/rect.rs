//! Rect - Rectangle regions
//!
//! Used as the active region of interest of an [`Image`](crate::Image).

use crate::error::{Error, Result};

/// A rectangle region in allocated-image coordinates
///
/// A simple `Copy` type since it's small and frequently copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: u32,
    /// Top y coordinate
    pub y: u32,
    /// Width
    pub w: u32,
    /// Height
    pub h: u32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle contains another one
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Move each side by the given amount.
    ///
    /// Positive values move a side inward, negative values outward.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoi`] if a side would cross the opposite one
    /// or move to a negative coordinate.
    pub fn adjusted(&self, left: i32, top: i32, right: i32, bottom: i32) -> Result<Rect> {
        let x = i64::from(self.x) + i64::from(left);
        let y = i64::from(self.y) + i64::from(top);
        let r = i64::from(self.right()) - i64::from(right);
        let b = i64::from(self.bottom()) - i64::from(bottom);
        if x < 0 || y < 0 || r < x || b < y {
            return Err(Error::InvalidRoi(format!(
                "adjusting {:?} by ({left}, {top}, {right}, {bottom}) leaves no valid region",
                self
            )));
        }
        Ok(Rect {
            x: x as u32,
            y: y as u32,
            w: (r - x) as u32,
            h: (b - y) as u32,
        })
    }
}
