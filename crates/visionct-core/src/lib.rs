//! visionct Core - Basic data structures for the conformance suite
//!
//! This crate provides the fundamental data structures used throughout
//! the visionct workspace:
//!
//! - [`Image`] / [`ImageMut`] - Single-channel image with an active region
//!   of interest (immutable / mutable)
//! - [`PixelFormat`] - U8 and S16 sample formats
//! - [`Rect`] - Rectangle regions
//! - [`ImageDiff`] - Result of an exact image comparison

pub mod error;
pub mod image;
pub mod rect;

pub use error::{Error, Result};
pub use image::{Image, ImageDiff, ImageMut, PixelFormat, PixelMismatch};
pub use rect::Rect;
