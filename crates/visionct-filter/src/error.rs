//! Error types for visionct-filter

use thiserror::Error;
use visionct_core::PixelFormat;

/// Errors that can occur in the reference model and the verifier
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] visionct_core::Error),

    /// Pixel format not accepted by this operation
    #[error("unsupported format: expected {expected:?}, got {actual:?}")]
    UnsupportedFormat {
        /// Required format
        expected: PixelFormat,
        /// Format supplied
        actual: PixelFormat,
    },

    /// Border mode tag the reference model does not implement
    #[error("unsupported border mode {mode:#06x}: not implemented")]
    UnsupportedBorder {
        /// Raw mode tag
        mode: u32,
    },

    /// Candidate output does not have the reference's shape
    #[error("{channel} output is {actual_w}x{actual_h}, reference is {expected_w}x{expected_h}")]
    ShapeMismatch {
        /// Gradient channel name ("x" or "y")
        channel: &'static str,
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
