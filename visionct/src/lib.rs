//! visionct - Sobel 3x3 conformance suite
//!
//! Checks that an implementation of the 3x3 Sobel gradient operator of a
//! graph-based vision API produces output bit-identical to a software
//! reference, across border modes and invocation styles.
//!
//! # Overview
//!
//! - Single-channel U8/S16 images with an active region of interest
//! - Image I/O (BMP, PGM, PNG)
//! - Border-mode samplers, the Sobel kernel and the reference builder
//! - The conformance harness: cases, targets and reports
//!
//! # Example
//!
//! ```
//! use visionct::filter::{BorderMode, sobel3x3_reference, sobel3x3_verify};
//! use visionct::{Image, PixelFormat};
//!
//! let src = Image::random(16, 16, PixelFormat::U8, 1, 0, 256).unwrap();
//! let candidate = sobel3x3_reference(&src, BorderMode::Undefined).unwrap();
//! let verdict = sobel3x3_verify(&src, &candidate, BorderMode::Undefined).unwrap();
//! assert!(verdict.is_match());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use visionct_core::*;

// Re-export the other crates as modules to avoid name conflicts
pub use visionct_filter as filter;
pub use visionct_io as io;
pub use visionct_test as harness;
