//! visionct-filter - Sobel 3x3 reference model
//!
//! This crate provides the software reference the conformance suite
//! checks candidates against:
//!
//! - Border modes and per-mode pixel samplers
//! - The Sobel 3x3 gradient kernel
//! - A reference builder producing S16 gradient pairs
//! - A verifier that aligns the valid region and compares exactly

pub mod border;
mod error;
pub mod sobel;
pub mod verify;

pub use error::{FilterError, FilterResult};

pub use border::{
    BORDER_MODE_CONSTANT, BORDER_MODE_REPLICATE, BORDER_MODE_UNDEFINED, BorderMode,
    ConstantSampler, InBoundsSampler, RawBorderMode, ReplicateSampler, Sampler, sample,
};
pub use sobel::{
    GradientPair, gather, sobel_x, sobel_y, sobel3x3_reference, sobel3x3_reference_raw,
};
pub use verify::{DEFAULT_MAX_REPORTED, SobelVerdict, sobel3x3_verify, sobel3x3_verify_with};
