//! Error types for the conformance framework

use thiserror::Error;
use visionct_filter::FilterError;

/// Errors that can occur while running conformance cases
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to load a test image
    #[error("failed to load image '{path}': {message}")]
    ImageLoad { path: String, message: String },

    /// Failed to write an image
    #[error("failed to write image '{path}': {message}")]
    ImageWrite { path: String, message: String },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {message}")]
    DirectoryCreate { path: String, message: String },

    /// The implementation under test reported an error
    #[error("target error: {0}")]
    Target(String),

    /// Case inputs could not be prepared
    #[error("setup error: {0}")]
    Setup(String),

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] visionct_core::Error),

    /// Reference model or verifier error
    #[error("reference error: {0}")]
    Filter(#[from] FilterError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
