//! visionct-test - Conformance test framework for visionct
//!
//! Drives an implementation of the Sobel 3x3 operator through the
//! parameterized conformance cases and compares its output with the
//! reference model, in two modes:
//!
//! - **Compare**: mismatches fail the case (default)
//! - **Display**: run and dump diagnostics without failing on mismatches
//!
//! # Usage
//!
//! ```ignore
//! use visionct_test::{CtParams, InvocationStyle, run_suite, sobel3x3_parameters};
//!
//! let mut rp = CtParams::new("sobel3x3");
//! let report = run_suite(&mut target, InvocationStyle::Graph, &sobel3x3_parameters(), &rp.config);
//! rp.check_suite(&report);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! See [`CtConfig`]: `CT_SEED`, `CT_MODE`, `CT_DUMP`, `CT_RUN_DISABLED`,
//! `CT_MAX_REPORTED`.

mod case;
mod config;
mod error;
mod params;
mod runner;
mod target;

pub use case::{
    CONSTANT_VALUES, ImageSource, REFERENCE_BITMAP, SMALL_SIZE_SET, Sobel3x3Case,
    sobel3x3_parameters,
};
pub use config::{CtConfig, CtMode, DEFAULT_SEED, DumpPolicy};
pub use error::{TestError, TestResult};
pub use params::CtParams;
pub use runner::{
    CaseOutcome, CaseReport, SuiteReport, check_node_creation, check_sobel3x3, run_case, run_suite,
};
pub use target::{InvocationStyle, Sobel3x3Target, run_target};

/// Load a test image from the test data directory
///
/// # Arguments
///
/// * `name` - Image filename (e.g., "gray_pattern.bmp")
pub fn load_test_image(name: &str) -> TestResult<visionct_core::Image> {
    let path = test_data_path(name);
    visionct_io::read_image(&path).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // visionct-test is at crates/visionct-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a test data file
pub fn test_data_path(name: &str) -> String {
    format!("{}/tests/data/images/{}", workspace_root(), name)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
