//! Conformance test parameters and operations

use crate::config::CtConfig;
use crate::error::{TestError, TestResult};
use crate::regout_dir;
use crate::runner::{CaseOutcome, CaseReport, SuiteReport};
use std::fs;
use visionct_core::Image;
use visionct_io::ImageFormat;

/// Conformance test parameters
///
/// Tracks the state of one test: its name, the running check index, the
/// run configuration and the failures recorded so far.
pub struct CtParams {
    /// Name of the test (e.g., "sobel3x3")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Run configuration
    pub config: CtConfig,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl CtParams {
    /// Create test parameters configured from the environment.
    pub fn new(test_name: &str) -> Self {
        Self::with_config(test_name, CtConfig::from_env())
    }

    /// Create test parameters with an explicit configuration.
    pub fn with_config(test_name: &str, config: CtConfig) -> Self {
        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}, seed: {:#x}", config.mode, config.seed);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            config,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.config.display()
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two numeric values
    ///
    /// # Returns
    ///
    /// `true` if values match within `delta`, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare the active regions of two images for exact equality
    ///
    /// The first differing samples, up to `config.max_reported`, are
    /// included in the failure message.
    pub fn compare_images(&mut self, expected: &Image, actual: &Image) -> bool {
        self.index += 1;

        let diff = match expected.compare_exact(actual, self.config.max_reported) {
            Ok(diff) => diff,
            Err(e) => {
                self.fail(format!(
                    "Failure in {}_reg: image comparison for index {} - {}",
                    self.test_name, self.index, e
                ));
                return false;
            }
        };
        if diff.is_equal() {
            return true;
        }

        let mut msg = format!(
            "Failure in {}_reg: image comparison for index {} - {} of {}x{} samples differ",
            self.test_name, self.index, diff.n_diff, diff.width, diff.height
        );
        for m in &diff.mismatches {
            msg.push_str(&format!("\n    {m}"));
        }
        self.fail(msg);
        false
    }

    /// Record the outcome of a conformance case
    ///
    /// Failed and aborted cases count as failures; skipped cases do not.
    pub fn check_case(&mut self, report: &CaseReport) -> bool {
        self.index += 1;
        match &report.outcome {
            CaseOutcome::Passed | CaseOutcome::Skipped(_) => true,
            CaseOutcome::Failed(_) | CaseOutcome::Aborted(_) => {
                self.fail(format!(
                    "Failure in {}_reg: case for index {} - {}",
                    self.test_name, self.index, report
                ));
                false
            }
        }
    }

    /// Record every case of a suite
    ///
    /// # Returns
    ///
    /// `true` if no case failed.
    pub fn check_suite(&mut self, report: &SuiteReport) -> bool {
        let mut ok = true;
        for case in &report.cases {
            ok &= self.check_case(case);
        }
        eprintln!("{}", report);
        ok
    }

    /// Write an image to the output directory
    ///
    /// The file is named `<test_name>.<index>.<ext>`.
    ///
    /// # Returns
    ///
    /// The path written.
    pub fn write_image(&mut self, img: &Image, format: ImageFormat) -> TestResult<String> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            format.extension()
        );
        visionct_io::write_image(img, &local_path, format).map_err(|e| TestError::ImageWrite {
            path: local_path.clone(),
            message: e.to_string(),
        })?;
        Ok(local_path)
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvocationStyle;
    use visionct_core::PixelFormat;

    fn params() -> CtParams {
        CtParams::with_config("test", CtConfig::default())
    }

    #[test]
    fn test_compare_values_success() {
        let mut rp = params();
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = params();
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = params();
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.index(), 1);
    }

    #[test]
    fn test_compare_images() {
        let mut rp = params();
        let a = Image::from_s16(3, 1, vec![1, 2, 3]).unwrap();
        let b = Image::from_s16(3, 1, vec![1, 5, 3]).unwrap();
        assert!(rp.compare_images(&a, &a.clone()));
        assert!(!rp.compare_images(&a, &b));
        assert!(rp.failures()[0].contains("(1, 0): expected 2, actual 5"));

        let c = Image::new(3, 1, PixelFormat::U8).unwrap();
        assert!(!rp.compare_images(&a, &c));
        assert_eq!(rp.failures().len(), 2);
    }

    #[test]
    fn test_check_case() {
        let mut rp = params();
        let mut report = CaseReport {
            name: "random/18x18/BORDER_REPLICATE".to_string(),
            style: InvocationStyle::Graph,
            outcome: CaseOutcome::Skipped("disabled".to_string()),
        };
        assert!(rp.check_case(&report));
        assert!(rp.is_success());
        report.outcome = CaseOutcome::Aborted("no input".to_string());
        assert!(!rp.check_case(&report));
        assert!(!rp.cleanup());
    }
}
