//! Case execution and reporting

use crate::case::Sobel3x3Case;
use crate::config::{CtConfig, DumpPolicy};
use crate::error::{TestError, TestResult};
use crate::regout_dir;
use crate::target::{InvocationStyle, Sobel3x3Target, run_target};
use std::fmt;
use std::fs;
use std::io::Write;
use visionct_core::Image;
use visionct_filter::{BorderMode, FilterError, GradientPair, SobelVerdict, sobel3x3_verify_with};
use visionct_io::ImageFormat;

/// Images up to this many pixels get their values in the text dump
const MAX_DUMPED_VALUES: u32 = 32 * 32;

/// Result of one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// Output matched the reference
    Passed,
    /// The implementation produced wrong output or reported an error
    Failed(String),
    /// Inputs or configuration could not be set up; nothing was compared
    Aborted(String),
    /// Not run
    Skipped(String),
}

impl CaseOutcome {
    /// Whether this outcome fails the suite.
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseOutcome::Failed(_) | CaseOutcome::Aborted(_))
    }

    fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "PASSED",
            CaseOutcome::Failed(_) => "FAILED",
            CaseOutcome::Aborted(_) => "ABORTED",
            CaseOutcome::Skipped(_) => "SKIPPED",
        }
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseOutcome::Passed => write!(f, "{}", self.label()),
            CaseOutcome::Failed(msg) | CaseOutcome::Aborted(msg) | CaseOutcome::Skipped(msg) => {
                write!(f, "{}: {msg}", self.label())
            }
        }
    }
}

/// Outcome of one case in one invocation style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub name: String,
    pub style: InvocationStyle,
    pub outcome: CaseOutcome,
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.style, self.name, self.outcome)
    }
}

/// Outcomes of a set of cases
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn push(&mut self, report: CaseReport) {
        self.cases.push(report);
    }

    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.outcome)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    pub fn aborted(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Aborted(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Skipped(_)))
    }

    /// True if no case failed or aborted.
    pub fn is_success(&self) -> bool {
        self.cases.iter().all(|c| !c.outcome.is_failure())
    }

    /// Look up a case by name and style.
    pub fn get(&self, name: &str, style: InvocationStyle) -> Option<&CaseReport> {
        self.cases
            .iter()
            .find(|c| c.name == name && c.style == style)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cases: {} passed, {} failed, {} aborted, {} skipped",
            self.cases.len(),
            self.passed(),
            self.failed(),
            self.aborted(),
            self.skipped()
        )
    }
}

/// Check that `target` can create a node for `width` x `height` inputs.
pub fn check_node_creation<T>(target: &mut T, width: u32, height: u32) -> CaseOutcome
where
    T: Sobel3x3Target + ?Sized,
{
    match target.check_node_creation(width, height) {
        Ok(()) => CaseOutcome::Passed,
        Err(e) => CaseOutcome::Failed(e.to_string()),
    }
}

/// Compare a candidate against the reference, writing diagnostics as
/// `config.dump` asks.
///
/// Diagnostics that cannot be written are logged and do not change the
/// verdict.
pub fn check_sobel3x3(
    name: &str,
    src: &Image,
    candidate: &GradientPair,
    border: BorderMode,
    config: &CtConfig,
) -> TestResult<SobelVerdict> {
    let verdict = sobel3x3_verify_with(src, candidate, border, config.max_reported)?;
    let dump = match config.dump {
        DumpPolicy::Never => false,
        DumpPolicy::Failure => !verdict.is_match(),
        DumpPolicy::Always => true,
    };
    if dump {
        match dump_case(name, src, candidate, &verdict) {
            Ok(stem) => log::debug!("wrote diagnostics to {stem}.*"),
            Err(e) => log::warn!("could not write diagnostics for {name}: {e}"),
        }
    }
    Ok(verdict)
}

/// Run one case in one style.
pub fn run_case<T>(
    target: &mut T,
    style: InvocationStyle,
    case: &Sobel3x3Case,
    config: &CtConfig,
) -> CaseReport
where
    T: Sobel3x3Target + ?Sized,
{
    let outcome = run_case_outcome(target, style, case, config);
    log::debug!("[{style}] {}: {outcome}", case.name);
    CaseReport {
        name: case.name.clone(),
        style,
        outcome,
    }
}

fn run_case_outcome<T>(
    target: &mut T,
    style: InvocationStyle,
    case: &Sobel3x3Case,
    config: &CtConfig,
) -> CaseOutcome
where
    T: Sobel3x3Target + ?Sized,
{
    if !case.enabled(config) {
        log::warn!("skipping disabled case {}", case.name);
        return CaseOutcome::Skipped("disabled".to_string());
    }

    let src = match case.source.load(config.seed) {
        Ok(img) => img,
        Err(e) => return CaseOutcome::Aborted(e.to_string()),
    };

    let candidate = match run_target(target, style, &src, case.border) {
        Ok(pair) => pair,
        Err(e) => return classify(e),
    };

    match check_sobel3x3(&case.name, &src, &candidate, case.border, config) {
        Ok(verdict) if verdict.is_match() => CaseOutcome::Passed,
        Ok(verdict) if config.display() => {
            log::warn!("{}: mismatch ignored in display mode", case.name);
            eprintln!("{verdict}");
            CaseOutcome::Passed
        }
        Ok(verdict) => CaseOutcome::Failed(verdict.to_string()),
        Err(e) => classify(e),
    }
}

/// Configuration errors abort the case; everything else is a failure of
/// the implementation under test.
fn classify(e: TestError) -> CaseOutcome {
    match e {
        TestError::Filter(FilterError::UnsupportedBorder { .. }) | TestError::Setup(_) => {
            CaseOutcome::Aborted(e.to_string())
        }
        e => CaseOutcome::Failed(e.to_string()),
    }
}

/// Run every case in `cases` in one style.
pub fn run_suite<T>(
    target: &mut T,
    style: InvocationStyle,
    cases: &[Sobel3x3Case],
    config: &CtConfig,
) -> SuiteReport
where
    T: Sobel3x3Target + ?Sized,
{
    let mut report = SuiteReport::default();
    for case in cases {
        report.push(run_case(target, style, case, config));
    }
    report
}

/// File stem for a case name: path separators and `=` become `_`
fn dump_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '=' | ' ' => '_',
            c => c,
        })
        .collect()
}

fn write_png(img: &Image, path: String) -> TestResult<()> {
    visionct_io::write_image(img, &path, ImageFormat::Png).map_err(|e| TestError::ImageWrite {
        path,
        message: e.to_string(),
    })
}

/// Write source, candidate and reference images plus a text summary.
///
/// Returns the path stem the files share.
fn dump_case(
    name: &str,
    src: &Image,
    candidate: &GradientPair,
    verdict: &SobelVerdict,
) -> TestResult<String> {
    let dir = regout_dir();
    fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    let stem = format!("{dir}/{}", dump_stem(name));

    write_png(src, format!("{stem}.src.png"))?;
    write_png(&candidate.x, format!("{stem}.dst_x.png"))?;
    write_png(&candidate.y, format!("{stem}.dst_y.png"))?;
    write_png(&verdict.reference.x, format!("{stem}.ref_x.png"))?;
    write_png(&verdict.reference.y, format!("{stem}.ref_y.png"))?;

    let mut text = Vec::new();
    writeln!(text, "{verdict}")?;
    let images = [
        ("SRC", src),
        ("DST_X", &candidate.x),
        ("DST_Y", &candidate.y),
        ("EXPECTED_X", &verdict.reference.x),
        ("EXPECTED_Y", &verdict.reference.y),
    ];
    for (label, img) in images {
        if img.width() * img.height() <= MAX_DUMPED_VALUES {
            img.dump_values(&mut text, Some(label))?;
        } else {
            img.print_info(&mut text, Some(label))?;
        }
    }
    fs::write(format!("{stem}.txt"), text)?;

    Ok(stem)
}
