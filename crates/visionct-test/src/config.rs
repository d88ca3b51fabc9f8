//! Run configuration read from the environment

use visionct_filter::DEFAULT_MAX_REPORTED;

/// Default PRNG seed for random inputs
pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

/// Conformance run mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CtMode {
    /// Compare candidate output with the reference (default)
    #[default]
    Compare,
    /// Run and dump without failing on image mismatches
    Display,
}

/// When to write diagnostic images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpPolicy {
    /// Never write diagnostics
    Never,
    /// Write diagnostics for failing cases (default)
    #[default]
    Failure,
    /// Write diagnostics for every case
    Always,
}

/// Conformance run configuration
///
/// Environment variables:
///
/// - `CT_SEED`: PRNG seed, decimal or `0x` hex
/// - `CT_MODE`: `compare` or `display`
/// - `CT_DUMP`: `never`, `failure` or `always`
/// - `CT_RUN_DISABLED`: `1` or `true` to run disabled cases
/// - `CT_MAX_REPORTED`: mismatch locations reported per channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtConfig {
    pub seed: u64,
    pub mode: CtMode,
    pub dump: DumpPolicy,
    pub run_disabled: bool,
    pub max_reported: usize,
}

impl Default for CtConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            mode: CtMode::Compare,
            dump: DumpPolicy::Failure,
            run_disabled: false,
            max_reported: DEFAULT_MAX_REPORTED,
        }
    }
}

impl CtConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from a variable lookup.
    ///
    /// Unset or unparsable values fall back to the defaults, with a warning
    /// for the unparsable ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("CT_SEED") {
            match parse_u64(&v) {
                Some(seed) => config.seed = seed,
                None => log::warn!("ignoring CT_SEED={v}"),
            }
        }
        if let Some(v) = lookup("CT_MODE") {
            config.mode = match v.to_lowercase().as_str() {
                "display" => CtMode::Display,
                "compare" => CtMode::Compare,
                _ => {
                    log::warn!("ignoring CT_MODE={v}");
                    CtMode::Compare
                }
            };
        }
        if let Some(v) = lookup("CT_DUMP") {
            config.dump = match v.to_lowercase().as_str() {
                "never" => DumpPolicy::Never,
                "failure" => DumpPolicy::Failure,
                "always" => DumpPolicy::Always,
                _ => {
                    log::warn!("ignoring CT_DUMP={v}");
                    DumpPolicy::Failure
                }
            };
        }
        if let Some(v) = lookup("CT_RUN_DISABLED") {
            config.run_disabled = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = lookup("CT_MAX_REPORTED") {
            match v.trim().parse() {
                Ok(n) => config.max_reported = n,
                Err(_) => log::warn!("ignoring CT_MAX_REPORTED={v}"),
            }
        }

        config
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == CtMode::Display
    }
}

fn parse_u64(s: &str) -> Option<u64> {
    let s = s.trim().replace('_', "");
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}
