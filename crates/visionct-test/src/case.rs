//! Test case parameterization
//!
//! A case pairs an input image source with a border mode. The Sobel 3x3
//! operator is required to conform under [`BorderMode::Undefined`]; the
//! other modes are enumerated as disabled cases and only run on request.

use crate::config::CtConfig;
use crate::error::{TestError, TestResult};
use crate::load_test_image;
use std::fmt;
use visionct_core::{Image, PixelFormat};
use visionct_filter::BorderMode;

/// Sizes used for randomized inputs
pub const SMALL_SIZE_SET: [(u32, u32); 3] = [(18, 18), (644, 258), (1600, 1200)];

/// Fixed bitmap used as a natural-image input
pub const REFERENCE_BITMAP: &str = "gray_pattern.bmp";

/// Constant fill values enumerated for disabled cases
pub const CONSTANT_VALUES: [u32; 4] = [0, 1, 127, 255];

/// Where a case's input image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Uniform 8-bit noise of the given size
    Random { width: u32, height: u32 },
    /// A bitmap from the test data directory
    File { name: String },
}

impl ImageSource {
    /// Produce the input image.
    ///
    /// Random images are generated from `seed` mixed with the size, so each
    /// size gets its own reproducible stream.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::ImageLoad`] if a file cannot be read, and
    /// [`TestError::Setup`] for a zero size or a file that is not 8-bit.
    pub fn load(&self, seed: u64) -> TestResult<Image> {
        match self {
            ImageSource::Random { width, height } => {
                let seed = seed ^ ((u64::from(*width) << 32) | u64::from(*height));
                Image::random(*width, *height, PixelFormat::U8, seed, 0, 256)
                    .map_err(|e| TestError::Setup(e.to_string()))
            }
            ImageSource::File { name } => {
                let img = load_test_image(name)?;
                if img.format() != PixelFormat::U8 {
                    return Err(TestError::Setup(format!(
                        "{name}: expected {}, loaded {}",
                        PixelFormat::U8.fourcc(),
                        img.format().fourcc()
                    )));
                }
                Ok(img)
            }
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Random { width, height } => write!(f, "random/{width}x{height}"),
            ImageSource::File { name } => write!(f, "{name}/0x0"),
        }
    }
}

/// One Sobel 3x3 conformance case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sobel3x3Case {
    /// Stable name, `"<source>/<size>/<border>"`
    pub name: String,
    pub source: ImageSource,
    pub border: BorderMode,
    /// Not required for conformance; runs only when enabled
    pub disabled: bool,
}

impl Sobel3x3Case {
    pub fn new(source: ImageSource, border: BorderMode, disabled: bool) -> Self {
        Self {
            name: format!("{source}/{border}"),
            source,
            border,
            disabled,
        }
    }

    /// Whether this case runs under `config`.
    pub fn enabled(&self, config: &CtConfig) -> bool {
        !self.disabled || config.run_disabled
    }
}

/// Border modes paired with whether they are disabled
fn border_modes() -> Vec<(BorderMode, bool)> {
    let mut modes = vec![
        (BorderMode::Undefined, false),
        (BorderMode::Replicate, true),
    ];
    for v in CONSTANT_VALUES {
        modes.push((BorderMode::Constant(v), true));
    }
    modes
}

/// Enumerate the Sobel 3x3 cases.
///
/// Random inputs over [`SMALL_SIZE_SET`] followed by
/// [`REFERENCE_BITMAP`], each crossed with every border mode.
pub fn sobel3x3_parameters() -> Vec<Sobel3x3Case> {
    let sources = SMALL_SIZE_SET
        .iter()
        .map(|&(width, height)| ImageSource::Random { width, height })
        .chain(std::iter::once(ImageSource::File {
            name: REFERENCE_BITMAP.to_string(),
        }));

    let mut cases = Vec::new();
    for source in sources {
        for (border, disabled) in border_modes() {
            cases.push(Sobel3x3Case::new(source.clone(), border, disabled));
        }
    }
    cases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names() {
        let cases = sobel3x3_parameters();
        assert_eq!(cases.len(), 4 * 6);
        assert_eq!(cases[0].name, "random/18x18/BORDER_UNDEFINED");
        assert!(
            cases
                .iter()
                .any(|c| c.name == "gray_pattern.bmp/0x0/BORDER_CONSTANT=127")
        );
        let mut names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), cases.len());
    }

    #[test]
    fn test_only_undefined_required() {
        for case in sobel3x3_parameters() {
            assert_eq!(case.disabled, case.border != BorderMode::Undefined);
        }
    }

    #[test]
    fn test_enabled() {
        let case = Sobel3x3Case::new(
            ImageSource::Random {
                width: 4,
                height: 4,
            },
            BorderMode::Replicate,
            true,
        );
        let mut config = CtConfig::default();
        assert!(!case.enabled(&config));
        config.run_disabled = true;
        assert!(case.enabled(&config));
    }

    #[test]
    fn test_random_source_reproducible() {
        let src = ImageSource::Random {
            width: 18,
            height: 18,
        };
        let a = src.load(1).unwrap();
        let b = src.load(1).unwrap();
        assert!(a.equals(&b));
        assert_eq!(a.format(), PixelFormat::U8);
    }

    #[test]
    fn test_zero_size_is_setup_error() {
        let src = ImageSource::Random {
            width: 0,
            height: 18,
        };
        assert!(matches!(src.load(1), Err(TestError::Setup(_))));
    }

    #[test]
    fn test_missing_file() {
        let src = ImageSource::File {
            name: "no_such_image.bmp".to_string(),
        };
        assert!(matches!(src.load(1), Err(TestError::ImageLoad { .. })));
    }
}
