//! Sobel 3x3 conformance regression test
//!
//! Drives in-process software implementations through the conformance
//! harness in both invocation styles.
//!
//! - Part 1: node creation for 128x128 inputs
//! - Part 2: graph and immediate output agree with each other and the
//!   reference on a 128x128 random image
//! - Part 3: every parameterized case, disabled ones included, passes for
//!   a separable implementation
//! - Part 4: a wrong implementation fails with mismatch locations, unless
//!   in display mode
//! - Part 5: setup and configuration errors abort instead of failing

use visionct_core::{Image, PixelFormat, Rect};
use visionct_filter::{
    BORDER_MODE_UNDEFINED, BorderMode, GradientPair, RawBorderMode, sobel3x3_reference,
};
use visionct_test::{
    CaseOutcome, CtConfig, CtMode, CtParams, DumpPolicy, ImageSource, InvocationStyle,
    REFERENCE_BITMAP, Sobel3x3Case, Sobel3x3Target, TestError, TestResult, check_node_creation,
    run_case, run_suite, run_target, sobel3x3_parameters,
};

/// Value written to output pixels that the border mode leaves undefined
const GARBAGE: i16 = 0x7777;

/// Separable Sobel: [1 2 1] smoothing across a [-1 0 1] difference
#[derive(Default)]
struct SeparableSobel {
    immediate_border: RawBorderMode,
    /// Add this to one interior x sample of every output
    corrupt: Option<i16>,
}

struct Node {
    src: Image,
    border: RawBorderMode,
}

impl SeparableSobel {
    fn corrupting(delta: i16) -> Self {
        Self {
            corrupt: Some(delta),
            ..Self::default()
        }
    }

    fn run(&self, src: &Image, border: RawBorderMode) -> TestResult<GradientPair> {
        let border = BorderMode::try_from(border)?;
        let (w, h) = (src.width() as usize, src.height() as usize);
        let pw = w + 2;

        // Padded copy, frame filled per border mode
        let mut padded = vec![0i32; pw * (h + 2)];
        for py in 0..h + 2 {
            for px in 0..pw {
                let (sx, sy) = (px as i64 - 1, py as i64 - 1);
                let inside = sx >= 0 && sy >= 0 && (sx as usize) < w && (sy as usize) < h;
                padded[py * pw + px] = match border {
                    _ if inside => i32::from(src.get_u8(sx as u32, sy as u32).unwrap()),
                    BorderMode::Undefined => 0,
                    BorderMode::Replicate => {
                        let cx = sx.clamp(0, w as i64 - 1) as u32;
                        let cy = sy.clamp(0, h as i64 - 1) as u32;
                        i32::from(src.get_u8(cx, cy).unwrap())
                    }
                    BorderMode::Constant(v) => i32::from(v as u8),
                };
            }
        }
        let p = |x: usize, y: usize| padded[y * pw + x];

        let mut gx = vec![0i16; w * h];
        let mut gy = vec![0i16; w * h];
        for y in 0..h {
            for x in 0..w {
                let (cx, cy) = (x + 1, y + 1);
                let mut sx = 0;
                let mut sy = 0;
                for (d, wt) in [(0usize, 1), (1, 2), (2, 1)] {
                    sx += wt * (p(cx + 1, cy + d - 1) - p(cx - 1, cy + d - 1));
                    sy += wt * (p(cx + d - 1, cy + 1) - p(cx + d - 1, cy - 1));
                }
                let on_frame = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                let i = y * w + x;
                if border == BorderMode::Undefined && on_frame {
                    gx[i] = GARBAGE;
                    gy[i] = -GARBAGE;
                } else {
                    gx[i] = sx as i16;
                    gy[i] = sy as i16;
                }
            }
        }
        if let Some(delta) = self.corrupt {
            let i = (h / 2) * w + w / 2;
            gx[i] = gx[i].wrapping_add(delta);
        }

        let gx = Image::from_s16(w as u32, h as u32, gx)?;
        let gy = Image::from_s16(w as u32, h as u32, gy)?;
        Ok(GradientPair::new(gx, gy))
    }
}

impl Sobel3x3Target for SeparableSobel {
    type Node = Node;

    fn check_node_creation(&mut self, width: u32, height: u32) -> TestResult<()> {
        if width == 0 || height == 0 {
            return Err(TestError::Target(format!(
                "cannot create node for {width}x{height}"
            )));
        }
        Ok(())
    }

    fn create_graph_node(&mut self, src: &Image) -> TestResult<Node> {
        if src.format() != PixelFormat::U8 {
            return Err(TestError::Target("input must be U008".to_string()));
        }
        Ok(Node {
            src: src.clone(),
            border: RawBorderMode {
                mode: BORDER_MODE_UNDEFINED,
                constant_value: 0,
            },
        })
    }

    fn set_node_border(&mut self, node: &mut Node, border: RawBorderMode) -> TestResult<()> {
        node.border = border;
        Ok(())
    }

    fn verify_and_process(&mut self, node: Node) -> TestResult<GradientPair> {
        self.run(&node.src, node.border)
    }

    fn set_immediate_border(&mut self, border: RawBorderMode) -> TestResult<()> {
        self.immediate_border = border;
        Ok(())
    }

    fn process_immediate(&mut self, src: &Image) -> TestResult<GradientPair> {
        self.run(src, self.immediate_border)
    }
}

fn outcome_is(rp: &mut CtParams, expected: &str, outcome: &CaseOutcome) {
    let label = match outcome {
        CaseOutcome::Passed => "passed",
        CaseOutcome::Failed(_) => "failed",
        CaseOutcome::Aborted(_) => "aborted",
        CaseOutcome::Skipped(_) => "skipped",
    };
    eprintln!("    {}", outcome);
    rp.compare_values(1.0, if label == expected { 1.0 } else { 0.0 }, 0.0);
}

#[test]
fn sobel3x3_conformance_reg() {
    let mut rp = CtParams::new("sobel3x3_conformance");
    let config = rp.config.clone();

    // Part 1
    eprintln!("\n=== Part 1: node creation ===");
    let mut target = SeparableSobel::default();
    let created = check_node_creation(&mut target, 128, 128);
    outcome_is(&mut rp, "passed", &created);

    // Part 2
    eprintln!("\n=== Part 2: graph vs immediate, 128x128 ===");
    let src = ImageSource::Random {
        width: 128,
        height: 128,
    }
    .load(config.seed)
    .unwrap();
    let border = BorderMode::Undefined;
    let graph = run_target(&mut target, InvocationStyle::Graph, &src, border).unwrap();
    let immediate = run_target(&mut target, InvocationStyle::Immediate, &src, border).unwrap();
    let reference = sobel3x3_reference(&src, border).unwrap();

    let graph = graph.valid_region(border).unwrap();
    let immediate = immediate.valid_region(border).unwrap();
    let reference = reference.valid_region(border).unwrap();
    let interior = graph.x.roi() == Rect::new(1, 1, 126, 126);
    rp.compare_values(1.0, if interior { 1.0 } else { 0.0 }, 0.0);
    rp.compare_images(&graph.x, &immediate.x);
    rp.compare_images(&graph.y, &immediate.y);
    rp.compare_images(&reference.x, &graph.x);
    rp.compare_images(&reference.y, &graph.y);

    // Part 3
    eprintln!("\n=== Part 3: all cases ===");
    let all = CtConfig {
        run_disabled: true,
        ..config.clone()
    };
    let cases = sobel3x3_parameters();
    for style in InvocationStyle::ALL {
        let report = run_suite(&mut target, style, &cases, &all);
        rp.check_suite(&report);
        rp.compare_values(cases.len() as f64, report.passed() as f64, 0.0);
    }
    let required = run_suite(&mut target, InvocationStyle::Graph, &cases, &config);
    rp.compare_values(
        if config.run_disabled { 0.0 } else { 20.0 },
        required.skipped() as f64,
        0.0,
    );
    let bitmap_case = format!("{}/0x0/{}", REFERENCE_BITMAP, BorderMode::Undefined);
    match required.get(&bitmap_case, InvocationStyle::Graph) {
        Some(report) => outcome_is(&mut rp, "passed", &report.outcome),
        None => {
            rp.compare_values(1.0, 0.0, 0.0);
        }
    }

    // Part 4
    eprintln!("\n=== Part 4: wrong implementation ===");
    let mut wrong = SeparableSobel::corrupting(1);
    let case = Sobel3x3Case::new(
        ImageSource::Random {
            width: 18,
            height: 18,
        },
        BorderMode::Undefined,
        false,
    );
    let quiet = CtConfig {
        mode: CtMode::Compare,
        dump: DumpPolicy::Never,
        ..config.clone()
    };
    for style in InvocationStyle::ALL {
        let report = run_case(&mut wrong, style, &case, &quiet);
        outcome_is(&mut rp, "failed", &report.outcome);
        if let CaseOutcome::Failed(msg) = &report.outcome {
            rp.compare_values(1.0, if msg.contains("x (8, 8)") { 1.0 } else { 0.0 }, 0.0);
        }
    }
    let dumping = CtConfig {
        mode: CtMode::Compare,
        dump: DumpPolicy::Failure,
        ..config.clone()
    };
    let report = run_case(&mut wrong, InvocationStyle::Graph, &case, &dumping);
    outcome_is(&mut rp, "failed", &report.outcome);
    let display = CtConfig {
        mode: CtMode::Display,
        dump: DumpPolicy::Never,
        ..config.clone()
    };
    let report = run_case(&mut wrong, InvocationStyle::Immediate, &case, &display);
    outcome_is(&mut rp, "passed", &report.outcome);

    // Part 5
    eprintln!("\n=== Part 5: aborted cases ===");
    let missing = Sobel3x3Case::new(
        ImageSource::File {
            name: "missing_pattern.bmp".to_string(),
        },
        BorderMode::Undefined,
        false,
    );
    let report = run_case(&mut target, InvocationStyle::Graph, &missing, &config);
    outcome_is(&mut rp, "aborted", &report.outcome);

    let empty = Sobel3x3Case::new(
        ImageSource::Random {
            width: 0,
            height: 0,
        },
        BorderMode::Undefined,
        false,
    );
    let report = run_case(&mut target, InvocationStyle::Immediate, &empty, &config);
    outcome_is(&mut rp, "aborted", &report.outcome);

    let bad = RawBorderMode {
        mode: 0xC0FF,
        constant_value: 0,
    };
    target.set_immediate_border(bad).unwrap();
    let rejected = matches!(target.process_immediate(&src), Err(TestError::Filter(_)));
    rp.compare_values(1.0, if rejected { 1.0 } else { 0.0 }, 0.0);

    let disabled = Sobel3x3Case::new(
        ImageSource::Random {
            width: 18,
            height: 18,
        },
        BorderMode::Replicate,
        true,
    );
    let off = CtConfig {
        run_disabled: false,
        ..config.clone()
    };
    let report = run_case(&mut target, InvocationStyle::Graph, &disabled, &off);
    outcome_is(&mut rp, "skipped", &report.outcome);

    assert!(rp.cleanup(), "sobel3x3_conformance regression test failed");
}
