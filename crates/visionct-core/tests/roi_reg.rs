//! Region-of-interest regression test
//!
//! Checks that ROI adjustment, access and exact comparison agree with each
//! other on seeded random images:
//!
//! - shrinking shares storage and offsets every access
//! - a shrunk region compares equal to a cropped copy
//! - shrinking twice is not the same as shrinking once
//! - differences outside the active region are invisible to comparison

use visionct_core::{Image, PixelFormat, Rect};
use visionct_test::CtParams;

#[test]
fn roi_reg() {
    let mut rp = CtParams::new("roi");
    let seed = rp.config.seed;

    let img = Image::random(37, 23, PixelFormat::U8, seed, 0, 256).unwrap();

    // Part 1: shrink and access
    eprintln!("\n=== Part 1: shrink by one pixel per side ===");
    let inner = img.adjust_roi(1, 1, 1, 1).unwrap();
    rp.compare_values(35.0, inner.width() as f64, 0.0);
    rp.compare_values(21.0, inner.height() as f64, 0.0);
    rp.compare_values(2.0, img.ref_count() as f64, 0.0);
    for (x, y) in [(0, 0), (34, 0), (0, 20), (34, 20), (17, 11)] {
        let a = inner.get_u8(x, y).unwrap();
        let b = img.get_u8(x + 1, y + 1).unwrap();
        rp.compare_values(f64::from(b), f64::from(a), 0.0);
    }
    rp.compare_values(0.0, inner.get_u8(35, 0).map_or(0.0, |_| 1.0), 0.0);

    // Part 2: shrunk region equals a cropped copy
    eprintln!("\n=== Part 2: compare against cropped copy ===");
    let cropped = inner.crop_to_roi().unwrap();
    rp.compare_values(35.0, cropped.full_width() as f64, 0.0);
    rp.compare_images(&inner, &cropped);

    // Part 3: shrinking twice
    eprintln!("\n=== Part 3: shrink twice ===");
    let twice = inner.adjust_roi(1, 1, 1, 1).unwrap();
    rp.compare_values(
        1.0,
        if twice.roi() == Rect::new(2, 2, 33, 19) {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    let shape_err = inner.compare_exact(&twice, 1).is_err();
    rp.compare_values(1.0, if shape_err { 1.0 } else { 0.0 }, 0.0);

    // Part 4: changes on the frame are outside the comparison
    eprintln!("\n=== Part 4: frame changes ignored ===");
    let mut edited = img.to_mut();
    for x in 0..37 {
        edited.set_u8(x, 0, 0).unwrap();
        edited.set_u8(x, 22, 255).unwrap();
    }
    let edited: Image = edited.into();
    rp.compare_images(&inner, &edited.adjust_roi(1, 1, 1, 1).unwrap());
    let full = img.compare_exact(&edited, 4).unwrap();
    rp.compare_values(1.0, if full.n_diff > 0 { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(4.0, full.mismatches.len() as f64, 0.0);

    assert!(rp.cleanup(), "roi regression test failed");
}
