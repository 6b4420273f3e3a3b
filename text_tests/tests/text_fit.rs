// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting the point size to the control.

use proptest::prelude::*;
use text_layout::{Direction, Size, TextFitSettings};

use crate::util::{controller, multi_line_controller};

fn enabled() -> TextFitSettings {
    TextFitSettings {
        enabled: true,
        ..TextFitSettings::default()
    }
}

#[test]
fn text_fit_boundary_is_strict() {
    // "Hello" at 10pt is 30 by 12 pixels.
    let mut controller = controller("Hello");
    assert!(!controller.check_for_text_fit(10.0, Size::new(30.0, 100.0)));
    assert!(controller.check_for_text_fit(10.0, Size::new(30.5, 100.0)));
    assert!(!controller.check_for_text_fit(10.0, Size::new(100.0, 12.0)));
    assert!(controller.check_for_text_fit(10.0, Size::new(100.0, 12.5)));
}

#[test]
fn text_fit_through_relayout() {
    let mut controller = controller("Hello");
    controller.set_text_fit(enabled());
    controller.relayout(Size::new(60.0, 40.0), Direction::LeftToRight);

    // At 20pt the text is exactly 60 pixels wide.
    assert_eq!(controller.fit_point_size(), Some(19.0));
    let advance = 19.0_f32 * 3.0 / 5.0;
    assert!(controller
        .visual_model()
        .glyphs()
        .iter()
        .all(|glyph| glyph.advance == advance));
}

#[test]
fn text_fit_wrapping_text_is_monotonic() {
    // One line up to 11pt, two up to 18pt, three after that.
    let mut controller = multi_line_controller("aaaa bbbb cccc");
    let fits: Vec<bool> = (5..=40)
        .map(|size| controller.check_for_text_fit(size as f32, Size::new(100.0, 50.0)))
        .collect();

    let fitting = fits.iter().take_while(|&&fits| fits).count();
    assert!(fits[fitting..].iter().all(|&fits| !fits), "{fits:?}");
    assert_eq!(4 + fitting, 18);
}

proptest! {
    #[test]
    fn text_fit_is_monotonic_in_the_point_size(
        a in 5_u8..60,
        b in 5_u8..60,
        width in 1.0_f32..400.0,
        height in 1.0_f32..100.0,
    ) {
        let (small, large) = (f32::from(a.min(b)), f32::from(a.max(b)));
        let layout_size = Size::new(width, height);
        let mut controller = controller("Hello world");

        let large_fits = controller.check_for_text_fit(large, layout_size);
        let small_fits = controller.check_for_text_fit(small, layout_size);
        prop_assert!(!large_fits || small_fits);
    }
}
