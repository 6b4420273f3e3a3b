// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use text_layout::testing::FixedMetricsFontClient;
use text_layout::{Controller, Direction, Size};

/// A box large enough for every test text.
pub(crate) const LARGE_BOX: Size = Size::new(400.0, 400.0);

/// Installs a logger printing through the test harness, once per process.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A controller over the fixed metrics font client, at 10pt: glyphs advance 6 pixels
/// and lines are 12 pixels high.
pub(crate) fn controller(text: &str) -> Controller {
    init_logger();
    let mut controller = Controller::new(Arc::new(FixedMetricsFontClient::new()));
    controller.set_default_point_size(10.0);
    controller.set_text(text);
    controller
}

/// Like [`controller`], with multi-line layout.
pub(crate) fn multi_line_controller(text: &str) -> Controller {
    let mut controller = controller("");
    controller.set_multi_line(true);
    controller.set_text(text);
    controller
}

pub(crate) fn relayout(controller: &mut Controller) {
    controller.relayout(LARGE_BOX, Direction::LeftToRight);
}

/// Asserts that two controllers hold the same analysis and layout.
#[track_caller]
pub(crate) fn assert_same_models(actual: &Controller, expected: &Controller) {
    assert_eq!(actual.text(), expected.text(), "text");
    let (a, b) = (actual.logical_model(), expected.logical_model());
    assert_eq!(a.line_breaks(), b.line_breaks(), "line breaks");
    assert_eq!(a.paragraphs(), b.paragraphs(), "paragraphs");
    assert_eq!(a.scripts(), b.scripts(), "scripts");
    assert_eq!(a.fonts(), b.fonts(), "fonts");
    assert_eq!(a.bidi_levels(), b.bidi_levels(), "bidi levels");
    let (a, b) = (actual.visual_model(), expected.visual_model());
    assert_eq!(a.glyphs(), b.glyphs(), "glyphs");
    assert_eq!(a.glyph_to_character(), b.glyph_to_character(), "glyph to character");
    assert_eq!(a.characters_per_glyph(), b.characters_per_glyph(), "characters per glyph");
    assert_eq!(a.characters_to_glyph(), b.characters_to_glyph(), "characters to glyph");
    assert_eq!(a.glyphs_per_character(), b.glyphs_per_character(), "glyphs per character");
    assert_eq!(a.lines(), b.lines(), "lines");
    assert_eq!(a.glyph_positions(), b.glyph_positions(), "glyph positions");
    assert_eq!(a.layout_size(), b.layout_size(), "layout size");
}

/// Polls `done` until it holds, failing after ten seconds.
#[track_caller]
pub(crate) fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for the workers");
        std::thread::sleep(Duration::from_millis(1));
    }
}
