// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup processing and the runs it feeds into layout.

use peniko::color::palette::css;
use text_layout::Controller;
use text_markup::process_markup;
use text_runs::{CharacterRun, ColorRun};

use crate::util::{controller, relayout};

fn markup_controller(markup: &str) -> Controller {
    let mut controller = controller("");
    controller.set_markup_enabled(true);
    controller.set_text(markup);
    controller
}

#[test]
fn markup_color_scenario() {
    let markup = process_markup("<color value='red'>Hello</color> world");
    assert_eq!(markup.text, "Hello world");
    assert_eq!(markup.character_count(), 11);
    assert_eq!(
        markup.runs.color_runs,
        [ColorRun::new(CharacterRun::new(0, 5), css::RED)]
    );
}

#[test]
fn markup_runs_follow_edits() {
    let mut controller = markup_controller("<color value='red'>Hello</color> world");
    relayout(&mut controller);

    controller.remove_text(2, 5).unwrap();
    assert_eq!(controller.text(), "Heorld");
    assert_eq!(
        controller.logical_model().runs().color_runs[0].character_run,
        CharacterRun::new(0, 2)
    );

    controller.insert_text(1, "xy").unwrap();
    assert_eq!(controller.text(), "Hxyeorld");
    assert_eq!(
        controller.logical_model().runs().color_runs[0].character_run,
        CharacterRun::new(0, 4)
    );
    assert!(controller.logical_model().runs().max_end() <= 8);

    relayout(&mut controller);
    let visual = controller.visual_model();
    assert_eq!(visual.glyphs().len(), 8);
    for glyph in 0..4 {
        assert_eq!(visual.glyph_color(glyph), css::RED, "glyph {glyph}");
    }
    assert_eq!(visual.glyph_color(4), css::BLACK);
}

#[test]
fn markup_anchor_is_blue_and_underlined() {
    let mut controller = markup_controller("see <a href='https://linebender.org'>docs</a>.");
    relayout(&mut controller);

    assert_eq!(controller.text(), "see docs.");
    let visual = controller.visual_model();
    assert_eq!(visual.glyph_color(3), css::BLACK);
    assert_eq!(visual.glyph_color(4), css::BLUE);
    assert_eq!(visual.underline_runs().len(), 1);
    assert_eq!(visual.underline_runs()[0].glyph_run.glyph_index, 4);
    assert_eq!(visual.underline_runs()[0].glyph_run.number_of_glyphs, 4);
}

#[test]
fn markup_unknown_tags_keep_their_content() {
    let mut controller = markup_controller("<blink>x</blink><glow>y</glow>&bogus;");
    relayout(&mut controller);

    assert_eq!(controller.text(), "xy");
    assert_eq!(controller.visual_model().glyphs().len(), 2);
}

#[test]
fn markup_disabled_keeps_tags_as_text() {
    let mut controller = controller("<b>x</b>");
    relayout(&mut controller);

    assert_eq!(controller.text(), "<b>x</b>");
    assert_eq!(controller.visual_model().glyphs().len(), 8);
    assert!(controller.logical_model().runs().is_empty());
}
