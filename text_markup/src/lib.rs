// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text Markup converts an HTML-like annotated string into plain text plus style runs.
//!
//! The parser is a best-effort decorator rather than a validating parser: unknown tags,
//! stray closing tags and malformed character references are ignored, and processing
//! always produces a result.
//!
//! Supported elements are `color`, `font`, `b`, `i`, `u`, `s`, `background`, `span`,
//! `p`, `a`, `char-spacing` and `item`. `shadow`, `glow` and `outline` are recognized
//! but produce no runs. Attribute values are single-quoted.
//!
//! ## Example
//!
//! ```
//! use text_markup::process_markup;
//! use text_runs::CharacterRun;
//!
//! let markup = process_markup("<color value='red'>Hello</color> world");
//! assert_eq!(markup.text, "Hello world");
//! assert_eq!(markup.runs.color_runs.len(), 1);
//! assert_eq!(markup.runs.color_runs[0].character_run, CharacterRun::new(0, 5));
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attributes;
mod color;
mod entity;
mod processor;
mod stack;
mod tag;

use text_runs::{CharacterBuffer, StyleRuns};

pub use crate::color::parse_color;

/// The result of processing a markup string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessedMarkup {
    /// The text with every tag removed and every character reference decoded.
    pub text: String,
    /// Normalized style runs indexing into the characters of `text`.
    pub runs: StyleRuns,
}

impl ProcessedMarkup {
    /// Number of characters (Unicode scalar values) in the text.
    pub fn character_count(&self) -> usize {
        self.text.chars().count()
    }

    /// The text as a character buffer.
    pub fn characters(&self) -> CharacterBuffer {
        CharacterBuffer::from(self.text.as_str())
    }
}

/// Processes `markup` into plain text and style runs.
pub fn process_markup(markup: &str) -> ProcessedMarkup {
    processor::MarkupProcessor::default().process(markup)
}

#[cfg(test)]
mod tests {
    use super::process_markup;
    use peniko::color::palette::css;
    use proptest::prelude::*;
    use text_runs::{
        CharacterRun, Color, ColorRun, FontSlant, FontWeight, HorizontalAlignment, Run,
        UnderlineType,
    };

    #[test]
    fn color_tag() {
        let markup = process_markup("<color value='red'>Hello</color> world");
        assert_eq!(markup.text, "Hello world");
        assert_eq!(markup.character_count(), 11);
        assert_eq!(
            markup.runs.color_runs,
            [ColorRun::new(CharacterRun::new(0, 5), css::RED)]
        );
        assert!(markup.runs.font_description_runs.is_empty());
    }

    #[test]
    fn nested_bold_and_italic() {
        let markup = process_markup("<b>ab<i>cd</i></b>ef");
        assert_eq!(markup.text, "abcdef");
        let fonts = &markup.runs.font_description_runs;
        assert_eq!(fonts.len(), 2);
        assert_eq!(fonts[0].character_run, CharacterRun::new(0, 2));
        assert_eq!(fonts[0].weight, Some(FontWeight::BOLD));
        assert_eq!(fonts[0].slant, None);
        assert_eq!(fonts[1].character_run, CharacterRun::new(2, 2));
        assert_eq!(fonts[1].weight, Some(FontWeight::BOLD));
        assert_eq!(fonts[1].slant, Some(FontSlant::Italic));
    }

    #[test]
    fn nested_colors_are_flattened() {
        let markup =
            process_markup("<color value='red'>a<color value='blue'>b</color>c</color>");
        assert_eq!(markup.text, "abc");
        assert_eq!(
            markup.runs.color_runs,
            [
                ColorRun::new(CharacterRun::new(0, 1), css::RED),
                ColorRun::new(CharacterRun::new(1, 1), css::BLUE),
                ColorRun::new(CharacterRun::new(2, 1), css::RED),
            ]
        );
    }

    #[test]
    fn span_realizes_only_given_attributes() {
        let markup = process_markup(
            "<span font-weight='bold' text-color='blue' u-type='dashed'>x</span>y",
        );
        assert_eq!(markup.text, "xy");
        let runs = &markup.runs;
        assert_eq!(runs.font_description_runs.len(), 1);
        assert_eq!(runs.font_description_runs[0].weight, Some(FontWeight::BOLD));
        assert_eq!(runs.font_description_runs[0].family, None);
        assert_eq!(
            runs.color_runs,
            [ColorRun::new(CharacterRun::new(0, 1), css::BLUE)]
        );
        assert_eq!(runs.underlined_character_runs.len(), 1);
        assert_eq!(
            runs.underlined_character_runs[0].properties.kind,
            Some(UnderlineType::Dashed)
        );
        assert!(runs.background_color_runs.is_empty());
        assert!(runs.strikethrough_character_runs.is_empty());
    }

    #[test]
    fn font_tag_attributes() {
        let markup = process_markup(
            "<font family='DejaVu Sans' size='18' weight='light' slant='italic'>t</font>",
        );
        let font = &markup.runs.font_description_runs[0];
        assert_eq!(font.family.as_deref(), Some("DejaVu Sans"));
        assert_eq!(font.size, Some(18.0));
        assert_eq!(font.weight, Some(FontWeight::LIGHT));
        assert_eq!(font.slant, Some(FontSlant::Italic));
    }

    #[test]
    fn paragraph_inserts_new_paragraphs() {
        let markup = process_markup("first<p align='center'>second</p>third");
        assert_eq!(markup.text, "first\nsecond\nthird");
        let paragraphs = &markup.runs.bounded_paragraph_runs;
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].character_run, CharacterRun::new(6, 7));
        assert_eq!(
            paragraphs[0].horizontal_alignment,
            Some(HorizontalAlignment::Center)
        );
    }

    #[test]
    fn paragraph_keeps_existing_new_paragraphs() {
        let markup = process_markup("<p>one\n</p><p>two</p>");
        assert_eq!(markup.text, "one\ntwo\n");
        let ranges: Vec<_> = markup
            .runs
            .bounded_paragraph_runs
            .iter()
            .map(|run| run.character_run.range())
            .collect();
        assert_eq!(ranges, [0..4, 4..8]);
    }

    #[test]
    fn embedded_item_inserts_one_placeholder() {
        let markup =
            process_markup("a<item url='icon.png' width='10' height='12px' color-blending='multiply'/>b");
        assert_eq!(markup.text, "a b");
        let items = &markup.runs.embedded_items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].character_index, 1);
        assert_eq!(items[0].url.as_deref(), Some("icon.png"));
        assert_eq!(items[0].width, Some(10.0));
        assert_eq!(items[0].height, Some(12.0));
        assert_eq!(
            items[0].color_blending,
            text_runs::ColorBlendingMode::Multiply
        );
        // `</item>` is ignored.
        assert_eq!(process_markup("<item url='x'></item>").text, " ");
    }

    #[test]
    fn anchor_defaults_to_blue_and_underlined() {
        let markup = process_markup("see <a href='https://linebender.org'>docs</a>.");
        assert_eq!(markup.text, "see docs.");
        let runs = &markup.runs;
        assert_eq!(runs.anchors.len(), 1);
        assert_eq!(runs.anchors[0].character_run(), CharacterRun::new(4, 4));
        assert_eq!(
            runs.anchors[0].href.as_deref(),
            Some("https://linebender.org")
        );
        assert_eq!(
            runs.color_runs,
            [ColorRun::new(CharacterRun::new(4, 4), css::BLUE)]
        );
        assert_eq!(runs.underlined_character_runs.len(), 1);
        assert_eq!(
            runs.underlined_character_runs[0].character_run(),
            CharacterRun::new(4, 4)
        );
        assert_eq!(
            runs.underlined_character_runs[0].properties.kind,
            Some(UnderlineType::Solid)
        );
    }

    #[test]
    fn anchor_color_override() {
        let markup = process_markup("<a href='x' color='#00ff00'>go</a>");
        assert_eq!(
            markup.runs.color_runs,
            [ColorRun::new(
                CharacterRun::new(0, 2),
                Color::from_rgba8(0, 255, 0, 255)
            )]
        );
    }

    #[test]
    fn stray_closing_tags_are_ignored() {
        let markup = process_markup("a</b>b<u>c</u></u>d");
        assert_eq!(markup.text, "abcd");
        assert!(markup.runs.font_description_runs.is_empty());
        assert_eq!(markup.runs.underlined_character_runs.len(), 1);
        assert_eq!(
            markup.runs.underlined_character_runs[0].character_run(),
            CharacterRun::new(2, 1)
        );
    }

    #[test]
    fn unknown_and_reserved_tags_keep_their_content() {
        let markup = process_markup("<blink>x</blink><shadow color='red'>y</shadow><glow>z</glow>");
        assert_eq!(markup.text, "xyz");
        assert!(markup.runs.is_empty());
    }

    #[test]
    fn invalid_attribute_values_open_nothing() {
        let markup = process_markup("<color value='nope'>x</color><font>y</font>");
        assert_eq!(markup.text, "xy");
        assert!(markup.runs.is_empty());
    }

    #[test]
    fn character_references() {
        let markup = process_markup("a &lt;b&gt; &amp; &#65;&#x42;");
        assert_eq!(markup.text, "a <b> & AB");
        assert!(markup.runs.is_empty());
    }

    #[test]
    fn malformed_references_are_dropped() {
        assert_eq!(process_markup("x&bogus;y").text, "xy");
        assert_eq!(process_markup("x&#xD800;y").text, "xy");
        assert_eq!(process_markup("fish & chips").text, "fish  chips");
    }

    #[test]
    fn backslash_escapes() {
        let markup = process_markup("\\<b\\>\\&");
        assert_eq!(markup.text, "<b>&");
        assert!(markup.runs.is_empty());
        assert_eq!(process_markup("a\\b").text, "a\\b");
    }

    #[test]
    fn unterminated_tag_is_literal() {
        assert_eq!(process_markup("a < b").text, "a < b");
    }

    #[test]
    fn unclosed_tags_run_to_the_end() {
        let markup = process_markup("<color value='red'>abc");
        assert_eq!(
            markup.runs.color_runs,
            [ColorRun::new(CharacterRun::new(0, 3), css::RED)]
        );
    }

    #[test]
    fn character_spacing() {
        let markup = process_markup("<char-spacing value='2.5'>ab</char-spacing>");
        let spacing = &markup.runs.character_spacing_runs;
        assert_eq!(spacing.len(), 1);
        assert_eq!(spacing[0].value, 2.5);
        assert_eq!(spacing[0].character_run, CharacterRun::new(0, 2));
    }

    #[test]
    fn multi_byte_text_is_indexed_by_character() {
        let markup = process_markup("h\u{e9}<b>\u{1F600}x</b>");
        assert_eq!(markup.character_count(), 4);
        assert_eq!(
            markup.runs.font_description_runs[0].character_run,
            CharacterRun::new(2, 2)
        );
        assert_eq!(markup.characters().len(), 4);
    }

    fn assert_sorted_and_disjoint<R: Run>(runs: &[R]) {
        for pair in runs.windows(2) {
            assert!(
                pair[0].character_run().end() <= pair[1].character_run().character_index,
                "runs overlap: {:?} and {:?}",
                pair[0].character_run(),
                pair[1].character_run()
            );
        }
    }

    proptest! {
        #[test]
        fn runs_never_overlap_and_stay_in_bounds(
            pieces in proptest::collection::vec(
                prop_oneof![
                    Just("<b>"), Just("</b>"), Just("<i>"), Just("</i>"),
                    Just("<color value='red'>"), Just("<color value='blue'>"), Just("</color>"),
                    Just("<span text-color='green' font-size='12'>"), Just("</span>"),
                    Just("<u>"), Just("</u>"), Just("<p>"), Just("</p>"),
                    Just("<a href='x'>"), Just("</a>"), Just("<item/>"),
                    Just("&amp;"), Just("&bad;"), Just("a"), Just("bc"), Just(" "),
                    Just("\n"), Just("<"), Just("\u{5d0}"),
                ],
                0..40,
            )
        ) {
            let markup = process_markup(&pieces.concat());
            let runs = &markup.runs;
            assert_sorted_and_disjoint(&runs.color_runs);
            assert_sorted_and_disjoint(&runs.font_description_runs);
            assert_sorted_and_disjoint(&runs.underlined_character_runs);
            assert_sorted_and_disjoint(&runs.strikethrough_character_runs);
            assert_sorted_and_disjoint(&runs.background_color_runs);
            assert_sorted_and_disjoint(&runs.bounded_paragraph_runs);
            assert_sorted_and_disjoint(&runs.character_spacing_runs);
            prop_assert!(runs.max_end() <= markup.character_count());
        }
    }
}
