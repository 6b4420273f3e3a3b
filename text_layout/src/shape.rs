// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shaping adapter: segments the text, calls the font service and records the
//! glyph to character maps.

use text_runs::{CharacterIndex, CharacterRun, Length, StyleRuns};
use unicode_script::Script;

use crate::analysis::bidi::mirrored;
use crate::analysis::{is_new_paragraph, FontRun, LineBreakInfo, ScriptRun};
use crate::font::{FontClient, FontId, ShapeOutput};
use crate::GlyphInfo;

/// Glyphs of one shaped window.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ShapedText {
    pub(crate) glyphs: Vec<GlyphInfo>,
    /// Absolute index of the first character of each glyph.
    pub(crate) glyph_to_character: Vec<CharacterIndex>,
    pub(crate) characters_per_glyph: Vec<Length>,
}

/// The analysis results the shaper needs, covering the whole text.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ShapingInput<'a> {
    pub(crate) text: &'a [char],
    pub(crate) line_breaks: &'a [LineBreakInfo],
    pub(crate) scripts: &'a [ScriptRun],
    pub(crate) fonts: &'a [FontRun],
    pub(crate) bidi_levels: &'a [u8],
}

/// Position and end of the run containing `index`.
fn run_end_at<T>(
    runs: &[T],
    index: CharacterIndex,
    run: impl Fn(&T) -> CharacterRun,
) -> Option<(usize, CharacterIndex)> {
    let position = runs.partition_point(|item| run(item).end() <= index);
    runs.get(position)
        .filter(|item| run(item).contains(index))
        .map(|item| (position, run(item).end()))
}

/// Shapes the characters of `window`.
///
/// The window is split into segments that share one paragraph, one script and one
/// font; each segment is shaped on its own. Characters at odd bidi levels are mirrored
/// first. Output that breaks the [`ShapeOutput`] contract is replaced by one empty
/// glyph per character.
pub(crate) fn shape_text(
    input: ShapingInput<'_>,
    window: CharacterRun,
    client: &dyn FontClient,
) -> ShapedText {
    let mut shaped = ShapedText::default();
    let mut segment: Vec<char> = Vec::new();
    let mut position = window.character_index;
    let window_end = window.end().min(input.text.len());

    while position < window_end {
        let (script, script_end) = run_end_at(input.scripts, position, |run| run.character_run)
            .map_or((Script::Common, window_end), |(index, end)| {
                (input.scripts[index].script, end)
            });
        let (font, font_end) = match run_end_at(input.fonts, position, |run| run.character_run) {
            Some((index, end)) => (Some(input.fonts[index]), end),
            None => (None, window_end),
        };
        let paragraph_end = input.line_breaks[position..window_end]
            .iter()
            .zip(&input.text[position..window_end])
            .position(|(&info, &character)| {
                info == LineBreakInfo::MustBreak && is_new_paragraph(character)
            })
            .map_or(window_end, |offset| position + offset + 1);
        let end = script_end.min(font_end).min(paragraph_end).min(window_end);

        segment.clear();
        segment.extend((position..end).map(|index| {
            let character = input.text[index];
            match input.bidi_levels.get(index) {
                Some(level) if level % 2 == 1 => mirrored(character).unwrap_or(character),
                _ => character,
            }
        }));

        let font_id = font.map_or_else(FontId::default, |font| font.font_id);
        let mut output = client.shape(&segment, font_id, script);
        if !is_valid(&output, segment.len()) {
            log::warn!(
                "Shaper returned inconsistent glyphs for {} characters at {position}; using placeholders",
                segment.len()
            );
            output = placeholder_glyphs(font_id, segment.len());
        }
        append(&mut shaped, output, position, segment.len(), font);
        position = end;
    }
    shaped
}

fn is_valid(output: &ShapeOutput, number_of_characters: Length) -> bool {
    !output.glyphs.is_empty()
        && output.glyphs.len() == output.glyph_to_character.len()
        && output.glyph_to_character.first() == Some(&0)
        && output.glyph_to_character.windows(2).all(|w| w[0] <= w[1])
        && output
            .glyph_to_character
            .iter()
            .all(|&index| index < number_of_characters)
}

fn placeholder_glyphs(font_id: FontId, number_of_characters: Length) -> ShapeOutput {
    ShapeOutput {
        glyphs: vec![
            GlyphInfo {
                font_id,
                ..GlyphInfo::default()
            };
            number_of_characters
        ],
        glyph_to_character: (0..number_of_characters).collect(),
    }
}

fn append(
    shaped: &mut ShapedText,
    output: ShapeOutput,
    start: CharacterIndex,
    number_of_characters: Length,
    font: Option<FontRun>,
) {
    let ShapeOutput {
        mut glyphs,
        glyph_to_character,
    } = output;
    if let Some(font) = font {
        for glyph in &mut glyphs {
            glyph.is_bold_required |= font.is_bold_required;
            glyph.is_italic_required |= font.is_italic_required;
        }
    }

    let ends = glyph_to_character
        .iter()
        .skip(1)
        .copied()
        .chain(core::iter::once(number_of_characters));
    for (&first, next) in glyph_to_character.iter().zip(ends) {
        shaped.glyph_to_character.push(start + first);
        shaped.characters_per_glyph.push(next - first);
    }
    shaped.glyphs.extend(glyphs);
}

/// Adjusts the metrics of freshly shaped glyphs.
///
/// New paragraph characters take no room. Embedded item placeholders take the size of
/// their item, falling back to a square one line high when the item can't be measured.
/// Character spacing runs widen the advance of the glyphs they cover.
pub(crate) fn apply_glyph_metrics(
    shaped: &mut ShapedText,
    text: &[char],
    runs: &StyleRuns,
    client: &dyn FontClient,
) {
    for (glyph, &first) in shaped.glyphs.iter_mut().zip(&shaped.glyph_to_character) {
        if text.get(first).copied().is_some_and(is_new_paragraph) {
            glyph.width = 0.0;
            glyph.advance = 0.0;
            glyph.x_bearing = 0.0;
            continue;
        }

        if let Some(item) = runs.embedded_item_at(first) {
            let measured = item
                .url
                .as_deref()
                .and_then(|url| client.embedded_item_size(url));
            let fallback = client.font_metrics(glyph.font_id).line_height();
            let width = item
                .width
                .or(measured.map(|size| size.width))
                .unwrap_or(fallback);
            let height = item
                .height
                .or(measured.map(|size| size.height))
                .unwrap_or(fallback);
            if item.url.is_some()
                && measured.is_none()
                && (item.width.is_none() || item.height.is_none())
            {
                log::warn!("Embedded item at {first} could not be measured; using a placeholder");
            }
            glyph.width = width;
            glyph.height = height;
            glyph.advance = width;
            glyph.x_bearing = 0.0;
            glyph.y_bearing = height;
        }

        let spacing = runs
            .character_spacing_runs
            .iter()
            .find(|run| run.character_run.contains(first));
        if let Some(run) = spacing {
            glyph.advance += run.value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_glyph_metrics, shape_text, ShapedText, ShapingInput};
    use crate::analysis::fonts::{validate_fonts, FontDefaults};
    use crate::analysis::script::script_runs;
    use crate::analysis::{line_break_info, LineBreakInfo};
    use crate::font::{FontClient, FontDescription, FontId, FontIdCache, FontMetrics, ShapeOutput};
    use crate::testing::FixedMetricsFontClient;
    use text_runs::{CharacterRun, CharacterSpacingCharacterRun, EmbeddedItem, StyleRuns};
    use unicode_script::Script;

    fn shape(text: &str, client: &dyn FontClient) -> (Vec<char>, ShapedText) {
        let text: Vec<char> = text.chars().collect();
        let line_breaks = line_break_info(&text);
        let scripts = script_runs(&text, 0);
        let window = CharacterRun::new(0, text.len());
        let fonts = validate_fonts(
            window,
            &[],
            &FontDefaults::default(),
            &mut FontIdCache::new(8),
            client,
        );
        let input = ShapingInput {
            text: &text,
            line_breaks: &line_breaks,
            scripts: &scripts,
            fonts: &fonts,
            bidi_levels: &[],
        };
        let shaped = shape_text(input, window, client);
        (text, shaped)
    }

    #[test]
    fn one_glyph_per_ascii_character() {
        let (_, shaped) = shape("Hello world", &FixedMetricsFontClient::new());
        assert_eq!(shaped.glyphs.len(), 11);
        assert!(shaped.characters_per_glyph.iter().all(|&count| count == 1));
        assert_eq!(shaped.glyph_to_character, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn ligatures_cover_two_characters() {
        let (_, shaped) = shape("fifi", &FixedMetricsFontClient::new().with_fi_ligature());
        assert_eq!(shaped.glyphs.len(), 2);
        assert_eq!(shaped.characters_per_glyph, [2, 2]);
        assert_eq!(shaped.characters_per_glyph.iter().sum::<usize>(), 4);
    }

    #[test]
    fn new_paragraph_glyphs_take_no_room() {
        let client = FixedMetricsFontClient::new();
        let (text, mut shaped) = shape("ab\ncd", &client);
        apply_glyph_metrics(&mut shaped, &text, &StyleRuns::default(), &client);
        assert_eq!(shaped.glyphs[2].advance, 0.0);
        assert!(shaped.glyphs[1].advance > 0.0);
    }

    #[test]
    fn embedded_items_and_spacing() {
        let client = FixedMetricsFontClient::new();
        let (text, mut shaped) = shape("a b", &client);
        let mut runs = StyleRuns::default();
        runs.embedded_items.push(EmbeddedItem {
            character_index: 1,
            width: Some(30.0),
            height: Some(20.0),
            ..EmbeddedItem::default()
        });
        runs.character_spacing_runs.push(CharacterSpacingCharacterRun {
            character_run: CharacterRun::new(2, 1),
            value: 5.0,
        });
        let plain_advance = shaped.glyphs[2].advance;
        apply_glyph_metrics(&mut shaped, &text, &runs, &client);
        assert_eq!(shaped.glyphs[1].advance, 30.0);
        assert_eq!(shaped.glyphs[1].y_bearing, 20.0);
        assert_eq!(shaped.glyphs[2].advance, plain_advance + 5.0);
    }

    #[test]
    fn unmeasurable_items_get_a_line_height_square() {
        let client = FixedMetricsFontClient::new();
        let (text, mut shaped) = shape(" ", &client);
        let mut runs = StyleRuns::default();
        runs.embedded_items.push(EmbeddedItem {
            character_index: 0,
            url: Some("missing.png".into()),
            ..EmbeddedItem::default()
        });
        apply_glyph_metrics(&mut shaped, &text, &runs, &client);
        let line_height = client.font_metrics(shaped.glyphs[0].font_id).line_height();
        assert_eq!(shaped.glyphs[0].width, line_height);
        assert_eq!(shaped.glyphs[0].height, line_height);
    }

    #[derive(Debug)]
    struct BrokenShaper;

    impl FontClient for BrokenShaper {
        fn font_id(&self, _: &FontDescription, _: f32) -> FontId {
            FontId(1)
        }

        fn font_description(&self, _: FontId) -> FontDescription {
            FontDescription::default()
        }

        fn font_metrics(&self, _: FontId) -> FontMetrics {
            FontMetrics::default()
        }

        fn shape(&self, _: &[char], _: FontId, _: Script) -> ShapeOutput {
            ShapeOutput {
                glyphs: Vec::new(),
                glyph_to_character: vec![3],
            }
        }
    }

    #[test]
    fn invalid_shaper_output_is_replaced() {
        let (_, shaped) = shape("abc", &BrokenShaper);
        assert_eq!(shaped.glyphs.len(), 3);
        assert_eq!(shaped.characters_per_glyph, [1, 1, 1]);
    }

    #[test]
    fn segments_end_at_paragraph_breaks() {
        let text: Vec<char> = "ab\ncd".chars().collect();
        let info = line_break_info(&text);
        assert_eq!(info[2], LineBreakInfo::MustBreak);
        let (_, shaped) = shape("ab\ncd", &FixedMetricsFontClient::new());
        assert_eq!(shaped.glyph_to_character, [0, 1, 2, 3, 4]);
    }

    proptest::proptest! {
        #[test]
        fn glyphs_conserve_characters(
            characters in proptest::collection::vec(
                proptest::sample::select(vec!['f', 'i', 'a', ' ', '\n', '\u{5d0}']),
                1..40,
            ),
        ) {
            let text: String = characters.into_iter().collect();
            let client = FixedMetricsFontClient::new().with_fi_ligature();
            let (text, shaped) = shape(&text, &client);
            proptest::prop_assert_eq!(
                shaped.characters_per_glyph.iter().sum::<usize>(),
                text.len()
            );
            proptest::prop_assert!(shaped
                .glyph_to_character
                .windows(2)
                .all(|pair| pair[0] < pair[1]));
        }
    }
}
