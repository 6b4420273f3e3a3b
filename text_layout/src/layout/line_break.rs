// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking.

use core::ops::Range;

use smallvec::SmallVec;
use text_runs::{CharacterIndex, GlyphIndex};

use super::{Layout, LayoutParameters, LineRun};
use crate::analysis::{is_new_paragraph, is_white_space, Direction, LineBreakInfo};
use crate::font::{FontClient, FontId, FontMetrics};
use crate::Vector2;

/// Font metrics looked up while laying out one window. Few faces appear per window.
struct MetricsCache<'a> {
    client: &'a dyn FontClient,
    entries: SmallVec<[(FontId, FontMetrics); 4]>,
}

impl<'a> MetricsCache<'a> {
    fn new(client: &'a dyn FontClient) -> Self {
        Self {
            client,
            entries: SmallVec::new(),
        }
    }

    fn get(&mut self, font_id: FontId) -> FontMetrics {
        if let Some((_, metrics)) = self.entries.iter().find(|(id, _)| *id == font_id) {
            return *metrics;
        }
        let metrics = self.client.font_metrics(font_id);
        self.entries.push((font_id, metrics));
        metrics
    }
}

/// Breaks `glyphs` into lines and positions every glyph.
///
/// `character_end` is one past the last character of the window. `pen_y` is the top of
/// the first line. When the window reaches the end of a multi-line text that ends with
/// a new paragraph character, an empty line is added for the paragraph that follows.
pub(crate) fn break_lines(
    parameters: &LayoutParameters<'_>,
    glyphs: Range<GlyphIndex>,
    character_end: CharacterIndex,
    reaches_end: bool,
    pen_y: f64,
    client: &dyn FontClient,
    positions: &mut [Vector2],
) -> Vec<LineRun> {
    let mut metrics = MetricsCache::new(client);
    let mut lines = Vec::new();
    // Use of f64 here avoids accumulating error over many lines.
    let mut pen_y = pen_y;

    let mut start = glyphs.start;
    while start < glyphs.end {
        let end = match parameters.layout {
            Layout::SingleLine => glyphs.end,
            Layout::MultiLine => line_end(parameters, start, glyphs.end),
        };
        let characters_end = if end < glyphs.end {
            parameters.glyph_to_character[end]
        } else {
            character_end
        };
        let line = position_line(
            parameters,
            start..end,
            characters_end,
            pen_y,
            &mut metrics,
            positions,
        );
        pen_y += f64::from(line.height);
        lines.push(line);
        start = end;
    }

    let ends_with_new_paragraph = parameters
        .text
        .last()
        .is_some_and(|&character| is_new_paragraph(character));
    if parameters.layout == Layout::MultiLine && reaches_end && ends_with_new_paragraph {
        lines.push(empty_line(parameters, glyphs.end, &mut metrics));
    }
    lines
}

/// Whether glyph `index` starts a cluster.
fn starts_cluster(parameters: &LayoutParameters<'_>, index: GlyphIndex) -> bool {
    index == 0
        || parameters.glyph_to_character[index] != parameters.glyph_to_character[index - 1]
}

/// Whether glyph `index` is the last one of its cluster.
fn ends_cluster(parameters: &LayoutParameters<'_>, index: GlyphIndex) -> bool {
    parameters
        .glyph_to_character
        .get(index + 1)
        .is_none_or(|&next| next != parameters.glyph_to_character[index])
}

/// The first glyph of the line after the one starting at `start`.
fn line_end(parameters: &LayoutParameters<'_>, start: GlyphIndex, end: GlyphIndex) -> GlyphIndex {
    let mut pen_x = 0.0;
    let mut last_break = None;

    for index in start..end {
        let glyph = &parameters.glyphs[index];
        let first = parameters.glyph_to_character[index];
        let is_white = parameters
            .text
            .get(first)
            .is_some_and(|&character| is_white_space(character));

        // White space hangs past the edge; anything else that overflows starts a new
        // line at the last break opportunity, or right here if there was none.
        if !is_white
            && index > start
            && starts_cluster(parameters, index)
            && pen_x + glyph.right_edge() > parameters.box_width
        {
            return last_break.unwrap_or(index);
        }
        pen_x += glyph.advance;

        if ends_cluster(parameters, index) {
            let count = parameters.characters_per_glyph[index].max(1);
            match parameters.line_breaks.get(first + count - 1) {
                Some(LineBreakInfo::MustBreak) => return index + 1,
                Some(LineBreakInfo::AllowBreak) => last_break = Some(index + 1),
                _ => {}
            }
        }
    }
    end
}

fn paragraph_direction(parameters: &LayoutParameters<'_>, index: CharacterIndex) -> Direction {
    let position = parameters
        .paragraphs
        .partition_point(|paragraph| paragraph.character_run.end() <= index);
    parameters
        .paragraphs
        .get(position)
        .or(parameters.paragraphs.last())
        .map_or(Direction::LeftToRight, |paragraph| paragraph.direction)
}

fn relative_line_size(parameters: &LayoutParameters<'_>, index: CharacterIndex) -> f32 {
    parameters
        .bounded_paragraphs
        .iter()
        .find(|run| run.character_run.contains(index))
        .and_then(|run| run.relative_line_size)
        .unwrap_or(1.0)
}

fn position_line(
    parameters: &LayoutParameters<'_>,
    glyphs: Range<GlyphIndex>,
    characters_end: CharacterIndex,
    pen_y: f64,
    metrics: &mut MetricsCache<'_>,
    positions: &mut [Vector2],
) -> LineRun {
    let character_index = parameters.glyph_to_character[glyphs.start];

    let mut ascender = 0.0_f32;
    let mut descender = 0.0_f32;
    let mut height = 0.0_f32;
    for glyph in &parameters.glyphs[glyphs.clone()] {
        let font = metrics.get(glyph.font_id);
        ascender = ascender.max(font.ascender).max(glyph.y_bearing);
        descender = descender.min(font.descender);
        height = height.max(font.line_height());
    }
    height = height.max(ascender - descender) * relative_line_size(parameters, character_index);

    #[expect(
        clippy::cast_possible_truncation,
        reason = "positions are stored as f32; the running sum is only kept in f64"
    )]
    let baseline = pen_y as f32 + ascender;
    let mut pen_x = 0.0_f32;
    let mut width = 0.0_f32;
    for index in glyphs.clone() {
        let glyph = &parameters.glyphs[index];
        positions[index] = Vector2::new(pen_x + glyph.x_bearing, baseline - glyph.y_bearing);
        pen_x += glyph.advance;
        let is_white = parameters
            .text
            .get(parameters.glyph_to_character[index])
            .is_some_and(|&character| is_white_space(character));
        if !is_white {
            width = width.max(pen_x);
        }
    }

    LineRun {
        glyph_index: glyphs.start,
        number_of_glyphs: glyphs.len(),
        character_index,
        number_of_characters: characters_end - character_index,
        width,
        ascender,
        descender,
        height,
        direction: paragraph_direction(parameters, character_index),
        alignment_offset: 0.0,
        visual_to_logical: Vec::new(),
    }
}

fn empty_line(
    parameters: &LayoutParameters<'_>,
    glyph_index: GlyphIndex,
    metrics: &mut MetricsCache<'_>,
) -> LineRun {
    let character_index = parameters.text.len();
    let font_id = parameters
        .glyphs
        .last()
        .map_or(parameters.default_font, |glyph| glyph.font_id);
    let font = metrics.get(font_id);
    LineRun {
        glyph_index,
        number_of_glyphs: 0,
        character_index,
        number_of_characters: 0,
        width: 0.0,
        ascender: font.ascender,
        descender: font.descender,
        height: font.line_height(),
        direction: paragraph_direction(parameters, character_index),
        alignment_offset: 0.0,
        visual_to_logical: Vec::new(),
    }
}
