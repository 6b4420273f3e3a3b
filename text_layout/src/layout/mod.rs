// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking, glyph positioning, alignment and bidi reordering.

pub(crate) mod alignment;
mod line_break;
pub(crate) mod reorder;

use core::ops::Range;

use text_runs::{BoundedParagraphRun, CharacterIndex, GlyphIndex, Length, LineIndex};

use crate::analysis::{Direction, LineBreakInfo, ParagraphRun};
use crate::font::{FontClient, FontId};
use crate::model::Window;
use crate::{GlyphInfo, Vector2};

use line_break::break_lines;

/// How lines are formed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// All the text on one line; nothing wraps.
    #[default]
    SingleLine,
    /// Lines wrap at the box width and end at new paragraph characters.
    MultiLine,
}

/// One laid out line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineRun {
    /// First glyph of the line.
    pub glyph_index: GlyphIndex,
    /// Number of glyphs, including trailing white space.
    pub number_of_glyphs: Length,
    /// First character of the line.
    pub character_index: CharacterIndex,
    /// Number of characters.
    pub number_of_characters: Length,
    /// Advance width, excluding trailing white space.
    pub width: f32,
    /// Distance from the top of the line to its baseline.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the line, negative.
    pub descender: f32,
    /// Line height.
    pub height: f32,
    /// Direction of the line's paragraph.
    pub direction: Direction,
    /// Horizontal offset applied by alignment.
    pub alignment_offset: f32,
    /// Characters of the line in visual order, or empty when that is the logical order.
    pub visual_to_logical: Vec<CharacterIndex>,
}

impl LineRun {
    /// One past the last glyph.
    pub fn glyph_end(&self) -> GlyphIndex {
        self.glyph_index + self.number_of_glyphs
    }

    /// One past the last character.
    pub fn character_end(&self) -> CharacterIndex {
        self.character_index + self.number_of_characters
    }
}

/// Everything line breaking reads.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LayoutParameters<'a> {
    pub(crate) layout: Layout,
    /// Width lines wrap at.
    pub(crate) box_width: f32,
    pub(crate) text: &'a [char],
    pub(crate) line_breaks: &'a [LineBreakInfo],
    pub(crate) paragraphs: &'a [ParagraphRun],
    pub(crate) bounded_paragraphs: &'a [BoundedParagraphRun],
    pub(crate) glyphs: &'a [GlyphInfo],
    pub(crate) glyph_to_character: &'a [CharacterIndex],
    pub(crate) characters_per_glyph: &'a [Length],
    pub(crate) characters_to_glyph: &'a [GlyphIndex],
    /// Face used for the metrics of empty lines.
    pub(crate) default_font: FontId,
}

/// Lays out the lines of `window`, replacing the lines it covered before.
///
/// With `incremental` set, lines before and after the window are kept: later lines and
/// their glyphs move by the glyph, character and height differences. Otherwise every
/// line is rebuilt. Returns the indices of the lines laid out in this pass.
pub(crate) fn layout_text(
    parameters: &LayoutParameters<'_>,
    window: Window,
    incremental: bool,
    client: &dyn FontClient,
    lines: &mut Vec<LineRun>,
    positions: &mut Vec<Vector2>,
) -> Range<LineIndex> {
    let number_of_characters = parameters.text.len();
    let number_of_glyphs = parameters.glyphs.len();
    positions.resize(number_of_glyphs, Vector2::ZERO);

    let window = if incremental {
        window
    } else {
        lines.clear();
        Window {
            start: 0,
            old_len: 0,
            new_len: number_of_characters,
        }
    };

    let glyph_at = |index: CharacterIndex| {
        parameters
            .characters_to_glyph
            .get(index)
            .copied()
            .unwrap_or(number_of_glyphs)
    };
    let reaches_end = window.new_end() >= number_of_characters;
    let glyphs = glyph_at(window.start)..if reaches_end {
        number_of_glyphs
    } else {
        glyph_at(window.new_end())
    };

    let start_line = lines.partition_point(|line| line.character_index < window.start);
    let end_line = if reaches_end {
        lines.len()
    } else {
        lines
            .partition_point(|line| line.character_index < window.old_end())
            .max(start_line)
    };
    let pen_y: f64 = lines[..start_line]
        .iter()
        .map(|line| f64::from(line.height))
        .sum();
    let old_height: f32 = lines[start_line..end_line].iter().map(|line| line.height).sum();
    let old_glyphs: Length = lines[start_line..end_line]
        .iter()
        .map(|line| line.number_of_glyphs)
        .sum();

    let new_lines = break_lines(
        parameters,
        glyphs.clone(),
        window.new_end().min(number_of_characters),
        reaches_end,
        pen_y,
        client,
        positions,
    );
    let new_height: f32 = new_lines.iter().map(|line| line.height).sum();
    let new_count = new_lines.len();

    if incremental && end_line < lines.len() {
        let first_later_glyph = glyphs.end;
        let height_delta = new_height - old_height;
        for line in &mut lines[end_line..] {
            line.glyph_index = line.glyph_index - old_glyphs + glyphs.len();
            line.character_index = window.shift(line.character_index);
            line.visual_to_logical = core::mem::take(&mut line.visual_to_logical)
                .into_iter()
                .map(|index| window.shift(index))
                .collect();
        }
        for position in &mut positions[first_later_glyph..] {
            position.y += height_delta;
        }
        log::trace!(
            "Relaid lines {start_line}..{end_line} as {new_count} lines; {} later lines shifted",
            lines.len() - end_line
        );
    }

    lines.splice(start_line..end_line, new_lines);
    start_line..start_line + new_count
}
