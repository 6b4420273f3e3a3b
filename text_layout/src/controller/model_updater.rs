// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brings the logical and visual models up to date with the pending edits.

use core::ops::Range;

use text_runs::{CharacterIndex, Color, ColorRun};

use super::{Controller, OperationsMask};
use crate::analysis::bidi::{bidi_levels, first_strong_direction};
use crate::analysis::fonts::validate_fonts;
use crate::analysis::script::script_runs;
use crate::analysis::{find_paragraphs, line_break_info, paragraphs};
use crate::error::LayoutError;
use crate::model::{
    splice_runs, CharacterSpacingGlyphRun, ColorIndex, StrikethroughGlyphRun,
    UnderlinedGlyphRun, Window,
};
use crate::shape::{apply_glyph_metrics, shape_text, ShapingInput};
use crate::Vector2;

impl Controller {
    /// Finds the paragraphs touched by the recorded edit.
    ///
    /// The window starts at the first character of the first touched paragraph. When
    /// the edit removes the new paragraph character of the last touched paragraph the
    /// next paragraph joins the window, since the two merge.
    pub(super) fn calculate_text_update_indices(&mut self) {
        let paragraph_runs = &self.logical.paragraphs;
        let info = &mut self.update_info;
        info.paragraph_character_index = 0;
        info.paragraph_number_of_characters = 0;
        info.start_glyph_index = 0;
        info.start_line_index = 0;

        let (Some(first), Some(last)) = (paragraph_runs.first(), paragraph_runs.last()) else {
            info.requested_number_of_characters = info
                .number_of_characters_to_add
                .saturating_sub(info.number_of_characters_to_remove);
            return;
        };

        let touched = if info.character_index >= info.previous_number_of_characters {
            if info.is_last_character_new_paragraph {
                // Text appended after a final new paragraph character starts a paragraph
                // of its own.
                info.paragraph_character_index = info.previous_number_of_characters;
                info.requested_number_of_characters = info
                    .number_of_characters_to_add
                    .saturating_sub(info.number_of_characters_to_remove);
                info.start_glyph_index = self.visual.glyphs.len();
                info.start_line_index = self.visual.lines.len().saturating_sub(1);
                return;
            }
            paragraph_runs.len() - 1..paragraph_runs.len()
        } else {
            let count = if info.full_relayout_needed {
                info.previous_number_of_characters
            } else {
                info.number_of_characters_to_remove.max(1)
            };
            find_paragraphs(paragraph_runs, info.character_index, count)
        };

        let first_touched = paragraph_runs.get(touched.start).unwrap_or(first);
        let last_touched = touched
            .end
            .checked_sub(1)
            .and_then(|index| paragraph_runs.get(index))
            .unwrap_or(last);
        let start = first_touched.character_run.character_index;
        let mut end = last_touched.character_run.end();
        if info.number_of_characters_to_remove > 0
            && end == info.character_index + info.number_of_characters_to_remove
        {
            if let Some(next) = paragraph_runs.get(touched.end) {
                end = next.character_run.end();
            }
        }

        info.paragraph_character_index = start;
        info.paragraph_number_of_characters = end - start;
        info.requested_number_of_characters = (info.paragraph_number_of_characters
            + info.number_of_characters_to_add)
            .saturating_sub(info.number_of_characters_to_remove);
        info.start_glyph_index = self
            .visual
            .characters_to_glyph
            .get(start)
            .copied()
            .unwrap_or(self.visual.glyphs.len());
        info.start_line_index = self
            .visual
            .lines
            .partition_point(|line| line.character_end() <= start);
    }

    /// Runs the pending stages of `required` over the paragraphs touched since the
    /// last update, or over the whole text when the update info asks for it.
    ///
    /// Returns whether anything ran.
    pub(super) fn update_model(&mut self, required: OperationsMask) -> Result<bool, LayoutError> {
        let operations = self.pending_operations & required;
        if operations.is_empty() {
            return Ok(false);
        }

        let number_of_characters = self.logical.text.len();
        // A full rebuild ignores the recorded edit, which may no longer describe a
        // single window of the old text.
        if !self.update_info.clear_all {
            self.calculate_text_update_indices();
            let info = &mut self.update_info;
            if info.paragraph_character_index > number_of_characters
                || info.requested_number_of_characters > number_of_characters
                || info.paragraph_character_index + info.requested_number_of_characters
                    > number_of_characters
            {
                if number_of_characters != 0 {
                    return Err(LayoutError::InvalidUpdateWindow {
                        start: info.paragraph_character_index,
                        requested: info.requested_number_of_characters,
                        number_of_characters,
                        characters_to_glyph: self.visual.characters_to_glyph.len(),
                        glyphs_per_character: self.visual.glyphs_per_character.len(),
                    });
                }
                info.clear();
                info.clear_all = true;
            }
        }

        let info = &mut self.update_info;
        let window = if info.clear_all {
            info.paragraph_character_index = 0;
            info.paragraph_number_of_characters = 0;
            info.requested_number_of_characters = number_of_characters;
            info.start_glyph_index = 0;
            info.start_line_index = 0;
            info.full_relayout_needed = true;
            self.clear_model_data(operations);
            Window {
                start: 0,
                old_len: 0,
                new_len: number_of_characters,
            }
        } else {
            Window {
                start: info.paragraph_character_index,
                old_len: info.paragraph_number_of_characters,
                new_len: info.requested_number_of_characters,
            }
        };
        self.update_info.clear_all = false;
        log::trace!("Updating {operations:?} over {window:?}");

        if operations.contains(OperationsMask::GET_LINE_BREAKS) {
            self.update_line_breaks(window);
        }
        if operations.contains(OperationsMask::GET_SCRIPTS) {
            self.update_scripts(window);
        }
        if operations.contains(OperationsMask::VALIDATE_FONTS) {
            self.update_fonts(window);
        }
        if operations.contains(OperationsMask::BIDI_INFO) {
            self.update_bidi_info(window);
        }
        let shaped = operations.contains(OperationsMask::SHAPE_TEXT);
        if shaped {
            self.update_glyphs(
                window,
                operations.contains(OperationsMask::GET_GLYPH_METRICS),
            );
        }
        // Color indices are per glyph, so reshaping invalidates them.
        if shaped || operations.contains(OperationsMask::COLOR) {
            self.update_colors();
        }

        let info = &mut self.update_info;
        info.estimated_number_of_lines = self
            .visual
            .lines
            .len()
            .max(self.logical.paragraphs.len());
        info.previous_number_of_characters = number_of_characters;
        Ok(true)
    }

    /// Drops the data the given stages are about to rebuild.
    fn clear_model_data(&mut self, operations: OperationsMask) {
        if operations.contains(OperationsMask::GET_LINE_BREAKS) {
            self.logical.line_breaks.clear();
            self.logical.paragraphs.clear();
        }
        if operations.contains(OperationsMask::GET_SCRIPTS) {
            self.logical.scripts.clear();
        }
        if operations.contains(OperationsMask::VALIDATE_FONTS) {
            self.logical.fonts.clear();
        }
        if operations.contains(OperationsMask::BIDI_INFO) {
            self.logical.bidi_levels.clear();
        }
        if operations.contains(OperationsMask::SHAPE_TEXT) {
            self.visual.clear_glyphs();
        }
        if operations.contains(OperationsMask::LAYOUT) {
            self.visual.lines.clear();
        }
        if operations.contains(OperationsMask::COLOR) {
            self.visual.color_indices.clear();
            self.visual.background_color_indices.clear();
        }
    }

    /// Indices of the paragraphs inside the updated window.
    fn window_paragraphs(&self, window: Window) -> Range<usize> {
        let paragraph_runs = &self.logical.paragraphs;
        let first = paragraph_runs.partition_point(|run| run.character_run.character_index < window.start);
        let last = paragraph_runs.partition_point(|run| run.character_run.character_index < window.new_end());
        first..last.max(first)
    }

    fn update_line_breaks(&mut self, window: Window) {
        let text = &self.logical.text.as_slice()[window.start..window.new_end()];
        splice_clamped(
            &mut self.logical.line_breaks,
            window.start..window.old_end(),
            line_break_info(text),
        );
        let mut new_paragraphs = paragraphs(text, self.layout_direction);
        for paragraph in &mut new_paragraphs {
            paragraph.character_run.character_index += window.start;
        }
        splice_runs(&mut self.logical.paragraphs, window, new_paragraphs);
    }

    fn update_scripts(&mut self, window: Window) {
        let text = self.logical.text.as_slice();
        let mut scripts = Vec::new();
        for paragraph in &self.logical.paragraphs[self.window_paragraphs(window)] {
            let run = paragraph.character_run;
            scripts.extend(script_runs(&text[run.range()], run.character_index));
        }
        splice_runs(&mut self.logical.scripts, window, scripts);
    }

    fn update_fonts(&mut self, window: Window) {
        let range = self.window_paragraphs(window);
        let mut fonts = Vec::new();
        for paragraph in &self.logical.paragraphs[range] {
            fonts.extend(validate_fonts(
                paragraph.character_run,
                &self.logical.runs.font_description_runs,
                &self.font_defaults,
                &mut self.font_cache,
                &*self.font_client,
            ));
        }
        splice_runs(&mut self.logical.fonts, window, fonts);
    }

    fn update_bidi_info(&mut self, window: Window) {
        let range = self.window_paragraphs(window);
        let text = self.logical.text.as_slice();
        let window_paragraphs = &mut self.logical.paragraphs[range];
        for paragraph in window_paragraphs.iter_mut() {
            paragraph.direction = first_strong_direction(&text[paragraph.character_run.range()])
                .unwrap_or(self.layout_direction);
        }
        let levels = bidi_levels(&text[window.start..window.new_end()], window_paragraphs);
        splice_clamped(
            &mut self.logical.bidi_levels,
            window.start..window.old_end(),
            levels,
        );
    }

    /// Reshapes the window and splices its glyphs in place of the old ones.
    fn update_glyphs(&mut self, window: Window, glyph_metrics: bool) {
        let visual = &self.visual;
        let old_total = visual.glyphs.len();
        let glyph_at = |index: CharacterIndex| {
            visual
                .characters_to_glyph
                .get(index)
                .copied()
                .unwrap_or(old_total)
        };
        let old_start = glyph_at(window.start).min(old_total);
        let old_glyphs = old_start..glyph_at(window.old_end()).clamp(old_start, old_total);

        let text = self.logical.text.as_slice();
        let input = ShapingInput {
            text,
            line_breaks: &self.logical.line_breaks,
            scripts: &self.logical.scripts,
            fonts: &self.logical.fonts,
            bidi_levels: &self.logical.bidi_levels,
        };
        let mut shaped = shape_text(input, window.new_run(), &*self.font_client);
        if glyph_metrics {
            apply_glyph_metrics(&mut shaped, text, &self.logical.runs, &*self.font_client);
        }
        let new_count = shaped.glyphs.len();

        let visual = &mut self.visual;
        for index in &mut visual.glyph_to_character[old_glyphs.end..] {
            *index = window.shift(*index);
        }
        visual.glyphs.splice(old_glyphs.clone(), shaped.glyphs);
        visual
            .glyph_to_character
            .splice(old_glyphs.clone(), shaped.glyph_to_character);
        visual
            .characters_per_glyph
            .splice(old_glyphs.clone(), shaped.characters_per_glyph);
        if visual.glyph_positions.len() == old_total {
            visual
                .glyph_positions
                .splice(old_glyphs, core::iter::repeat_n(Vector2::ZERO, new_count));
        } else {
            visual.glyph_positions.clear();
            self.update_info.full_relayout_needed = true;
        }
        visual.rebuild_character_maps(text.len());

        let runs = &self.logical.runs;
        let underline_runs = runs
            .underlined_character_runs
            .iter()
            .map(|run| UnderlinedGlyphRun {
                glyph_run: visual.glyph_run(run.character_run),
                properties: run.properties.clone(),
            })
            .filter(|run| run.glyph_run.number_of_glyphs > 0)
            .collect();
        let strikethrough_runs = runs
            .strikethrough_character_runs
            .iter()
            .map(|run| StrikethroughGlyphRun {
                glyph_run: visual.glyph_run(run.character_run),
                properties: run.properties.clone(),
            })
            .filter(|run| run.glyph_run.number_of_glyphs > 0)
            .collect();
        let character_spacing_runs = runs
            .character_spacing_runs
            .iter()
            .map(|run| CharacterSpacingGlyphRun {
                glyph_run: visual.glyph_run(run.character_run),
                value: run.value,
            })
            .filter(|run| run.glyph_run.number_of_glyphs > 0)
            .collect();
        visual.underline_runs = underline_runs;
        visual.strikethrough_runs = strikethrough_runs;
        visual.character_spacing_runs = character_spacing_runs;
    }

    fn update_colors(&mut self) {
        let runs = &self.logical.runs;
        let visual = &mut self.visual;
        visual.colors.clear();
        visual.color_indices =
            glyph_color_indices(&runs.color_runs, &visual.glyph_to_character, &mut visual.colors);
        visual.background_colors.clear();
        visual.background_color_indices = glyph_color_indices(
            &runs.background_color_runs,
            &visual.glyph_to_character,
            &mut visual.background_colors,
        );
    }
}

/// Replaces `range` of `values`, clamped to its length.
fn splice_clamped<T>(values: &mut Vec<T>, range: Range<usize>, replacement: Vec<T>) {
    let end = range.end.min(values.len());
    let start = range.start.min(end);
    values.splice(start..end, replacement);
}

/// Maps each glyph to the palette entry of the color run covering its first character.
///
/// `runs` must be normalized. Returns an empty vector when there are no runs.
fn glyph_color_indices(
    runs: &[ColorRun],
    glyph_to_character: &[CharacterIndex],
    palette: &mut Vec<Color>,
) -> Vec<ColorIndex> {
    if runs.is_empty() {
        return Vec::new();
    }
    let run_indices: Vec<ColorIndex> = runs
        .iter()
        .map(|run| palette_index(palette, run.color))
        .collect();
    glyph_to_character
        .iter()
        .map(|&character| {
            let position = runs.partition_point(|run| run.character_run.end() <= character);
            match runs.get(position) {
                Some(run) if run.character_run.contains(character) => run_indices[position],
                _ => 0,
            }
        })
        .collect()
}

fn palette_index(palette: &mut Vec<Color>, color: Color) -> ColorIndex {
    let position = match palette.iter().position(|&entry| entry == color) {
        Some(position) => position,
        None => {
            palette.push(color);
            palette.len() - 1
        }
    };
    ColorIndex::try_from(position + 1).unwrap_or_else(|_| {
        log::warn!("Too many distinct colors; falling back to the text color");
        0
    })
}
