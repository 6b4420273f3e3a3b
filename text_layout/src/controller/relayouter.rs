// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relayout, size queries and text fit.

use core::ops::Range;

use text_runs::{CharacterIndex, HorizontalAlignment, VerticalAlignment};

use super::{Controller, OperationsMask, UpdateTextType};
use crate::analysis::Direction;
use crate::error::LayoutError;
use crate::layout::alignment::{align, AlignmentSettings};
use crate::layout::reorder::{reorder_lines, ReorderInput};
use crate::layout::{layout_text, Layout, LayoutParameters};
use crate::model::Window;
use crate::{Size, Vector2, MACHINE_EPSILON_1000};

impl Controller {
    /// Brings the models up to date and lays the text out in a control of `size`.
    ///
    /// Only the pending operations run. A new size lays out every line again; a new
    /// `layout_direction` also recomputes bidi information and reshapes. A degenerate
    /// size drops the glyph positions and leaves everything else pending.
    pub fn relayout(&mut self, size: Size, layout_direction: Direction) -> UpdateTextType {
        let mut update = UpdateTextType::empty();
        if size.is_degenerate() {
            if !self.visual.glyph_positions.is_empty() {
                self.visual.glyph_positions.clear();
                update |= UpdateTextType::MODEL_UPDATED;
            }
            self.visual.control_size = Size::ZERO;
            log::debug!("Relayout skipped for degenerate size {size:?}");
            return update;
        }

        if self.text_fit.enabled {
            self.fit_point_size_for_layout(size);
            self.text_fit_content_size = size;
        }

        let new_size = !size.approx_eq(&self.visual.control_size);
        if new_size {
            let number_of_characters = self.logical.text.len();
            let info = &mut self.update_info;
            if info.number_of_characters_to_add == 0 && info.previous_number_of_characters == 0 {
                info.number_of_characters_to_add = number_of_characters;
            }
            info.full_relayout_needed = true;
            info.character_index = 0;
            self.pending_operations |= OperationsMask::LAYOUT
                | OperationsMask::ALIGN
                | OperationsMask::UPDATE_LAYOUT_SIZE
                | OperationsMask::REORDER;
            self.visual.control_size = size;
        }

        let direction_changed = layout_direction != self.layout_direction;
        if direction_changed {
            self.update_info.clear_all = true;
            self.pending_operations |= OperationsMask::GET_GLYPH_METRICS
                | OperationsMask::SHAPE_TEXT
                | OperationsMask::UPDATE_DIRECTION
                | OperationsMask::ALIGN
                | OperationsMask::LAYOUT
                | OperationsMask::BIDI_INFO
                | OperationsMask::REORDER;
            self.layout_direction = layout_direction;
        }

        let operations = self.pending_operations;
        let layout_size = match self.update_and_lay_out(size, operations) {
            Ok((updated, layout_size)) => {
                if updated {
                    update |= UpdateTextType::MODEL_UPDATED;
                }
                layout_size
            }
            Err(error) => {
                log::error!("Relayout failed: {error}");
                self.reset_text_update();
                return update;
            }
        };
        self.pending_operations = OperationsMask::empty();

        // Vertical alignment means nothing once an editor's text overflows its box.
        if !self.is_editable()
            || self.layout == Layout::SingleLine
            || layout_size.height < size.height
        {
            self.calculate_vertical_offset(size);
        }

        let decorator_stale = match &mut self.event_data {
            Some(event) => {
                event.decorator_stale |= new_size || direction_changed;
                event.decorator_stale
            }
            None => false,
        };
        if decorator_stale {
            self.update_cursor_position();
            update |= UpdateTextType::DECORATOR_UPDATED;
        }

        self.update_info.clear();
        log::trace!("Relayout at {size:?} returned {update:?}");
        update
    }

    fn update_and_lay_out(
        &mut self,
        size: Size,
        operations: OperationsMask,
    ) -> Result<(bool, Size), LayoutError> {
        let updated = self.update_model(operations)?;
        let (laid_out, layout_size) = self.do_relayout(size, operations)?;
        Ok((updated || laid_out, layout_size))
    }

    /// Runs the pending layout stages of `required` in a box of `size`.
    ///
    /// Returns whether anything ran and the size of the laid out text. The stored
    /// layout size only changes when [`OperationsMask::UPDATE_LAYOUT_SIZE`] runs.
    pub(super) fn do_relayout(
        &mut self,
        size: Size,
        required: OperationsMask,
    ) -> Result<(bool, Size), LayoutError> {
        let operations = self.pending_operations & required;
        let mut layout_size = self.visual.layout_size;
        let mut updated = false;
        let number_of_characters = self.logical.text.len();
        // A single line holds every glyph, so an edit anywhere moves all of them.
        let full = self.update_info.full_relayout_needed || self.layout == Layout::SingleLine;
        let info = self.update_info;
        let window = Window {
            start: info.paragraph_character_index,
            old_len: info.paragraph_number_of_characters,
            new_len: info.requested_number_of_characters,
        };
        let mut relaid_lines = None;

        if operations.contains(OperationsMask::LAYOUT) {
            let characters_to_glyph = self.visual.characters_to_glyph.len();
            if characters_to_glyph != self.visual.glyphs_per_character.len()
                || info.requested_number_of_characters > characters_to_glyph
                || (window.new_end() > characters_to_glyph && characters_to_glyph > 0)
            {
                return Err(LayoutError::InvalidUpdateWindow {
                    start: window.start,
                    requested: window.new_len,
                    number_of_characters,
                    characters_to_glyph,
                    glyphs_per_character: self.visual.glyphs_per_character.len(),
                });
            }

            if self.visual.glyphs.is_empty() {
                self.visual.lines.clear();
                self.visual.glyph_positions.clear();
                if operations.contains(OperationsMask::UPDATE_LAYOUT_SIZE) {
                    self.visual.layout_size = Size::ZERO;
                }
                return Ok((true, Size::ZERO));
            }

            let default_font = self.default_font_id();
            let logical = &self.logical;
            let visual = &mut self.visual;
            let parameters = LayoutParameters {
                layout: self.layout,
                box_width: size.width,
                text: logical.text.as_slice(),
                line_breaks: &logical.line_breaks,
                paragraphs: &logical.paragraphs,
                bounded_paragraphs: &logical.runs.bounded_paragraph_runs,
                glyphs: &visual.glyphs,
                glyph_to_character: &visual.glyph_to_character,
                characters_per_glyph: &visual.characters_per_glyph,
                characters_to_glyph: &visual.characters_to_glyph,
                default_font,
            };
            let relaid = layout_text(
                &parameters,
                window,
                !full,
                &*self.font_client,
                &mut visual.lines,
                &mut visual.glyph_positions,
            );
            relaid_lines = Some(relaid);

            let (width, height) = visual
                .lines
                .iter()
                .fold((0.0_f32, 0.0_f32), |(width, height), line| {
                    (width.max(line.width), height + line.height)
                });
            layout_size = Size::new(width, height);

            if operations.contains(OperationsMask::UPDATE_DIRECTION) {
                self.is_text_direction_rtl = visual
                    .lines
                    .first()
                    .is_some_and(|line| line.direction.is_rtl());
            }
            if operations.contains(OperationsMask::UPDATE_LAYOUT_SIZE) {
                visual.layout_size = layout_size;
            }
            updated = true;
        }

        if operations.contains(OperationsMask::REORDER) {
            let visual = &mut self.visual;
            let lines = match relaid_lines {
                Some(relaid) if !full => relaid,
                _ => 0..visual.lines.len(),
            };
            let input = ReorderInput {
                bidi_levels: &self.logical.bidi_levels,
                glyphs: &visual.glyphs,
                characters_to_glyph: &visual.characters_to_glyph,
                glyphs_per_character: &visual.glyphs_per_character,
            };
            reorder_lines(
                input,
                &mut visual.lines[lines],
                &mut visual.glyph_positions,
            );
            updated = true;
        }

        if operations.contains(OperationsMask::ALIGN) {
            let characters = if full {
                0..number_of_characters
            } else {
                window.start..window.new_end()
            };
            self.align_lines(size.width, characters);
            updated = true;
        }

        Ok((updated, layout_size))
    }

    /// Aligns the lines starting in `characters`.
    ///
    /// In multi-line layouts a bounded paragraph with its own alignment overrides the
    /// default for its lines.
    fn align_lines(&mut self, box_width: f32, characters: Range<CharacterIndex>) {
        let default = AlignmentSettings {
            alignment: self.horizontal_alignment,
            box_width,
            layout_direction: self.layout_direction,
            match_layout_direction: self.match_layout_direction,
        };
        let lines = &mut self.visual.lines;
        let bounded_paragraphs = &self.logical.runs.bounded_paragraph_runs;
        if bounded_paragraphs.is_empty() || self.layout == Layout::SingleLine {
            align(lines, characters.start, characters.end, default);
            return;
        }

        let mut align_start = characters.start;
        for run in bounded_paragraphs {
            let paragraph = run.character_run;
            if paragraph.end() <= align_start {
                continue;
            }
            if paragraph.character_index >= characters.end {
                break;
            }
            if align_start < paragraph.character_index {
                align(lines, align_start, paragraph.character_index, default);
                align_start = paragraph.character_index;
            }
            let end = paragraph.end().min(characters.end);
            let settings = AlignmentSettings {
                alignment: run.horizontal_alignment.unwrap_or(default.alignment),
                ..default
            };
            align(lines, align_start, end, settings);
            align_start = end;
        }
        if align_start < characters.end {
            align(lines, align_start, characters.end, default);
        }
    }

    /// Places the laid out text vertically within a control of `control_size`.
    fn calculate_vertical_offset(&mut self, control_size: Size) {
        let old_layout_size = self.visual.layout_size;
        let mut layout_size = old_layout_size;
        let default_line_height = self.default_font_line_height();
        if layout_size.height.abs() < MACHINE_EPSILON_1000 {
            layout_size.height = default_line_height;
        }

        // An editor showing its placeholder keeps the cursor at the height of the
        // default font.
        let recalculate = self.is_editable()
            && self.is_showing_placeholder_text()
            && (layout_size.height - default_line_height).abs() >= MACHINE_EPSILON_1000;
        if recalculate {
            layout_size.height = default_line_height;
        }

        let offset_y = match self.vertical_alignment {
            VerticalAlignment::Top => {
                self.scroll_position.y = 0.0;
                0.0
            }
            VerticalAlignment::Center => {
                self.scroll_position.y =
                    (0.5 * (control_size.height - layout_size.height)).floor();
                (0.5 * (layout_size.height - old_layout_size.height)).floor()
            }
            VerticalAlignment::Bottom => {
                self.scroll_position.y = control_size.height - layout_size.height;
                layout_size.height - old_layout_size.height
            }
        };

        if recalculate {
            for position in &mut self.visual.glyph_positions {
                position.y += offset_y;
            }
        }
    }

    fn update_cursor_position(&mut self) {
        let Some(index) = self.cursor_index() else {
            return;
        };
        let position = self.cursor_position_at(index);
        if let Some(event) = &mut self.event_data {
            event.cursor_position = position;
            event.decorator_stale = false;
        }
    }

    /// Position of a cursor before the character at `index`, relative to the top left
    /// of the laid out text.
    fn cursor_position_at(&self, index: CharacterIndex) -> Vector2 {
        let visual = &self.visual;
        let lines = &visual.lines;
        let line_index = lines
            .iter()
            .position(|line| index < line.character_end())
            .or_else(|| lines.len().checked_sub(1));
        let Some(line_index) = line_index else {
            let width = visual.control_size.width;
            let x = match self.horizontal_alignment {
                HorizontalAlignment::Begin => 0.0,
                HorizontalAlignment::Center => (0.5 * width).floor(),
                HorizontalAlignment::End => width,
            };
            return Vector2::new(x, 0.0);
        };

        let line = &lines[line_index];
        let y: f32 = lines[..line_index].iter().map(|line| line.height).sum();
        let pen_x = |glyph_index: usize| {
            let glyph = visual.glyphs.get(glyph_index)?;
            let position = visual.glyph_positions.get(glyph_index)?;
            Some((position.x - glyph.x_bearing, glyph.advance))
        };
        let x = if index < line.character_end() {
            let glyph_index = visual.characters_to_glyph.get(index).copied();
            let is_rtl = self
                .logical
                .bidi_levels
                .get(index)
                .is_some_and(|level| level % 2 == 1);
            match glyph_index.and_then(pen_x) {
                Some((x, advance)) if is_rtl => x + advance,
                Some((x, _)) => x,
                None => 0.0,
            }
        } else {
            line.glyph_end()
                .checked_sub(1)
                .filter(|_| line.number_of_glyphs > 0)
                .and_then(pen_x)
                .map_or(0.0, |(x, advance)| x + advance)
        };
        Vector2::new(x + line.alignment_offset, y)
    }

    // Size queries.

    /// Size of the text laid out without a width limit, with each dimension rounded
    /// up to an even number of pixels.
    ///
    /// The size is cached until the text or its style changes.
    pub fn natural_size(&mut self) -> Size {
        if let Some(size) = self.natural_size {
            return size;
        }
        let Some(layout_size) =
            self.layout_size_for(Size::MAX, OperationsMask::LAYOUT | OperationsMask::REORDER)
        else {
            return Size::ZERO;
        };
        let size = Size::new(
            convert_to_even(layout_size.width),
            convert_to_even(layout_size.height),
        );
        self.natural_size = Some(size);
        size
    }

    /// Height of the text laid out at `width`.
    pub fn height_for_width(&mut self, width: f32) -> f32 {
        let info = &self.update_info;
        if (width - self.visual.control_size.width).abs() > MACHINE_EPSILON_1000
            || info.full_relayout_needed
            || info.clear_all
        {
            self.layout_size_for(Size::new(width, f32::MAX), OperationsMask::LAYOUT)
                .map_or(0.0, |size| size.height)
        } else {
            self.visual.layout_size.height
        }
    }

    /// Lays the text out at `size` for a measurement, then schedules the layout at the
    /// control size again.
    fn layout_size_for(&mut self, size: Size, required: OperationsMask) -> Option<Size> {
        let pending = self.pending_operations;
        match self.calculate_layout_size(size, required) {
            Ok(layout_size) => {
                self.pending_operations = (pending - OperationsMask::ONLY_ONCE_OPERATIONS)
                    | OperationsMask::SIZE_OPERATIONS;
                Some(layout_size)
            }
            Err(error) => {
                log::error!("Measuring the text at {size:?} failed: {error}");
                self.pending_operations = pending | OperationsMask::SIZE_OPERATIONS;
                self.update_info.clear_all = true;
                self.update_info.full_relayout_needed = true;
                None
            }
        }
    }

    fn calculate_layout_size(
        &mut self,
        size: Size,
        required: OperationsMask,
    ) -> Result<Size, LayoutError> {
        let only_once = OperationsMask::ONLY_ONCE_OPERATIONS;
        let number_of_characters = self.logical.text.len();
        let info = &mut self.update_info;
        if info.number_of_characters_to_add == 0
            && info.previous_number_of_characters == 0
            && self.visual.control_size.is_degenerate()
        {
            info.number_of_characters_to_add = number_of_characters;
        }
        info.paragraph_character_index = 0;
        info.requested_number_of_characters = number_of_characters;
        info.full_relayout_needed = true;

        let layout_size = if self.is_editable() {
            let character_index = self.update_info.character_index;
            self.pending_operations |= required | only_once;
            let operations = self.pending_operations - OperationsMask::UPDATE_LAYOUT_SIZE;
            self.update_model(operations)?;
            let (_, layout_size) = self.do_relayout(size, operations)?;
            self.update_info.clear();
            self.update_info.character_index = character_index;
            layout_size
        } else {
            self.update_model(only_once)?;
            self.pending_operations |= required;
            let (_, layout_size) = self.do_relayout(size, only_once | required)?;
            self.update_info.clear();
            self.update_info.clear_all = true;
            self.pending_operations -= only_once;
            layout_size
        };
        self.update_info.full_relayout_needed = true;
        Ok(layout_size)
    }

    // Text fit.

    /// Lays the text out at `point_size` and reports whether it fits strictly inside
    /// `layout_size`.
    pub fn check_for_text_fit(&mut self, point_size: f32, layout_size: Size) -> bool {
        self.font_defaults.fit_point_size = Some(point_size);
        self.clear_font_data();

        let only_once = OperationsMask::ONLY_ONCE_OPERATIONS;
        self.update_info.paragraph_character_index = 0;
        self.update_info.requested_number_of_characters = self.logical.text.len();
        let measured = self.update_model(only_once).and_then(|_| {
            self.do_relayout(
                Size::new(layout_size.width, f32::MAX),
                only_once | OperationsMask::LAYOUT,
            )
        });
        self.update_info.clear();
        self.update_info.clear_all = true;

        match measured {
            Ok((_, text_size)) => {
                text_size.width < layout_size.width && text_size.height < layout_size.height
            }
            Err(error) => {
                log::error!("Text fit check at {point_size} failed: {error}");
                false
            }
        }
    }

    /// Picks the largest point size in the text fit range at which the text fits in
    /// `layout_size`, falling back to the minimum.
    ///
    /// Candidates are `min + k * step`, capped at the maximum; a binary search relies
    /// on fitting being monotonic in the point size. Nothing is done unless the
    /// layout size is pending or `layout_size` differs from the last fitted size.
    pub fn fit_point_size_for_layout(&mut self, layout_size: Size) {
        if !self
            .pending_operations
            .contains(OperationsMask::UPDATE_LAYOUT_SIZE)
            && self.text_fit_content_size.approx_eq(&layout_size)
        {
            return;
        }

        let settings = self.text_fit;
        let min = settings.min_size;
        let max = settings.max_size;
        let step = settings.step_size.max(1.0);
        let mut steps = step_count((max - min) / step);
        while min + steps as f32 * step < max {
            steps += 1;
        }
        let size_at = |index: u32| max.min(min + index as f32 * step);

        let previous = self.font_defaults.fit_point_size;
        let mut best = 0;
        let mut low = 1;
        let mut high = steps + 1;
        let mut best_is_latest = false;
        while low < high {
            let test = low + ((high - low) >> 1);
            if self.check_for_text_fit(size_at(test), layout_size) {
                best = test;
                low = test + 1;
                best_is_latest = true;
            } else {
                high = test;
                best_is_latest = false;
            }
        }

        let best_size = size_at(best);
        if !best_is_latest {
            self.check_for_text_fit(best_size, layout_size);
        }
        if previous != Some(best_size) {
            self.text_fit_changed = true;
        }
        log::debug!("Text fit chose point size {best_size} for {layout_size:?}");
        self.font_defaults.fit_point_size = Some(best_size);
        self.clear_font_data();
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "point size ranges are small and positive"
)]
fn step_count(steps: f32) -> u32 {
    steps.ceil().max(0.0) as u32
}

/// Truncates to whole pixels and rounds odd values up to the next even one.
#[expect(
    clippy::cast_possible_truncation,
    reason = "natural sizes are far below the i32 range; f32::MAX saturates"
)]
fn convert_to_even(value: f32) -> f32 {
    let value = value as i32;
    (value + (value & 1)) as f32
}

#[cfg(test)]
mod tests {
    use super::convert_to_even;

    #[test]
    fn even_sizes() {
        assert_eq!(convert_to_even(65.0), 66.0);
        assert_eq!(convert_to_even(66.9), 66.0);
        assert_eq!(convert_to_even(0.0), 0.0);
    }
}
