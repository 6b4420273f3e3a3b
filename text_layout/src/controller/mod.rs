// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text controller: one text instance, its models and the work pending on them.

mod model_updater;
mod relayouter;
mod update_info;

use core::fmt;
use std::sync::Arc;

use text_runs::{
    CharacterBuffer, CharacterIndex, CharacterRun, Color, FontDescriptionRun,
    HorizontalAlignment, Length, StyleRuns, VerticalAlignment,
};

use crate::analysis::fonts::FontDefaults;
use crate::analysis::Direction;
use crate::error::Error;
use crate::font::{FontClient, FontDescription, FontId, FontIdCache};
use crate::layout::Layout;
use crate::model::{LogicalModel, VisualModel};
use crate::{Size, Vector2};

pub use update_info::{OperationsMask, TextUpdateInfo, UpdateTextType};

const FONT_CACHE_SIZE: usize = 64;

/// Bounds of the search for the largest point size that fits the control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFitSettings {
    /// Whether relayout fits the point size to the control.
    pub enabled: bool,
    /// Smallest candidate point size.
    pub min_size: f32,
    /// Largest candidate point size.
    pub max_size: f32,
    /// Distance between candidates. Values below one are treated as one.
    pub step_size: f32,
}

impl Default for TextFitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            min_size: 10.0,
            max_size: 100.0,
            step_size: 1.0,
        }
    }
}

/// Text shown by an editable controller while its text is empty.
#[derive(Clone, Debug, Default, PartialEq)]
struct Placeholder {
    text: String,
    point_size: Option<f32>,
}

/// State of an editable controller.
#[derive(Clone, Debug, Default)]
struct EventData {
    cursor_index: CharacterIndex,
    cursor_position: Vector2,
    /// The cursor position needs recomputing at the next relayout.
    decorator_stale: bool,
    is_showing_placeholder: bool,
}

/// One text instance: its characters and style runs, the analysis and layout derived
/// from them, and the operations still pending.
///
/// Edits and setters only record what changed; [`relayout`](Self::relayout) brings
/// the models up to date, redoing only the paragraphs affected by the edits when it
/// can.
///
/// ```
/// use std::sync::Arc;
/// use text_layout::testing::FixedMetricsFontClient;
/// use text_layout::{Controller, Direction, Size, UpdateTextType};
///
/// let mut controller = Controller::new(Arc::new(FixedMetricsFontClient::new()));
/// controller.set_text("Hello world");
/// let update = controller.relayout(Size::new(400.0, 100.0), Direction::LeftToRight);
/// assert!(update.contains(UpdateTextType::MODEL_UPDATED));
/// assert_eq!(controller.visual_model().lines().len(), 1);
/// ```
pub struct Controller {
    font_client: Arc<dyn FontClient>,
    logical: LogicalModel,
    visual: VisualModel,
    pending_operations: OperationsMask,
    update_info: TextUpdateInfo,
    font_defaults: FontDefaults,
    font_cache: FontIdCache,
    layout: Layout,
    horizontal_alignment: HorizontalAlignment,
    vertical_alignment: VerticalAlignment,
    layout_direction: Direction,
    match_layout_direction: bool,
    markup_enabled: bool,
    scroll_position: Vector2,
    natural_size: Option<Size>,
    text_fit: TextFitSettings,
    text_fit_content_size: Size,
    text_fit_changed: bool,
    is_text_direction_rtl: bool,
    placeholder: Placeholder,
    event_data: Option<EventData>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("logical", &self.logical)
            .field("visual", &self.visual)
            .field("pending_operations", &self.pending_operations)
            .field("update_info", &self.update_info)
            .field("font_defaults", &self.font_defaults)
            .field("layout", &self.layout)
            .field("horizontal_alignment", &self.horizontal_alignment)
            .field("vertical_alignment", &self.vertical_alignment)
            .field("layout_direction", &self.layout_direction)
            .field("text_fit", &self.text_fit)
            .field("event_data", &self.event_data)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Creates an empty, non-editable, single line controller.
    pub fn new(font_client: Arc<dyn FontClient>) -> Self {
        Self {
            font_client,
            logical: LogicalModel::default(),
            visual: VisualModel::default(),
            pending_operations: OperationsMask::ALL_OPERATIONS,
            update_info: TextUpdateInfo::default(),
            font_defaults: FontDefaults::default(),
            font_cache: FontIdCache::new(FONT_CACHE_SIZE),
            layout: Layout::SingleLine,
            horizontal_alignment: HorizontalAlignment::Begin,
            vertical_alignment: VerticalAlignment::Top,
            layout_direction: Direction::LeftToRight,
            match_layout_direction: false,
            markup_enabled: false,
            scroll_position: Vector2::ZERO,
            natural_size: None,
            text_fit: TextFitSettings::default(),
            text_fit_content_size: Size::ZERO,
            text_fit_changed: false,
            is_text_direction_rtl: false,
            placeholder: Placeholder::default(),
            event_data: None,
        }
    }

    /// The text, or an empty string while the placeholder is shown.
    pub fn text(&self) -> String {
        if self.is_showing_placeholder_text() {
            return String::new();
        }
        self.logical.text.as_slice().iter().collect()
    }

    /// The per character model.
    pub fn logical_model(&self) -> &LogicalModel {
        &self.logical
    }

    /// The per glyph and per line model.
    pub fn visual_model(&self) -> &VisualModel {
        &self.visual
    }

    /// Operations the next relayout will run.
    pub fn pending_operations(&self) -> OperationsMask {
        self.pending_operations
    }

    /// The edits recorded since the last relayout.
    pub fn update_info(&self) -> &TextUpdateInfo {
        &self.update_info
    }

    /// How lines are formed.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The default horizontal alignment.
    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    /// The vertical alignment.
    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment
    }

    /// The layout direction of the last relayout.
    pub fn layout_direction(&self) -> Direction {
        self.layout_direction
    }

    /// Offset of the laid out text within the control.
    pub fn scroll_position(&self) -> Vector2 {
        self.scroll_position
    }

    /// Whether the first line of the text is right to left.
    pub fn is_text_direction_rtl(&self) -> bool {
        self.is_text_direction_rtl
    }

    /// The default point size.
    pub fn default_point_size(&self) -> f32 {
        self.font_defaults.point_size
    }

    /// The text fit settings.
    pub fn text_fit(&self) -> TextFitSettings {
        self.text_fit
    }

    /// The point size chosen by the last text fit, if any.
    pub fn fit_point_size(&self) -> Option<f32> {
        self.font_defaults.fit_point_size
    }

    /// Whether a text fit changed the point size since the flag was last reset.
    pub fn text_fit_changed(&self) -> bool {
        self.text_fit_changed
    }

    /// Resets [`text_fit_changed`](Self::text_fit_changed).
    pub fn reset_text_fit_changed(&mut self) {
        self.text_fit_changed = false;
    }

    /// Whether the controller keeps editing state.
    pub fn is_editable(&self) -> bool {
        self.event_data.is_some()
    }

    /// Whether the placeholder text is shown in place of the empty text.
    pub fn is_showing_placeholder_text(&self) -> bool {
        self.event_data
            .as_ref()
            .is_some_and(|event| event.is_showing_placeholder)
    }

    /// The cursor index of an editable controller.
    pub fn cursor_index(&self) -> Option<CharacterIndex> {
        self.event_data.as_ref().map(|event| event.cursor_index)
    }

    /// The cursor position computed by the last relayout, relative to the top left of
    /// the laid out text.
    pub fn cursor_position(&self) -> Option<Vector2> {
        self.event_data.as_ref().map(|event| event.cursor_position)
    }

    /// Number of laid out lines.
    pub fn number_of_lines(&self) -> usize {
        self.visual.lines.len()
    }

    /// Number of lines the text takes when laid out at `width`.
    pub fn line_count(&mut self, width: f32) -> usize {
        self.height_for_width(width);
        self.visual.lines.len()
    }

    // Configuration.

    /// Sets the font used where no font run applies.
    pub fn set_default_font(&mut self, description: FontDescription) {
        if self.font_defaults.description != description {
            self.font_defaults.description = description;
            self.clear_font_data();
        }
    }

    /// Sets the point size used where no font run sets one.
    pub fn set_default_point_size(&mut self, point_size: f32) {
        if self.font_defaults.point_size != point_size {
            self.font_defaults.point_size = point_size;
            self.clear_font_data();
        }
    }

    /// Sets the text fit settings. Disabling text fit restores the default point size.
    pub fn set_text_fit(&mut self, settings: TextFitSettings) {
        self.text_fit = settings;
        self.text_fit_content_size = Size::ZERO;
        if !settings.enabled && self.font_defaults.fit_point_size.take().is_some() {
            self.clear_font_data();
        }
    }

    /// Sets the default horizontal alignment.
    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        if self.horizontal_alignment != alignment {
            self.horizontal_alignment = alignment;
            self.realign();
        }
    }

    /// Sets the vertical alignment, applied at the next relayout.
    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        self.vertical_alignment = alignment;
    }

    /// Switches between single line and multi-line layout.
    pub fn set_multi_line(&mut self, multi_line: bool) {
        let layout = if multi_line {
            Layout::MultiLine
        } else {
            Layout::SingleLine
        };
        if self.layout != layout {
            self.layout = layout;
            self.pending_operations |= OperationsMask::LAYOUT
                | OperationsMask::ALIGN
                | OperationsMask::UPDATE_LAYOUT_SIZE
                | OperationsMask::REORDER;
            self.update_info.full_relayout_needed = true;
            self.natural_size = None;
        }
    }

    /// Resolves `Begin` and `End` against the layout direction rather than each
    /// paragraph's direction.
    pub fn set_match_layout_direction(&mut self, match_layout_direction: bool) {
        if self.match_layout_direction != match_layout_direction {
            self.match_layout_direction = match_layout_direction;
            self.realign();
        }
    }

    /// Whether [`set_text`](Self::set_text) interprets markup.
    pub fn set_markup_enabled(&mut self, enabled: bool) {
        self.markup_enabled = enabled;
    }

    /// Adds or drops editing state. Editable controllers keep a cursor and show the
    /// placeholder text while empty.
    pub fn set_editable(&mut self, editable: bool) {
        match (editable, self.event_data.is_some()) {
            (true, false) => {
                self.event_data = Some(EventData {
                    cursor_index: self.logical.text.len(),
                    decorator_stale: true,
                    ..EventData::default()
                });
                self.show_placeholder_if_needed();
            }
            (false, true) => {
                self.hide_placeholder();
                self.event_data = None;
            }
            _ => {}
        }
    }

    /// Sets the placeholder text and its point size, `None` meaning the default size.
    pub fn set_placeholder_text(&mut self, text: &str, point_size: Option<f32>) {
        let placeholder = Placeholder {
            text: text.to_owned(),
            point_size,
        };
        if self.placeholder != placeholder {
            self.hide_placeholder();
            self.placeholder = placeholder;
            self.show_placeholder_if_needed();
        }
    }

    /// Sets the color used where no color run applies.
    pub fn set_text_color(&mut self, color: Color) {
        self.visual.text_color = color;
    }

    /// Sets the cursor of an editable controller, clamped to the text.
    pub fn set_cursor_index(&mut self, index: CharacterIndex) {
        let len = if self.is_showing_placeholder_text() {
            0
        } else {
            self.logical.text.len()
        };
        self.move_cursor(index.min(len));
    }

    // Edits.

    /// Replaces the whole text. With markup enabled, `text` is parsed into plain text
    /// and style runs first.
    pub fn set_text(&mut self, text: &str) {
        let (characters, runs) = if self.markup_enabled {
            let markup = text_markup::process_markup(text);
            (markup.characters(), markup.runs)
        } else {
            (CharacterBuffer::from(text), StyleRuns::default())
        };
        self.logical.text = characters;
        self.logical.runs = runs;
        if let Some(event) = &mut self.event_data {
            event.is_showing_placeholder = false;
            event.cursor_index = self.logical.text.len();
            event.decorator_stale = true;
        }
        log::debug!("Text set to {} characters", self.logical.text.len());
        self.reset_text_update();
        self.show_placeholder_if_needed();
    }

    /// Inserts plain `text` before the character at `index`.
    pub fn insert_text(&mut self, index: CharacterIndex, text: &str) -> Result<(), Error> {
        self.hide_placeholder();
        let previous_len = self.logical.text.len();
        let last_new_paragraph = self.logical.is_last_character_new_paragraph();
        let added = match self.logical.text.insert(index, text) {
            Ok(added) => added,
            Err(error) => {
                self.show_placeholder_if_needed();
                return Err(error.into());
            }
        };
        if added > 0 {
            self.logical.runs.insert_characters(index, added);
            self.record_edit(index, 0, added, previous_len, last_new_paragraph);
            self.move_cursor(index + added);
        }
        self.show_placeholder_if_needed();
        Ok(())
    }

    /// Removes `count` characters starting at `index`.
    pub fn remove_text(&mut self, index: CharacterIndex, count: Length) -> Result<(), Error> {
        self.replace_text(index, count, "")
    }

    /// Replaces `count` characters starting at `index` with plain `text`.
    pub fn replace_text(
        &mut self,
        index: CharacterIndex,
        count: Length,
        text: &str,
    ) -> Result<(), Error> {
        self.hide_placeholder();
        let previous_len = self.logical.text.len();
        let last_new_paragraph = self.logical.is_last_character_new_paragraph();
        let added = match self
            .logical
            .text
            .replace(index..index.saturating_add(count), text)
        {
            Ok(added) => added,
            Err(error) => {
                self.show_placeholder_if_needed();
                return Err(error.into());
            }
        };
        if count > 0 {
            self.logical.runs.remove_characters(index, count);
            self.record_edit(index, count, 0, previous_len, last_new_paragraph);
        }
        if added > 0 {
            self.logical.runs.insert_characters(index, added);
            self.record_edit(index, 0, added, previous_len - count, last_new_paragraph);
        }
        if count > 0 || added > 0 {
            self.move_cursor(index + added);
        }
        self.show_placeholder_if_needed();
        Ok(())
    }

    // Bookkeeping.

    /// Records an edit of the text, merging it with the edit already pending when the
    /// two are contiguous. Anything else schedules a rebuild of the whole model.
    fn record_edit(
        &mut self,
        index: CharacterIndex,
        removed: Length,
        added: Length,
        previous_len: Length,
        last_new_paragraph: bool,
    ) {
        let info = &mut self.update_info;
        if info.is_clear() {
            info.character_index = index;
            info.number_of_characters_to_remove = removed;
            info.number_of_characters_to_add = added;
            info.is_last_character_new_paragraph = last_new_paragraph;
            if info.previous_number_of_characters != previous_len {
                info.clear_all = true;
            }
        } else {
            let start = info.character_index;
            let end = start + info.number_of_characters_to_add;
            if removed == 0 && (start..=end).contains(&index) {
                info.number_of_characters_to_add += added;
            } else if added == 0 && index >= start && index + removed <= end {
                info.number_of_characters_to_add -= removed;
            } else {
                log::trace!("Edit at {index} is not contiguous with the pending edit at {start}");
                info.clear_all = true;
            }
        }
        self.pending_operations |= OperationsMask::ALL_OPERATIONS;
        self.natural_size = None;
    }

    /// Schedules a rebuild of the whole model.
    fn reset_text_update(&mut self) {
        let info = &mut self.update_info;
        info.character_index = 0;
        info.number_of_characters_to_remove = info.previous_number_of_characters;
        info.number_of_characters_to_add = self.logical.text.len();
        info.clear_all = true;
        info.full_relayout_needed = true;
        self.pending_operations |= OperationsMask::ALL_OPERATIONS;
        self.natural_size = None;
    }

    /// Schedules font validation, shaping and layout of the whole text.
    fn clear_font_data(&mut self) {
        let info = &mut self.update_info;
        info.character_index = 0;
        info.number_of_characters_to_remove = info.previous_number_of_characters;
        info.number_of_characters_to_add = self.logical.text.len();
        info.clear_all = true;
        info.full_relayout_needed = true;
        self.natural_size = None;
        self.pending_operations |= OperationsMask::VALIDATE_FONTS
            | OperationsMask::SHAPE_TEXT
            | OperationsMask::BIDI_INFO
            | OperationsMask::GET_GLYPH_METRICS
            | OperationsMask::LAYOUT
            | OperationsMask::UPDATE_LAYOUT_SIZE
            | OperationsMask::REORDER
            | OperationsMask::ALIGN;
    }

    /// Schedules alignment of every line.
    fn realign(&mut self) {
        self.pending_operations |= OperationsMask::ALIGN;
        self.update_info.full_relayout_needed = true;
        if let Some(event) = &mut self.event_data {
            event.decorator_stale = true;
        }
    }

    fn move_cursor(&mut self, index: CharacterIndex) {
        if let Some(event) = &mut self.event_data {
            event.cursor_index = index;
            event.decorator_stale = true;
        }
    }

    fn show_placeholder_if_needed(&mut self) {
        let Some(event) = &mut self.event_data else {
            return;
        };
        if event.is_showing_placeholder
            || !self.logical.text.is_empty()
            || self.placeholder.text.is_empty()
        {
            return;
        }
        event.is_showing_placeholder = true;
        event.cursor_index = 0;
        event.decorator_stale = true;

        self.logical.text = CharacterBuffer::from(self.placeholder.text.as_str());
        self.logical.runs.clear();
        if let Some(point_size) = self.placeholder.point_size {
            let mut run = FontDescriptionRun::new(CharacterRun::new(0, self.logical.text.len()));
            run.size = Some(point_size);
            self.logical.runs.font_description_runs.push(run);
        }
        self.reset_text_update();
    }

    fn hide_placeholder(&mut self) {
        let Some(event) = &mut self.event_data else {
            return;
        };
        if !event.is_showing_placeholder {
            return;
        }
        event.is_showing_placeholder = false;
        self.logical.text.clear();
        self.logical.runs.clear();
        self.reset_text_update();
    }

    /// The face used where no font run applies.
    fn default_font_id(&mut self) -> FontId {
        let description = &self.font_defaults.description;
        let point_size = self.font_defaults.point_size();
        let client = &self.font_client;
        self.font_cache.font_id(description, point_size, || {
            client.font_id(description, point_size)
        })
    }

    /// Ascender to descender span of the default face.
    fn default_font_line_height(&mut self) -> f32 {
        let font_id = self.default_font_id();
        let metrics = self.font_client.font_metrics(font_id);
        metrics.ascender - metrics.descender
    }
}
