// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bitflags::bitflags;
use text_runs::{CharacterIndex, GlyphIndex, Length, LineIndex};

bitflags! {
    /// Stages of the text pipeline.
    ///
    /// A controller accumulates the stages invalidated by edits and setters, and the
    /// next relayout runs exactly those.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OperationsMask: u16 {
        /// Decode the text into characters.
        const CONVERT_TO_UTF32 = 1 << 0;
        /// Itemize the text into script runs.
        const GET_SCRIPTS = 1 << 1;
        /// Resolve font runs.
        const VALIDATE_FONTS = 1 << 2;
        /// Compute line break opportunities and paragraphs.
        const GET_LINE_BREAKS = 1 << 3;
        /// Compute bidi levels and paragraph directions.
        const BIDI_INFO = 1 << 4;
        /// Shape the text into glyphs.
        const SHAPE_TEXT = 1 << 5;
        /// Adjust glyph metrics for new paragraphs, embedded items and spacing.
        const GET_GLYPH_METRICS = 1 << 6;
        /// Break lines and position glyphs.
        const LAYOUT = 1 << 7;
        /// Store the size of the laid out text.
        const UPDATE_LAYOUT_SIZE = 1 << 8;
        /// Compute the visual order of right to left lines.
        const REORDER = 1 << 9;
        /// Align lines horizontally.
        const ALIGN = 1 << 10;
        /// Map color runs to glyph colors.
        const COLOR = 1 << 11;
        /// Record the direction of the first line.
        const UPDATE_DIRECTION = 1 << 12;

        /// Stages that depend only on the text and its style, not on the box size.
        const ONLY_ONCE_OPERATIONS = Self::CONVERT_TO_UTF32.bits()
            | Self::GET_SCRIPTS.bits()
            | Self::VALIDATE_FONTS.bits()
            | Self::GET_LINE_BREAKS.bits()
            | Self::BIDI_INFO.bits()
            | Self::SHAPE_TEXT.bits()
            | Self::GET_GLYPH_METRICS.bits();
        /// Stages that depend on the box size.
        const SIZE_OPERATIONS = Self::LAYOUT.bits() | Self::ALIGN.bits() | Self::REORDER.bits();
        /// Every stage.
        const ALL_OPERATIONS = (1 << 13) - 1;
    }
}

bitflags! {
    /// What a relayout changed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct UpdateTextType: u8 {
        /// Glyphs, lines or positions changed.
        const MODEL_UPDATED = 1 << 0;
        /// The cursor moved.
        const DECORATOR_UPDATED = 1 << 1;
    }
}

/// Which characters changed since the last relayout, and the window derived from them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextUpdateInfo {
    /// First edited character, or `usize::MAX` when nothing was edited.
    pub character_index: CharacterIndex,
    /// Characters removed at `character_index`.
    pub number_of_characters_to_remove: Length,
    /// Characters added at `character_index`.
    pub number_of_characters_to_add: Length,
    /// Length of the text when the model was last updated.
    pub previous_number_of_characters: Length,
    /// First character of the first paragraph to update.
    pub paragraph_character_index: CharacterIndex,
    /// Length of the paragraphs to update, before the edit.
    pub paragraph_number_of_characters: Length,
    /// Length of the paragraphs to update, after the edit.
    pub requested_number_of_characters: Length,
    /// First glyph of the paragraphs to update.
    pub start_glyph_index: GlyphIndex,
    /// First line of the paragraphs to update.
    pub start_line_index: LineIndex,
    /// Line count estimate used to reserve space.
    pub estimated_number_of_lines: Length,
    /// Rebuild the whole model rather than a window.
    pub clear_all: bool,
    /// Lay out every line rather than the window's.
    pub full_relayout_needed: bool,
    /// The text ended with a new paragraph character at the last relayout.
    pub is_last_character_new_paragraph: bool,
}

impl Default for TextUpdateInfo {
    fn default() -> Self {
        Self {
            character_index: CharacterIndex::MAX,
            number_of_characters_to_remove: 0,
            number_of_characters_to_add: 0,
            previous_number_of_characters: 0,
            paragraph_character_index: 0,
            paragraph_number_of_characters: 0,
            requested_number_of_characters: 0,
            start_glyph_index: 0,
            start_line_index: 0,
            estimated_number_of_lines: 0,
            clear_all: true,
            full_relayout_needed: true,
            is_last_character_new_paragraph: false,
        }
    }
}

impl TextUpdateInfo {
    /// Whether no edit is recorded.
    pub fn is_clear(&self) -> bool {
        self.character_index == CharacterIndex::MAX
    }

    /// Forgets everything except the previous number of characters.
    pub fn clear(&mut self) {
        *self = Self {
            previous_number_of_characters: self.previous_number_of_characters,
            clear_all: false,
            full_relayout_needed: false,
            ..Self::default()
        };
    }
}
