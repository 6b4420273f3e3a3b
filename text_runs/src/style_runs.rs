// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::run_list::shrink;
use crate::{
    insert_characters, normalize_runs, remove_characters, Anchor, BoundedParagraphRun,
    CharacterIndex, CharacterSpacingCharacterRun, ColorRun, EmbeddedItem,
    FontDescriptionRun, Length, Run, StrikethroughCharacterRun, UnderlinedCharacterRun,
};

/// Every style run list of one text instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRuns {
    /// Text color runs.
    pub color_runs: Vec<ColorRun>,
    /// Font description runs.
    pub font_description_runs: Vec<FontDescriptionRun>,
    /// Underline runs.
    pub underlined_character_runs: Vec<UnderlinedCharacterRun>,
    /// Strikethrough runs.
    pub strikethrough_character_runs: Vec<StrikethroughCharacterRun>,
    /// Background color runs.
    pub background_color_runs: Vec<ColorRun>,
    /// Bounded paragraph runs.
    pub bounded_paragraph_runs: Vec<BoundedParagraphRun>,
    /// Character spacing runs.
    pub character_spacing_runs: Vec<CharacterSpacingCharacterRun>,
    /// Hyperlinks, sorted by start index.
    pub anchors: Vec<Anchor>,
    /// Embedded items, sorted by character index.
    pub embedded_items: Vec<EmbeddedItem>,
}

impl StyleRuns {
    /// Removes every run.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether no run of any axis is present.
    pub fn is_empty(&self) -> bool {
        self.color_runs.is_empty()
            && self.font_description_runs.is_empty()
            && self.underlined_character_runs.is_empty()
            && self.strikethrough_character_runs.is_empty()
            && self.background_color_runs.is_empty()
            && self.bounded_paragraph_runs.is_empty()
            && self.character_spacing_runs.is_empty()
            && self.anchors.is_empty()
            && self.embedded_items.is_empty()
    }

    /// Flattens every axis into sorted, non-overlapping runs.
    ///
    /// See [`normalize_runs`].
    pub fn normalize(&mut self) {
        normalize_runs(&mut self.color_runs);
        normalize_runs(&mut self.font_description_runs);
        normalize_runs(&mut self.underlined_character_runs);
        normalize_runs(&mut self.strikethrough_character_runs);
        normalize_runs(&mut self.background_color_runs);
        normalize_runs(&mut self.bounded_paragraph_runs);
        normalize_runs(&mut self.character_spacing_runs);
        self.anchors.sort_by_key(|anchor| anchor.start_index);
        self.embedded_items.sort_by_key(|item| item.character_index);
    }

    /// Shifts and grows runs after `count` characters were inserted before `index`.
    pub fn insert_characters(&mut self, index: CharacterIndex, count: Length) {
        insert_characters(&mut self.color_runs, index, count);
        insert_characters(&mut self.font_description_runs, index, count);
        insert_characters(&mut self.underlined_character_runs, index, count);
        insert_characters(&mut self.strikethrough_character_runs, index, count);
        insert_characters(&mut self.background_color_runs, index, count);
        insert_characters(&mut self.bounded_paragraph_runs, index, count);
        insert_characters(&mut self.character_spacing_runs, index, count);
        for anchor in &mut self.anchors {
            if anchor.start_index >= index && !(anchor.start_index == index && index == 0) {
                anchor.start_index += count;
                anchor.end_index += count;
            } else if index <= anchor.end_index {
                anchor.end_index += count;
            }
        }
        for item in &mut self.embedded_items {
            if item.character_index >= index {
                item.character_index += count;
            }
        }
    }

    /// Shrinks and shifts runs after the characters `index..index + count` were removed.
    pub fn remove_characters(&mut self, index: CharacterIndex, count: Length) {
        if count == 0 {
            return;
        }
        remove_characters(&mut self.color_runs, index, count);
        remove_characters(&mut self.font_description_runs, index, count);
        remove_characters(&mut self.underlined_character_runs, index, count);
        remove_characters(&mut self.strikethrough_character_runs, index, count);
        remove_characters(&mut self.background_color_runs, index, count);
        remove_characters(&mut self.bounded_paragraph_runs, index, count);
        remove_characters(&mut self.character_spacing_runs, index, count);

        let removed_end = index + count;
        for anchor in &mut self.anchors {
            let run = shrink(anchor.character_run(), index, removed_end);
            anchor.start_index = run.character_index;
            anchor.end_index = run.end();
        }
        self.anchors.retain(|anchor| anchor.end_index > anchor.start_index);

        self.embedded_items
            .retain(|item| item.character_index < index || item.character_index >= removed_end);
        for item in &mut self.embedded_items {
            if item.character_index >= removed_end {
                item.character_index -= count;
            }
        }
    }

    /// One past the last character covered by any run, or `0` if there are no runs.
    pub fn max_end(&self) -> CharacterIndex {
        fn max_of<R: Run>(runs: &[R]) -> CharacterIndex {
            runs.iter()
                .map(|run| run.character_run().end())
                .max()
                .unwrap_or(0)
        }
        [
            max_of(&self.color_runs),
            max_of(&self.font_description_runs),
            max_of(&self.underlined_character_runs),
            max_of(&self.strikethrough_character_runs),
            max_of(&self.background_color_runs),
            max_of(&self.bounded_paragraph_runs),
            max_of(&self.character_spacing_runs),
            self.anchors
                .iter()
                .map(|anchor| anchor.end_index)
                .max()
                .unwrap_or(0),
            self.embedded_items
                .iter()
                .map(|item| item.character_index + 1)
                .max()
                .unwrap_or(0),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// The bounded paragraph covering `index`, if any.
    pub fn bounded_paragraph_at(&self, index: CharacterIndex) -> Option<&BoundedParagraphRun> {
        self.bounded_paragraph_runs
            .iter()
            .find(|run| run.character_run.contains(index))
    }

    /// The embedded item whose placeholder is at `index`, if any.
    pub fn embedded_item_at(&self, index: CharacterIndex) -> Option<&EmbeddedItem> {
        self.embedded_items
            .iter()
            .find(|item| item.character_index == index)
    }

    /// The anchor covering `index`, if any.
    pub fn anchor_at(&self, index: CharacterIndex) -> Option<&Anchor> {
        self.anchors
            .iter()
            .find(|anchor| anchor.character_run().contains(index))
    }
}
