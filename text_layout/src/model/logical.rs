// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_runs::{CharacterBuffer, StyleRuns};

use crate::analysis::{
    is_new_paragraph, Direction, FontRun, LineBreakInfo, ParagraphRun, ScriptRun,
};

/// Per character data of a text: the characters, their style runs and the results of
/// text analysis.
#[derive(Clone, Debug, Default)]
pub struct LogicalModel {
    pub(crate) text: CharacterBuffer,
    pub(crate) runs: StyleRuns,
    pub(crate) line_breaks: Vec<LineBreakInfo>,
    pub(crate) paragraphs: Vec<ParagraphRun>,
    pub(crate) scripts: Vec<ScriptRun>,
    pub(crate) fonts: Vec<FontRun>,
    pub(crate) bidi_levels: Vec<u8>,
}

impl LogicalModel {
    /// The characters, in logical order.
    pub fn text(&self) -> &CharacterBuffer {
        &self.text
    }

    /// The style runs.
    pub fn runs(&self) -> &StyleRuns {
        &self.runs
    }

    /// Line break opportunity after each character.
    pub fn line_breaks(&self) -> &[LineBreakInfo] {
        &self.line_breaks
    }

    /// The paragraphs.
    pub fn paragraphs(&self) -> &[ParagraphRun] {
        &self.paragraphs
    }

    /// The script runs. None of them crosses a paragraph boundary.
    pub fn scripts(&self) -> &[ScriptRun] {
        &self.scripts
    }

    /// The resolved font runs. None of them crosses a paragraph boundary.
    pub fn fonts(&self) -> &[FontRun] {
        &self.fonts
    }

    /// Bidi embedding level of each character.
    pub fn bidi_levels(&self) -> &[u8] {
        &self.bidi_levels
    }

    /// Whether any character is right to left.
    pub fn has_right_to_left(&self) -> bool {
        self.bidi_levels.iter().any(|level| level % 2 == 1)
    }

    /// Base direction of the paragraph containing `index`, or of the last paragraph
    /// when `index` is past the end.
    pub fn paragraph_direction(&self, index: usize) -> Option<Direction> {
        let position = self
            .paragraphs
            .partition_point(|paragraph| paragraph.character_run.end() <= index);
        self.paragraphs
            .get(position)
            .or(self.paragraphs.last())
            .map(|paragraph| paragraph.direction)
    }

    /// Whether the last character ends a paragraph.
    pub(crate) fn is_last_character_new_paragraph(&self) -> bool {
        self.text
            .as_slice()
            .last()
            .is_some_and(|&character| is_new_paragraph(character))
    }

    /// Drops all analysis results; the characters and style runs are kept.
    pub(crate) fn clear_analysis(&mut self) {
        self.line_breaks.clear();
        self.paragraphs.clear();
        self.scripts.clear();
        self.fonts.clear();
        self.bidi_levels.clear();
    }
}
