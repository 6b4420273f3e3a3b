// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_runs::{CharacterIndex, Length};

/// Errors reported by the [`Controller`](crate::Controller) edit API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The edit addressed characters outside the text.
    #[error("invalid edit: {0}")]
    InvalidEdit(#[from] text_runs::Error),
}

/// Internal failures that abort a relayout pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum LayoutError {
    /// The update window doesn't fit the character or glyph tables.
    #[error(
        "update window {start}+{requested} is out of bounds for {number_of_characters} characters \
         ({characters_to_glyph} characters to glyph, {glyphs_per_character} glyphs per character)"
    )]
    InvalidUpdateWindow {
        start: CharacterIndex,
        requested: Length,
        number_of_characters: Length,
        characters_to_glyph: Length,
        glyphs_per_character: Length,
    },
}
