// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

/// Index of a character (Unicode code point) in logical order.
pub type CharacterIndex = usize;

/// Index of a glyph in the visual model.
pub type GlyphIndex = usize;

/// Index of a laid out line.
pub type LineIndex = usize;

/// A number of characters, glyphs or lines.
pub type Length = usize;

/// A contiguous range of characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CharacterRun {
    /// Index of the first character.
    pub character_index: CharacterIndex,
    /// Number of characters in the run.
    pub number_of_characters: Length,
}

impl CharacterRun {
    /// Creates a run starting at `character_index` covering `number_of_characters`.
    pub const fn new(character_index: CharacterIndex, number_of_characters: Length) -> Self {
        Self {
            character_index,
            number_of_characters,
        }
    }

    /// Creates a run from a character range.
    pub fn from_range(range: Range<CharacterIndex>) -> Self {
        Self::new(range.start, range.end.saturating_sub(range.start))
    }

    /// One past the last character of the run.
    #[inline]
    pub const fn end(&self) -> CharacterIndex {
        self.character_index + self.number_of_characters
    }

    /// The run as a character range.
    #[inline]
    pub const fn range(&self) -> Range<CharacterIndex> {
        self.character_index..self.end()
    }

    /// Whether the run covers no characters.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.number_of_characters == 0
    }

    /// Whether `index` falls within the run.
    #[inline]
    pub const fn contains(&self, index: CharacterIndex) -> bool {
        index >= self.character_index && index < self.end()
    }

    /// Whether the run shares at least one character with `range`.
    #[inline]
    pub fn intersects(&self, range: &Range<CharacterIndex>) -> bool {
        self.character_index < range.end && range.start < self.end()
    }
}
