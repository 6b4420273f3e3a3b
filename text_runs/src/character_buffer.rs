// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::Range;

use crate::{CharacterIndex, Error};

/// An ordered sequence of Unicode code points in logical order.
///
/// Indices are dense character indices, not byte offsets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterBuffer {
    characters: Vec<char>,
}

impl CharacterBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Returns `true` if the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Borrow the characters.
    pub fn as_slice(&self) -> &[char] {
        &self.characters
    }

    /// The character at `index`, if any.
    pub fn get(&self, index: CharacterIndex) -> Option<char> {
        self.characters.get(index).copied()
    }

    /// Replaces the whole content.
    pub fn set_text(&mut self, text: &str) {
        self.characters.clear();
        self.characters.extend(text.chars());
    }

    /// Removes every character.
    pub fn clear(&mut self) {
        self.characters.clear();
    }

    /// Appends a single character.
    pub fn push(&mut self, character: char) {
        self.characters.push(character);
    }

    /// Inserts `text` before the character at `index`.
    ///
    /// Returns the number of inserted characters.
    pub fn insert(&mut self, index: CharacterIndex, text: &str) -> Result<usize, Error> {
        let len = self.len();
        if index > len {
            return Err(Error::invalid_bounds(index, index, len));
        }
        let before = len;
        self.characters.splice(index..index, text.chars());
        Ok(self.len() - before)
    }

    /// Removes the characters in `range`.
    pub fn remove(&mut self, range: Range<CharacterIndex>) -> Result<(), Error> {
        Error::check_range(range.start, range.end, self.len())?;
        self.characters.drain(range);
        Ok(())
    }

    /// Replaces the characters in `range` by `text`.
    ///
    /// Returns the number of inserted characters.
    pub fn replace(&mut self, range: Range<CharacterIndex>, text: &str) -> Result<usize, Error> {
        Error::check_range(range.start, range.end, self.len())?;
        let before = self.len() - range.len();
        self.characters.splice(range, text.chars());
        Ok(self.len() - before)
    }

    /// Collects the characters in `range` into a `String`.
    pub fn substring(&self, range: Range<CharacterIndex>) -> Result<String, Error> {
        Error::check_range(range.start, range.end, self.len())?;
        Ok(self.characters[range].iter().collect())
    }
}

impl From<&str> for CharacterBuffer {
    fn from(text: &str) -> Self {
        Self {
            characters: text.chars().collect(),
        }
    }
}

impl fmt::Display for CharacterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for c in &self.characters {
            f.write_char(*c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CharacterBuffer;
    use crate::ErrorKind;

    #[test]
    fn edits_use_character_indices() {
        let mut buffer = CharacterBuffer::from("héllo");
        assert_eq!(buffer.len(), 5);

        assert_eq!(buffer.insert(1, "ab").unwrap(), 2);
        assert_eq!(buffer.to_string(), "habéllo");

        buffer.remove(3..5).unwrap();
        assert_eq!(buffer.to_string(), "hablo");

        assert_eq!(buffer.replace(0..1, "XYZ").unwrap(), 3);
        assert_eq!(buffer.to_string(), "XYZablo");
        assert_eq!(buffer.substring(3..5).unwrap(), "ab");
    }

    #[expect(
        clippy::reversed_empty_ranges,
        reason = "We want an invalid range for testing."
    )]
    #[test]
    fn bad_ranges_are_rejected() {
        let mut buffer = CharacterBuffer::from("abc");
        assert_eq!(
            buffer.insert(4, "x").unwrap_err().kind(),
            ErrorKind::InvalidBounds
        );
        assert_eq!(
            buffer.remove(2..1).unwrap_err().kind(),
            ErrorKind::InvalidRange
        );
        assert_eq!(
            buffer.replace(1..7, "x").unwrap_err().kind(),
            ErrorKind::InvalidBounds
        );
        assert_eq!(buffer.to_string(), "abc");
    }
}
