// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per character text analysis: line break opportunities, paragraphs, scripts,
//! bidirectional levels and font validation.

pub(crate) mod bidi;
pub(crate) mod fonts;
pub(crate) mod script;

use core::ops::Range;

use text_runs::{CharacterIndex, CharacterRun, Length};
use unicode_linebreak::{linebreaks, BreakOpportunity};

pub use bidi::Direction;
pub use fonts::FontRun;
pub use script::ScriptRun;

/// Line break opportunity after a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineBreakInfo {
    /// A line must end after this character.
    MustBreak,
    /// A line may end after this character.
    AllowBreak,
    /// The line can't be broken after this character.
    #[default]
    NoBreak,
}

/// Whether `character` ends a paragraph.
pub fn is_new_paragraph(character: char) -> bool {
    matches!(
        character,
        '\n' | '\u{b}' | '\u{c}' | '\r' | '\u{85}' | '\u{2029}'
    )
}

/// Whether `character` is white space for the purpose of line fitting.
pub(crate) fn is_white_space(character: char) -> bool {
    character.is_whitespace()
}

/// Computes the line break opportunity after every character of `text`.
///
/// The last character always gets [`LineBreakInfo::MustBreak`].
pub(crate) fn line_break_info(text: &[char]) -> Vec<LineBreakInfo> {
    let mut info = vec![LineBreakInfo::NoBreak; text.len()];
    if text.is_empty() {
        return info;
    }

    let string: String = text.iter().collect();
    let starts: Vec<usize> = string.char_indices().map(|(offset, _)| offset).collect();
    for (offset, opportunity) in linebreaks(&string) {
        // A break at `offset` comes after the character that precedes it.
        let Some(index) = starts.partition_point(|&start| start < offset).checked_sub(1) else {
            continue;
        };
        info[index] = match opportunity {
            BreakOpportunity::Mandatory => LineBreakInfo::MustBreak,
            BreakOpportunity::Allowed => LineBreakInfo::AllowBreak,
        };
    }
    if let Some(last) = info.last_mut() {
        *last = LineBreakInfo::MustBreak;
    }
    info
}

/// A paragraph: a run of characters ended by a new paragraph character or the end of
/// the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParagraphRun {
    /// The characters of the paragraph, including its new paragraph character.
    pub character_run: CharacterRun,
    /// Base direction of the paragraph.
    pub direction: Direction,
}

/// Splits `text` into paragraphs.
///
/// The base direction of each paragraph is that of its first strong character, or
/// `default_direction` if it has none.
pub(crate) fn paragraphs(text: &[char], default_direction: Direction) -> Vec<ParagraphRun> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    for (index, &character) in text.iter().enumerate() {
        if is_new_paragraph(character) {
            paragraphs.push(paragraph(text, start..index + 1, default_direction));
            start = index + 1;
        }
    }
    if start < text.len() {
        paragraphs.push(paragraph(text, start..text.len(), default_direction));
    }
    paragraphs
}

fn paragraph(text: &[char], range: Range<usize>, default_direction: Direction) -> ParagraphRun {
    ParagraphRun {
        direction: bidi::first_strong_direction(&text[range.clone()])
            .unwrap_or(default_direction),
        character_run: CharacterRun::from_range(range),
    }
}

/// Indices of the paragraphs overlapping `index..index + count`. A `count` of zero is
/// treated as one character.
pub(crate) fn find_paragraphs(
    paragraphs: &[ParagraphRun],
    index: CharacterIndex,
    count: Length,
) -> Range<usize> {
    let end = index + count.max(1);
    let first = paragraphs.partition_point(|paragraph| paragraph.character_run.end() <= index);
    let last = paragraphs.partition_point(|paragraph| paragraph.character_run.character_index < end);
    first..last.max(first)
}

#[cfg(test)]
mod tests {
    use super::{find_paragraphs, line_break_info, paragraphs, Direction, LineBreakInfo};
    use text_runs::CharacterRun;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn break_opportunities_follow_spaces() {
        let info = line_break_info(&chars("ab cd"));
        assert_eq!(
            info,
            [
                LineBreakInfo::NoBreak,
                LineBreakInfo::NoBreak,
                LineBreakInfo::AllowBreak,
                LineBreakInfo::NoBreak,
                LineBreakInfo::MustBreak,
            ]
        );
    }

    #[test]
    fn new_lines_must_break() {
        let info = line_break_info(&chars("a\nb"));
        assert_eq!(info[1], LineBreakInfo::MustBreak);
        assert_eq!(info[2], LineBreakInfo::MustBreak);
    }

    #[test]
    fn multi_byte_characters_map_to_character_indices() {
        let info = line_break_info(&chars("\u{e9}\u{e9} x"));
        assert_eq!(info[2], LineBreakInfo::AllowBreak);
        assert_eq!(info.len(), 4);
    }

    #[test]
    fn paragraphs_include_their_separator() {
        let text = chars("one\ntwo\n\nthree");
        let runs: Vec<_> = paragraphs(&text, Direction::LeftToRight)
            .iter()
            .map(|paragraph| paragraph.character_run)
            .collect();
        assert_eq!(
            runs,
            [
                CharacterRun::new(0, 4),
                CharacterRun::new(4, 4),
                CharacterRun::new(8, 1),
                CharacterRun::new(9, 5),
            ]
        );
    }

    #[test]
    fn paragraph_direction_from_first_strong_character() {
        let text = chars("123 \u{5d0}\u{5d1}\nabc\n456");
        let directions: Vec<_> = paragraphs(&text, Direction::RightToLeft)
            .iter()
            .map(|paragraph| paragraph.direction)
            .collect();
        assert_eq!(
            directions,
            [
                Direction::RightToLeft,
                Direction::LeftToRight,
                Direction::RightToLeft
            ]
        );
    }

    #[test]
    fn finding_paragraphs() {
        let text = chars("one\ntwo\nthree");
        let runs = paragraphs(&text, Direction::LeftToRight);
        assert_eq!(find_paragraphs(&runs, 0, 1), 0..1);
        assert_eq!(find_paragraphs(&runs, 3, 0), 0..1);
        assert_eq!(find_paragraphs(&runs, 3, 2), 0..2);
        assert_eq!(find_paragraphs(&runs, 5, 20), 1..3);
    }
}
