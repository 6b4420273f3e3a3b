// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use unicode_bidi::{bidi_class, BidiClass, BidiInfo, Level};

use super::ParagraphRun;

/// Writing direction of a paragraph, a line or the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    LeftToRight,
    /// Right to left.
    RightToLeft,
}

impl Direction {
    /// Whether this is [`Direction::RightToLeft`].
    pub fn is_rtl(self) -> bool {
        self == Self::RightToLeft
    }

    fn level(self) -> Level {
        match self {
            Self::LeftToRight => Level::ltr(),
            Self::RightToLeft => Level::rtl(),
        }
    }
}

fn is_rtl_class(class: BidiClass) -> bool {
    matches!(class, BidiClass::R | BidiClass::AL)
}

/// Direction of the first strong character, if any.
pub(crate) fn first_strong_direction(text: &[char]) -> Option<Direction> {
    text.iter().find_map(|&character| match bidi_class(character) {
        BidiClass::L => Some(Direction::LeftToRight),
        class if is_rtl_class(class) => Some(Direction::RightToLeft),
        _ => None,
    })
}

/// Computes the embedding level of every character in the given paragraphs.
///
/// `text` starts at the first character of `paragraphs[0]`. Paragraphs with a left to
/// right base direction and no right to left characters skip the bidi algorithm and
/// get level zero throughout.
pub(crate) fn bidi_levels(text: &[char], paragraphs: &[ParagraphRun]) -> Vec<u8> {
    let Some(offset) = paragraphs.first().map(|p| p.character_run.character_index) else {
        return Vec::new();
    };

    let mut levels = Vec::with_capacity(text.len());
    for paragraph in paragraphs {
        let start = paragraph.character_run.character_index - offset;
        let characters = &text[start..start + paragraph.character_run.number_of_characters];

        let needs_bidi = paragraph.direction.is_rtl()
            || characters
                .iter()
                .any(|&character| is_rtl_class(bidi_class(character)));
        if !needs_bidi {
            levels.extend(core::iter::repeat_n(0, characters.len()));
            continue;
        }

        let string: String = characters.iter().collect();
        let info = BidiInfo::new(&string, Some(paragraph.direction.level()));
        // `BidiInfo` levels are per byte; keep the level of each character's first byte.
        levels.extend(
            string
                .char_indices()
                .map(|(byte, _)| info.levels.get(byte).map_or(0, |level| level.number())),
        );
    }
    levels
}

/// Visual to logical order of a line with the given character levels.
pub(crate) fn reorder_visual(levels: &[u8]) -> Vec<usize> {
    let levels: Vec<Level> = levels
        .iter()
        .map(|&level| Level::new(level).unwrap_or_else(|_| Level::ltr()))
        .collect();
    BidiInfo::reorder_visual(&levels)
}

/// The mirrored form of `character` when it appears in right to left text.
pub(crate) fn mirrored(character: char) -> Option<char> {
    const PAIRS: [(char, char); 12] = [
        ('(', ')'),
        (')', '('),
        ('<', '>'),
        ('>', '<'),
        ('[', ']'),
        (']', '['),
        ('{', '}'),
        ('}', '{'),
        ('\u{ab}', '\u{bb}'),
        ('\u{bb}', '\u{ab}'),
        ('\u{2039}', '\u{203a}'),
        ('\u{203a}', '\u{2039}'),
    ];
    PAIRS
        .iter()
        .find(|(from, _)| *from == character)
        .map(|(_, to)| *to)
}
