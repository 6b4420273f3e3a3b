// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_runs::{CharacterIndex, HorizontalAlignment};

use super::LineRun;
use crate::analysis::Direction;

/// How a range of lines is aligned.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AlignmentSettings {
    pub(crate) alignment: HorizontalAlignment,
    pub(crate) box_width: f32,
    pub(crate) layout_direction: Direction,
    /// Resolve `Begin` and `End` against the layout direction instead of each line's
    /// paragraph direction.
    pub(crate) match_layout_direction: bool,
}

/// Sets the alignment offset of the lines starting in `start..end`.
///
/// An empty line starting at `end` (the line after a final new paragraph character) is
/// aligned too.
pub(crate) fn align(
    lines: &mut [LineRun],
    start: CharacterIndex,
    end: CharacterIndex,
    settings: AlignmentSettings,
) {
    for line in lines {
        let in_range = line.character_index >= start
            && (line.character_index < end
                || (line.number_of_characters == 0 && line.character_index == end));
        if !in_range {
            continue;
        }

        let direction = if settings.match_layout_direction {
            settings.layout_direction
        } else {
            line.direction
        };
        let is_rtl = direction.is_rtl();
        let free_space = settings.box_width - line.width;

        line.alignment_offset = match (settings.alignment, is_rtl) {
            (HorizontalAlignment::Begin, false) | (HorizontalAlignment::End, true) => 0.0,
            (HorizontalAlignment::Begin, true) | (HorizontalAlignment::End, false) => free_space,
            (HorizontalAlignment::Center, _) => (free_space * 0.5).floor(),
        };
    }
}
