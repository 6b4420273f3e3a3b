// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_runs::{GlyphIndex, Length};

use super::LineRun;
use crate::analysis::bidi::reorder_visual;
use crate::{GlyphInfo, Vector2};

/// Per glyph and per character data read while reordering.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReorderInput<'a> {
    pub(crate) bidi_levels: &'a [u8],
    pub(crate) glyphs: &'a [GlyphInfo],
    pub(crate) characters_to_glyph: &'a [GlyphIndex],
    pub(crate) glyphs_per_character: &'a [Length],
}

/// Computes the visual order of each line with right to left characters and moves its
/// glyphs horizontally into that order. Lines without any are left in logical order.
pub(crate) fn reorder_lines(
    input: ReorderInput<'_>,
    lines: &mut [LineRun],
    positions: &mut [Vector2],
) {
    for line in lines {
        let characters = line.character_index..line.character_end();
        let Some(levels) = input.bidi_levels.get(characters.clone()) else {
            line.visual_to_logical.clear();
            continue;
        };
        if !levels.iter().any(|level| level % 2 == 1) {
            line.visual_to_logical.clear();
            continue;
        }

        line.visual_to_logical = reorder_visual(levels)
            .into_iter()
            .map(|offset| line.character_index + offset)
            .collect();

        // Glyphs of ligatures and decompositions move together with their first
        // character.
        let mut pen_x = 0.0;
        for &character in &line.visual_to_logical {
            let count = input.glyphs_per_character.get(character).copied().unwrap_or(0);
            let Some(&first_glyph) = input.characters_to_glyph.get(character) else {
                continue;
            };
            for glyph_index in first_glyph..first_glyph + count {
                let (Some(glyph), Some(position)) =
                    (input.glyphs.get(glyph_index), positions.get_mut(glyph_index))
                else {
                    continue;
                };
                position.x = pen_x + glyph.x_bearing;
                pen_x += glyph.advance;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{reorder_lines, ReorderInput};
    use crate::layout::LineRun;
    use crate::{GlyphInfo, Vector2};

    fn glyph(advance: f32) -> GlyphInfo {
        GlyphInfo {
            advance,
            width: advance,
            ..GlyphInfo::default()
        }
    }

    #[test]
    fn right_to_left_run_is_mirrored() {
        let glyphs = [glyph(10.0), glyph(20.0), glyph(30.0)];
        let mut positions = vec![Vector2::ZERO; 3];
        let mut lines = vec![LineRun {
            number_of_glyphs: 3,
            number_of_characters: 3,
            ..LineRun::default()
        }];
        let input = ReorderInput {
            bidi_levels: &[0, 1, 1],
            glyphs: &glyphs,
            characters_to_glyph: &[0, 1, 2],
            glyphs_per_character: &[1, 1, 1],
        };
        reorder_lines(input, &mut lines, &mut positions);

        assert_eq!(lines[0].visual_to_logical, [0, 2, 1]);
        assert_eq!(positions[0].x, 0.0);
        assert_eq!(positions[2].x, 10.0);
        assert_eq!(positions[1].x, 40.0);
    }

    #[test]
    fn left_to_right_lines_keep_logical_order() {
        let glyphs = [glyph(10.0)];
        let mut positions = vec![Vector2::new(3.0, 4.0)];
        let mut lines = vec![LineRun {
            number_of_glyphs: 1,
            number_of_characters: 1,
            visual_to_logical: vec![0],
            ..LineRun::default()
        }];
        let input = ReorderInput {
            bidi_levels: &[0],
            glyphs: &glyphs,
            characters_to_glyph: &[0],
            glyphs_per_character: &[1],
        };
        reorder_lines(input, &mut lines, &mut positions);
        assert!(lines[0].visual_to_logical.is_empty());
        assert_eq!(positions[0], Vector2::new(3.0, 4.0));
    }
}
