// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_runs::{
    CharacterRun, Color, GlyphIndex, Length, StrikethroughStyleProperties,
    UnderlineStyleProperties,
};

use crate::layout::LineRun;
use crate::{GlyphInfo, Size, Vector2};

/// Index into a color palette. Zero selects the default.
pub type ColorIndex = u16;

/// A range of glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphRun {
    /// First glyph.
    pub glyph_index: GlyphIndex,
    /// Number of glyphs.
    pub number_of_glyphs: Length,
}

impl GlyphRun {
    /// One past the last glyph.
    pub fn end(&self) -> GlyphIndex {
        self.glyph_index + self.number_of_glyphs
    }
}

/// Underlined glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct UnderlinedGlyphRun {
    /// The glyphs.
    pub glyph_run: GlyphRun,
    /// How to draw the underline.
    pub properties: UnderlineStyleProperties,
}

/// Struck through glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct StrikethroughGlyphRun {
    /// The glyphs.
    pub glyph_run: GlyphRun,
    /// How to draw the line.
    pub properties: StrikethroughStyleProperties,
}

/// Glyphs with extra spacing added to their advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterSpacingGlyphRun {
    /// The glyphs.
    pub glyph_run: GlyphRun,
    /// Extra advance per glyph, in pixels.
    pub value: f32,
}

/// Per glyph and per line data of a text, ready to be drawn.
///
/// Glyphs are stored in logical order. The four maps between characters and glyphs
/// are kept consistent with the glyph array: `glyph_to_character[g]` is the first
/// character of glyph `g` and `characters_per_glyph[g]` how many it covers;
/// `characters_to_glyph[c]` is the first glyph of character `c` and
/// `glyphs_per_character[c]` how many glyphs it produced.
#[derive(Clone, Debug)]
pub struct VisualModel {
    pub(crate) glyphs: Vec<GlyphInfo>,
    pub(crate) glyph_to_character: Vec<usize>,
    pub(crate) characters_per_glyph: Vec<Length>,
    pub(crate) characters_to_glyph: Vec<GlyphIndex>,
    pub(crate) glyphs_per_character: Vec<Length>,
    pub(crate) glyph_positions: Vec<Vector2>,
    pub(crate) lines: Vec<LineRun>,
    pub(crate) text_color: Color,
    pub(crate) colors: Vec<Color>,
    pub(crate) color_indices: Vec<ColorIndex>,
    pub(crate) background_colors: Vec<Color>,
    pub(crate) background_color_indices: Vec<ColorIndex>,
    pub(crate) underline_runs: Vec<UnderlinedGlyphRun>,
    pub(crate) strikethrough_runs: Vec<StrikethroughGlyphRun>,
    pub(crate) character_spacing_runs: Vec<CharacterSpacingGlyphRun>,
    pub(crate) layout_size: Size,
    pub(crate) control_size: Size,
}

impl Default for VisualModel {
    fn default() -> Self {
        Self {
            glyphs: Vec::new(),
            glyph_to_character: Vec::new(),
            characters_per_glyph: Vec::new(),
            characters_to_glyph: Vec::new(),
            glyphs_per_character: Vec::new(),
            glyph_positions: Vec::new(),
            lines: Vec::new(),
            text_color: peniko::color::palette::css::BLACK,
            colors: Vec::new(),
            color_indices: Vec::new(),
            background_colors: Vec::new(),
            background_color_indices: Vec::new(),
            underline_runs: Vec::new(),
            strikethrough_runs: Vec::new(),
            character_spacing_runs: Vec::new(),
            layout_size: Size::ZERO,
            control_size: Size::ZERO,
        }
    }
}

impl VisualModel {
    /// The shaped glyphs, in logical order.
    pub fn glyphs(&self) -> &[GlyphInfo] {
        &self.glyphs
    }

    /// Position of each glyph's ink box, relative to the top left of the layout.
    pub fn glyph_positions(&self) -> &[Vector2] {
        &self.glyph_positions
    }

    /// First character of each glyph.
    pub fn glyph_to_character(&self) -> &[usize] {
        &self.glyph_to_character
    }

    /// Number of characters covered by each glyph.
    pub fn characters_per_glyph(&self) -> &[Length] {
        &self.characters_per_glyph
    }

    /// First glyph of each character.
    pub fn characters_to_glyph(&self) -> &[GlyphIndex] {
        &self.characters_to_glyph
    }

    /// Number of glyphs produced by each character.
    pub fn glyphs_per_character(&self) -> &[Length] {
        &self.glyphs_per_character
    }

    /// The laid out lines.
    pub fn lines(&self) -> &[LineRun] {
        &self.lines
    }

    /// Size of the laid out text.
    pub fn layout_size(&self) -> Size {
        self.layout_size
    }

    /// Size of the control the text was last laid out for.
    pub fn control_size(&self) -> Size {
        self.control_size
    }

    /// Color used where no color run applies.
    pub fn text_color(&self) -> Color {
        self.text_color
    }

    /// Color of glyph `index`.
    pub fn glyph_color(&self, index: GlyphIndex) -> Color {
        match self.color_indices.get(index) {
            Some(&color_index) if color_index > 0 => self
                .colors
                .get(usize::from(color_index - 1))
                .copied()
                .unwrap_or(self.text_color),
            _ => self.text_color,
        }
    }

    /// Background color of glyph `index`, if any.
    pub fn glyph_background_color(&self, index: GlyphIndex) -> Option<Color> {
        match self.background_color_indices.get(index) {
            Some(&color_index) if color_index > 0 => self
                .background_colors
                .get(usize::from(color_index - 1))
                .copied(),
            _ => None,
        }
    }

    /// Per glyph indices into [`colors`](Self::colors); zero is the text color.
    pub fn color_indices(&self) -> &[ColorIndex] {
        &self.color_indices
    }

    /// The palette of run colors.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Underlined glyph runs.
    pub fn underline_runs(&self) -> &[UnderlinedGlyphRun] {
        &self.underline_runs
    }

    /// Struck through glyph runs.
    pub fn strikethrough_runs(&self) -> &[StrikethroughGlyphRun] {
        &self.strikethrough_runs
    }

    /// Character spacing glyph runs.
    pub fn character_spacing_runs(&self) -> &[CharacterSpacingGlyphRun] {
        &self.character_spacing_runs
    }

    /// The glyphs produced by `character_run`.
    pub fn glyph_run(&self, character_run: CharacterRun) -> GlyphRun {
        let glyph_at = |index: usize| {
            self.characters_to_glyph
                .get(index)
                .copied()
                .unwrap_or(self.glyphs.len())
        };
        if character_run.is_empty() {
            let glyph_index = glyph_at(character_run.character_index);
            return GlyphRun {
                glyph_index,
                number_of_glyphs: 0,
            };
        }
        let last = character_run.end() - 1;
        let glyph_index = glyph_at(character_run.character_index);
        // A character merged into a ligature still belongs to that glyph.
        let glyph_count = self.glyphs_per_character.get(last).copied().unwrap_or(0).max(1);
        let end = (glyph_at(last) + glyph_count).min(self.glyphs.len());
        GlyphRun {
            glyph_index,
            number_of_glyphs: end.saturating_sub(glyph_index),
        }
    }

    /// Rebuilds the character to glyph maps from the glyph to character maps.
    pub(crate) fn rebuild_character_maps(&mut self, number_of_characters: Length) {
        self.characters_to_glyph.clear();
        self.characters_to_glyph.resize(number_of_characters, 0);
        self.glyphs_per_character.clear();
        self.glyphs_per_character.resize(number_of_characters, 0);

        let mut next_character = 0;
        for (glyph, (&first, &count)) in self
            .glyph_to_character
            .iter()
            .zip(&self.characters_per_glyph)
            .enumerate()
        {
            // Characters without a glyph of their own belong to the previous glyph.
            while next_character < first && next_character < number_of_characters {
                self.characters_to_glyph[next_character] = glyph.saturating_sub(1);
                next_character += 1;
            }
            if first < number_of_characters {
                if self.glyphs_per_character[first] == 0 {
                    self.characters_to_glyph[first] = glyph;
                }
                self.glyphs_per_character[first] += 1;
            }
            for character in first + 1..(first + count).min(number_of_characters) {
                self.characters_to_glyph[character] = glyph;
            }
            next_character = next_character.max(first + count);
        }
        // Trailing characters with no glyph map past the end.
        for character in next_character..number_of_characters {
            self.characters_to_glyph[character] = self.glyphs.len();
        }
    }

    /// Drops all glyph and line data.
    pub(crate) fn clear_glyphs(&mut self) {
        self.glyphs.clear();
        self.glyph_to_character.clear();
        self.characters_per_glyph.clear();
        self.characters_to_glyph.clear();
        self.glyphs_per_character.clear();
        self.glyph_positions.clear();
        self.lines.clear();
        self.color_indices.clear();
        self.background_color_indices.clear();
        self.underline_runs.clear();
        self.strikethrough_runs.clear();
        self.character_spacing_runs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{GlyphRun, VisualModel};
    use crate::GlyphInfo;
    use text_runs::CharacterRun;

    fn model(glyph_to_character: &[usize], characters_per_glyph: &[usize]) -> VisualModel {
        let mut model = VisualModel {
            glyphs: vec![GlyphInfo::default(); glyph_to_character.len()],
            glyph_to_character: glyph_to_character.to_vec(),
            characters_per_glyph: characters_per_glyph.to_vec(),
            ..VisualModel::default()
        };
        model.rebuild_character_maps(characters_per_glyph.iter().sum());
        model
    }

    #[test]
    fn one_glyph_per_character() {
        let model = model(&[0, 1, 2], &[1, 1, 1]);
        assert_eq!(model.characters_to_glyph(), [0, 1, 2]);
        assert_eq!(model.glyphs_per_character(), [1, 1, 1]);
    }

    #[test]
    fn ligature_maps_both_characters_to_one_glyph() {
        // "afib" with an "fi" ligature.
        let model = model(&[0, 1, 3], &[1, 2, 1]);
        assert_eq!(model.characters_to_glyph(), [0, 1, 1, 2]);
        assert_eq!(model.glyphs_per_character(), [1, 1, 0, 1]);
        assert_eq!(
            model.glyph_run(CharacterRun::new(1, 2)),
            GlyphRun {
                glyph_index: 1,
                number_of_glyphs: 1
            }
        );
    }

    #[test]
    fn decomposition_maps_one_character_to_two_glyphs() {
        let model = model(&[0, 1, 1, 2], &[1, 1, 0, 1]);
        assert_eq!(model.characters_to_glyph(), [0, 1, 3]);
        assert_eq!(model.glyphs_per_character(), [1, 2, 1]);
        assert_eq!(model.glyph_run(CharacterRun::new(1, 1)).number_of_glyphs, 2);
    }

    #[test]
    fn default_color_for_unstyled_glyphs() {
        let mut model = model(&[0, 1], &[1, 1]);
        model.colors = vec![peniko::color::palette::css::RED];
        model.color_indices = vec![1, 0];
        assert_eq!(model.glyph_color(0), peniko::color::palette::css::RED);
        assert_eq!(model.glyph_color(1), model.text_color());
        assert_eq!(model.glyph_background_color(0), None);
    }
}
