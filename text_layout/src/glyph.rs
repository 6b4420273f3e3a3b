// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::FontId;

/// A shaped glyph and its metrics, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphInfo {
    /// The face the glyph comes from.
    pub font_id: FontId,
    /// Glyph id within the face.
    pub index: u32,
    /// Width of the glyph's ink box.
    pub width: f32,
    /// Height of the glyph's ink box.
    pub height: f32,
    /// Horizontal distance from the pen position to the left of the ink box.
    pub x_bearing: f32,
    /// Vertical distance from the baseline to the top of the ink box.
    pub y_bearing: f32,
    /// Horizontal pen advance.
    pub advance: f32,
    /// Scale applied to bitmap glyphs.
    pub scale_factor: f32,
    /// The face has no italic style; a slant has to be synthesized.
    pub is_italic_required: bool,
    /// The face has no bold style; emboldening has to be synthesized.
    pub is_bold_required: bool,
}

impl Default for GlyphInfo {
    fn default() -> Self {
        Self {
            font_id: FontId::default(),
            index: 0,
            width: 0.0,
            height: 0.0,
            x_bearing: 0.0,
            y_bearing: 0.0,
            advance: 0.0,
            scale_factor: 1.0,
            is_italic_required: false,
            is_bold_required: false,
        }
    }
}

impl GlyphInfo {
    /// Horizontal extent of the glyph's ink relative to its pen position.
    pub fn right_edge(&self) -> f32 {
        self.x_bearing + self.width
    }
}
