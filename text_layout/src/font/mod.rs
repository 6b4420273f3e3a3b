// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface to the external font and shaping service.

mod cache;

use text_runs::{FontDescriptionRun, FontSlant, FontWeight, FontWidth};
use unicode_script::Script;

use crate::{GlyphInfo, Size};

pub(crate) use cache::FontIdCache;

/// Identifier of a font face at a given point size, assigned by the [`FontClient`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub u32);

/// The attributes used to look up a font face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontDescription {
    /// Family name, or `None` for the platform default family.
    pub family: Option<String>,
    /// Weight.
    pub weight: FontWeight,
    /// Width.
    pub width: FontWidth,
    /// Slant.
    pub slant: FontSlant,
}

impl FontDescription {
    /// Creates a description for `family` with normal weight, width and slant.
    pub fn with_family(family: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            ..Self::default()
        }
    }

    /// Overlays the attributes defined by a font description run.
    pub fn apply(&mut self, run: &FontDescriptionRun) {
        if let Some(family) = &run.family {
            self.family = Some(family.clone());
        }
        if let Some(weight) = run.weight {
            self.weight = weight;
        }
        if let Some(width) = run.width {
            self.width = width;
        }
        if let Some(slant) = run.slant {
            self.slant = slant;
        }
    }
}

/// Vertical metrics of a font face, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the face, positive upwards.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the face, negative downwards.
    pub descender: f32,
    /// Recommended line height.
    pub height: f32,
    /// Offset of the underline from the baseline.
    pub underline_position: f32,
    /// Thickness of the underline.
    pub underline_thickness: f32,
}

impl FontMetrics {
    /// The line height, never smaller than the ascender to descender span.
    pub fn line_height(&self) -> f32 {
        self.height.max(self.ascender - self.descender)
    }
}

/// Glyphs produced by shaping one segment of text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeOutput {
    /// The glyphs in logical order.
    pub glyphs: Vec<GlyphInfo>,
    /// For every glyph, the index of its first character relative to the start of the
    /// shaped segment. Must be non-decreasing.
    pub glyph_to_character: Vec<usize>,
}

/// A font and shaping service.
///
/// The layout engine never loads fonts itself; every face lookup, metric query and
/// shaping call goes through this trait.
pub trait FontClient: Send + Sync {
    /// Resolves the face that best matches `description` at `point_size`.
    fn font_id(&self, description: &FontDescription, point_size: f32) -> FontId;

    /// The description of the face behind `font_id`, which may differ from the one
    /// requested when no exact match exists.
    fn font_description(&self, font_id: FontId) -> FontDescription;

    /// Vertical metrics of `font_id`.
    fn font_metrics(&self, font_id: FontId) -> FontMetrics;

    /// Shapes `text`, a run of characters sharing one face and one script.
    fn shape(&self, text: &[char], font_id: FontId, script: Script) -> ShapeOutput;

    /// Natural size of the embedded item at `url`, or `None` if it can't be loaded.
    fn embedded_item_size(&self, url: &str) -> Option<Size> {
        let _ = url;
        None
    }
}
