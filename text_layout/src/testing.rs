// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic [`FontClient`] for tests and examples.

use hashbrown::HashMap;
use parking_lot::Mutex;
use text_runs::{FontSlant, FontWeight};
use unicode_script::Script;

use crate::font::{FontClient, FontDescription, FontId, FontMetrics, ShapeOutput};
use crate::{GlyphInfo, Size};

/// Point size reported for [`FontId`]s the client never handed out.
const FALLBACK_POINT_SIZE: f32 = 16.0;

/// A font service with one synthetic face per description and point size.
///
/// Every character shapes to one glyph whose advance is `0.6` times the point size.
/// Faces have an ascender of `0.8`, a descender of `-0.2` and a line height of `1.2`
/// times the point size.
#[derive(Debug, Default)]
pub struct FixedMetricsFontClient {
    faces: Mutex<Vec<(FontDescription, f32)>>,
    fi_ligature: bool,
    synthetic_styles: bool,
    embedded_items: HashMap<String, Size>,
}

impl FixedMetricsFontClient {
    /// Creates a client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes `"fi"` to a single glyph covering both characters.
    pub fn with_fi_ligature(mut self) -> Self {
        self.fi_ligature = true;
        self
    }

    /// Reports every face as upright and of normal weight, so bold and italic text
    /// needs synthetic styling.
    pub fn with_synthetic_styles(mut self) -> Self {
        self.synthetic_styles = true;
        self
    }

    /// Reports `size` for the embedded item at `url`.
    pub fn with_embedded_item_size(mut self, url: impl Into<String>, size: Size) -> Self {
        self.embedded_items.insert(url.into(), size);
        self
    }

    /// Number of distinct faces handed out so far.
    pub fn face_count(&self) -> usize {
        self.faces.lock().len()
    }

    fn face(&self, font_id: FontId) -> Option<(FontDescription, f32)> {
        let index = usize::try_from(font_id.0).ok()?.checked_sub(1)?;
        self.faces.lock().get(index).cloned()
    }

    fn point_size(&self, font_id: FontId) -> f32 {
        self.face(font_id)
            .map_or(FALLBACK_POINT_SIZE, |(_, point_size)| point_size)
    }
}

impl FontClient for FixedMetricsFontClient {
    fn font_id(&self, description: &FontDescription, point_size: f32) -> FontId {
        let mut faces = self.faces.lock();
        let position = faces
            .iter()
            .position(|(face, size)| face == description && *size == point_size)
            .unwrap_or_else(|| {
                faces.push((description.clone(), point_size));
                faces.len() - 1
            });
        FontId(u32::try_from(position + 1).unwrap_or(u32::MAX))
    }

    fn font_description(&self, font_id: FontId) -> FontDescription {
        let mut description = self
            .face(font_id)
            .map(|(description, _)| description)
            .unwrap_or_default();
        if self.synthetic_styles {
            description.weight = FontWeight::NORMAL;
            description.slant = FontSlant::Normal;
        }
        description
    }

    fn font_metrics(&self, font_id: FontId) -> FontMetrics {
        let size = self.point_size(font_id);
        FontMetrics {
            ascender: size * 4.0 / 5.0,
            descender: -size / 5.0,
            height: size * 6.0 / 5.0,
            underline_position: -size / 10.0,
            underline_thickness: size / 20.0,
        }
    }

    fn shape(&self, text: &[char], font_id: FontId, _script: Script) -> ShapeOutput {
        let size = self.point_size(font_id);
        let mut output = ShapeOutput::default();
        let mut index = 0;
        while index < text.len() {
            let ligature =
                self.fi_ligature && text[index] == 'f' && text.get(index + 1) == Some(&'i');
            let advance = size * 3.0 / 5.0;
            output.glyphs.push(GlyphInfo {
                font_id,
                index: if ligature { 0xFB01 } else { u32::from(text[index]) },
                width: advance,
                height: size,
                y_bearing: size * 4.0 / 5.0,
                advance,
                ..GlyphInfo::default()
            });
            output.glyph_to_character.push(index);
            index += if ligature { 2 } else { 1 };
        }
        output
    }

    fn embedded_item_size(&self, url: &str) -> Option<Size> {
        self.embedded_items.get(url).copied()
    }
}
