// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use text_runs::{CharacterIndex, CharacterRun, FontDescriptionRun};

use crate::font::{FontClient, FontDescription, FontId, FontIdCache};

/// A run of characters resolved to one font face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontRun {
    /// The characters of the run.
    pub character_run: CharacterRun,
    /// The resolved face.
    pub font_id: FontId,
    /// The requested weight is bold but the face is not.
    pub is_bold_required: bool,
    /// The requested slant is italic or oblique but the face is upright.
    pub is_italic_required: bool,
}

/// Font settings that apply where no font description run does.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FontDefaults {
    pub(crate) description: FontDescription,
    pub(crate) point_size: f32,
    /// Point size chosen by text fit; replaces `point_size` and scales run sizes.
    pub(crate) fit_point_size: Option<f32>,
}

impl Default for FontDefaults {
    fn default() -> Self {
        Self {
            description: FontDescription::default(),
            point_size: 16.0,
            fit_point_size: None,
        }
    }
}

impl FontDefaults {
    /// The point size in effect for text without a size override.
    pub(crate) fn point_size(&self) -> f32 {
        self.fit_point_size.unwrap_or(self.point_size)
    }

    fn run_point_size(&self, size: Option<f32>) -> f32 {
        match (size, self.fit_point_size) {
            (Some(size), Some(fit)) if self.point_size > 0.0 => size * fit / self.point_size,
            (Some(size), _) => size,
            (None, _) => self.point_size(),
        }
    }
}

/// Resolves the faces of `window`, overlaying the font description runs on the
/// defaults.
///
/// `runs` must be normalized. Adjacent pieces that resolve to the same face and
/// synthetic styling are merged into one [`FontRun`].
pub(crate) fn validate_fonts(
    window: CharacterRun,
    runs: &[FontDescriptionRun],
    defaults: &FontDefaults,
    cache: &mut FontIdCache,
    client: &dyn FontClient,
) -> Vec<FontRun> {
    let mut font_runs: Vec<FontRun> = Vec::new();
    let window_end = window.end();
    let mut position = window.character_index;

    while position < window_end {
        let next = runs.partition_point(|run| run.character_run.end() <= position);
        let (end, run) = match runs.get(next) {
            Some(run) if run.character_run.character_index <= position => {
                (run.character_run.end().min(window_end), Some(run))
            }
            Some(run) => (run.character_run.character_index.min(window_end), None),
            None => (window_end, None),
        };

        let mut description = defaults.description.clone();
        if let Some(run) = run {
            description.apply(run);
        }
        let point_size = defaults.run_point_size(run.and_then(|run| run.size));
        let font_run = resolve(position, end, &description, point_size, cache, client);
        push_font_run(&mut font_runs, font_run);
        position = end;
    }
    font_runs
}

fn resolve(
    start: CharacterIndex,
    end: CharacterIndex,
    description: &FontDescription,
    point_size: f32,
    cache: &mut FontIdCache,
    client: &dyn FontClient,
) -> FontRun {
    let font_id = cache.font_id(description, point_size, || {
        client.font_id(description, point_size)
    });
    let actual = client.font_description(font_id);
    FontRun {
        character_run: CharacterRun::from_range(start..end),
        font_id,
        is_bold_required: description.weight.is_bold() && !actual.weight.is_bold(),
        is_italic_required: description.slant.is_slanted() && !actual.slant.is_slanted(),
    }
}

fn push_font_run(font_runs: &mut Vec<FontRun>, font_run: FontRun) {
    if let Some(last) = font_runs.last_mut() {
        if last.font_id == font_run.font_id
            && last.is_bold_required == font_run.is_bold_required
            && last.is_italic_required == font_run.is_italic_required
            && last.character_run.end() == font_run.character_run.character_index
        {
            last.character_run.number_of_characters += font_run.character_run.number_of_characters;
            return;
        }
    }
    font_runs.push(font_run);
}
