// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The logical (per character) and visual (per glyph and per line) models of a text.

mod logical;
mod visual;

use text_runs::{CharacterIndex, CharacterRun, Length};

use crate::analysis::{FontRun, ParagraphRun, ScriptRun};

pub use logical::LogicalModel;
pub use visual::{
    CharacterSpacingGlyphRun, ColorIndex, GlyphRun, StrikethroughGlyphRun, UnderlinedGlyphRun,
    VisualModel,
};

/// The characters replaced by one model update.
///
/// `start` is a paragraph start. Before the update the window covered `old_len`
/// characters; afterwards it covers `new_len`. Everything after the window moves by the
/// difference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) start: CharacterIndex,
    pub(crate) old_len: Length,
    pub(crate) new_len: Length,
}

impl Window {
    pub(crate) fn old_end(&self) -> CharacterIndex {
        self.start + self.old_len
    }

    pub(crate) fn new_end(&self) -> CharacterIndex {
        self.start + self.new_len
    }

    pub(crate) fn new_run(&self) -> CharacterRun {
        CharacterRun::new(self.start, self.new_len)
    }

    /// Maps an index at or after the old end of the window to its new position.
    pub(crate) fn shift(&self, index: CharacterIndex) -> CharacterIndex {
        index - self.old_len + self.new_len
    }
}

/// An analysis run that lives inside one paragraph.
pub(crate) trait WindowRun {
    fn character_run(&self) -> CharacterRun;

    fn character_run_mut(&mut self) -> &mut CharacterRun;
}

macro_rules! impl_window_run {
    ($($ty:ty),*) => {
        $(
            impl WindowRun for $ty {
                fn character_run(&self) -> CharacterRun {
                    self.character_run
                }

                fn character_run_mut(&mut self) -> &mut CharacterRun {
                    &mut self.character_run
                }
            }
        )*
    };
}

impl_window_run!(ParagraphRun, ScriptRun, FontRun);

/// Replaces the runs starting inside the old window with `new_runs` and shifts the runs
/// after it.
pub(crate) fn splice_runs<R: WindowRun>(runs: &mut Vec<R>, window: Window, new_runs: Vec<R>) {
    let first = runs.partition_point(|run| run.character_run().character_index < window.start);
    let last = runs
        .partition_point(|run| run.character_run().character_index < window.old_end())
        .max(first);
    for run in &mut runs[last..] {
        let character_run = run.character_run_mut();
        character_run.character_index = window.shift(character_run.character_index);
    }
    runs.splice(first..last, new_runs);
}
