// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text Runs is the data model shared by the markup parser and the layout engine.
//!
//! A text instance is a [`CharacterBuffer`] of Unicode code points in logical order plus a
//! set of style run lists ([`StyleRuns`]). Every run covers a contiguous range of characters
//! described by a [`CharacterRun`]. Within one list, runs are sorted by start index and never
//! overlap once [`StyleRuns::normalize`] has been applied.
//!
//! ## Example
//!
//! ```
//! use text_runs::{CharacterRun, ColorRun, StyleRuns};
//! use peniko::color::palette::css;
//!
//! let mut runs = StyleRuns::default();
//! runs.color_runs.push(ColorRun::new(CharacterRun::new(0, 5), css::RED));
//! runs.color_runs.push(ColorRun::new(CharacterRun::new(2, 1), css::BLUE));
//! runs.normalize();
//!
//! let ranges: Vec<_> = runs.color_runs.iter().map(|r| r.character_run.range()).collect();
//! assert_eq!(ranges, [0..2, 2..3, 3..5]);
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod alignment;
mod character_buffer;
mod character_run;
mod error;
mod font;
mod run_list;
mod runs;
mod style_runs;

pub use peniko::Color;

pub use crate::alignment::{HorizontalAlignment, VerticalAlignment};
pub use crate::character_buffer::CharacterBuffer;
pub use crate::character_run::{CharacterIndex, CharacterRun, GlyphIndex, Length, LineIndex};
pub use crate::error::{Error, ErrorKind};
pub use crate::font::{FontSlant, FontWeight, FontWidth};
pub use crate::run_list::{insert_characters, normalize_runs, remove_characters, Run};
pub use crate::runs::{
    Anchor, BoundedParagraphRun, CharacterSpacingCharacterRun, ColorBlendingMode, ColorRun,
    EmbeddedItem, FontDescriptionRun, StrikethroughCharacterRun, StrikethroughStyleProperties,
    UnderlineStyleProperties, UnderlineType, UnderlinedCharacterRun,
};
pub use crate::style_runs::StyleRuns;
