// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text Layout turns styled text into positioned glyphs, and keeps them up to date as
//! the text is edited or its box is resized.
//!
//! A [`Controller`] owns one text instance: the characters and style runs produced by
//! [`text_markup`] (the [`LogicalModel`]) and the glyphs, lines and positions derived from
//! them (the [`VisualModel`]). Edits and setters record which pipeline stages
//! ([`OperationsMask`]) they invalidate, and [`Controller::relayout`] runs only those
//! stages, and only over the paragraphs touched since the last relayout:
//!
//! 1. line break opportunities and paragraphs,
//! 2. script itemization and font validation,
//! 3. bidirectional levels,
//! 4. shaping through a [`FontClient`],
//! 5. line breaking and glyph positioning,
//! 6. visual reordering of right to left lines,
//! 7. horizontal and vertical alignment.
//!
//! The natural size of the text and the point size fitting the box are measured with the
//! same pipeline. A [`RelayoutTask`] runs a relayout on an
//! [`AsyncTaskManager`](async_tasks::AsyncTaskManager) worker.
//!
//! Font discovery and shaping are provided by the host through [`FontClient`];
//! [`testing::FixedMetricsFontClient`] is a deterministic implementation.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use text_layout::testing::FixedMetricsFontClient;
//! use text_layout::{Controller, Direction, Size, UpdateTextType};
//!
//! let mut controller = Controller::new(Arc::new(FixedMetricsFontClient::new()));
//! controller.set_markup_enabled(true);
//! controller.set_multi_line(true);
//! controller.set_text("<b>Hello</b>\nworld");
//!
//! let update = controller.relayout(Size::new(200.0, 100.0), Direction::LeftToRight);
//! assert!(update.contains(UpdateTextType::MODEL_UPDATED));
//! assert_eq!(controller.number_of_lines(), 2);
//! assert_eq!(controller.visual_model().glyphs().len(), 11);
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

pub mod analysis;
mod controller;
mod error;
mod font;
mod geometry;
mod glyph;
mod layout;
mod model;
mod shape;
mod task;
pub mod testing;

pub use async_tasks;
pub use text_markup;
pub use text_runs;

pub use analysis::{is_new_paragraph, Direction, FontRun, LineBreakInfo, ParagraphRun, ScriptRun};
pub use controller::{
    Controller, OperationsMask, TextFitSettings, TextUpdateInfo, UpdateTextType,
};
pub use error::Error;
pub use font::{FontClient, FontDescription, FontId, FontMetrics, ShapeOutput};
pub use geometry::{Size, Vector2, MACHINE_EPSILON_1000};
pub use glyph::GlyphInfo;
pub use layout::{Layout, LineRun};
pub use model::{
    CharacterSpacingGlyphRun, ColorIndex, GlyphRun, LogicalModel, StrikethroughGlyphRun,
    UnderlinedGlyphRun, VisualModel,
};
pub use task::{RelayoutResult, RelayoutTask};
