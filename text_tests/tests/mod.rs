// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for the text crates.
//!
//! - The `util` module contains shared utility functions that are needed by different
//!   test modules.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, so that the utilities are shared.
//! - Put new tests into the module of their topic, and start test names with the topic,
//!   e.g. `relayout_is_idempotent` rather than `idempotent_relayout`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod markup;
mod text_fit;
mod util;
