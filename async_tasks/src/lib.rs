// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Async Tasks runs expensive work, such as text relayout, on a bounded pool of worker
//! threads without blocking the thread that owns the work.
//!
//! Work is an [`AsyncTask`] wrapped in an [`AsyncTaskHandle`] that carries its
//! [`Priority`], the [`CallbackThread`] its completion callback runs on, and the callback
//! itself. The [`AsyncTaskManager`] guarantees that:
//!
//! - ready tasks are claimed in submission order, and a task that isn't ready waits aside
//!   without holding up the tasks behind it,
//! - a task is never processed on two workers at once,
//! - a removed task's callback never runs, even if it was already being processed,
//! - low priority tasks occupy at most half of the pool.
//!
//! Callbacks of [`CallbackThread::Main`] tasks are queued until the owning thread calls
//! [`AsyncTaskManager::task_completed`] or [`AsyncTaskManager::task_all_completed`],
//! typically after [`AsyncTaskManager::wait_for_trigger`] returns.
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

mod completed;
mod config;
mod manager;
mod task;
mod trigger;
mod worker;

pub use crate::completed::{CompletedCallbackTraceMask, TasksCompletedId};
pub use crate::config::{AsyncTaskManagerConfig, NUMBER_OF_THREADS_ENV};
pub use crate::manager::{AsyncTaskManager, FORCE_TRIGGER_THRESHOLD};
pub use crate::task::{AsyncTask, AsyncTaskHandle, CallbackThread, Priority, TaskError};
