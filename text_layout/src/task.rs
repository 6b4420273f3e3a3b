// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use async_tasks::{AsyncTask, TaskError};
use parking_lot::Mutex;

use crate::analysis::Direction;
use crate::{Controller, Size, UpdateTextType};

/// What a [`RelayoutTask`] produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelayoutResult {
    /// What the relayout changed.
    pub update: UpdateTextType,
    /// Natural size of the text after the relayout.
    pub natural_size: Size,
    /// Size of the laid out text.
    pub layout_size: Size,
}

/// Relayouts a shared [`Controller`] on an [`AsyncTaskManager`](async_tasks::AsyncTaskManager)
/// worker.
///
/// The controller stays locked for the duration of the relayout. The result is read
/// from the completion callback with [`result`](Self::result).
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use async_tasks::{AsyncTaskHandle, AsyncTaskManager, CallbackThread, Priority};
/// use parking_lot::Mutex;
/// use text_layout::testing::FixedMetricsFontClient;
/// use text_layout::{Controller, Direction, RelayoutTask, Size};
///
/// let mut controller = Controller::new(Arc::new(FixedMetricsFontClient::new()));
/// controller.set_text("Hello");
/// let controller = Arc::new(Mutex::new(controller));
///
/// let task = Arc::new(RelayoutTask::new(
///     controller.clone(),
///     Size::new(200.0, 50.0),
///     Direction::LeftToRight,
/// ));
/// let manager = AsyncTaskManager::default();
/// let observed = task.clone();
/// manager.add_task(AsyncTaskHandle::new(
///     task,
///     Priority::High,
///     CallbackThread::Main,
///     move |handle| {
///         assert!(handle.is_succeeded());
///         assert!(observed.result().is_some());
///     },
/// ));
/// while manager.completed_task_count() == 0 {
///     manager.wait_for_trigger(Duration::from_millis(10));
/// }
/// manager.task_all_completed();
/// assert_eq!(controller.lock().number_of_lines(), 1);
/// ```
#[derive(Debug)]
pub struct RelayoutTask {
    controller: Arc<Mutex<Controller>>,
    size: Size,
    layout_direction: Direction,
    result: Mutex<Option<RelayoutResult>>,
}

impl RelayoutTask {
    /// Creates a task laying out `controller` into `size`.
    pub fn new(controller: Arc<Mutex<Controller>>, size: Size, layout_direction: Direction) -> Self {
        Self {
            controller,
            size,
            layout_direction,
            result: Mutex::new(None),
        }
    }

    /// The controller being laid out.
    pub fn controller(&self) -> &Arc<Mutex<Controller>> {
        &self.controller
    }

    /// The result of the last processing.
    pub fn result(&self) -> Option<RelayoutResult> {
        *self.result.lock()
    }
}

impl AsyncTask for RelayoutTask {
    fn process(&self) -> Result<(), TaskError> {
        let result = {
            let mut controller = self.controller.lock();
            let update = controller.relayout(self.size, self.layout_direction);
            let layout_size = controller.visual_model().layout_size();
            RelayoutResult {
                update,
                natural_size: controller.natural_size(),
                layout_size,
            }
        };
        *self.result.lock() = Some(result);
        Ok(())
    }

    fn task_name(&self) -> &str {
        "RelayoutTask"
    }
}
