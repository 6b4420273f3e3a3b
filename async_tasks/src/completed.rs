// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aggregate "these tasks have all finished" notifications.

use core::fmt;

use bitflags::bitflags;
use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::task::{AsyncTaskHandle, CallbackThread, Priority};
use crate::trigger::Trigger;

/// Identifies a callback registered with
/// [`set_completed_callback`](crate::AsyncTaskManager::set_completed_callback).
pub type TasksCompletedId = u32;

bitflags! {
    /// Selects which of the currently submitted tasks a completed callback waits for.
    ///
    /// A task is traced when both its callback thread and its priority are selected.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CompletedCallbackTraceMask: u8 {
        /// Tasks whose callback runs on the owning thread.
        const THREAD_MASK_MAIN = 1 << 0;
        /// Tasks whose callback runs on a worker.
        const THREAD_MASK_WORKER = 1 << 1;
        /// High priority tasks.
        const PRIORITY_MASK_HIGH = 1 << 2;
        /// Low priority tasks.
        const PRIORITY_MASK_LOW = 1 << 3;

        /// Tasks of either thread.
        const THREAD_MASK_ALL = Self::THREAD_MASK_MAIN.bits() | Self::THREAD_MASK_WORKER.bits();
        /// Tasks of either priority.
        const PRIORITY_MASK_ALL = Self::PRIORITY_MASK_HIGH.bits() | Self::PRIORITY_MASK_LOW.bits();
        /// Every task.
        const MASK_ALL = Self::THREAD_MASK_ALL.bits() | Self::PRIORITY_MASK_ALL.bits();
    }
}

impl Default for CompletedCallbackTraceMask {
    fn default() -> Self {
        Self::MASK_ALL
    }
}

impl CompletedCallbackTraceMask {
    pub(crate) fn selects(self, task: &AsyncTaskHandle) -> bool {
        let thread = match task.callback_thread() {
            CallbackThread::Main => Self::THREAD_MASK_MAIN,
            CallbackThread::Worker => Self::THREAD_MASK_WORKER,
        };
        let priority = match task.priority() {
            Priority::High => Self::PRIORITY_MASK_HIGH,
            Priority::Low => Self::PRIORITY_MASK_LOW,
        };
        self.contains(thread | priority)
    }
}

pub(crate) type TasksCompletedCallback = Box<dyn FnOnce(TasksCompletedId) + Send>;

struct CallbackData {
    callback: TasksCompletedCallback,
    /// Remaining completions per traced task.
    tasks: HashMap<usize, u32>,
}

#[derive(Default)]
struct Traced {
    next_id: TasksCompletedId,
    callbacks: HashMap<TasksCompletedId, CallbackData>,
}

#[derive(Default)]
struct Ready {
    callbacks: Vec<(TasksCompletedCallback, TasksCompletedId)>,
    triggered: bool,
}

/// Completed callbacks and the tasks they still wait for.
///
/// `traced` may be locked before `ready`, never the other way around.
pub(crate) struct TasksCompleted {
    trigger: Trigger,
    traced: Mutex<Traced>,
    ready: Mutex<Ready>,
}

impl TasksCompleted {
    pub(crate) fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            traced: Mutex::new(Traced::default()),
            ready: Mutex::new(Ready::default()),
        }
    }

    pub(crate) fn generate_id(&self, callback: TasksCompletedCallback) -> TasksCompletedId {
        let mut traced = self.traced.lock();
        let id = traced.next_id;
        traced.next_id = traced.next_id.wrapping_add(1);
        traced.callbacks.insert(
            id,
            CallbackData {
                callback,
                tasks: HashMap::new(),
            },
        );
        id
    }

    pub(crate) fn append_task_trace(&self, id: TasksCompletedId, task: &AsyncTaskHandle) {
        let mut traced = self.traced.lock();
        if let Some(data) = traced.callbacks.get_mut(&id) {
            *data.tasks.entry(task.key()).or_insert(0) += 1;
        }
    }

    /// Forgets `count` completions of `task`, readying every callback left with no task
    /// to wait for.
    pub(crate) fn remove_task_trace(&self, task: &AsyncTaskHandle, count: u32) {
        if count == 0 {
            return;
        }
        let key = task.key();
        let mut traced = self.traced.lock();
        let mut finished = Vec::new();
        for (id, data) in &mut traced.callbacks {
            if let Some(remaining) = data.tasks.get_mut(&key) {
                if *remaining <= count {
                    data.tasks.remove(&key);
                    if data.tasks.is_empty() {
                        finished.push(*id);
                    }
                } else {
                    *remaining -= count;
                }
            }
        }
        for id in finished {
            if let Some(data) = traced.callbacks.remove(&id) {
                self.register_ready(data.callback, id);
            }
        }
    }

    /// Readies the callback of `id` if it waits for nothing. Returns whether it did.
    pub(crate) fn check_completed(&self, id: TasksCompletedId) -> bool {
        let mut traced = self.traced.lock();
        if !traced
            .callbacks
            .get(&id)
            .is_some_and(|data| data.tasks.is_empty())
        {
            return false;
        }
        match traced.callbacks.remove(&id) {
            Some(data) => {
                self.register_ready(data.callback, id);
                true
            }
            None => false,
        }
    }

    /// Drops the callback of `id`, whether it is still waiting or already readied.
    pub(crate) fn remove(&self, id: TasksCompletedId) -> bool {
        let mut traced = self.traced.lock();
        if traced.callbacks.remove(&id).is_some() {
            return true;
        }
        let mut ready = self.ready.lock();
        match ready.callbacks.iter().position(|(_, ready_id)| *ready_id == id) {
            Some(index) => {
                ready.callbacks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Runs every readied callback on the calling thread.
    pub(crate) fn emit(&self) {
        let callbacks = {
            let mut ready = self.ready.lock();
            ready.triggered = false;
            core::mem::take(&mut ready.callbacks)
        };
        for (callback, id) in callbacks {
            log::trace!("tasks completed callback {id}");
            callback(id);
        }
    }

    pub(crate) fn has_traced(&self) -> bool {
        !self.traced.lock().callbacks.is_empty()
    }

    pub(crate) fn has_ready(&self) -> bool {
        !self.ready.lock().callbacks.is_empty()
    }

    fn register_ready(&self, callback: TasksCompletedCallback, id: TasksCompletedId) {
        let mut ready = self.ready.lock();
        ready.callbacks.push((callback, id));
        if !ready.triggered {
            ready.triggered = true;
            self.trigger.trigger();
        }
    }
}

impl fmt::Debug for TasksCompleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TasksCompleted")
            .field("traced", &self.traced.lock().callbacks.len())
            .field("ready", &self.ready.lock().callbacks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::{CompletedCallbackTraceMask, TasksCompleted};
    use crate::task::{AsyncTask, AsyncTaskHandle, CallbackThread, Priority, TaskError};
    use crate::trigger::Trigger;

    struct Nop;

    impl AsyncTask for Nop {
        fn process(&self) -> Result<(), TaskError> {
            Ok(())
        }
    }

    fn handle(priority: Priority, thread: CallbackThread) -> AsyncTaskHandle {
        AsyncTaskHandle::new(Arc::new(Nop), priority, thread, |_| {})
    }

    fn counter() -> (Arc<AtomicU32>, impl FnOnce(u32) + Send + 'static) {
        let fired = Arc::new(AtomicU32::new(0));
        let seen = fired.clone();
        (fired, move |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        })
    }

    #[test]
    fn mask_selection() {
        let low_worker = handle(Priority::Low, CallbackThread::Worker);
        assert!(CompletedCallbackTraceMask::MASK_ALL.selects(&low_worker));
        assert!(!CompletedCallbackTraceMask::THREAD_MASK_WORKER.selects(&low_worker));
        assert!((CompletedCallbackTraceMask::THREAD_MASK_WORKER
            | CompletedCallbackTraceMask::PRIORITY_MASK_LOW)
            .selects(&low_worker));
        assert!(!(CompletedCallbackTraceMask::THREAD_MASK_ALL
            | CompletedCallbackTraceMask::PRIORITY_MASK_HIGH)
            .selects(&low_worker));
    }

    #[test]
    fn fires_once_every_traced_completion_is_removed() {
        let trigger = Trigger::new();
        let completed = TasksCompleted::new(trigger.clone());
        let a = handle(Priority::High, CallbackThread::Main);
        let b = handle(Priority::High, CallbackThread::Main);
        let (fired, callback) = counter();
        let id = completed.generate_id(Box::new(callback));
        completed.append_task_trace(id, &a);
        completed.append_task_trace(id, &a);
        completed.append_task_trace(id, &b);

        completed.remove_task_trace(&a, 1);
        completed.remove_task_trace(&b, 1);
        assert!(!completed.has_ready(), "a is traced twice");
        completed.remove_task_trace(&a, 1);
        assert!(completed.has_ready());
        assert!(!completed.has_traced());
        assert!(trigger.wait(Duration::ZERO));

        completed.emit();
        completed.emit();
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn empty_trace_completes_immediately() {
        let completed = TasksCompleted::new(Trigger::new());
        let (fired, callback) = counter();
        let id = completed.generate_id(Box::new(callback));
        assert!(completed.check_completed(id));
        assert!(!completed.check_completed(id));
        completed.emit();
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn removed_callbacks_never_fire() {
        let completed = TasksCompleted::new(Trigger::new());
        let a = handle(Priority::Low, CallbackThread::Main);
        let (fired, callback) = counter();
        let waiting = completed.generate_id(Box::new(callback));
        completed.append_task_trace(waiting, &a);
        assert!(completed.remove(waiting));
        assert!(!completed.remove(waiting));

        let (fired_ready, callback) = counter();
        let ready = completed.generate_id(Box::new(callback));
        completed.check_completed(ready);
        assert!(completed.remove(ready), "readied callbacks can still be removed");

        completed.remove_task_trace(&a, 1);
        completed.emit();
        assert_eq!(fired.load(Ordering::Relaxed), 0);
        assert_eq!(fired_ready.load(Ordering::Relaxed), 0);
    }
}
