// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

/// A unit of work run by the [`AsyncTaskManager`](crate::AsyncTaskManager).
///
/// Tasks are shared between the submitter and the worker threads, so state produced by
/// [`process`](Self::process) lives behind interior mutability.
pub trait AsyncTask: Send + Sync + 'static {
    /// Does the work. Called on a worker thread, at most once concurrently per handle.
    fn process(&self) -> Result<(), TaskError>;

    /// Whether the task can be processed now.
    ///
    /// A task that isn't ready when it is added waits aside until
    /// [`notify_to_task_ready`](crate::AsyncTaskManager::notify_to_task_ready).
    fn is_ready(&self) -> bool {
        true
    }

    /// Name used in traces.
    fn task_name(&self) -> &str {
        "AsyncTask"
    }
}

/// Why a task did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TaskError {
    /// [`AsyncTask::process`] reported a failure.
    #[error("task failed: {0}")]
    Failed(String),
    /// [`AsyncTask::process`] panicked.
    #[error("task panicked")]
    Panicked,
}

/// Scheduling class of a task.
///
/// Low priority tasks may occupy at most half of the worker pool at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Runs on any free worker.
    #[default]
    High,
    /// Runs only while fewer than half of the workers are busy with low priority tasks.
    Low,
}

/// The thread a completion callback runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CallbackThread {
    /// Queued for the owning thread, which runs it from
    /// [`task_completed`](crate::AsyncTaskManager::task_completed).
    #[default]
    Main,
    /// Run on the worker right after processing.
    Worker,
}

type CompletedCallback = Box<dyn FnMut(&AsyncTaskHandle) + Send>;

struct Inner {
    task: Arc<dyn AsyncTask>,
    priority: Priority,
    callback_thread: CallbackThread,
    callback: Mutex<CompletedCallback>,
    outcome: Mutex<Option<Result<(), TaskError>>>,
    cancelled: AtomicBool,
}

/// A submitted task together with its scheduling options and completion callback.
///
/// Handles are reference counted; clones refer to the same task and compare equal.
/// The manager identifies tasks by handle, so adding the same handle twice queues
/// the same work twice but never runs it on two workers at once.
#[derive(Clone)]
pub struct AsyncTaskHandle {
    inner: Arc<Inner>,
}

impl AsyncTaskHandle {
    /// Wraps `task`. `callback` runs once per successful or failed processing, unless the
    /// task was removed from the manager in the meantime.
    pub fn new(
        task: Arc<dyn AsyncTask>,
        priority: Priority,
        callback_thread: CallbackThread,
        callback: impl FnMut(&Self) + Send + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                task,
                priority,
                callback_thread,
                callback: Mutex::new(Box::new(callback)),
                outcome: Mutex::new(None),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// The wrapped task.
    pub fn task(&self) -> &dyn AsyncTask {
        &*self.inner.task
    }

    /// See [`AsyncTask::task_name`].
    pub fn task_name(&self) -> &str {
        self.inner.task.task_name()
    }

    /// See [`AsyncTask::is_ready`].
    pub fn is_ready(&self) -> bool {
        self.inner.task.is_ready()
    }

    /// Scheduling class of the task.
    pub fn priority(&self) -> Priority {
        self.inner.priority
    }

    /// Thread the completion callback runs on.
    pub fn callback_thread(&self) -> CallbackThread {
        self.inner.callback_thread
    }

    /// Whether the last processing finished without error.
    pub fn is_succeeded(&self) -> bool {
        matches!(*self.inner.outcome.lock(), Some(Ok(())))
    }

    /// The error of the last processing, if it failed.
    pub fn error(&self) -> Option<TaskError> {
        match &*self.inner.outcome.lock() {
            Some(Err(error)) => Some(error.clone()),
            _ => None,
        }
    }

    /// Whether the task was removed from the manager since it was last added.
    ///
    /// Long running tasks may poll this to stop early; the result of a cancelled run is
    /// discarded either way.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn set_cancelled(&self, cancelled: bool) {
        self.inner.cancelled.store(cancelled, Ordering::Release);
    }

    /// Runs the task, turning a panic into [`TaskError::Panicked`].
    pub(crate) fn process(&self) {
        let outcome = match catch_unwind(AssertUnwindSafe(|| self.inner.task.process())) {
            Ok(outcome) => outcome,
            Err(_) => {
                log::error!("AsyncTask[{}] panicked", self.task_name());
                Err(TaskError::Panicked)
            }
        };
        if let Err(error) = &outcome {
            log::debug!("AsyncTask[{}] failed: {error}", self.task_name());
        }
        *self.inner.outcome.lock() = Some(outcome);
    }

    pub(crate) fn invoke_callback(&self) {
        let mut callback = self.inner.callback.lock();
        (*callback)(self);
    }

    /// Identity of the shared allocation.
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.inner).addr()
    }
}

impl PartialEq for AsyncTaskHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for AsyncTaskHandle {}

impl fmt::Debug for AsyncTaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTaskHandle")
            .field("task_name", &self.task_name())
            .field("priority", &self.inner.priority)
            .field("callback_thread", &self.inner.callback_thread)
            .field("outcome", &*self.inner.outcome.lock())
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::{AsyncTask, AsyncTaskHandle, CallbackThread, Priority, TaskError};

    struct Outcome(Option<&'static str>);

    impl AsyncTask for Outcome {
        fn process(&self) -> Result<(), TaskError> {
            match self.0 {
                Some("panic") => panic!("boom"),
                Some(message) => Err(TaskError::Failed(message.into())),
                None => Ok(()),
            }
        }
    }

    fn handle(outcome: Option<&'static str>) -> AsyncTaskHandle {
        AsyncTaskHandle::new(
            Arc::new(Outcome(outcome)),
            Priority::High,
            CallbackThread::Main,
            |_| {},
        )
    }

    #[test]
    fn identity_is_the_allocation() {
        let a = handle(None);
        let b = handle(None);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.key(), a.clone().key());
    }

    #[test]
    fn outcomes() {
        let ok = handle(None);
        assert!(!ok.is_succeeded(), "not processed yet");
        ok.process();
        assert!(ok.is_succeeded());

        let failed = handle(Some("no font"));
        failed.process();
        assert!(!failed.is_succeeded());
        assert_eq!(failed.error(), Some(TaskError::Failed("no font".into())));

        let panicked = handle(Some("panic"));
        panicked.process();
        assert_eq!(panicked.error(), Some(TaskError::Panicked));
    }

    #[test]
    fn callback_sees_the_handle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let task = AsyncTaskHandle::new(
            Arc::new(Outcome(None)),
            Priority::Low,
            CallbackThread::Worker,
            move |task| {
                assert!(task.is_succeeded(), "callback runs after processing");
                seen.fetch_add(1, Ordering::Relaxed);
            },
        );
        task.process();
        task.invoke_callback();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(task.task_name(), "AsyncTask");
    }
}
