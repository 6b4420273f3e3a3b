// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::completed::{CompletedCallbackTraceMask, TasksCompleted, TasksCompletedId};
use crate::config::AsyncTaskManagerConfig;
use crate::task::{AsyncTaskHandle, CallbackThread, Priority};
use crate::trigger::Trigger;
use crate::worker::AsyncTaskThread;

/// Number of completed tasks after which the owning thread is woken even if none of them
/// needs a callback, so finished tasks are released in bounded batches.
pub const FORCE_TRIGGER_THRESHOLD: usize = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunningTaskState {
    Running,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CompletedTaskState {
    RequireCallback,
    SkipCallback,
}

#[derive(Default)]
struct WaitingTasks {
    /// Ready tasks in submission order.
    waiting: VecDeque<AsyncTaskHandle>,
    /// Tasks added before they were ready.
    not_ready: VecDeque<AsyncTaskHandle>,
}

/// State shared between the manager and its workers.
///
/// Lock order: `waiting`, then `running`, then `completed`. The completed callback
/// bookkeeping has its own locks, which may be taken under these but never the reverse.
pub(crate) struct Shared {
    number_of_threads: usize,
    waiting: Mutex<WaitingTasks>,
    running: Mutex<Vec<(AsyncTaskHandle, RunningTaskState)>>,
    completed: Mutex<VecDeque<(AsyncTaskHandle, CompletedTaskState)>>,
    trigger: Trigger,
    tasks_completed: TasksCompleted,
}

impl Shared {
    fn new(number_of_threads: usize) -> Self {
        let trigger = Trigger::new();
        Self {
            number_of_threads,
            waiting: Mutex::new(WaitingTasks::default()),
            running: Mutex::new(Vec::new()),
            completed: Mutex::new(VecDeque::new()),
            tasks_completed: TasksCompleted::new(trigger.clone()),
            trigger,
        }
    }

    fn low_priority_limit(&self) -> usize {
        (self.number_of_threads / 2).max(1)
    }

    /// Queues `task`. Returns whether a worker should be woken for it.
    fn enqueue(&self, task: AsyncTaskHandle) -> bool {
        let mut queues = self.waiting.lock();
        if !task.is_ready() {
            queues.not_ready.push_back(task);
            return false;
        }
        queues.waiting.push_back(task);
        let running = self.running.lock();
        running.len() < self.number_of_threads
    }

    /// Claims the first waiting task that may run now.
    ///
    /// Skips tasks that are already running on another worker and low priority tasks
    /// while the low priority share of the pool is in use.
    pub(crate) fn pop_next_task_to_process(&self) -> Option<AsyncTaskHandle> {
        let mut queues = self.waiting.lock();
        let mut running = self.running.lock();
        let running_low = running
            .iter()
            .filter(|(task, _)| task.priority() == Priority::Low)
            .count();
        let index = queues.waiting.iter().position(|task| {
            if !task.is_ready() {
                log::error!(
                    "AsyncTask[{}] is waiting but not ready, skipping it",
                    task.task_name()
                );
                return false;
            }
            if running.iter().any(|(other, _)| other == task) {
                log::trace!("AsyncTask[{}] is already running", task.task_name());
                return false;
            }
            task.priority() == Priority::High || running_low < self.low_priority_limit()
        })?;
        let task = queues.waiting.remove(index)?;
        running.push((task.clone(), RunningTaskState::Running));
        log::trace!("AsyncTask[{}] claimed", task.task_name());
        Some(task)
    }

    /// Moves a processed task to the completed queue, running its callback first when it
    /// runs on workers and the task wasn't cancelled.
    pub(crate) fn complete_task(&self, task: AsyncTaskHandle) {
        let mut need_trigger = false;

        if task.callback_thread() == CallbackThread::Worker {
            let valid = self
                .running
                .lock()
                .iter()
                .any(|(other, state)| *other == task && *state == RunningTaskState::Running);
            if valid {
                if catch_unwind(AssertUnwindSafe(|| task.invoke_callback())).is_err() {
                    log::error!("AsyncTask[{}] callback panicked", task.task_name());
                }
                if self.tasks_completed.has_traced() {
                    self.tasks_completed.remove_task_trace(&task, 1);
                    need_trigger |= self.tasks_completed.has_ready();
                }
            }
        }

        {
            let mut running = self.running.lock();
            if let Some(index) = running.iter().position(|(other, _)| *other == task) {
                let (task, state) = running.remove(index);
                let callback_required = state == RunningTaskState::Running
                    && task.callback_thread() == CallbackThread::Main;
                need_trigger |= callback_required;

                let mut completed = self.completed.lock();
                completed.push_back((
                    task,
                    if callback_required {
                        CompletedTaskState::RequireCallback
                    } else {
                        CompletedTaskState::SkipCallback
                    },
                ));
                need_trigger |= completed.len() >= FORCE_TRIGGER_THRESHOLD;
            }
        }

        if need_trigger {
            self.trigger.trigger();
        }
    }

    fn pop_next_completed_task(&self) -> Option<AsyncTaskHandle> {
        // Skipped tasks are released after the lock.
        let mut skipped = Vec::new();
        let mut completed = self.completed.lock();
        while let Some((task, state)) = completed.pop_front() {
            match state {
                CompletedTaskState::RequireCallback => return Some(task),
                CompletedTaskState::SkipCallback => skipped.push(task),
            }
        }
        drop(completed);
        drop(skipped);
        None
    }
}

/// The round robin view of the worker pool.
struct Workers {
    threads: Vec<AsyncTaskThread>,
    next: usize,
}

/// Runs [`AsyncTask`](crate::AsyncTask)s on a bounded pool of worker threads.
///
/// Ready tasks are served first in, first out. A task never runs on two workers at once,
/// even when its handle was added more than once. Completion callbacks of
/// [`CallbackThread::Main`] tasks are queued for the thread that owns the manager: it
/// waits with [`wait_for_trigger`](Self::wait_for_trigger) and then runs them with
/// [`task_completed`](Self::task_completed) or
/// [`task_all_completed`](Self::task_all_completed).
///
/// Dropping the manager joins its workers after their current task. Results of tasks
/// finishing during the drop are discarded.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use async_tasks::{
///     AsyncTask, AsyncTaskHandle, AsyncTaskManager, AsyncTaskManagerConfig, CallbackThread,
///     Priority, TaskError,
/// };
///
/// struct Sum(u32, u32);
///
/// impl AsyncTask for Sum {
///     fn process(&self) -> Result<(), TaskError> {
///         let _ = self.0 + self.1;
///         Ok(())
///     }
/// }
///
/// let manager = AsyncTaskManager::new(AsyncTaskManagerConfig { number_of_threads: 2 });
/// let task = AsyncTaskHandle::new(
///     Arc::new(Sum(1, 2)),
///     Priority::High,
///     CallbackThread::Main,
///     |task| assert!(task.is_succeeded()),
/// );
/// manager.add_task(task);
/// while manager.waiting_task_count() + manager.running_task_count() > 0 {
///     manager.wait_for_trigger(Duration::from_millis(10));
/// }
/// manager.task_all_completed();
/// assert_eq!(manager.completed_task_count(), 0);
/// ```
pub struct AsyncTaskManager {
    shared: Arc<Shared>,
    workers: Mutex<Workers>,
}

impl AsyncTaskManager {
    /// Creates a manager. Worker threads start when work first arrives.
    pub fn new(config: AsyncTaskManagerConfig) -> Self {
        let number_of_threads = config.number_of_threads.max(1);
        Self {
            shared: Arc::new(Shared::new(number_of_threads)),
            workers: Mutex::new(Workers {
                threads: (1..=number_of_threads).map(AsyncTaskThread::new).collect(),
                next: 0,
            }),
        }
    }

    /// Size of the worker pool.
    pub fn number_of_threads(&self) -> usize {
        self.shared.number_of_threads
    }

    /// Submits `task`.
    ///
    /// Adding a handle that is already queued queues it again; it is still never
    /// processed on two workers at once.
    pub fn add_task(&self, task: AsyncTaskHandle) {
        task.set_cancelled(false);
        if self.shared.enqueue(task) {
            self.request_worker();
        }
    }

    /// Withdraws every submission of `task`.
    ///
    /// Queued submissions are dropped. A running submission is marked cancelled: it
    /// runs to the end but its callback is skipped.
    pub fn remove_task(&self, task: &AsyncTaskHandle) {
        task.set_cancelled(true);
        let mut removed = 0_u32;
        {
            let mut queues = self.shared.waiting.lock();
            let before = queues.waiting.len() + queues.not_ready.len();
            queues.waiting.retain(|other| other != task);
            queues.not_ready.retain(|other| other != task);
            removed += count(before - queues.waiting.len() - queues.not_ready.len());
        }
        {
            let mut running = self.shared.running.lock();
            for (other, state) in running.iter_mut() {
                if other == task && *state == RunningTaskState::Running {
                    *state = RunningTaskState::Cancelled;
                    removed += 1;
                }
            }
        }
        {
            let mut completed = self.shared.completed.lock();
            completed.retain(|(other, state)| {
                if other != task {
                    return true;
                }
                if *state == CompletedTaskState::RequireCallback {
                    removed += 1;
                }
                false
            });
        }
        if removed > 0 && self.shared.tasks_completed.has_traced() {
            self.shared.tasks_completed.remove_task_trace(task, removed);
        }
    }

    /// Moves `task` from the not ready queue to the back of the waiting queue.
    pub fn notify_to_task_ready(&self, task: &AsyncTaskHandle) {
        {
            let mut queues = self.shared.waiting.lock();
            let before = queues.not_ready.len();
            queues.not_ready.retain(|other| other != task);
            for _ in queues.not_ready.len()..before {
                queues.waiting.push_back(task.clone());
            }
        }
        self.request_worker();
    }

    /// Registers `callback` to run on the owning thread once every task currently
    /// submitted and selected by `mask` has completed or been removed.
    ///
    /// Runs on the next [`task_completed`](Self::task_completed) when no such task
    /// exists.
    pub fn set_completed_callback(
        &self,
        callback: impl FnOnce(TasksCompletedId) + Send + 'static,
        mask: CompletedCallbackTraceMask,
    ) -> TasksCompletedId {
        let tasks_completed = &self.shared.tasks_completed;
        let id = tasks_completed.generate_id(Box::new(callback));
        let mut traced_any = false;
        {
            let queues = self.shared.waiting.lock();
            let running = self.shared.running.lock();
            let completed = self.shared.completed.lock();

            let waiting = queues.waiting.iter().chain(queues.not_ready.iter());
            let running = running
                .iter()
                .filter(|(_, state)| *state == RunningTaskState::Running)
                .map(|(task, _)| task);
            let completed = completed
                .iter()
                .filter(|(_, state)| *state == CompletedTaskState::RequireCallback)
                .map(|(task, _)| task);
            for task in waiting.chain(running).chain(completed) {
                if mask.selects(task) {
                    traced_any = true;
                    tasks_completed.append_task_trace(id, task);
                }
            }
        }
        if !traced_any {
            tasks_completed.check_completed(id);
        }
        id
    }

    /// Unregisters a completed callback. Returns false if it already ran or is unknown.
    pub fn remove_completed_callback(&self, id: TasksCompletedId) -> bool {
        self.shared.tasks_completed.remove(id)
    }

    /// Blocks until a completion needs the owning thread or `timeout` elapses.
    ///
    /// Returns whether it was woken by a completion.
    pub fn wait_for_trigger(&self, timeout: Duration) -> bool {
        self.shared.trigger.wait(timeout)
    }

    /// Runs the callback of the oldest completed task, then any completed callbacks that
    /// became due.
    pub fn task_completed(&self) {
        if let Some(task) = self.shared.pop_next_completed_task() {
            self.finish(&task);
        }
        self.shared.tasks_completed.emit();
    }

    /// Runs the callbacks of every completed task, then any completed callbacks that
    /// became due.
    pub fn task_all_completed(&self) {
        while let Some(task) = self.shared.pop_next_completed_task() {
            self.finish(&task);
        }
        self.shared.tasks_completed.emit();
    }

    /// Number of ready tasks waiting for a worker.
    pub fn waiting_task_count(&self) -> usize {
        self.shared.waiting.lock().waiting.len()
    }

    /// Number of tasks waiting to become ready.
    pub fn not_ready_task_count(&self) -> usize {
        self.shared.waiting.lock().not_ready.len()
    }

    /// Number of tasks being processed, cancelled ones included.
    pub fn running_task_count(&self) -> usize {
        self.shared.running.lock().len()
    }

    /// Number of processed tasks not yet released by the owning thread.
    pub fn completed_task_count(&self) -> usize {
        self.shared.completed.lock().len()
    }

    /// Whether `task` is being processed and wasn't cancelled.
    pub fn is_running(&self, task: &AsyncTaskHandle) -> bool {
        self.shared
            .running
            .lock()
            .iter()
            .any(|(other, state)| other == task && *state == RunningTaskState::Running)
    }

    fn finish(&self, task: &AsyncTaskHandle) {
        task.invoke_callback();
        if self.shared.tasks_completed.has_traced() {
            self.shared.tasks_completed.remove_task_trace(task, 1);
        }
    }

    /// Wakes the next idle worker, if any. Busy workers look for work when they finish.
    fn request_worker(&self) {
        let mut workers = self.workers.lock();
        let Workers { threads, next } = &mut *workers;
        for _ in 0..threads.len() {
            let index = *next;
            *next = (*next + 1) % threads.len();
            if threads[index].request(&self.shared) {
                break;
            }
        }
    }
}

impl Default for AsyncTaskManager {
    fn default() -> Self {
        Self::new(AsyncTaskManagerConfig::default())
    }
}

impl fmt::Debug for AsyncTaskManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTaskManager")
            .field("number_of_threads", &self.number_of_threads())
            .field("waiting", &self.waiting_task_count())
            .field("not_ready", &self.not_ready_task_count())
            .field("running", &self.running_task_count())
            .field("completed", &self.completed_task_count())
            .field("tasks_completed", &self.shared.tasks_completed)
            .finish_non_exhaustive()
    }
}

fn count(removed: usize) -> u32 {
    u32::try_from(removed).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::{AsyncTaskManager, Shared, FORCE_TRIGGER_THRESHOLD};
    use crate::completed::CompletedCallbackTraceMask;
    use crate::config::AsyncTaskManagerConfig;
    use crate::task::{AsyncTask, AsyncTaskHandle, CallbackThread, Priority, TaskError};

    #[derive(Default)]
    struct Flag {
        ready: AtomicBool,
        processed: AtomicUsize,
    }

    impl AsyncTask for Flag {
        fn process(&self) -> Result<(), TaskError> {
            self.processed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn task_name(&self) -> &str {
            "Flag"
        }
    }

    fn ready_task() -> Arc<Flag> {
        let task = Flag::default();
        task.ready.store(true, Ordering::SeqCst);
        Arc::new(task)
    }

    fn handle(
        task: Arc<Flag>,
        priority: Priority,
        thread: CallbackThread,
        calls: &Arc<AtomicUsize>,
    ) -> AsyncTaskHandle {
        let calls = calls.clone();
        AsyncTaskHandle::new(task, priority, thread, move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn wait_until(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !done() {
            assert!(Instant::now() < deadline, "timed out");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn claims_in_submission_order() {
        let shared = Shared::new(4);
        let calls = Arc::new(AtomicUsize::new(0));
        let a = handle(ready_task(), Priority::High, CallbackThread::Main, &calls);
        let b = handle(ready_task(), Priority::High, CallbackThread::Main, &calls);
        assert!(shared.enqueue(a.clone()));
        assert!(shared.enqueue(b.clone()));
        assert_eq!(shared.pop_next_task_to_process(), Some(a));
        assert_eq!(shared.pop_next_task_to_process(), Some(b));
        assert_eq!(shared.pop_next_task_to_process(), None);
    }

    #[test]
    fn a_running_task_is_not_claimed_twice() {
        let shared = Shared::new(4);
        let calls = Arc::new(AtomicUsize::new(0));
        let a = handle(ready_task(), Priority::High, CallbackThread::Main, &calls);
        let b = handle(ready_task(), Priority::High, CallbackThread::Main, &calls);
        shared.enqueue(a.clone());
        shared.enqueue(a.clone());
        shared.enqueue(b.clone());

        assert_eq!(shared.pop_next_task_to_process(), Some(a.clone()));
        assert_eq!(shared.pop_next_task_to_process(), Some(b), "a is skipped");
        assert_eq!(shared.pop_next_task_to_process(), None);
        assert_eq!(shared.running.lock().len(), 2);

        a.process();
        shared.complete_task(a.clone());
        assert_eq!(shared.pop_next_task_to_process(), Some(a));
    }

    #[test]
    fn low_priority_tasks_use_half_the_pool() {
        let shared = Shared::new(4);
        let calls = Arc::new(AtomicUsize::new(0));
        let low: Vec<_> = (0..3)
            .map(|_| handle(ready_task(), Priority::Low, CallbackThread::Main, &calls))
            .collect();
        let high = handle(ready_task(), Priority::High, CallbackThread::Main, &calls);
        for task in &low {
            shared.enqueue(task.clone());
        }
        shared.enqueue(high.clone());

        assert_eq!(shared.pop_next_task_to_process(), Some(low[0].clone()));
        assert_eq!(shared.pop_next_task_to_process(), Some(low[1].clone()));
        assert_eq!(
            shared.pop_next_task_to_process(),
            Some(high),
            "the third low priority task waits without blocking"
        );
        assert_eq!(shared.pop_next_task_to_process(), None);

        shared.complete_task(low[0].clone());
        assert_eq!(shared.pop_next_task_to_process(), Some(low[2].clone()));
    }

    #[test]
    fn completion_routing() {
        let shared = Shared::new(2);
        let calls = Arc::new(AtomicUsize::new(0));
        let main = handle(ready_task(), Priority::High, CallbackThread::Main, &calls);
        let worker = handle(ready_task(), Priority::High, CallbackThread::Worker, &calls);
        shared.enqueue(main.clone());
        shared.enqueue(worker.clone());
        let first = shared.pop_next_task_to_process();
        let second = shared.pop_next_task_to_process();
        assert_eq!((first, second), (Some(main.clone()), Some(worker.clone())));

        shared.complete_task(worker);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "worker callbacks run at once");
        shared.complete_task(main.clone());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(shared.trigger.wait(Duration::ZERO));

        assert_eq!(shared.pop_next_completed_task(), Some(main));
        assert!(shared.completed.lock().is_empty(), "skipped tasks are released");
    }

    #[test]
    fn a_panicking_worker_callback_still_completes_the_task() {
        let shared = Shared::new(1);
        let task = AsyncTaskHandle::new(
            ready_task(),
            Priority::High,
            CallbackThread::Worker,
            |_| panic!("callback failed"),
        );
        shared.enqueue(task.clone());
        assert_eq!(shared.pop_next_task_to_process(), Some(task.clone()));

        shared.complete_task(task);
        assert!(shared.running.lock().is_empty());
        assert_eq!(shared.completed.lock().len(), 1);

        let calls = Arc::new(AtomicUsize::new(0));
        let next = handle(ready_task(), Priority::High, CallbackThread::Worker, &calls);
        shared.enqueue(next.clone());
        assert_eq!(shared.pop_next_task_to_process(), Some(next));
    }

    #[test]
    fn workers_survive_a_panicking_callback() {
        let manager = AsyncTaskManager::new(AsyncTaskManagerConfig {
            number_of_threads: 1,
        });
        manager.add_task(AsyncTaskHandle::new(
            ready_task(),
            Priority::High,
            CallbackThread::Worker,
            |_| panic!("callback failed"),
        ));
        wait_until(|| manager.completed_task_count() == 1);
        assert_eq!(manager.running_task_count(), 0);

        let calls = Arc::new(AtomicUsize::new(0));
        let flag = ready_task();
        manager.add_task(handle(flag.clone(), Priority::High, CallbackThread::Worker, &calls));
        wait_until(|| calls.load(Ordering::SeqCst) == 1);
        assert_eq!(flag.processed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn many_completions_force_a_trigger() {
        let shared = Shared::new(1);
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..FORCE_TRIGGER_THRESHOLD {
            let task = handle(ready_task(), Priority::High, CallbackThread::Worker, &calls);
            shared.enqueue(task);
            if let Some(task) = shared.pop_next_task_to_process() {
                shared.complete_task(task);
            }
        }
        assert_eq!(shared.completed.lock().len(), FORCE_TRIGGER_THRESHOLD);
        assert!(shared.trigger.wait(Duration::ZERO));
    }

    #[test]
    fn not_ready_tasks_wait_aside() {
        let manager = AsyncTaskManager::new(AsyncTaskManagerConfig {
            number_of_threads: 1,
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let flag = Arc::new(Flag::default());
        let task = handle(flag.clone(), Priority::High, CallbackThread::Main, &calls);
        manager.add_task(task.clone());
        assert_eq!(manager.not_ready_task_count(), 1);
        assert_eq!(manager.waiting_task_count(), 0);

        flag.ready.store(true, Ordering::SeqCst);
        manager.notify_to_task_ready(&task);
        assert_eq!(manager.not_ready_task_count(), 0);
        wait_until(|| manager.completed_task_count() == 1);
        manager.task_completed();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flag.processed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_tasks_are_not_processed() {
        let manager = AsyncTaskManager::new(AsyncTaskManagerConfig {
            number_of_threads: 1,
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let flag = Arc::new(Flag::default());
        let task = handle(flag.clone(), Priority::High, CallbackThread::Main, &calls);
        manager.add_task(task.clone());
        manager.remove_task(&task);
        assert!(task.is_cancelled());
        assert_eq!(manager.not_ready_task_count(), 0);

        flag.ready.store(true, Ordering::SeqCst);
        manager.notify_to_task_ready(&task);
        assert_eq!(manager.waiting_task_count(), 0);
        assert_eq!(flag.processed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn completed_callback_waits_for_selected_tasks() {
        let manager = AsyncTaskManager::new(AsyncTaskManagerConfig {
            number_of_threads: 2,
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let flags: Vec<_> = (0..2).map(|_| Arc::new(Flag::default())).collect();
        let high = handle(flags[0].clone(), Priority::High, CallbackThread::Main, &calls);
        let low = handle(flags[1].clone(), Priority::Low, CallbackThread::Main, &calls);
        manager.add_task(high.clone());
        manager.add_task(low.clone());

        let fired = Arc::new(AtomicUsize::new(0));
        let seen = fired.clone();
        manager.set_completed_callback(
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
            CompletedCallbackTraceMask::THREAD_MASK_ALL
                | CompletedCallbackTraceMask::PRIORITY_MASK_HIGH,
        );

        manager.remove_task(&low);
        manager.task_all_completed();
        assert_eq!(fired.load(Ordering::SeqCst), 0, "the high priority task is pending");

        flags[0].ready.store(true, Ordering::SeqCst);
        manager.notify_to_task_ready(&high);
        wait_until(|| manager.completed_task_count() == 1);
        manager.task_all_completed();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn completed_callback_without_tasks_runs_on_the_next_completion() {
        let manager = AsyncTaskManager::default();
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = fired.clone();
        let id = manager.set_completed_callback(
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
            CompletedCallbackTraceMask::default(),
        );
        assert!(manager.wait_for_trigger(Duration::ZERO));
        manager.task_completed();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!manager.remove_completed_callback(id));
    }
}
