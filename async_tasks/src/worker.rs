// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::manager::Shared;

#[derive(Default)]
struct Flags {
    idle: bool,
    /// Set by each request, so a request racing with the worker going idle is not lost.
    wake: bool,
    destroy: bool,
}

#[derive(Default)]
struct Signal {
    flags: Mutex<Flags>,
    condvar: Condvar,
}

/// One worker of the pool. The thread starts on the first request and is joined on drop.
pub(crate) struct AsyncTaskThread {
    id: usize,
    signal: Arc<Signal>,
    thread: Option<JoinHandle<()>>,
}

impl AsyncTaskThread {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            id,
            signal: Arc::new(Signal {
                flags: Mutex::new(Flags {
                    idle: true,
                    ..Flags::default()
                }),
                condvar: Condvar::new(),
            }),
            thread: None,
        }
    }

    /// Asks the worker to look for work. Returns whether it was idle.
    pub(crate) fn request(&mut self, shared: &Arc<Shared>) -> bool {
        if self.thread.is_none() {
            let signal = self.signal.clone();
            let shared = shared.clone();
            let spawned = thread::Builder::new()
                .name(format!("AsyncTaskThread[{}]", self.id))
                .spawn(move || run(&signal, &shared));
            match spawned {
                Ok(thread) => self.thread = Some(thread),
                Err(error) => {
                    log::error!("failed to start AsyncTaskThread[{}]: {error}", self.id);
                    return false;
                }
            }
        }

        let mut flags = self.signal.flags.lock();
        flags.wake = true;
        let was_idle = core::mem::replace(&mut flags.idle, false);
        if was_idle {
            self.signal.condvar.notify_one();
        }
        was_idle
    }
}

impl Drop for AsyncTaskThread {
    fn drop(&mut self) {
        {
            let mut flags = self.signal.flags.lock();
            flags.destroy = true;
            self.signal.condvar.notify_one();
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("AsyncTaskThread[{}] panicked", self.id);
            }
        }
    }
}

fn run(signal: &Signal, shared: &Shared) {
    loop {
        if signal.flags.lock().destroy {
            return;
        }
        match shared.pop_next_task_to_process() {
            Some(task) => {
                log::trace!("BEGIN: AsyncTask[{}] process", task.task_name());
                task.process();
                log::trace!("END: AsyncTask[{}] process", task.task_name());
                if signal.flags.lock().destroy {
                    return;
                }
                shared.complete_task(task);
            }
            None => {
                let mut flags = signal.flags.lock();
                while !flags.wake && !flags.destroy {
                    flags.idle = true;
                    signal.condvar.wait(&mut flags);
                }
                flags.wake = false;
                flags.idle = false;
            }
        }
    }
}
