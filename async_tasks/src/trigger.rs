// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

/// Wakes the owning thread. Triggers coalesce until the owning thread wakes up.
#[derive(Clone, Debug)]
pub(crate) struct Trigger {
    sender: Sender<()>,
    receiver: Receiver<()>,
}

impl Trigger {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        Self { sender, receiver }
    }

    pub(crate) fn trigger(&self) {
        // A full channel already holds a pending wake-up, and the receiver lives as
        // long as the sender.
        let _ = self.sender.try_send(());
    }

    /// Blocks until triggered or `timeout` elapses. Returns whether a trigger arrived.
    pub(crate) fn wait(&self, timeout: Duration) -> bool {
        self.receiver.recv_timeout(timeout).is_ok()
    }
}
