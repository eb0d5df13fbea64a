//! Start gate and completion barrier for buyer threads
//!
//! The orchestrator opens a [`StartGate`] once every buyer is spawned, and
//! blocks on a [`CompletionBarrier`] until each buyer has signalled. Buyers
//! signal through a [`CompletionGuard`], so a buyer that returns early or
//! panics still counts as finished.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counting latch: `wait` returns once `done` was called `count` times
#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: Mutex<usize>,
    all_done: Condvar,
}

impl CompletionBarrier {
    /// Barrier expecting `count` completions
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            all_done: Condvar::new(),
        }
    }

    /// Record one completion. Extra calls past zero are ignored.
    pub fn done(&self) {
        let mut remaining = self.remaining.lock();
        if *remaining == 0 {
            return;
        }
        *remaining -= 1;
        if *remaining == 0 {
            self.all_done.notify_all();
        }
    }

    /// Block until every expected completion has been recorded
    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.all_done.wait(&mut remaining);
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    ///
    /// Returns `true` if the barrier completed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            if self.all_done.wait_until(&mut remaining, deadline).timed_out() {
                return *remaining == 0;
            }
        }
        true
    }

    /// Completions still outstanding
    pub fn remaining(&self) -> usize {
        *self.remaining.lock()
    }

    /// Guard that records one completion when dropped
    pub fn guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            barrier: Arc::clone(self),
        }
    }
}

/// Records a completion on drop
#[derive(Debug)]
pub struct CompletionGuard {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.barrier.done();
    }
}

/// One-shot gate; waiters block until it is opened
#[derive(Debug, Default)]
pub struct StartGate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl StartGate {
    /// Closed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every current and future waiter
    pub fn open(&self) {
        let mut open = self.open.lock();
        *open = true;
        self.opened.notify_all();
    }

    /// Block until the gate is open
    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.opened.wait(&mut open);
        }
    }

    /// True once opened
    pub fn is_open(&self) -> bool {
        *self.open.lock()
    }
}
