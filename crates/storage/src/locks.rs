//! Named lease locks
//!
//! Models a Redlock-style lock on a single store node: a lock is a named
//! entry holding the owner's token and an expiry. Acquiring blocks until the
//! entry is absent or expired; releasing only succeeds if the caller's token
//! still owns an unexpired lease.

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;
use shareguard_core::{LockHandle, StoreError, StoreResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Lease {
    token: u64,
    expires_at: Instant,
}

/// Table of currently held locks
#[derive(Debug)]
pub struct LockTable {
    held: Mutex<FxHashMap<String, Lease>>,
    released: Condvar,
    next_token: AtomicU64,
}

impl LockTable {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self {
            held: Mutex::new(FxHashMap::default()),
            released: Condvar::new(),
            next_token: AtomicU64::new(1),
        }
    }

    /// Acquire `name`, waiting at most `timeout` for the current owner to
    /// release it or for its lease to run out
    pub fn acquire(&self, name: &str, lease: Duration, timeout: Duration) -> StoreResult<LockHandle> {
        let started = Instant::now();
        let deadline = started + timeout;
        let mut held = self.held.lock();

        loop {
            let now = Instant::now();
            let current = held.get(name).copied();

            match current {
                Some(owner) if owner.expires_at > now => {
                    if now >= deadline {
                        return Err(StoreError::LockUnavailable {
                            name: name.to_string(),
                            waited_ms: started.elapsed().as_millis() as u64,
                        });
                    }
                    // Wake on release, on lease expiry, or at our own deadline
                    let wake_at = owner.expires_at.min(deadline);
                    self.released.wait_until(&mut held, wake_at);
                }
                _ => {
                    if current.is_some() {
                        tracing::debug!(lock = name, "taking over expired lease");
                    }
                    let token = self.next_token.fetch_add(1, Ordering::Relaxed);
                    held.insert(
                        name.to_string(),
                        Lease {
                            token,
                            expires_at: now + lease,
                        },
                    );
                    return Ok(LockHandle {
                        name: name.to_string(),
                        token,
                        lease,
                    });
                }
            }
        }
    }

    /// Release a lock held by `handle`
    ///
    /// Returns `false` when the lease already expired or another owner holds
    /// the lock now.
    pub fn release(&self, handle: &LockHandle) -> bool {
        let mut held = self.held.lock();
        let owned = match held.get(&handle.name) {
            Some(lease) if lease.token == handle.token => {
                let live = lease.expires_at > Instant::now();
                held.remove(&handle.name);
                live
            }
            _ => false,
        };
        drop(held);
        self.released.notify_all();
        owned
    }

    /// True if `name` is held under an unexpired lease
    pub fn is_locked(&self, name: &str) -> bool {
        self.held
            .lock()
            .get(name)
            .map(|lease| lease.expires_at > Instant::now())
            .unwrap_or(false)
    }
}

impl Default for LockTable {
    fn default() -> Self {
        Self::new()
    }
}
