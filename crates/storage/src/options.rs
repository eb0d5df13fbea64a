//! Store tuning knobs
//!
//! Durations are kept in milliseconds so the options read naturally from
//! TOML:
//!
//! ```toml
//! [store]
//! latency_ms = 5
//! lock_lease_ms = 8000
//! lock_acquire_timeout_ms = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lock lease, matching the usual Redlock client expiry
pub const DEFAULT_LOCK_LEASE_MS: u64 = 8_000;

/// Default time a caller waits for a contended lock
pub const DEFAULT_LOCK_ACQUIRE_TIMEOUT_MS: u64 = 10_000;

/// Options for [`MemoryStore`](crate::MemoryStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Simulated network round trip per command.
    ///
    /// Half is spent before the command executes, half after. Zero disables
    /// the simulation.
    pub latency_ms: u64,
    /// Lease granted to an acquired lock
    pub lock_lease_ms: u64,
    /// How long `acquire_lock` waits before giving up
    pub lock_acquire_timeout_ms: u64,
}

impl StoreOptions {
    /// Default options: no latency, 8s lease, 10s acquire timeout
    pub fn new() -> Self {
        Self {
            latency_ms: 0,
            lock_lease_ms: DEFAULT_LOCK_LEASE_MS,
            lock_acquire_timeout_ms: DEFAULT_LOCK_ACQUIRE_TIMEOUT_MS,
        }
    }

    /// Set the simulated round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }

    /// Set the lock lease
    pub fn with_lock_lease(mut self, lease: Duration) -> Self {
        self.lock_lease_ms = lease.as_millis() as u64;
        self
    }

    /// Set the lock acquire timeout
    pub fn with_lock_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.lock_acquire_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Simulated round trip
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Lock lease
    pub fn lock_lease(&self) -> Duration {
        Duration::from_millis(self.lock_lease_ms)
    }

    /// Lock acquire timeout
    pub fn lock_acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_acquire_timeout_ms)
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::new()
    }
}
