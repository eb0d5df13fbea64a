//! Distributed lock
//!
//! Acquire a named lease lock, then GET, validate, SET, then release. Every
//! buyer of every company uses the same lock name, so unrelated companies
//! serialize against each other too. The name stays global to match the
//! deployed behavior; [`DistributedLock::with_name`] scopes it when needed.
//!
//! The lease bounds how long the lock survives a crashed holder. A holder
//! that outlives its lease loses exclusivity; that shows up as a `false`
//! release and is logged.

use crate::error::BuyError;
use crate::strategy::{check_funds, ensure_positive, BuyStrategy, Purchase, StrategyKind};
use shareguard_core::{shares_key, BuyRequest, KeyValueStore, LockHandle, StoreError};
use tracing::{debug, warn};

/// Lock name shared by every buyer
pub const GLOBAL_LOCK_NAME: &str = "my-global-mutex";

/// Read-validate-write under a named mutex
#[derive(Debug, Clone)]
pub struct DistributedLock {
    lock_name: String,
}

impl DistributedLock {
    /// Strategy using [`GLOBAL_LOCK_NAME`]
    pub fn new() -> Self {
        Self::with_name(GLOBAL_LOCK_NAME)
    }

    /// Strategy using a custom lock name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            lock_name: name.into(),
        }
    }

    /// Name of the lock taken around each attempt
    pub fn lock_name(&self) -> &str {
        &self.lock_name
    }
}

impl Default for DistributedLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the lock when dropped, on every exit path
struct LockGuard<'a> {
    store: &'a dyn KeyValueStore,
    handle: LockHandle,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        match self.store.release_lock(&self.handle) {
            Ok(true) => {}
            Ok(false) => warn!(lock = %self.handle.name, "lock lease expired before release"),
            Err(e) => warn!(lock = %self.handle.name, error = %e, "failed to release lock"),
        }
    }
}

impl BuyStrategy for DistributedLock {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DistributedLock
    }

    fn buy(&self, store: &dyn KeyValueStore, request: &BuyRequest) -> Result<Purchase, BuyError> {
        ensure_positive(request)?;
        let key = shares_key(&request.company);

        let handle = match store.acquire_lock(&self.lock_name) {
            Ok(handle) => handle,
            Err(StoreError::LockUnavailable { name, waited_ms }) => {
                warn!(buyer = %request.buyer, lock = %name, waited_ms, "lock not acquired");
                return Err(BuyError::LockUnavailable(name));
            }
            Err(e) => return Err(e.into()),
        };
        let _guard = LockGuard { store, handle };
        debug!(buyer = %request.buyer, lock = %self.lock_name, "lock acquired");

        let current = store.get(&key)?;
        let remaining = check_funds(request, current)?;
        store.set(&key, remaining)?;

        Ok(Purchase { remaining })
    }
}
