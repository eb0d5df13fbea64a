//! Sharded key map with a global version counter
//!
//! # Design
//!
//! - DashMap: sharded, concurrent readers, writers only lock the key's shard
//! - FxHash: fast non-crypto hash for short string keys
//! - Global AtomicU64 version: every write gets a fresh, larger version
//!
//! Versions are what optimistic transactions compare at commit time. A key
//! that was never written has version 0.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxHasher;
use shareguard_core::{Shares, StoreError, StoreResult};
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// A stored integer together with the version of its last write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedValue {
    /// Current value
    pub value: Shares,
    /// Version assigned by the write that produced `value`
    pub version: u64,
}

/// Sharded storage - DashMap keyed by the full string key
///
/// # Thread Safety
///
/// Each method is atomic with respect to a single key. Nothing here spans
/// keys; multi-key atomicity is layered on top by
/// [`MemoryStore`](crate::MemoryStore).
pub struct ShardedStore {
    entries: DashMap<String, VersionedValue, FxBuildHasher>,
    version: AtomicU64,
}

impl ShardedStore {
    /// Create new sharded store
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher::default()),
            version: AtomicU64::new(0),
        }
    }

    /// Get current version
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Increment version and return new value
    #[inline]
    pub fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was ever written
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a value and its version
    #[inline]
    pub fn get(&self, key: &str) -> Option<VersionedValue> {
        self.entries.get(key).map(|entry| *entry.value())
    }

    /// Version of a key, 0 if absent
    #[inline]
    pub fn version_of(&self, key: &str) -> u64 {
        self.get(key).map(|v| v.version).unwrap_or(0)
    }

    /// Write a value under a fresh version, returning that version
    pub fn put(&self, key: &str, value: Shares) -> u64 {
        let version = self.next_version();
        self.put_at(key, value, version);
        version
    }

    /// Write a value under a caller-supplied version
    ///
    /// Used when several keys are committed together and must share one
    /// version.
    pub fn put_at(&self, key: &str, value: Shares, version: u64) {
        self.entries
            .insert(key.to_string(), VersionedValue { value, version });
    }

    /// Atomically add `delta`, treating a missing key as 0
    ///
    /// The shard stays locked between reading the old value and writing the
    /// new one.
    pub fn add(&self, key: &str, delta: Shares) -> StoreResult<Shares> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let next = occupied
                    .get()
                    .value
                    .checked_add(delta)
                    .ok_or_else(|| StoreError::Overflow(key.to_string()))?;
                let version = self.next_version();
                *occupied.get_mut() = VersionedValue {
                    value: next,
                    version,
                };
                Ok(next)
            }
            Entry::Vacant(vacant) => {
                let version = self.next_version();
                vacant.insert(VersionedValue {
                    value: delta,
                    version,
                });
                Ok(delta)
            }
        }
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("entries", &self.len())
            .field("version", &self.version())
            .finish()
    }
}
