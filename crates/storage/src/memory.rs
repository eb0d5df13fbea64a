//! In-process store with Redis execution semantics
//!
//! ## Execution model
//!
//! A Redis server executes one command at a time, but a client's *sequence*
//! of commands interleaves with other clients'. `MemoryStore` reproduces
//! that split with an execution gate:
//!
//! ```text
//! GET / SET / INCRBY / lock cmds   shared gate   (atomic per key via DashMap)
//! EXEC (watch commit) / EVALSHA    exclusive gate (nothing else runs)
//! ```
//!
//! ## Commit sequence (watch)
//!
//! ```text
//! 1. WATCH      - capture the version of every watched key
//! 2. body       - reads go to the store, writes are staged
//! 3. EXEC       - take the exclusive gate
//! 4. validate   - any watched version changed? abort with Conflict
//! 5. apply      - all staged writes share one fresh version
//! ```
//!
//! The exclusive gate spans validate and apply, so no write can land
//! between them.
//!
//! ## Simulated latency
//!
//! With [`StoreOptions::latency_ms`] set, every command sleeps half the round
//! trip before executing and half after. The gate is never held while
//! sleeping.

use crate::locks::LockTable;
use crate::options::StoreOptions;
use crate::scripts::ScriptCache;
use crate::sharded::{ShardedStore, VersionedValue};
use parking_lot::RwLock;
use shareguard_core::{
    KeyValueStore, LockHandle, Script, ScriptEnv, Shares, StoreError, StoreResult, Transaction,
};
use smallvec::SmallVec;
use std::time::Duration;
use tracing::debug;

/// In-process key-value store
pub struct MemoryStore {
    data: ShardedStore,
    exec_gate: RwLock<()>,
    scripts: ScriptCache,
    locks: LockTable,
    options: StoreOptions,
}

impl MemoryStore {
    /// Create a store with default options
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Create a store with the given options
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            data: ShardedStore::new(),
            exec_gate: RwLock::new(()),
            scripts: ScriptCache::new(),
            locks: LockTable::new(),
            options,
        }
    }

    /// Options this store was built with
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Read a value with its version, bypassing latency simulation
    pub fn inspect(&self, key: &str) -> Option<VersionedValue> {
        self.data.get(key)
    }

    /// Current global version
    pub fn version(&self) -> u64 {
        self.data.version()
    }

    /// True if the digest is in the script cache
    pub fn script_exists(&self, digest: &str) -> bool {
        self.scripts.contains(digest)
    }

    /// Drop all cached scripts
    pub fn script_flush(&self) {
        self.scripts.flush();
    }

    /// True if the named lock is currently held
    pub fn is_locked(&self, name: &str) -> bool {
        self.locks.is_locked(name)
    }

    fn transit(&self) {
        let half = self.options.latency() / 2;
        if half > Duration::ZERO {
            std::thread::sleep(half);
        }
    }

    /// Run `f` as one command: request transit, execute, response transit
    fn round_trip<T>(&self, f: impl FnOnce() -> T) -> T {
        self.transit();
        let out = f();
        self.transit();
        out
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("data", &self.data)
            .field("scripts", &self.scripts.len())
            .field("options", &self.options)
            .finish()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Shares> {
        self.round_trip(|| {
            let _gate = self.exec_gate.read();
            self.data
                .get(key)
                .map(|v| v.value)
                .ok_or_else(|| StoreError::NotFound(key.to_string()))
        })
    }

    fn set(&self, key: &str, value: Shares) -> StoreResult<()> {
        self.round_trip(|| {
            let _gate = self.exec_gate.read();
            self.data.put(key, value);
            Ok(())
        })
    }

    fn incr_by(&self, key: &str, delta: Shares) -> StoreResult<Shares> {
        self.round_trip(|| {
            let _gate = self.exec_gate.read();
            self.data.add(key, delta)
        })
    }

    fn watch(
        &self,
        keys: &[&str],
        body: &mut dyn FnMut(&mut Transaction<'_>) -> StoreResult<()>,
    ) -> StoreResult<()> {
        let watched: SmallVec<[(String, u64); 2]> = self.round_trip(|| {
            let _gate = self.exec_gate.read();
            keys.iter()
                .map(|key| (key.to_string(), self.data.version_of(key)))
                .collect()
        });

        let mut txn = Transaction::new(self);
        // Body errors behave like UNWATCH: nothing staged is applied
        body(&mut txn)?;
        if txn.is_discarded() {
            return Ok(());
        }
        let writes = txn.into_writes();

        self.round_trip(|| {
            let _gate = self.exec_gate.write();

            for (key, seen) in &watched {
                let now = self.data.version_of(key);
                if now != *seen {
                    debug!(key = %key, seen, now, "watched key changed, aborting EXEC");
                    return Err(StoreError::Conflict(key.clone()));
                }
            }

            if !writes.is_empty() {
                let version = self.data.next_version();
                for (key, value) in &writes {
                    self.data.put_at(key, *value, version);
                }
            }
            Ok(())
        })
    }

    fn script_load(&self, script: &Script) -> StoreResult<String> {
        Ok(self.round_trip(|| self.scripts.load(script)))
    }

    fn eval_sha(&self, digest: &str, keys: &[&str], args: &[Shares]) -> StoreResult<Shares> {
        self.round_trip(|| {
            let script = self
                .scripts
                .get(digest)
                .ok_or_else(|| StoreError::UnknownScript(digest.to_string()))?;
            let _gate = self.exec_gate.write();
            let mut env = ExclusiveEnv { data: &self.data };
            script.invoke(&mut env, keys, args)
        })
    }

    fn acquire_lock(&self, name: &str) -> StoreResult<LockHandle> {
        self.round_trip(|| {
            self.locks.acquire(
                name,
                self.options.lock_lease(),
                self.options.lock_acquire_timeout(),
            )
        })
    }

    fn release_lock(&self, handle: &LockHandle) -> StoreResult<bool> {
        Ok(self.round_trip(|| self.locks.release(handle)))
    }
}

/// Script view of the data while the exclusive gate is held
struct ExclusiveEnv<'a> {
    data: &'a ShardedStore,
}

impl ScriptEnv for ExclusiveEnv<'_> {
    fn get(&mut self, key: &str) -> StoreResult<Option<Shares>> {
        Ok(self.data.get(key).map(|v| v.value))
    }

    fn set(&mut self, key: &str, value: Shares) -> StoreResult<()> {
        self.data.put(key, value);
        Ok(())
    }
}
