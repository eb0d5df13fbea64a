//! Store contract consumed by the buy strategies
//!
//! [`KeyValueStore`] is the seam between the strategies and whatever store
//! holds the ledger. It exposes exactly the primitives a Redis-like server
//! offers:
//!
//! | Primitive | Method | Atomicity |
//! |-----------|--------|-----------|
//! | GET / SET | [`get`](KeyValueStore::get), [`set`](KeyValueStore::set) | per command |
//! | INCRBY | [`incr_by`](KeyValueStore::incr_by) | per command |
//! | WATCH / MULTI / EXEC | [`watch`](KeyValueStore::watch) | whole commit, conditional |
//! | EVAL / EVALSHA | [`run_script`](KeyValueStore::run_script) | whole script |
//! | lock / unlock | [`acquire_lock`](KeyValueStore::acquire_lock), [`release_lock`](KeyValueStore::release_lock) | lease based |
//!
//! Nothing is atomic *across* calls. A strategy that reads with `get` and
//! writes with `set` leaves a window in which other callers interleave.

use crate::error::{StoreError, StoreResult};
use crate::script::Script;
use crate::types::Shares;
use smallvec::SmallVec;
use std::time::Duration;

/// Key-value store primitives
///
/// Implementations must be shareable across buyer threads.
pub trait KeyValueStore: Send + Sync {
    /// Read an integer value. Missing keys are [`StoreError::NotFound`].
    fn get(&self, key: &str) -> StoreResult<Shares>;

    /// Overwrite a value unconditionally.
    fn set(&self, key: &str, value: Shares) -> StoreResult<()>;

    /// Atomically add `delta` (which may be negative) and return the new value.
    ///
    /// A missing key counts as 0.
    fn incr_by(&self, key: &str, delta: Shares) -> StoreResult<Shares>;

    /// Run `body` as an optimistic transaction over `keys`.
    ///
    /// The watched keys' versions are captured before `body` runs. Writes the
    /// body stages through [`Transaction::set`] are applied at commit only if
    /// no watched key changed in between; otherwise nothing is applied and
    /// [`StoreError::Conflict`] is returned. An error returned by `body`
    /// discards the staged writes and is passed through unchanged, and a body
    /// that calls [`Transaction::discard`] ends the transaction with `Ok(())`
    /// without committing.
    fn watch(
        &self,
        keys: &[&str],
        body: &mut dyn FnMut(&mut Transaction<'_>) -> StoreResult<()>,
    ) -> StoreResult<()>;

    /// Cache a script on the store and return its digest (SCRIPT LOAD).
    fn script_load(&self, script: &Script) -> StoreResult<String>;

    /// Run a previously loaded script by digest (EVALSHA).
    ///
    /// Returns [`StoreError::UnknownScript`] if the digest was never loaded.
    fn eval_sha(&self, digest: &str, keys: &[&str], args: &[Shares]) -> StoreResult<Shares>;

    /// Run a script, loading it first if the store does not know it yet.
    fn run_script(&self, script: &Script, keys: &[&str], args: &[Shares]) -> StoreResult<Shares> {
        match self.eval_sha(script.digest(), keys, args) {
            Err(StoreError::UnknownScript(_)) => {
                self.script_load(script)?;
                self.eval_sha(script.digest(), keys, args)
            }
            other => other,
        }
    }

    /// Acquire the named lock, blocking up to the store's acquire timeout.
    fn acquire_lock(&self, name: &str) -> StoreResult<LockHandle>;

    /// Release a lock.
    ///
    /// Returns `false` if the handle no longer owns the lock (its lease
    /// expired and someone else may hold it now).
    fn release_lock(&self, handle: &LockHandle) -> StoreResult<bool>;
}

/// Staging area handed to an optimistic transaction body
///
/// Reads go straight to the store; writes are buffered until commit.
pub struct Transaction<'a> {
    reader: &'a dyn KeyValueStore,
    writes: SmallVec<[(String, Shares); 2]>,
    discarded: bool,
}

impl<'a> Transaction<'a> {
    /// Create a transaction reading through `reader`
    pub fn new(reader: &'a dyn KeyValueStore) -> Self {
        Self {
            reader,
            writes: SmallVec::new(),
            discarded: false,
        }
    }

    /// Read a value
    ///
    /// A value staged earlier in the same transaction is returned instead of
    /// the stored one.
    pub fn get(&self, key: &str) -> StoreResult<Shares> {
        if let Some((_, value)) = self.writes.iter().rev().find(|(k, _)| k == key) {
            return Ok(*value);
        }
        self.reader.get(key)
    }

    /// Stage a write (queued inside MULTI)
    pub fn set(&mut self, key: &str, value: Shares) {
        self.writes.push((key.to_string(), value));
    }

    /// Drop everything staged and skip EXEC (DISCARD)
    ///
    /// A discarded transaction commits nothing and cannot conflict.
    pub fn discard(&mut self) {
        self.writes.clear();
        self.discarded = true;
    }

    /// True once [`discard`](Self::discard) was called
    pub fn is_discarded(&self) -> bool {
        self.discarded
    }

    /// Staged writes in issue order
    pub fn writes(&self) -> &[(String, Shares)] {
        &self.writes
    }

    /// Consume the transaction, returning its staged writes
    pub fn into_writes(self) -> SmallVec<[(String, Shares); 2]> {
        self.writes
    }
}

/// Store-side view available to a running script (`redis.call`)
pub trait ScriptEnv {
    /// Read a value; `None` if missing
    fn get(&mut self, key: &str) -> StoreResult<Option<Shares>>;

    /// Write a value
    fn set(&mut self, key: &str, value: Shares) -> StoreResult<()>;
}

/// Proof of lock ownership returned by [`KeyValueStore::acquire_lock`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHandle {
    /// Lock name
    pub name: String,
    /// Owner token; release only succeeds while it is the current one
    pub token: u64,
    /// Lease granted at acquisition
    pub lease: Duration,
}
