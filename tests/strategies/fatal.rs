//! Fatal Run Tests
//!
//! Publishing the balance and reading it back are the only store calls that
//! end a run. A store that refuses either must surface the matching
//! `EngineError`, and a failed publish must not start any buyer.

use crate::*;
use shareguard::{
    EngineError, KeyValueStore, LockHandle, Orchestrator, Script, Shares, StoreError, StoreResult,
    Transaction,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Delegating store that can refuse SET or GET and counts buyer commands
struct FailingStore {
    inner: MemoryStore,
    refuse_set: bool,
    refuse_get: bool,
    buyer_calls: AtomicUsize,
}

impl FailingStore {
    fn new(refuse_set: bool, refuse_get: bool) -> Self {
        Self {
            inner: MemoryStore::new(),
            refuse_set,
            refuse_get,
            buyer_calls: AtomicUsize::new(0),
        }
    }

    fn buyer_calls(&self) -> usize {
        self.buyer_calls.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> StoreResult<Shares> {
        if self.refuse_get {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Shares) -> StoreResult<()> {
        if self.refuse_set {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.set(key, value)
    }

    fn incr_by(&self, key: &str, delta: Shares) -> StoreResult<Shares> {
        self.buyer_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.incr_by(key, delta)
    }

    fn watch(
        &self,
        keys: &[&str],
        body: &mut dyn FnMut(&mut Transaction<'_>) -> StoreResult<()>,
    ) -> StoreResult<()> {
        self.buyer_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.watch(keys, body)
    }

    fn script_load(&self, script: &Script) -> StoreResult<String> {
        self.inner.script_load(script)
    }

    fn eval_sha(&self, digest: &str, keys: &[&str], args: &[Shares]) -> StoreResult<Shares> {
        self.buyer_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.eval_sha(digest, keys, args)
    }

    fn acquire_lock(&self, name: &str) -> StoreResult<LockHandle> {
        self.buyer_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.acquire_lock(name)
    }

    fn release_lock(&self, handle: &LockHandle) -> StoreResult<bool> {
        self.inner.release_lock(handle)
    }
}

#[test]
fn test_failed_publish_starts_no_buyer() {
    for kind in [StrategyKind::AtomicScript, StrategyKind::DistributedLock] {
        let store = Arc::new(FailingStore::new(true, false));
        let orchestrator = Orchestrator::new(store.clone(), kind.build());

        let err = orchestrator.run(&config(kind, 1_000, 5, 100)).unwrap_err();

        match err {
            EngineError::Publish { company, source } => {
                assert_eq!(company.as_str(), "TestCompanySL");
                assert_eq!(source, StoreError::Unavailable("connection refused".into()));
            }
            other => panic!("{}: expected Publish, got {:?}", kind, other),
        }
        assert_eq!(store.buyer_calls(), 0, "{}", kind);
    }
}

#[test]
fn test_failed_final_read_ends_run() {
    // The script buyers never issue GET, so only the final read is refused
    let store = Arc::new(FailingStore::new(false, true));
    let orchestrator = Orchestrator::new(store.clone(), StrategyKind::AtomicScript.build());

    let err = orchestrator
        .run(&config(StrategyKind::AtomicScript, 1_000, 4, 100))
        .unwrap_err();

    assert!(
        matches!(err, EngineError::FinalRead { source: StoreError::Unavailable(_), .. }),
        "expected FinalRead, got {:?}",
        err
    );
    // EVALSHA runs twice for whoever loads the script
    assert!(store.buyer_calls() >= 4);
    assert_eq!(store.inner.get("shares:TestCompanySL").unwrap(), 600);
}
