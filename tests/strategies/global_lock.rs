//! Global Lock Tests
//!
//! Every Distributed Lock buyer takes the same lock name, so buys on two
//! unrelated companies cannot overlap. A per-company name lifts that.

use crate::*;
use parking_lot::Mutex;
use shareguard::{
    BuyRequest, BuyStrategy, DistributedLock, KeyValueStore, LockHandle, Script, Shares,
    StoreResult, Transaction, GLOBAL_LOCK_NAME,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;

/// Delegating store that tracks how many callers hold any lock at once
struct RecordingStore {
    inner: MemoryStore,
    holders: AtomicUsize,
    max_holders: AtomicUsize,
    names: Mutex<Vec<String>>,
}

impl RecordingStore {
    fn new(latency_ms: u64) -> Self {
        Self {
            inner: MemoryStore::with_options(
                StoreOptions::default().with_latency(Duration::from_millis(latency_ms)),
            ),
            holders: AtomicUsize::new(0),
            max_holders: AtomicUsize::new(0),
            names: Mutex::new(Vec::new()),
        }
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> StoreResult<Shares> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Shares) -> StoreResult<()> {
        self.inner.set(key, value)
    }

    fn incr_by(&self, key: &str, delta: Shares) -> StoreResult<Shares> {
        self.inner.incr_by(key, delta)
    }

    fn watch(
        &self,
        keys: &[&str],
        body: &mut dyn FnMut(&mut Transaction<'_>) -> StoreResult<()>,
    ) -> StoreResult<()> {
        self.inner.watch(keys, body)
    }

    fn script_load(&self, script: &Script) -> StoreResult<String> {
        self.inner.script_load(script)
    }

    fn eval_sha(&self, digest: &str, keys: &[&str], args: &[Shares]) -> StoreResult<Shares> {
        self.inner.eval_sha(digest, keys, args)
    }

    fn acquire_lock(&self, name: &str) -> StoreResult<LockHandle> {
        let handle = self.inner.acquire_lock(name)?;
        self.names.lock().push(name.to_string());
        let now = self.holders.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_holders.fetch_max(now, Ordering::SeqCst);
        Ok(handle)
    }

    fn release_lock(&self, handle: &LockHandle) -> StoreResult<bool> {
        self.holders.fetch_sub(1, Ordering::SeqCst);
        self.inner.release_lock(handle)
    }
}

/// One buyer per company, all released at once
fn buy_two_companies(store: &Arc<RecordingStore>, strategies: [Arc<dyn BuyStrategy>; 2]) {
    store.set("shares:alpha", 100).unwrap();
    store.set("shares:beta", 100).unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = strategies
        .into_iter()
        .zip(["alpha", "beta"])
        .map(|(strategy, company)| {
            let store = Arc::clone(store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let purchase = strategy
                    .buy(&*store, &BuyRequest::new("user1", company, 10))
                    .unwrap();
                assert_eq!(purchase.remaining, 90);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn test_unrelated_companies_serialize() {
    let store = Arc::new(RecordingStore::new(20));
    buy_two_companies(
        &store,
        [Arc::new(DistributedLock::new()), Arc::new(DistributedLock::new())],
    );

    assert_eq!(store.max_holders.load(Ordering::SeqCst), 1);
    let names = store.names.lock();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n == GLOBAL_LOCK_NAME));
}

#[test]
fn test_per_company_lock_names_overlap() {
    let store = Arc::new(RecordingStore::new(30));
    buy_two_companies(
        &store,
        [
            Arc::new(DistributedLock::with_name("lock:alpha")),
            Arc::new(DistributedLock::with_name("lock:beta")),
        ],
    );

    assert_eq!(store.max_holders.load(Ordering::SeqCst), 2);
}

#[test]
fn test_orchestrated_lock_run_releases_lock() {
    let store = store_with_latency(1);
    let report = run_on(
        Arc::clone(&store),
        &config(StrategyKind::DistributedLock, 1_000, 10, 100),
    );

    assert_conserved(&report);
    assert_eq!(report.purchased(), 10);
    assert!(!store.is_locked(GLOBAL_LOCK_NAME));
}
