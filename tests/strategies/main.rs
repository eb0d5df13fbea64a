//! Strategy Test Suite
//!
//! Runs every buy strategy through the orchestrator against the in-process
//! store and checks the guarantees each one claims (and the ones it does
//! not).
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test strategies
//!
//! # Race exhibits only
//! cargo test --test strategies races::
//! ```

use std::sync::Arc;
use std::time::Duration;

use shareguard::{MemoryStore, Orchestrator, RunConfig, RunReport, StoreOptions, StrategyKind};

// Test modules
pub mod conservation;
pub mod end_to_end;
pub mod fatal;
pub mod global_lock;
pub mod races;
pub mod rejection;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Strategies that keep the conservation invariant
pub const CONSERVING: [StrategyKind; 3] = [
    StrategyKind::OptimisticTransaction,
    StrategyKind::AtomicScript,
    StrategyKind::DistributedLock,
];

/// Store whose commands each take `latency_ms` of simulated round trip
pub fn store_with_latency(latency_ms: u64) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_options(
        StoreOptions::default().with_latency(Duration::from_millis(latency_ms)),
    ))
}

/// Run config for `buyers` buyers each taking `amount` from `initial`
pub fn config(kind: StrategyKind, initial: i64, buyers: usize, amount: i64) -> RunConfig {
    RunConfig::default()
        .with_company("TestCompanySL")
        .with_strategy(kind)
        .with_initial_shares(initial)
        .with_buyers(buyers)
        .with_shares_per_buyer(amount)
}

/// Run `config` with its own strategy against `store`
pub fn run_on(store: Arc<MemoryStore>, config: &RunConfig) -> RunReport {
    Orchestrator::for_config(store, config)
        .run(config)
        .expect("run should not fail")
}

/// Assert the report's final balance matches its purchases and is not negative
pub fn assert_conserved(report: &RunReport) {
    assert!(
        report.conserved(),
        "{}: final {} but {} purchases of {} from {} imply {}",
        report.strategy,
        report.final_balance,
        report.purchased(),
        report.shares_per_buyer,
        report.initial_shares,
        report.expected_balance()
    );
    assert!(report.final_balance >= 0, "{}: negative balance", report.strategy);
}
