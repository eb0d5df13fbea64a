//! # ShareGuard
//!
//! Five concurrency-control strategies for selling a company's shares to
//! many concurrent buyers without overselling, and an orchestrator that
//! runs them side by side against a Redis-style key-value store.
//!
//! ## Quick Start
//!
//! ```ignore
//! use shareguard::prelude::*;
//!
//! let config = RunConfig::default().with_strategy(StrategyKind::AtomicScript);
//! let report = shareguard::run(&config)?;
//! assert_eq!(report.final_balance, 97_000);
//! ```
//!
//! ## Strategies
//!
//! | Selector | Strategy | Conserves balance |
//! |----------|----------|-------------------|
//! | 0 | [`NoConcurrencyControl`] | no (lost updates) |
//! | 1 | [`AtomicDelta`] | no (oversells) |
//! | 2 | [`OptimisticTransaction`] | yes |
//! | 3 | [`AtomicScript`] | yes |
//! | 4 | [`DistributedLock`] | yes |
//!
//! ## Crates
//!
//! - `shareguard-core`: ids, keys, the [`KeyValueStore`] contract, scripts
//! - `shareguard-storage`: [`MemoryStore`], an in-process store with
//!   WATCH/EXEC, scripts, leases and simulated latency
//! - `shareguard-concurrency`: the [`BuyStrategy`] implementations
//! - `shareguard-engine`: [`RunConfig`], [`Orchestrator`], [`RunReport`]

#![warn(missing_docs)]

pub mod prelude;

use std::sync::Arc;

pub use shareguard_concurrency::{
    AtomicDelta, AtomicScript, BuyError, BuyStrategy, DistributedLock, NoConcurrencyControl,
    OptimisticTransaction, Purchase, StrategyKind, UnknownStrategy, GLOBAL_LOCK_NAME,
};
pub use shareguard_core::{
    shares_key, BuyRequest, BuyerId, CompanyId, KeyValueStore, LockHandle, RunId, Script, Shares,
    StoreError, StoreResult, Transaction,
};
pub use shareguard_engine::{
    BuyerOutcome, BuyerReport, ConfigError, EngineError, EngineResult, Orchestrator, RunConfig,
    RunReport,
};
pub use shareguard_storage::{MemoryStore, StoreOptions};

/// Run `config` against a fresh [`MemoryStore`] built from `config.store`
pub fn run(config: &RunConfig) -> EngineResult<RunReport> {
    let store = Arc::new(MemoryStore::with_options(config.store));
    Orchestrator::for_config(store, config).run(config)
}
