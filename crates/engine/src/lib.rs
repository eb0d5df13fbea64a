//! Run orchestration for ShareGuard
//!
//! Ties a store, a strategy and a [`RunConfig`] together:
//!
//! - [`Orchestrator`]: publish, run the buyers, read the final balance
//! - [`CompletionBarrier`] / [`StartGate`]: buyer thread synchronization
//! - [`RunReport`]: what happened to every buyer

#![warn(clippy::all)]

pub mod barrier;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;

pub use barrier::{CompletionBarrier, CompletionGuard, StartGate};
pub use config::{
    RunConfig, DEFAULT_BUYERS, DEFAULT_COMPANY, DEFAULT_INITIAL_SHARES, DEFAULT_SHARES_PER_BUYER,
    MAX_BUYERS,
};
pub use error::{ConfigError, EngineError, EngineResult};
pub use orchestrator::Orchestrator;
pub use report::{BuyerOutcome, BuyerReport, RunReport};
