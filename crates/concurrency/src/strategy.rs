//! Strategy trait and selector
//!
//! A strategy performs "decrement-if-sufficient" on one company's balance.
//! Per attempt, every strategy walks the same state machine:
//!
//! ```text
//! Start ─► Validate ─┬─► Commit ─► Done
//!                    ├─► Reject ─► Failed
//!                    └─► Abort(Conflict) ─► Failed   (transaction / script only)
//! ```
//!
//! | Selector | Kind | Guarantee |
//! |----------|------|-----------|
//! | 0 | [`NoConcurrency`](StrategyKind::NoConcurrency) | none, lost updates possible |
//! | 1 | [`AtomicDelta`](StrategyKind::AtomicDelta) | no lost updates, may oversell |
//! | 2 | [`OptimisticTransaction`](StrategyKind::OptimisticTransaction) | linearizable, conflicts fail |
//! | 3 | [`AtomicScript`](StrategyKind::AtomicScript) | serializable per key |
//! | 4 | [`DistributedLock`](StrategyKind::DistributedLock) | serialized, globally |

use crate::atomic_delta::AtomicDelta;
use crate::atomic_script::AtomicScript;
use crate::distributed_lock::DistributedLock;
use crate::error::BuyError;
use crate::no_control::NoConcurrencyControl;
use crate::optimistic::OptimisticTransaction;
use serde::{Deserialize, Serialize};
use shareguard_core::{BuyRequest, KeyValueStore, Shares};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Successful deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Balance the strategy left behind after its own deduction
    pub remaining: Shares,
}

/// A concurrency-control algorithm for buying shares
pub trait BuyStrategy: Send + Sync {
    /// Which variant this is
    fn kind(&self) -> StrategyKind;

    /// Deduct `request.amount` from the company's balance if sufficient
    fn buy(&self, store: &dyn KeyValueStore, request: &BuyRequest) -> Result<Purchase, BuyError>;
}

/// The five strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Plain read, validate, write
    NoConcurrency,
    /// Read to validate, then atomic INCRBY
    AtomicDelta,
    /// WATCH / MULTI / EXEC
    OptimisticTransaction,
    /// Server-side script
    AtomicScript,
    /// Global named lock around read, validate, write
    DistributedLock,
}

/// Selector value that names no strategy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid implementation method selected: {0}")]
pub struct UnknownStrategy(pub String);

impl StrategyKind {
    /// All variants in selector order
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::NoConcurrency,
        StrategyKind::AtomicDelta,
        StrategyKind::OptimisticTransaction,
        StrategyKind::AtomicScript,
        StrategyKind::DistributedLock,
    ];

    /// Numeric selector of this variant
    pub fn selector(self) -> u8 {
        match self {
            StrategyKind::NoConcurrency => 0,
            StrategyKind::AtomicDelta => 1,
            StrategyKind::OptimisticTransaction => 2,
            StrategyKind::AtomicScript => 3,
            StrategyKind::DistributedLock => 4,
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::NoConcurrency => "No Concurrency",
            StrategyKind::AtomicDelta => "Atomic Operator",
            StrategyKind::OptimisticTransaction => "Transaction",
            StrategyKind::AtomicScript => "LUA Script",
            StrategyKind::DistributedLock => "Redis Locks",
        }
    }

    /// Kebab-case name, as accepted in config files
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::NoConcurrency => "no-concurrency",
            StrategyKind::AtomicDelta => "atomic-delta",
            StrategyKind::OptimisticTransaction => "optimistic-transaction",
            StrategyKind::AtomicScript => "atomic-script",
            StrategyKind::DistributedLock => "distributed-lock",
        }
    }

    /// True for the variants that keep the conservation invariant
    pub fn conserves(self) -> bool {
        matches!(
            self,
            StrategyKind::OptimisticTransaction
                | StrategyKind::AtomicScript
                | StrategyKind::DistributedLock
        )
    }

    /// Instantiate the strategy
    pub fn build(self) -> Arc<dyn BuyStrategy> {
        match self {
            StrategyKind::NoConcurrency => Arc::new(NoConcurrencyControl),
            StrategyKind::AtomicDelta => Arc::new(AtomicDelta),
            StrategyKind::OptimisticTransaction => Arc::new(OptimisticTransaction),
            StrategyKind::AtomicScript => Arc::new(AtomicScript::new()),
            StrategyKind::DistributedLock => Arc::new(DistributedLock::new()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for StrategyKind {
    type Error = UnknownStrategy;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StrategyKind::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| UnknownStrategy(value.to_string()))
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    /// Accepts the numeric selector or the kebab-case name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return StrategyKind::try_from(n);
        }
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Reject non-positive requests before any store access
pub(crate) fn ensure_positive(request: &BuyRequest) -> Result<(), BuyError> {
    if request.amount <= 0 {
        return Err(BuyError::InvalidAmount(request.amount));
    }
    Ok(())
}

/// Validate step: the balance left after the deduction, or a rejection
pub(crate) fn check_funds(request: &BuyRequest, available: Shares) -> Result<Shares, BuyError> {
    if available < request.amount {
        return Err(BuyError::InsufficientShares {
            company: request.company.clone(),
            available,
            requested: request.amount,
        });
    }
    Ok(available - request.amount)
}
