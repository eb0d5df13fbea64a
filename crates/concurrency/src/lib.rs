//! Concurrency-control strategies for buying shares
//!
//! Five ways to decrement one company's share balance from many concurrent
//! buyers, from no control at all to a global lock. See [`strategy`] for the
//! guarantee each one gives.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod atomic_delta;
pub mod atomic_script;
pub mod distributed_lock;
pub mod error;
pub mod no_control;
pub mod optimistic;
pub mod strategy;

pub use atomic_delta::AtomicDelta;
pub use atomic_script::{AtomicScript, BUY_SHARES, INSUFFICIENT_SHARES, NO_LEDGER};
pub use distributed_lock::{DistributedLock, GLOBAL_LOCK_NAME};
pub use error::BuyError;
pub use no_control::NoConcurrencyControl;
pub use optimistic::OptimisticTransaction;
pub use strategy::{BuyStrategy, Purchase, StrategyKind, UnknownStrategy};
