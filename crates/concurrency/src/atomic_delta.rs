//! Atomic delta
//!
//! GET to validate, then an unconditional INCRBY of `-amount`. The decrement
//! itself cannot lose updates, but validation and decrement are separate
//! commands: buyers that validate against the same balance all decrement,
//! and the balance can end up below zero.

use crate::error::BuyError;
use crate::strategy::{check_funds, ensure_positive, BuyStrategy, Purchase, StrategyKind};
use shareguard_core::{shares_key, BuyRequest, KeyValueStore};
use tracing::{debug, warn};

/// Validate, then atomic decrement
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicDelta;

impl BuyStrategy for AtomicDelta {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AtomicDelta
    }

    fn buy(&self, store: &dyn KeyValueStore, request: &BuyRequest) -> Result<Purchase, BuyError> {
        ensure_positive(request)?;
        let key = shares_key(&request.company);

        let current = store.get(&key)?;
        check_funds(request, current)?;

        let remaining = store.incr_by(&key, -request.amount)?;
        if remaining < 0 {
            warn!(buyer = %request.buyer, key = %key, remaining, "balance oversold");
        } else {
            debug!(buyer = %request.buyer, key = %key, remaining, "decremented");
        }

        Ok(Purchase { remaining })
    }
}
