//! No concurrency control
//!
//! GET, validate, SET as independent commands. Two buyers that both read
//! the same balance both pass validation and the second SET silently erases
//! the first deduction. Kept to exhibit that race.

use crate::error::BuyError;
use crate::strategy::{check_funds, ensure_positive, BuyStrategy, Purchase, StrategyKind};
use shareguard_core::{shares_key, BuyRequest, KeyValueStore};
use tracing::debug;

/// Read-validate-write with no synchronization
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConcurrencyControl;

impl BuyStrategy for NoConcurrencyControl {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NoConcurrency
    }

    fn buy(&self, store: &dyn KeyValueStore, request: &BuyRequest) -> Result<Purchase, BuyError> {
        ensure_positive(request)?;
        let key = shares_key(&request.company);

        let current = store.get(&key)?;
        debug!(buyer = %request.buyer, key = %key, current, requested = request.amount, "read balance");

        let remaining = check_funds(request, current)?;
        // Anything written between the GET above and this SET is overwritten
        store.set(&key, remaining)?;

        Ok(Purchase { remaining })
    }
}
