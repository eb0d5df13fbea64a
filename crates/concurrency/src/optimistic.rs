//! Optimistic transaction
//!
//! WATCH the balance key, read and validate inside the transaction body,
//! stage the new balance, EXEC. If the balance was written by anyone after
//! the WATCH, EXEC applies nothing and the attempt fails with
//! [`BuyError::Conflict`].
//!
//! Conflicts are not retried: a buyer that loses the race is reported as
//! failed exactly like one that found too few shares.

use crate::error::BuyError;
use crate::strategy::{check_funds, ensure_positive, BuyStrategy, Purchase, StrategyKind};
use shareguard_core::{shares_key, BuyRequest, KeyValueStore, Shares, StoreError};
use tracing::debug;

/// WATCH / MULTI / EXEC without retry
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimisticTransaction;

impl BuyStrategy for OptimisticTransaction {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OptimisticTransaction
    }

    fn buy(&self, store: &dyn KeyValueStore, request: &BuyRequest) -> Result<Purchase, BuyError> {
        ensure_positive(request)?;
        let key = shares_key(&request.company);

        let mut verdict: Option<Result<Shares, BuyError>> = None;
        let committed = store.watch(&[key.as_str()], &mut |txn| {
            let current = txn.get(&key)?;
            match check_funds(request, current) {
                Ok(remaining) => {
                    txn.set(&key, remaining);
                    verdict = Some(Ok(remaining));
                }
                Err(rejection) => {
                    txn.discard();
                    verdict = Some(Err(rejection));
                }
            }
            Ok(())
        });

        match committed {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                debug!(buyer = %request.buyer, key = %key, "EXEC aborted by concurrent write");
                return Err(BuyError::Conflict {
                    company: request.company.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        match verdict {
            Some(Ok(remaining)) => Ok(Purchase { remaining }),
            Some(Err(rejection)) => Err(rejection),
            None => Err(BuyError::Store(StoreError::Unavailable(
                "transaction body did not run".into(),
            ))),
        }
    }
}
