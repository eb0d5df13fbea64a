//! Errors of a single buy attempt

use shareguard_core::{CompanyId, Shares, StoreError};
use thiserror::Error;

/// Why a buy attempt did not deduct shares
///
/// Every variant is local to one attempt: it never affects sibling buyers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuyError {
    /// Balance too small for the request (business rule)
    #[error("company {company} does not have enough shares: available {available}, requested {requested}")]
    InsufficientShares {
        /// Company bought from
        company: CompanyId,
        /// Balance observed at validation
        available: Shares,
        /// Amount requested
        requested: Shares,
    },

    /// Balance changed between WATCH and EXEC; nothing was applied
    #[error("balance of {company} changed during the transaction")]
    Conflict {
        /// Company bought from
        company: CompanyId,
    },

    /// Mutual-exclusion lock could not be obtained
    #[error("could not acquire lock {0}")]
    LockUnavailable(String),

    /// Requested amount is zero or negative
    #[error("requested amount must be positive, got {0}")]
    InvalidAmount(Shares),

    /// Store failure (connectivity, protocol, missing ledger)
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl BuyError {
    /// Business-rule or conflict rejection: the attempt was refused cleanly
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BuyError::InsufficientShares { .. } | BuyError::Conflict { .. } | BuyError::InvalidAmount(_)
        )
    }

    /// Failure that might not recur on a later attempt
    pub fn is_transient(&self) -> bool {
        match self {
            BuyError::Conflict { .. } | BuyError::LockUnavailable(_) => true,
            BuyError::Store(e) => e.is_retryable(),
            _ => false,
        }
    }
}
