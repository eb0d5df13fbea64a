//! Run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shareguard_concurrency::{BuyError, Purchase, StrategyKind};
use shareguard_core::{BuyerId, CompanyId, RunId, Shares};

/// How one buyer's attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BuyerOutcome {
    /// Shares deducted
    Purchased {
        /// Balance the strategy left behind
        remaining: Shares,
    },
    /// Refused cleanly: insufficient balance, conflict, bad amount
    Rejected {
        /// Rejection message
        reason: String,
    },
    /// Lock or store failure
    Failed {
        /// Failure message
        reason: String,
    },
}

impl BuyerOutcome {
    /// True if the buyer got its shares
    pub fn is_purchased(&self) -> bool {
        matches!(self, BuyerOutcome::Purchased { .. })
    }
}

impl From<Result<Purchase, BuyError>> for BuyerOutcome {
    fn from(result: Result<Purchase, BuyError>) -> Self {
        match result {
            Ok(purchase) => BuyerOutcome::Purchased {
                remaining: purchase.remaining,
            },
            Err(e) if e.is_rejection() => BuyerOutcome::Rejected {
                reason: e.to_string(),
            },
            Err(e) => BuyerOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// One buyer's line in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerReport {
    /// Buyer
    pub buyer: BuyerId,
    /// Outcome of its single attempt
    #[serde(flatten)]
    pub outcome: BuyerOutcome,
}

/// Summary of an orchestrated run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub strategy: StrategyKind,
    pub company: CompanyId,
    pub initial_shares: Shares,
    pub shares_per_buyer: Shares,
    /// Per-buyer outcomes, ordered by buyer number
    pub buyers: Vec<BuyerReport>,
    /// Balance read after every buyer finished
    pub final_balance: Shares,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Buyers that got their shares
    pub fn purchased(&self) -> usize {
        self.buyers.iter().filter(|b| b.outcome.is_purchased()).count()
    }

    /// Buyers refused cleanly
    pub fn rejected(&self) -> usize {
        self.buyers
            .iter()
            .filter(|b| matches!(b.outcome, BuyerOutcome::Rejected { .. }))
            .count()
    }

    /// Buyers that hit a lock or store failure
    pub fn failed(&self) -> usize {
        self.buyers
            .iter()
            .filter(|b| matches!(b.outcome, BuyerOutcome::Failed { .. }))
            .count()
    }

    /// Balance implied by the successful purchases, saturated to `Shares`
    pub fn expected_balance(&self) -> Shares {
        let expected = self.implied_balance();
        expected.clamp(Shares::MIN as i128, Shares::MAX as i128) as Shares
    }

    /// Final balance equals initial minus everything reported sold
    pub fn conserved(&self) -> bool {
        self.final_balance as i128 == self.implied_balance()
    }

    /// More shares were handed out than existed
    pub fn oversold(&self) -> bool {
        self.final_balance < 0 || self.implied_balance() < 0
    }

    // Widened so lost updates on huge balances cannot overflow
    fn implied_balance(&self) -> i128 {
        self.initial_shares as i128 - self.purchased() as i128 * self.shares_per_buyer as i128
    }
}
