//! Core types for the share ledger
//!
//! - [`RunId`]: Unique identifier for one orchestrated buy run
//! - [`CompanyId`]: Company whose shares are on sale
//! - [`BuyerId`]: Identity of a single concurrent buyer
//! - [`BuyRequest`]: One buyer's request against one company

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Share counts and balances.
///
/// Signed on purpose: the unsafe strategies can drive a balance below zero
/// and the ledger must be able to show it.
pub type Shares = i64;

/// Unique identifier for a buy run
///
/// Every orchestrated run gets one. It shows up in the run's tracing span
/// and in the serialized report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use shareguard_core::RunId;
    ///
    /// let id1 = RunId::new();
    /// let id2 = RunId::new();
    /// assert_ne!(id1, id2);
    /// ```
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Company identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    /// Create a company id
    pub fn new(id: impl Into<String>) -> Self {
        CompanyId(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        CompanyId(s.to_string())
    }
}

impl From<String> for CompanyId {
    fn from(s: String) -> Self {
        CompanyId(s)
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Buyer identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuyerId(String);

impl BuyerId {
    /// Create a buyer id
    pub fn new(id: impl Into<String>) -> Self {
        BuyerId(id.into())
    }

    /// Buyer id for the n-th worker of a run (`user1`, `user2`, ...)
    pub fn numbered(n: usize) -> Self {
        BuyerId(format!("user{}", n))
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BuyerId {
    fn from(s: &str) -> Self {
        BuyerId(s.to_string())
    }
}

impl std::fmt::Display for BuyerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single buyer's request to take `amount` shares of `company`
///
/// Produced once per concurrent worker and consumed by exactly one strategy
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyRequest {
    /// Who is buying
    pub buyer: BuyerId,
    /// Whose shares are bought
    pub company: CompanyId,
    /// How many shares
    pub amount: Shares,
}

impl BuyRequest {
    /// Create a buy request
    pub fn new(buyer: impl Into<BuyerId>, company: impl Into<CompanyId>, amount: Shares) -> Self {
        Self {
            buyer: buyer.into(),
            company: company.into(),
            amount,
        }
    }
}
