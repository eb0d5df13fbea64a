//! Run configuration
//!
//! A [`RunConfig`] describes one orchestrated run. Defaults reproduce the
//! classic demo: 30 buyers take 100 shares each from the 100000 published
//! for `TestCompanySL`.
//!
//! ```toml
//! company = "TestCompanySL"
//! initial_shares = 100000
//! buyers = 30
//! shares_per_buyer = 100
//! strategy = "atomic-script"   # or the selector, e.g. 3
//!
//! [store]
//! latency_ms = 2
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use shareguard_concurrency::StrategyKind;
use shareguard_core::{CompanyId, Shares};
use shareguard_storage::StoreOptions;
use std::path::Path;

/// Default company
pub const DEFAULT_COMPANY: &str = "TestCompanySL";

/// Default published balance
pub const DEFAULT_INITIAL_SHARES: Shares = 100_000;

/// Default number of concurrent buyers
pub const DEFAULT_BUYERS: usize = 30;

/// Default amount each buyer requests
pub const DEFAULT_SHARES_PER_BUYER: Shares = 100;

/// Upper bound on buyers; each buyer is an OS thread
pub const MAX_BUYERS: usize = 4096;

/// Parameters of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Company whose shares are bought
    pub company: CompanyId,
    /// Balance published before the buyers start
    pub initial_shares: Shares,
    /// Number of concurrent buyers
    pub buyers: usize,
    /// Amount each buyer requests
    pub shares_per_buyer: Shares,
    /// Strategy every buyer uses
    #[serde(deserialize_with = "strategy_selector")]
    pub strategy: StrategyKind,
    /// In-process store tuning
    pub store: StoreOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            company: CompanyId::new(DEFAULT_COMPANY),
            initial_shares: DEFAULT_INITIAL_SHARES,
            buyers: DEFAULT_BUYERS,
            shares_per_buyer: DEFAULT_SHARES_PER_BUYER,
            strategy: StrategyKind::AtomicScript,
            store: StoreOptions::default(),
        }
    }
}

impl RunConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the company
    pub fn with_company(mut self, company: impl Into<CompanyId>) -> Self {
        self.company = company.into();
        self
    }

    /// Set the published balance
    pub fn with_initial_shares(mut self, shares: Shares) -> Self {
        self.initial_shares = shares;
        self
    }

    /// Set the number of buyers
    pub fn with_buyers(mut self, buyers: usize) -> Self {
        self.buyers = buyers;
        self
    }

    /// Set the amount each buyer requests
    pub fn with_shares_per_buyer(mut self, amount: Shares) -> Self {
        self.shares_per_buyer = amount;
        self
    }

    /// Set the strategy
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the store options
    pub fn with_store(mut self, store: StoreOptions) -> Self {
        self.store = store;
        self
    }

    /// Check every parameter is in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company.as_str().trim().is_empty() {
            return Err(invalid("company", "must not be empty"));
        }
        if self.initial_shares < 0 {
            return Err(invalid(
                "initial_shares",
                format!("must not be negative, got {}", self.initial_shares),
            ));
        }
        if self.buyers == 0 || self.buyers > MAX_BUYERS {
            return Err(invalid(
                "buyers",
                format!("must be between 1 and {}, got {}", MAX_BUYERS, self.buyers),
            ));
        }
        if self.shares_per_buyer <= 0 {
            return Err(invalid(
                "shares_per_buyer",
                format!("must be positive, got {}", self.shares_per_buyer),
            ));
        }
        Ok(())
    }

    /// Total shares all buyers request together
    pub fn demand(&self) -> Shares {
        (self.buyers as Shares).saturating_mul(self.shares_per_buyer)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        field,
        reason: reason.into(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrategyRepr {
    Selector(u8),
    Name(String),
}

/// Accept either the numeric selector or the kebab-case name
fn strategy_selector<'de, D>(deserializer: D) -> Result<StrategyKind, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match StrategyRepr::deserialize(deserializer)? {
        StrategyRepr::Selector(n) => StrategyKind::try_from(n),
        StrategyRepr::Name(s) => s.parse(),
    };
    parsed.map_err(serde::de::Error::custom)
}
