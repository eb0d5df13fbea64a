//! Convenient imports for ShareGuard.
//!
//! ```ignore
//! use shareguard::prelude::*;
//!
//! let report = shareguard::run(&RunConfig::default())?;
//! ```

// Orchestration
pub use crate::{Orchestrator, RunConfig, RunReport};

// Strategies
pub use crate::{BuyStrategy, StrategyKind};

// Store
pub use crate::{KeyValueStore, MemoryStore, StoreOptions};

// Errors
pub use crate::{BuyError, EngineError, StoreError};

// Ids
pub use crate::{BuyRequest, BuyerId, CompanyId, Shares};
