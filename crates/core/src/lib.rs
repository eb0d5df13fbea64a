//! Core types and store contract for ShareGuard
//!
//! This crate defines the pieces every other crate builds on:
//! - Ledger identifiers and requests ([`CompanyId`], [`BuyerId`], [`BuyRequest`])
//! - The ledger key scheme ([`shares_key`])
//! - The [`KeyValueStore`] contract and its transaction / script / lock types
//! - [`StoreError`], the error type of every store call

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod keys;
pub mod script;
pub mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use keys::{company_from_key, shares_key, SHARES_PREFIX};
pub use script::{digest_hex, Script, ScriptFn};
pub use traits::{KeyValueStore, LockHandle, ScriptEnv, Transaction};
pub use types::{BuyRequest, BuyerId, CompanyId, RunId, Shares};
