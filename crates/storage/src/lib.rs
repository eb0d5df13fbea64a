//! Storage layer for ShareGuard
//!
//! This crate implements the in-process reference store:
//! - ShardedStore: DashMap-backed integer values with a global version
//! - MemoryStore: Redis execution semantics on top (per-command atomicity,
//!   WATCH/EXEC, EVALSHA, lease locks) implementing `KeyValueStore`
//! - ScriptCache / LockTable: the script and lock subsystems
//! - StoreOptions: simulated latency and lock timing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod locks;
pub mod memory;
pub mod options;
pub mod scripts;
pub mod sharded;

pub use locks::LockTable;
pub use memory::MemoryStore;
pub use options::{StoreOptions, DEFAULT_LOCK_ACQUIRE_TIMEOUT_MS, DEFAULT_LOCK_LEASE_MS};
pub use scripts::ScriptCache;
pub use sharded::{ShardedStore, VersionedValue};
