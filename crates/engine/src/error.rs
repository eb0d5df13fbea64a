//! Engine error types

use shareguard_concurrency::UnknownStrategy;
use shareguard_core::{BuyerId, CompanyId, StoreError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for orchestration
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Invalid run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Selector names no strategy
    #[error(transparent)]
    InvalidStrategy(#[from] UnknownStrategy),

    /// A run parameter is out of range
    #[error("invalid {field}: {reason}")]
    InvalidParameter {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for a run
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Fatal orchestration failure
///
/// Per-buyer failures are never fatal; they are recorded in the report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Run refused before touching the store
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Initial balance could not be written
    #[error("failed to publish shares of {company}: {source}")]
    Publish {
        /// Company being published
        company: CompanyId,
        /// Store failure
        #[source]
        source: StoreError,
    },

    /// Final balance could not be read
    #[error("failed to read final balance of {company}: {source}")]
    FinalRead {
        /// Company being read
        company: CompanyId,
        /// Store failure
        #[source]
        source: StoreError,
    },

    /// A buyer thread panicked
    #[error("buyer {0} panicked")]
    WorkerPanicked(BuyerId),
}
