//! Server-side scripts
//!
//! A [`Script`] pairs its source text with the native body the store
//! executes. The source is what identifies the script: its SHA-256 digest is
//! the cache key used for EVALSHA-style invocation.

use crate::error::StoreResult;
use crate::traits::ScriptEnv;
use crate::types::Shares;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Executable body of a script
///
/// Receives the store view, the `KEYS` and the `ARGV` of the invocation.
pub type ScriptFn = dyn Fn(&mut dyn ScriptEnv, &[&str], &[Shares]) -> StoreResult<Shares> + Send + Sync;

/// A script the store can cache and execute indivisibly
#[derive(Clone)]
pub struct Script {
    source: Arc<str>,
    digest: String,
    body: Arc<ScriptFn>,
}

impl Script {
    /// Create a script from its source and body
    pub fn new<F>(source: &str, body: F) -> Self
    where
        F: Fn(&mut dyn ScriptEnv, &[&str], &[Shares]) -> StoreResult<Shares> + Send + Sync + 'static,
    {
        Self {
            source: Arc::from(source),
            digest: digest_hex(source),
            body: Arc::new(body),
        }
    }

    /// Script source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Hex-encoded SHA-256 of the source
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Execute the body against a store view
    pub fn invoke(&self, env: &mut dyn ScriptEnv, keys: &[&str], args: &[Shares]) -> StoreResult<Shares> {
        (self.body)(env, keys, args)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script").field("digest", &self.digest).finish_non_exhaustive()
    }
}

/// Hex-encoded SHA-256 digest of a script source
pub fn digest_hex(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}
