//! Error types for store operations
//!
//! `StoreError` covers everything a [`KeyValueStore`](crate::KeyValueStore)
//! can report back to a caller: missing keys, optimistic-transaction
//! conflicts, structured script rejections, lock contention and
//! connectivity-style failures.
//!
//! Business-rule violations (insufficient shares) are NOT store errors. They
//! are raised by the strategies on top of the store, except for the atomic
//! script path where the store relays the script's own error reply through
//! [`StoreError::ScriptRejected`].

use thiserror::Error;

/// Errors reported by a key-value store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Key does not exist (nil reply)
    #[error("key not found: {0}")]
    NotFound(String),

    /// A watched key changed between WATCH and EXEC
    #[error("transaction conflict: {0}")]
    Conflict(String),

    /// A script returned an error reply
    ///
    /// `code` is the first word of the reply (e.g. `INSUFFICIENT_SHARES`),
    /// `message` the rest of it.
    #[error("script rejected ({code}): {message}")]
    ScriptRejected {
        /// Machine-readable error code
        code: String,
        /// Human-readable detail
        message: String,
    },

    /// EVALSHA against a digest the store has never loaded
    #[error("no script loaded for digest {0}")]
    UnknownScript(String),

    /// Lock could not be acquired before the acquire timeout elapsed
    #[error("lock {name} unavailable after {waited_ms}ms")]
    LockUnavailable {
        /// Lock name
        name: String,
        /// How long the caller waited
        waited_ms: u64,
    },

    /// Stored value is not usable as the requested type
    #[error("wrong type: {0}")]
    WrongType(String),

    /// Increment would overflow a 64-bit integer
    #[error("increment would overflow key {0}")]
    Overflow(String),

    /// Store is unreachable or refused the command
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Check if this error is an optimistic-transaction conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    /// Check if this is a missing-key error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Check if retrying the same operation could succeed.
    ///
    /// Conflicts, lock contention and unavailability are retryable; the
    /// strategies in this workspace never retry on their own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Conflict(_)
                | StoreError::LockUnavailable { .. }
                | StoreError::Unavailable(_)
        )
    }

    /// Build a script rejection from a Redis-style error reply
    ///
    /// The first whitespace-separated word becomes the code. A reply with a
    /// single word gets an empty message.
    pub fn from_error_reply(reply: &str) -> Self {
        let reply = reply.trim();
        let (code, message) = match reply.split_once(char::is_whitespace) {
            Some((code, rest)) => (code, rest.trim()),
            None => (reply, ""),
        };
        StoreError::ScriptRejected {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}
