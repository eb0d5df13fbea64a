//! Atomic script
//!
//! The whole read-validate-write runs on the store as one script. The store
//! executes scripts indivisibly, so no other command lands between the read
//! and the write. The script is invoked by digest and loaded on first use.

use crate::error::BuyError;
use crate::strategy::{ensure_positive, BuyStrategy, Purchase, StrategyKind};
use once_cell::sync::Lazy;
use shareguard_core::{shares_key, BuyRequest, KeyValueStore, Script, ScriptEnv, Shares, StoreError, StoreResult};
use tracing::debug;

/// Error reply code for a balance below the requested amount
pub const INSUFFICIENT_SHARES: &str = "INSUFFICIENT_SHARES";

/// Error reply code for a company that was never published
pub const NO_LEDGER: &str = "NO_LEDGER";

const BUY_SHARES_SOURCE: &str = r#"
local key = KEYS[1]
local requested = tonumber(ARGV[1])
local current = redis.call('GET', key)
if not current then
    return redis.error_reply('NO_LEDGER ' .. key)
end
current = tonumber(current)
if current < requested then
    return redis.error_reply('INSUFFICIENT_SHARES ' .. current)
end
local remaining = current - requested
redis.call('SET', key, remaining)
return remaining
"#;

/// Buy script: `KEYS[1]` is the balance key, `ARGV[1]` the amount
///
/// Compares balances numerically.
pub static BUY_SHARES: Lazy<Script> = Lazy::new(|| Script::new(BUY_SHARES_SOURCE, buy_shares));

fn buy_shares(env: &mut dyn ScriptEnv, keys: &[&str], args: &[Shares]) -> StoreResult<Shares> {
    let (Some(key), Some(&requested)) = (keys.first(), args.first()) else {
        return Err(StoreError::from_error_reply("ERR wrong number of arguments"));
    };
    let Some(current) = env.get(key)? else {
        return Err(StoreError::from_error_reply(&format!("{NO_LEDGER} {key}")));
    };
    if current < requested {
        return Err(StoreError::from_error_reply(&format!("{INSUFFICIENT_SHARES} {current}")));
    }
    let remaining = current - requested;
    env.set(key, remaining)?;
    Ok(remaining)
}

/// Whole transaction as one server-side script
#[derive(Debug, Clone)]
pub struct AtomicScript {
    script: Script,
}

impl AtomicScript {
    /// Strategy running [`BUY_SHARES`]
    pub fn new() -> Self {
        Self {
            script: BUY_SHARES.clone(),
        }
    }

    /// The script this strategy runs
    pub fn script(&self) -> &Script {
        &self.script
    }

    fn translate(request: &BuyRequest, err: StoreError) -> BuyError {
        match err {
            StoreError::ScriptRejected { code, message } if code == INSUFFICIENT_SHARES => {
                match message.parse::<Shares>() {
                    Ok(available) => BuyError::InsufficientShares {
                        company: request.company.clone(),
                        available,
                        requested: request.amount,
                    },
                    Err(_) => BuyError::Store(StoreError::ScriptRejected { code, message }),
                }
            }
            StoreError::ScriptRejected { code, message } if code == NO_LEDGER => {
                BuyError::Store(StoreError::NotFound(message))
            }
            other => BuyError::Store(other),
        }
    }
}

impl Default for AtomicScript {
    fn default() -> Self {
        Self::new()
    }
}

impl BuyStrategy for AtomicScript {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AtomicScript
    }

    fn buy(&self, store: &dyn KeyValueStore, request: &BuyRequest) -> Result<Purchase, BuyError> {
        ensure_positive(request)?;
        let key = shares_key(&request.company);

        let remaining = store
            .run_script(&self.script, &[key.as_str()], &[request.amount])
            .map_err(|e| Self::translate(request, e))?;
        debug!(buyer = %request.buyer, key = %key, remaining, "script committed");

        Ok(Purchase { remaining })
    }
}
