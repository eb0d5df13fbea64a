//! ArgMatches → run configuration

use clap::ArgMatches;
use shareguard_concurrency::StrategyKind;
use shareguard_engine::{ConfigError, RunConfig};
use std::time::Duration;

/// How to print the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Resolve the final [`RunConfig`]: file, then flags, then validation
pub fn matches_to_config(matches: &ArgMatches) -> Result<RunConfig, ConfigError> {
    // The selector is checked first so a bad one fails before any file access
    let strategy: StrategyKind = match matches.get_one::<String>("strategy") {
        Some(selector) => selector.parse()?,
        None => RunConfig::default().strategy,
    };

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => RunConfig::from_path(path)?,
        None => RunConfig::default(),
    };
    config.strategy = strategy;

    if let Some(company) = matches.get_one::<String>("company") {
        config.company = company.as_str().into();
    }
    if let Some(&initial) = matches.get_one::<i64>("initial") {
        config.initial_shares = initial;
    }
    if let Some(&buyers) = matches.get_one::<usize>("buyers") {
        config.buyers = buyers;
    }
    if let Some(&amount) = matches.get_one::<i64>("amount") {
        config.shares_per_buyer = amount;
    }
    if let Some(&latency) = matches.get_one::<u64>("latency-ms") {
        config.store = config.store.with_latency(Duration::from_millis(latency));
    }

    config.validate()?;
    Ok(config)
}

/// Output mode requested on the command line
pub fn output_mode(matches: &ArgMatches) -> OutputMode {
    if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}
