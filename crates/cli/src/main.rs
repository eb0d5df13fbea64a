//! ShareGuard CLI: run concurrent buyers under one strategy and print the
//! final balance.
//!
//! ```text
//! shareguard 3
//! shareguard 0 --initial 100 --buyers 2 --amount 100 --latency-ms 20
//! RUST_LOG=shareguard=debug shareguard 4 --json
//! ```

mod commands;
mod parse;

use std::process;
use std::sync::Arc;

use shareguard_engine::{Orchestrator, RunReport};
use shareguard_storage::MemoryStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::build_cli;
use parse::{matches_to_config, output_mode, OutputMode};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shareguard=info")))
        .init();

    let matches = build_cli().get_matches();
    let mode = output_mode(&matches);

    let config = match matches_to_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    };

    if mode == OutputMode::Human {
        println!(">> {} selected...", config.strategy.label());
    }

    let store = Arc::new(MemoryStore::with_options(config.store));
    let orchestrator = Orchestrator::for_config(store, &config);

    match orchestrator.run(&config) {
        Ok(report) => print_report(&report, mode),
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    }
}

fn print_report(report: &RunReport, mode: OutputMode) {
    match mode {
        OutputMode::Human => println!(
            "the number of free shares the company {} has is: {}",
            report.company, report.final_balance
        ),
        OutputMode::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("(error) cannot encode report: {}", e);
                process::exit(1);
            }
        },
    }
}
