//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the `shareguard` command
pub fn build_cli() -> Command {
    Command::new("shareguard")
        .about("Run concurrent share purchases under one concurrency-control strategy")
        .arg(
            Arg::new("strategy")
                .required(true)
                .allow_hyphen_values(true)
                .value_name("STRATEGY")
                .help(
                    "0 No Concurrency, 1 Atomic Operator, 2 Transaction, \
                     3 LUA Script, 4 Redis Locks",
                ),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("TOML run configuration; flags override its values"),
        )
        .arg(
            Arg::new("company")
                .long("company")
                .value_name("ID")
                .help("Company to buy from"),
        )
        .arg(
            Arg::new("initial")
                .long("initial")
                .value_name("N")
                .value_parser(value_parser!(i64))
                .help("Shares published before the buyers start"),
        )
        .arg(
            Arg::new("buyers")
                .long("buyers")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of concurrent buyers"),
        )
        .arg(
            Arg::new("amount")
                .long("amount")
                .value_name("N")
                .value_parser(value_parser!(i64))
                .help("Shares each buyer requests"),
        )
        .arg(
            Arg::new("latency-ms")
                .long("latency-ms")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Simulated store round trip in milliseconds"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the run report as JSON"),
        )
}
