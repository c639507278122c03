// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .required(required)
        .help("Calendar month")
}

pub fn build_cli() -> Command {
    Command::new("duoledger")
        .about("Shared-finance reconciliation for two people")
        .version(clap::crate_version!())
        .arg(
            Arg::new("data")
                .long("data")
                .value_name("FILE")
                .global(true)
                .help("Dataset JSON file (default: $DUOLEDGER_DATA or the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Write an empty dataset if none exists"))
        .subcommand(
            Command::new("summary")
                .about("Monthly settlement: totals, responsibility and who transfers")
                .arg(month_arg(true))
                .args(json_args()),
        )
        .subcommand(
            Command::new("goals")
                .about("Balances and progress of every savings goal")
                .args(json_args()),
        )
        .subcommand(
            Command::new("portfolio")
                .about("Investment balances, cost basis and profit")
                .args(json_args()),
        )
        .subcommand(
            Command::new("trip")
                .about("Settle trips with a shared fund")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_parser(value_parser!(i64))
                        .help("Only this trip"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("project")
                .about("Months until a goal is reached, and who holds it back")
                .arg(
                    Arg::new("goal")
                        .long("goal")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(month_arg(false).help("Month to project from (default: current month)"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("simulate")
                .about("Compound-growth what-if")
                .arg(Arg::new("initial").long("initial").default_value("0"))
                .arg(Arg::new("monthly").long("monthly").default_value("0"))
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .required(true)
                        .help("Rate in percent; annual unless --monthly-rate"),
                )
                .arg(
                    Arg::new("monthly-rate")
                        .long("monthly-rate")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(u32))
                        .conflicts_with("years"),
                )
                .arg(
                    Arg::new("years")
                        .long("years")
                        .value_parser(value_parser!(u32)),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("export")
                .about("Write computed results to a file")
                .subcommand(
                    Command::new("summary")
                        .about("Monthly summary as CSV (metric,value) or JSON")
                        .arg(month_arg(true))
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Data-quality checks"))
}
