// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use duoledger::{cli, commands, dataset};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("duoledger=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = dataset::data_path(matches.get_one::<String>("data").map(String::as_str))?;
    if let Some(("init", _)) = matches.subcommand() {
        if dataset::init(&path)? {
            println!("Dataset initialized at {}", path.display());
        } else {
            println!("Dataset already exists at {}", path.display());
        }
        return Ok(());
    }

    let ds = dataset::open_or_default(&path)?;

    match matches.subcommand() {
        Some(("summary", sub)) => commands::summary::handle(&ds, sub)?,
        Some(("goals", sub)) => commands::goals::handle(&ds, sub)?,
        Some(("portfolio", sub)) => commands::portfolio::handle(&ds, sub)?,
        Some(("trip", sub)) => commands::trips::handle(&ds, sub)?,
        Some(("project", sub)) => commands::project::handle(&ds, sub)?,
        Some(("simulate", sub)) => commands::simulate::handle(&ds, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ds, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&ds)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
