// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::summary::{month_summary, summary_rows};
use crate::dataset::Dataset;
use crate::utils::parse_month;
use anyhow::{Context, Result, bail};

pub fn handle(ds: &Dataset, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => export_summary(ds, sub),
        _ => Ok(()),
    }
}

fn export_summary(ds: &Dataset, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".into());
    let out = sub
        .get_one::<String>("out")
        .context("--out is required")?;
    let month = parse_month(sub.get_one::<String>("month").context("--month is required")?)?;
    let summary = month_summary(ds, month);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record(["metric", "value"])?;
            for row in summary_rows(&summary, &ds.couple) {
                wtr.write_record(&row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&summary)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} summary to {}", summary.month, out);
    Ok(())
}
