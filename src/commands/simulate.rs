// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::engine::projection::{Rate, Simulation, SimulationParams, SimulationPoint, Term};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub monthly_rate: Decimal,
    pub months: u32,
    pub points: Vec<SimulationPoint>,
    pub final_point: Option<SimulationPoint>,
}

pub fn params_from(m: &clap::ArgMatches) -> Result<SimulationParams> {
    let decimal = |name: &str| -> Result<Decimal> {
        parse_decimal(m.get_one::<String>(name).map(String::as_str).unwrap_or("0"))
    };
    let pct = decimal("rate")?;
    let rate = if m.get_flag("monthly-rate") {
        Rate::Monthly(pct)
    } else {
        Rate::Annual(pct)
    };
    let term = match (m.get_one::<u32>("months"), m.get_one::<u32>("years")) {
        (Some(n), _) => Term::Months(*n),
        (None, Some(n)) => Term::Years(*n),
        (None, None) => bail!("Pass --months or --years"),
    };
    Ok(SimulationParams {
        initial_value: decimal("initial")?,
        monthly_contribution: decimal("monthly")?,
        rate,
        term,
    })
}

pub fn simulation_report(ds: &Dataset, params: SimulationParams) -> SimulationReport {
    let sim = Simulation::new(params, &ds.settings);
    SimulationReport {
        monthly_rate: sim.monthly_rate(),
        months: sim.months(),
        points: sim.points().collect(),
        final_point: sim.final_point(),
    }
}

pub fn handle(ds: &Dataset, m: &clap::ArgMatches) -> Result<()> {
    let report = simulation_report(ds, params_from(m)?);
    if m.get_flag("jsonl") {
        maybe_print_json(false, true, &report.points)?;
        return Ok(());
    }
    if maybe_print_json(m.get_flag("json"), false, &report)? {
        return Ok(());
    }
    let rows = report
        .points
        .iter()
        .map(|p| {
            vec![
                p.label.clone(),
                fmt_money(&p.invested),
                fmt_money(&p.interest_accrued),
                fmt_money(&p.total),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Period", "Invested", "Interest", "Total"], rows));
    if let Some(last) = &report.final_point {
        println!(
            "After {} months: {} ({} from interest)",
            last.month,
            fmt_money(&last.total),
            fmt_money(&last.interest_accrued)
        );
    }
    Ok(())
}
