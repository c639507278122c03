// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::engine::ledger::{PortfolioSummary, calculate_portfolio_summary};
use crate::models::{CoupleInfo, Owner};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ds: &Dataset, m: &clap::ArgMatches) -> Result<()> {
    let summary = portfolio_summary(ds);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        return Ok(());
    }

    let mut rows = Vec::new();
    for inv in &ds.investments {
        let Some(stats) = summary.stats_by_investment.get(&inv.id) else {
            continue;
        };
        rows.push(vec![
            inv.name.clone(),
            inv.asset_type.clone(),
            owner_label(inv.owner, &ds.couple).to_string(),
            fmt_money(&stats.invested_amount),
            fmt_money(&stats.total_balance),
            fmt_money(&stats.total_yield),
            fmt_money(&stats.profit),
            format!("{:.2}%", stats.profit_percentage.round_dp(2)),
        ]);
    }
    rows.push(vec![
        "TOTAL".into(),
        String::new(),
        String::new(),
        fmt_money(&summary.total_cost),
        fmt_money(&summary.total_balance),
        fmt_money(&summary.total_yield),
        fmt_money(&summary.total_profit),
        format!("{:.2}%", summary.total_yield_percentage.round_dp(2)),
    ]);
    println!(
        "{}",
        pretty_table(
            &["Name", "Type", "Owner", "Invested", "Balance", "Yield", "Profit", "Profit %"],
            rows
        )
    );
    println!(
        "{}: {}  {}: {}",
        ds.couple.person1_name,
        fmt_money(&summary.person1_balance),
        ds.couple.person2_name,
        fmt_money(&summary.person2_balance)
    );
    Ok(())
}

pub fn portfolio_summary(ds: &Dataset) -> PortfolioSummary {
    calculate_portfolio_summary(&ds.investments, &ds.investment_movements, &ds.settings)
}

fn owner_label(owner: Owner, couple: &CoupleInfo) -> &str {
    match owner {
        Owner::Person1 => &couple.person1_name,
        Owner::Person2 => &couple.person2_name,
        Owner::Couple => "couple",
    }
}
