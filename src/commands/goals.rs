// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::engine::ledger::{GoalStats, calculate_goal_stats};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRow {
    pub id: i64,
    pub name: String,
    pub target_value: Decimal,
    pub is_emergency: bool,
    #[serde(flatten)]
    pub stats: GoalStats,
}

pub fn goal_rows(ds: &Dataset) -> Vec<GoalRow> {
    ds.goals
        .iter()
        .map(|g| GoalRow {
            id: g.id,
            name: g.name.clone(),
            target_value: g.target_value,
            is_emergency: g.is_emergency,
            stats: calculate_goal_stats(g, &ds.goal_transactions, &ds.settings),
        })
        .collect()
}

pub fn handle(ds: &Dataset, m: &clap::ArgMatches) -> Result<()> {
    let rows = goal_rows(ds);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let data = rows
        .into_iter()
        .map(|r| {
            // Bars stop at 100; the raw figure may overshoot.
            let shown = r.stats.progress.min(Decimal::ONE_HUNDRED);
            vec![
                r.id.to_string(),
                r.name,
                fmt_money(&r.target_value),
                fmt_money(&r.stats.p1_balance),
                fmt_money(&r.stats.p2_balance),
                fmt_money(&r.stats.total_balance),
                fmt_percent(&shown),
                if r.stats.is_completed { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    let p1 = ds.couple.person1_name.as_str();
    let p2 = ds.couple.person2_name.as_str();
    println!(
        "{}",
        pretty_table(&["ID", "Goal", "Target", p1, p2, "Total", "Progress", "Done"], data)
    );
    Ok(())
}
