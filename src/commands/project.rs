// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::engine::ledger::calculate_goal_stats;
use crate::engine::projection::{GoalProjection, Horizon, project_goal};
use crate::models::MonthKey;
use crate::utils::{maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use chrono::Utc;

pub fn projection_for(ds: &Dataset, goal_id: i64, from: MonthKey) -> Result<GoalProjection> {
    let goal = ds.goal(goal_id)?;
    let stats = calculate_goal_stats(goal, &ds.goal_transactions, &ds.settings);
    Ok(project_goal(goal, &stats, from, &ds.settings))
}

pub fn handle(ds: &Dataset, m: &clap::ArgMatches) -> Result<()> {
    let goal_id = m
        .get_one::<i64>("goal")
        .copied()
        .ok_or_else(|| anyhow::anyhow!("--goal is required"))?;
    let from = match m.get_one::<String>("month") {
        Some(raw) => parse_month(raw)?,
        None => MonthKey::from_date(Utc::now().date_naive()),
    };
    let projection = projection_for(ds, goal_id, from)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &projection)? {
        return Ok(());
    }

    let mut rows = vec![
        vec!["months".to_string(), projection.months.to_string()],
        vec![
            "completion".to_string(),
            projection
                .completion_month
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".into()),
        ],
    ];
    if let Some(b) = &projection.bottleneck {
        rows.push(vec![ds.couple.person1_name.clone(), b.p1_months.to_string()]);
        rows.push(vec![ds.couple.person2_name.clone(), b.p2_months.to_string()]);
        let flag = match (b.bottleneck, b.gap_months) {
            (Some(p), Some(gap)) => format!("{} ({} months behind)", ds.couple.name_of(p), gap),
            (Some(p), None) => format!("{} (never finishes)", ds.couple.name_of(p)),
            (None, _) => "none".to_string(),
        };
        rows.push(vec!["bottleneck".to_string(), flag]);
    }
    println!("{}", pretty_table(&["Projection", "Value"], rows));
    if projection.months == Horizon::Never {
        println!("No monthly contribution set; the goal is out of reach.");
    }
    Ok(())
}
