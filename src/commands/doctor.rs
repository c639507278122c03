// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::models::{ExpenseType, SplitPolicy};
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

impl Issue {
    fn new(kind: &'static str, detail: String) -> Self {
        Self { kind, detail }
    }
}

pub fn diagnose(ds: &Dataset) -> Vec<Issue> {
    let mut issues = Vec::new();

    // 1) Shared expenses nobody is recorded as having paid
    for e in &ds.expenses {
        if e.kind.personal_owner().is_none() && e.paid_by.is_none() {
            issues.push(Issue::new(
                "unspecified_paid_by",
                format!("expense {} {} {}", e.id, e.date, e.description),
            ));
        }
    }

    // 2) Split settings outside their valid range. Expense percentages are
    // already clamped when loaded, so only absolute overrides and goals remain.
    for e in &ds.expenses {
        if let SplitPolicy::Absolute(p1, p2) = e.split {
            if p1 + p2 > e.total_value {
                issues.push(Issue::new(
                    "absolute_exceeds_value",
                    format!("expense {} {} + {} > {}", e.id, p1, p2, e.total_value),
                ));
            }
        }
        if e.kind == ExpenseType::Equal && e.split != SplitPolicy::Proportional {
            issues.push(Issue::new(
                "equal_ignores_split",
                format!("expense {} is EQUAL; its custom split is ignored", e.id),
            ));
        }
    }
    for g in &ds.goals {
        if g.split_p1_percentage < Decimal::ZERO || g.split_p1_percentage > Decimal::ONE_HUNDRED {
            issues.push(Issue::new(
                "split_out_of_range",
                format!("goal {} {}%", g.id, g.split_p1_percentage),
            ));
        }
    }

    // 3) Log rows pointing at records that do not exist
    let goal_ids: HashSet<i64> = ds.goals.iter().map(|g| g.id).collect();
    for t in &ds.goal_transactions {
        if !goal_ids.contains(&t.goal_id) {
            issues.push(Issue::new(
                "orphan_goal_transaction",
                format!("transaction {} -> goal {}", t.id, t.goal_id),
            ));
        }
    }
    let investment_ids: HashSet<i64> = ds.investments.iter().map(|i| i.id).collect();
    for mv in &ds.investment_movements {
        if !investment_ids.contains(&mv.investment_id) {
            issues.push(Issue::new(
                "orphan_movement",
                format!("movement {} -> investment {}", mv.id, mv.investment_id),
            ));
        }
    }
    issues
}

pub fn handle(ds: &Dataset) -> Result<()> {
    let rows: Vec<Vec<String>> = diagnose(ds)
        .into_iter()
        .map(|i| vec![i.kind.to_string(), i.detail])
        .collect();
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        tracing::debug!(issues = rows.len(), "doctor found issues");
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
