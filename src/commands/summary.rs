// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::engine::settlement::{MonthlySummary, WhoTransfers, calculate_summary};
use crate::models::{CoupleInfo, MonthKey, Person};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;

pub fn handle(ds: &Dataset, m: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(m.get_one::<String>("month").map(String::as_str).unwrap_or_default())?;
    let summary = month_summary(ds, month);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(&["Metric", "Value"], summary_rows(&summary, &ds.couple))
    );
    println!("{}", transfer_line(&summary, &ds.couple));
    Ok(())
}

pub fn month_summary(ds: &Dataset, month: MonthKey) -> MonthlySummary {
    calculate_summary(
        &ds.expenses,
        &ds.incomes,
        &ds.couple,
        &month.to_string(),
        &ds.goals,
        &ds.goal_transactions,
        &ds.settings,
    )
}

pub fn transfer_line(s: &MonthlySummary, couple: &CoupleInfo) -> String {
    let (from, to) = match s.who_transfers {
        WhoTransfers::Person1 => (Person::Person1, Person::Person2),
        WhoTransfers::Person2 => (Person::Person2, Person::Person1),
        WhoTransfers::None => return format!("{}: settled", s.month),
    };
    format!(
        "{}: {} transfers {} to {}",
        s.month,
        couple.name_of(from),
        fmt_money(&s.transfer_amount),
        couple.name_of(to)
    )
}

/// `(metric, value)` rows shared by the table view and the CSV export.
pub fn summary_rows(s: &MonthlySummary, couple: &CoupleInfo) -> Vec<Vec<String>> {
    let p1 = couple.name_of(Person::Person1);
    let p2 = couple.name_of(Person::Person2);
    let mut rows = vec![
        vec!["month".into(), s.month.clone()],
        vec!["total_fixed".into(), fmt_money(&s.total_fixed)],
        vec!["total_common".into(), fmt_money(&s.total_common)],
        vec!["total_equal".into(), fmt_money(&s.total_equal)],
        vec!["total_reimbursement".into(), fmt_money(&s.total_reimbursement)],
        vec!["total_shared".into(), fmt_money(&s.total_shared)],
        vec![format!("income {}", p1), fmt_money(&s.person1_total_income)],
        vec![format!("income {}", p2), fmt_money(&s.person2_total_income)],
        vec![
            format!("income_share {}", p1),
            fmt_percent(&s.income_share_percent(Person::Person1)),
        ],
        vec![
            format!("income_share {}", p2),
            fmt_percent(&s.income_share_percent(Person::Person2)),
        ],
        vec![format!("responsibility {}", p1), fmt_money(&s.person1_responsibility)],
        vec![format!("responsibility {}", p2), fmt_money(&s.person2_responsibility)],
        vec![format!("paid {}", p1), fmt_money(&s.person1_paid)],
        vec![format!("paid {}", p2), fmt_money(&s.person2_paid)],
        vec![format!("personal {}", p1), fmt_money(&s.person1_personal_total)],
        vec![format!("personal {}", p2), fmt_money(&s.person2_personal_total)],
        vec![format!("goals_planned {}", p1), fmt_money(&s.person1_goal_contribution)],
        vec![format!("goals_planned {}", p2), fmt_money(&s.person2_goal_contribution)],
        vec![format!("goals_realized {}", p1), fmt_money(&s.person1_goals_realized)],
        vec![format!("goals_realized {}", p2), fmt_money(&s.person2_goals_realized)],
        vec![format!("remaining {}", p1), fmt_money(&s.person1_remaining)],
        vec![format!("remaining {}", p2), fmt_money(&s.person2_remaining)],
        vec!["unspecified_paid_by".into(), s.unspecified_paid_by_count.to_string()],
    ];
    for (category, total) in &s.category_totals {
        rows.push(vec![format!("category {}", category), fmt_money(total)]);
    }
    rows
}
