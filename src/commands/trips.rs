// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dataset::Dataset;
use crate::engine::settlement::base_income_ratio;
use crate::engine::trips::{TripSettlement, calculate_trip_settlement};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRow {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub settlement: TripSettlement,
}

/// Settles every trip, or only `id`. Proportional trips use the couple's
/// template income ratio.
pub fn settle_trips(ds: &Dataset, id: Option<i64>) -> Result<Vec<TripRow>> {
    let ratio = base_income_ratio(&ds.couple, &ds.settings);
    let trips = match id {
        Some(id) => vec![ds.trip(id)?],
        None => ds.trips.iter().collect(),
    };
    Ok(trips
        .into_iter()
        .map(|t| TripRow {
            id: t.id,
            name: t.name.clone(),
            settlement: calculate_trip_settlement(t, ratio, &ds.settings),
        })
        .collect())
}

pub fn handle(ds: &Dataset, m: &clap::ArgMatches) -> Result<()> {
    let rows = settle_trips(ds, m.get_one::<i64>("id").copied())?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let p1 = ds.couple.person1_name.as_str();
    let p2 = ds.couple.person2_name.as_str();
    let data = rows
        .into_iter()
        .map(|r| {
            let s = r.settlement;
            vec![
                r.id.to_string(),
                r.name,
                fmt_money(&s.total_expenses),
                fmt_money(&s.p1_responsibility),
                fmt_money(&s.p2_responsibility),
                fmt_money(&s.p1_balance),
                fmt_money(&s.p2_balance),
                fmt_money(&s.fund_balance),
            ]
        })
        .collect();
    let h1 = format!("{} owes", p1);
    let h2 = format!("{} owes", p2);
    println!(
        "{}",
        pretty_table(
            &["ID", "Trip", "Total", p1, p2, h1.as_str(), h2.as_str(), "Fund left"],
            data
        )
    );
    Ok(())
}
