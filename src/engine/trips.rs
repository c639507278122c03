// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trip settlement with a shared pre-funded pool (the "fund").

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::engine::clamp_ratio;
use crate::models::{Person, ProportionType, Trip, TripPayer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSettlement {
    pub total_expenses: Decimal,
    pub total_paid_by_p1: Decimal,
    pub total_paid_by_p2: Decimal,
    pub total_paid_by_fund: Decimal,
    pub p1_responsibility: Decimal,
    pub p2_responsibility: Decimal,
    /// Positive: still owes. Negative: is owed money back.
    pub p1_balance: Decimal,
    pub p2_balance: Decimal,
    /// Deposited into the fund and not yet spent.
    pub fund_balance: Decimal,
}

impl TripSettlement {
    pub fn balance_of(&self, person: Person) -> Decimal {
        match person {
            Person::Person1 => self.p1_balance,
            Person::Person2 => self.p2_balance,
        }
    }
}

/// Person 1's share of the trip: the salary ratio for proportional trips, the
/// trip's own percentage for custom ones (50% when it was never set).
fn p1_share(trip: &Trip, p1_salary_ratio: Decimal) -> Decimal {
    match trip.proportion_type {
        ProportionType::Proportional => clamp_ratio(p1_salary_ratio),
        ProportionType::Custom => trip
            .custom_percentage1
            .map(|pct| clamp_ratio(pct / Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::new(5, 1)),
    }
}

/// Settles one trip. `p1_salary_ratio` is person 1's income share in [0, 1],
/// supplied by the caller; it is ignored for custom-proportion trips.
pub fn calculate_trip_settlement(
    trip: &Trip,
    p1_salary_ratio: Decimal,
    config: &EngineConfig,
) -> TripSettlement {
    let mut s = TripSettlement::default();
    for expense in &trip.expenses {
        match expense.paid_by {
            TripPayer::Person1 => s.total_paid_by_p1 += expense.value,
            TripPayer::Person2 => s.total_paid_by_p2 += expense.value,
            TripPayer::Fund => s.total_paid_by_fund += expense.value,
        }
    }
    s.total_expenses = s.total_paid_by_p1 + s.total_paid_by_p2 + s.total_paid_by_fund;

    s.p1_responsibility = s.total_expenses * p1_share(trip, p1_salary_ratio);
    s.p2_responsibility = s.total_expenses - s.p1_responsibility;

    let (mut deposited_p1, mut deposited_p2) = (Decimal::ZERO, Decimal::ZERO);
    for deposit in &trip.deposits {
        match deposit.person {
            Person::Person1 => deposited_p1 += deposit.value,
            Person::Person2 => deposited_p2 += deposit.value,
        }
    }
    s.fund_balance = deposited_p1 + deposited_p2 - s.total_paid_by_fund;
    s.p1_balance = s.p1_responsibility - (s.total_paid_by_p1 + deposited_p1);
    s.p2_balance = s.p2_responsibility - (s.total_paid_by_p2 + deposited_p2);

    if s.fund_balance < -config.guard_epsilon {
        tracing::debug!(trip = trip.id, fund = %s.fund_balance, "fund spent beyond deposits");
    }
    s
}
