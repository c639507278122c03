// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Forward-looking calculators: months to a savings target, which partner
//! holds a couple goal back, and a month-by-month compound-growth series.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::engine::ledger::GoalStats;
use crate::models::{GoalType, MonthKey, Person, SavingsGoal};

/// How long until a target is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Horizon {
    Months(u32),
    /// Contributions never get there.
    Never,
}

impl Horizon {
    pub fn months(self) -> Option<u32> {
        match self {
            Horizon::Months(n) => Some(n),
            Horizon::Never => None,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Months(n) => write!(f, "{} months", n),
            Horizon::Never => f.write_str("never"),
        }
    }
}

fn ceil_months(months: Decimal) -> Horizon {
    // Absorb ln() noise so an exact 12.0000000001 stays 12.
    months
        .round_dp(9)
        .ceil()
        .to_u32()
        .map_or(Horizon::Never, Horizon::Months)
}

/// Months until `current` reaches `target` with a fixed monthly deposit.
///
/// `annual_rate_pct` is converted to a simple monthly rate (annual / 12); a
/// positive rate solves the growing-annuity equation, otherwise the division
/// is linear. Both round up.
pub fn time_to_goal(
    target: Decimal,
    current: Decimal,
    monthly_contribution: Decimal,
    annual_rate_pct: Decimal,
) -> Horizon {
    let remaining = target - current;
    if remaining <= Decimal::ZERO {
        return Horizon::Months(0);
    }
    if monthly_contribution <= Decimal::ZERO {
        return Horizon::Never;
    }
    let linear = || {
        remaining
            .checked_div(monthly_contribution)
            .map_or(Horizon::Never, ceil_months)
    };

    let r = annual_rate_pct / Decimal::ONE_HUNDRED / Decimal::from(12);
    if r <= Decimal::ZERO {
        return linear();
    }
    let annuity = remaining
        .checked_mul(r)
        .and_then(|x| x.checked_div(monthly_contribution))
        .and_then(|x| x.checked_add(Decimal::ONE))
        .and_then(|x| x.checked_ln());
    let growth = (Decimal::ONE + r).checked_ln();
    match (annuity, growth) {
        (Some(num), Some(den)) if !den.is_zero() => {
            num.checked_div(den).map_or(Horizon::Never, ceil_months)
        }
        _ => {
            tracing::warn!(%remaining, %r, "logarithm failed; projecting without interest");
            linear()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleneckAnalysis {
    pub p1_months: Horizon,
    pub p2_months: Horizon,
    /// The slower partner, when the paces differ by more than the threshold.
    pub bottleneck: Option<Person>,
    /// Months between the two paces; `None` when one side never finishes.
    pub gap_months: Option<u32>,
}

/// Compares each partner's pace toward their own share of a couple goal.
/// Returns `None` for individual goals.
pub fn analyze_bottleneck(
    goal: &SavingsGoal,
    stats: &GoalStats,
    config: &EngineConfig,
) -> Option<BottleneckAnalysis> {
    if goal.goal_type != GoalType::Couple {
        return None;
    }
    let share = |pct: Decimal| goal.target_value * pct / Decimal::ONE_HUNDRED;
    let p1_months = time_to_goal(
        share(goal.split_p1()),
        stats.p1_balance,
        goal.monthly_contribution(Person::Person1),
        Decimal::ZERO,
    );
    let p2_months = time_to_goal(
        share(goal.split_p2_percentage()),
        stats.p2_balance,
        goal.monthly_contribution(Person::Person2),
        Decimal::ZERO,
    );

    let (bottleneck, gap_months) = match (p1_months, p2_months) {
        (Horizon::Months(a), Horizon::Months(b)) => {
            let gap = a.abs_diff(b);
            let slower = if a > b { Person::Person1 } else { Person::Person2 };
            if gap > config.bottleneck_threshold_months {
                (Some(slower), Some(gap))
            } else {
                (None, Some(gap))
            }
        }
        (Horizon::Never, Horizon::Months(_)) => (Some(Person::Person1), None),
        (Horizon::Months(_), Horizon::Never) => (Some(Person::Person2), None),
        (Horizon::Never, Horizon::Never) => (None, None),
    };
    Some(BottleneckAnalysis {
        p1_months,
        p2_months,
        bottleneck,
        gap_months,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub months: Horizon,
    pub completion_month: Option<MonthKey>,
    pub bottleneck: Option<BottleneckAnalysis>,
}

/// Projects a goal from its current stats, counting months from `from`.
pub fn project_goal(
    goal: &SavingsGoal,
    stats: &GoalStats,
    from: MonthKey,
    config: &EngineConfig,
) -> GoalProjection {
    let contribution = goal.monthly_contribution_p1 + goal.monthly_contribution_p2;
    let months = time_to_goal(
        goal.target_value,
        stats.total_balance,
        contribution,
        goal.interest_rate,
    );
    GoalProjection {
        months,
        completion_month: months.months().map(|n| from.add_months(n)),
        bottleneck: analyze_bottleneck(goal, stats, config),
    }
}

/// Rate in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rate {
    Annual(Decimal),
    Monthly(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Months(u32),
    Years(u32),
}

impl Term {
    pub fn months(self) -> u32 {
        match self {
            Term::Months(n) => n,
            Term::Years(n) => n.saturating_mul(12),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParams {
    pub initial_value: Decimal,
    pub monthly_contribution: Decimal,
    pub rate: Rate,
    pub term: Term,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPoint {
    pub month: u32,
    pub label: String,
    pub invested: Decimal,
    pub interest_accrued: Decimal,
    pub total: Decimal,
}

/// A compound-growth run. Cheap to build; points are produced on demand and
/// the series can be walked any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    initial_value: Decimal,
    monthly_contribution: Decimal,
    monthly_rate: Decimal,
    months: u32,
    dense: bool,
}

/// Effective monthly rate (fraction) equivalent to `annual` percent.
pub fn effective_monthly_rate(annual_pct: Decimal) -> Decimal {
    let annual = annual_pct / Decimal::ONE_HUNDRED;
    if annual.is_zero() {
        return Decimal::ZERO;
    }
    let twelfth = Decimal::ONE / Decimal::from(12);
    match (Decimal::ONE + annual).checked_powd(twelfth) {
        Some(factor) => factor - Decimal::ONE,
        None => {
            tracing::warn!(%annual_pct, "fractional power failed; using annual / 12");
            annual / Decimal::from(12)
        }
    }
}

impl Simulation {
    pub fn new(params: SimulationParams, config: &EngineConfig) -> Self {
        let monthly_rate = match params.rate {
            Rate::Annual(pct) => effective_monthly_rate(pct),
            Rate::Monthly(pct) => pct / Decimal::ONE_HUNDRED,
        };
        let months = params.term.months();
        Self {
            initial_value: params.initial_value,
            monthly_contribution: params.monthly_contribution,
            monthly_rate,
            months,
            dense: months <= config.dense_series_limit_months,
        }
    }

    pub fn monthly_rate(&self) -> Decimal {
        self.monthly_rate
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn points(&self) -> SimulationPoints<'_> {
        SimulationPoints {
            sim: self,
            month: 0,
            balance: self.initial_value,
            invested: self.initial_value,
        }
    }

    /// The point at the end of the term; `None` for a zero-length term.
    pub fn final_point(&self) -> Option<SimulationPoint> {
        self.points().last()
    }
}

impl<'a> IntoIterator for &'a Simulation {
    type Item = SimulationPoint;
    type IntoIter = SimulationPoints<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.points()
    }
}

/// Lazy point series of a [`Simulation`]: every month for short terms,
/// otherwise every twelfth month plus the last one.
#[derive(Debug, Clone)]
pub struct SimulationPoints<'a> {
    sim: &'a Simulation,
    month: u32,
    balance: Decimal,
    invested: Decimal,
}

impl SimulationPoints<'_> {
    fn step(&mut self) -> Option<()> {
        let growth = Decimal::ONE + self.sim.monthly_rate;
        self.balance = self
            .balance
            .checked_mul(growth)?
            .checked_add(self.sim.monthly_contribution)?;
        self.invested = self.invested.checked_add(self.sim.monthly_contribution)?;
        self.month += 1;
        Some(())
    }

    fn label(&self) -> String {
        if self.sim.dense || self.month % 12 != 0 {
            format!("Month {}", self.month)
        } else {
            format!("Year {}", self.month / 12)
        }
    }
}

impl Iterator for SimulationPoints<'_> {
    type Item = SimulationPoint;

    fn next(&mut self) -> Option<Self::Item> {
        while self.month < self.sim.months {
            if self.step().is_none() {
                tracing::warn!(month = self.month, "balance overflowed; truncating series");
                self.month = self.sim.months;
                return None;
            }
            let emit = self.sim.dense || self.month % 12 == 0 || self.month == self.sim.months;
            if emit {
                return Some(SimulationPoint {
                    month: self.month,
                    label: self.label(),
                    invested: self.invested,
                    interest_accrued: self.balance - self.invested,
                    total: self.balance,
                });
            }
        }
        None
    }
}
