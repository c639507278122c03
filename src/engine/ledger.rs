// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Running balances over append-only movement logs.
//!
//! Goals and investments share one reduction: drop soft-deleted rows, then fold
//! the signed values. The arithmetic never depends on slice order; only the
//! "last deposit" lookup does, and it orders by `(date, id, position)`.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::engine::{attribute, percent_of};
use crate::models::{
    GoalMovementKind, GoalTransaction, Investment, InvestmentMovement, MovementKind, Person,
    SavingsGoal,
};

/// A row of an append-only log as the reducer sees it.
pub trait Movement {
    fn is_deleted(&self) -> bool;
    fn date(&self) -> NaiveDate;
    /// Insertion sequence; breaks ties between rows sharing a date.
    fn sequence(&self) -> i64;
    fn person(&self) -> Option<Person>;
    /// Signed change this row applies to the running balance.
    fn balance_delta(&self) -> Decimal;
}

impl Movement for GoalTransaction {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn sequence(&self) -> i64 {
        self.id
    }

    fn person(&self) -> Option<Person> {
        self.person
    }

    fn balance_delta(&self) -> Decimal {
        match self.kind {
            GoalMovementKind::Deposit => self.value,
            GoalMovementKind::Withdraw => -self.value,
        }
    }
}

impl Movement for InvestmentMovement {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn sequence(&self) -> i64 {
        self.id
    }

    fn person(&self) -> Option<Person> {
        self.person
    }

    fn balance_delta(&self) -> Decimal {
        match self.kind {
            MovementKind::Sell => -self.value,
            MovementKind::Buy | MovementKind::Yield | MovementKind::Adjustment => self.value,
        }
    }
}

/// Non-deleted rows only.
pub fn live<'a, M, I>(movements: I) -> impl Iterator<Item = &'a M>
where
    M: Movement + 'a,
    I: IntoIterator<Item = &'a M>,
{
    movements.into_iter().filter(|m| !m.is_deleted())
}

/// The most recent row matching `pred`: latest date, then highest sequence,
/// then the later position in the input.
pub fn latest<'a, M, I, F>(movements: I, mut pred: F) -> Option<&'a M>
where
    M: Movement + 'a,
    I: IntoIterator<Item = &'a M>,
    F: FnMut(&M) -> bool,
{
    let mut best: Option<&'a M> = None;
    for m in live(movements).filter(|m| pred(*m)) {
        let newer = match best {
            None => true,
            Some(b) => (m.date(), m.sequence()) >= (b.date(), b.sequence()),
        };
        if newer {
            best = Some(m);
        }
    }
    best
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentStats {
    /// Cost basis: buys minus sell proceeds. Yield and adjustments never touch it.
    pub invested_amount: Decimal,
    pub total_balance: Decimal,
    pub total_yield: Decimal,
    pub profit: Decimal,
    pub profit_percentage: Decimal,
    pub quantity: Decimal,
    pub person1_balance: Decimal,
    pub person2_balance: Decimal,
}

fn reduce_investment<'a, I>(investment: &Investment, movements: I, config: &EngineConfig) -> InvestmentStats
where
    I: IntoIterator<Item = &'a InvestmentMovement>,
{
    let mut stats = InvestmentStats::default();
    for m in live(movements) {
        let delta = m.balance_delta();
        stats.total_balance += delta;
        let qty = m.quantity.unwrap_or_default().abs();
        match m.kind {
            MovementKind::Buy => {
                stats.invested_amount += m.value;
                stats.quantity += qty;
            }
            MovementKind::Sell => {
                stats.invested_amount -= m.value;
                stats.quantity -= qty;
            }
            MovementKind::Yield => stats.total_yield += m.value,
            MovementKind::Adjustment => {}
        }
        let (p1, p2) = attribute(delta, m.person, investment.owner);
        stats.person1_balance += p1;
        stats.person2_balance += p2;
    }
    stats.profit = stats.total_balance - stats.invested_amount;
    stats.profit_percentage = percent_of(stats.profit, stats.invested_amount, config.guard_epsilon);
    stats
}

/// Balance, cost basis and profit of one investment, from the movements
/// whose `investment_id` matches it.
pub fn calculate_investment_stats(
    investment: &Investment,
    movements: &[InvestmentMovement],
    config: &EngineConfig,
) -> InvestmentStats {
    reduce_investment(
        investment,
        movements.iter().filter(|m| m.investment_id == investment.id),
        config,
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_cost: Decimal,
    pub total_balance: Decimal,
    pub total_yield: Decimal,
    pub total_profit: Decimal,
    pub total_yield_percentage: Decimal,
    pub person1_balance: Decimal,
    pub person2_balance: Decimal,
    pub stats_by_investment: BTreeMap<i64, InvestmentStats>,
}

/// Per-investment stats plus portfolio totals, in one pass over the log.
pub fn calculate_portfolio_summary(
    investments: &[Investment],
    movements: &[InvestmentMovement],
    config: &EngineConfig,
) -> PortfolioSummary {
    let mut by_investment: HashMap<i64, Vec<&InvestmentMovement>> =
        HashMap::with_capacity(investments.len());
    for m in movements {
        by_investment.entry(m.investment_id).or_default().push(m);
    }

    let mut summary = PortfolioSummary::default();
    for investment in investments {
        let rows = by_investment.get(&investment.id).map(Vec::as_slice).unwrap_or(&[]);
        let stats = reduce_investment(investment, rows.iter().copied(), config);
        summary.total_cost += stats.invested_amount;
        summary.total_balance += stats.total_balance;
        summary.total_yield += stats.total_yield;
        summary.total_profit += stats.profit;
        summary.person1_balance += stats.person1_balance;
        summary.person2_balance += stats.person2_balance;
        summary.stats_by_investment.insert(investment.id, stats);
    }
    summary.total_yield_percentage =
        percent_of(summary.total_profit, summary.total_cost, config.guard_epsilon);
    tracing::trace!(
        investments = investments.len(),
        movements = movements.len(),
        "portfolio summary computed"
    );
    summary
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub p1_balance: Decimal,
    pub p2_balance: Decimal,
    pub total_balance: Decimal,
    /// Percent of target; not clamped, so it exceeds 100 once overshot.
    pub progress: Decimal,
    pub is_completed: bool,
    pub p1_last_deposit: Option<Decimal>,
    pub p2_last_deposit: Option<Decimal>,
}

/// Balances and progress of one goal, from the transactions whose `goal_id`
/// matches it.
pub fn calculate_goal_stats(
    goal: &SavingsGoal,
    transactions: &[GoalTransaction],
    config: &EngineConfig,
) -> GoalStats {
    let owner = goal.goal_type.owner();
    let own = || transactions.iter().filter(|t| t.goal_id == goal.id);

    let mut stats = GoalStats::default();
    for tx in live(own()) {
        let (p1, p2) = attribute(tx.balance_delta(), tx.person, owner);
        stats.p1_balance += p1;
        stats.p2_balance += p2;
    }
    stats.total_balance = stats.p1_balance + stats.p2_balance;
    stats.progress = if goal.target_value > config.guard_epsilon {
        stats.total_balance / goal.target_value * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    stats.is_completed = goal.is_completed
        || (goal.target_value > config.guard_epsilon && stats.total_balance >= goal.target_value);

    let last_deposit = |person: Person| {
        latest(own(), |t: &GoalTransaction| {
            t.kind == GoalMovementKind::Deposit && t.person == Some(person)
        })
        .map(|t| t.value)
    };
    stats.p1_last_deposit = last_deposit(Person::Person1);
    stats.p2_last_deposit = last_deposit(Person::Person2);
    stats
}
