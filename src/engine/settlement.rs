// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly settlement: who owes whom for one calendar month.
//!
//! Expenses are amortized into the month (installments contribute
//! `totalValue / n` to each of their `n` months, recurring types contribute in
//! full every month from their start), bucketed by type, split into
//! per-person responsibility and compared against what each person paid.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::{attribute, clamp_ratio};
use crate::models::{
    CoupleInfo, Expense, ExpenseType, GoalMovementKind, GoalTransaction, Income, IncomeKind,
    MonthKey, Owner, Person, SavingsGoal, SplitPolicy,
};

const UNCATEGORIZED: &str = "(uncategorized)";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBreakdown {
    /// Salary actually recorded this month.
    pub salary_real: Decimal,
    /// Template value from the split configuration.
    pub salary_recurring: Decimal,
    pub other: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhoTransfers {
    Person1,
    Person2,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: String,
    pub total_fixed: Decimal,
    pub total_common: Decimal,
    pub total_equal: Decimal,
    pub total_reimbursement: Decimal,
    /// Sum of every shared (non-personal) contribution.
    pub total_shared: Decimal,
    pub category_totals: BTreeMap<String, Decimal>,
    pub person1_personal_total: Decimal,
    pub person2_personal_total: Decimal,
    pub person1_responsibility: Decimal,
    pub person2_responsibility: Decimal,
    pub person1_paid: Decimal,
    pub person2_paid: Decimal,
    /// Shared contributions with no payer; they count toward responsibility only.
    pub unspecified_paid_by_count: usize,
    pub person1_total_income: Decimal,
    pub person2_total_income: Decimal,
    pub p1_income_breakdown: IncomeBreakdown,
    pub p2_income_breakdown: IncomeBreakdown,
    /// Fractions in [0, 1] summing to one.
    pub income_share_p1: Decimal,
    pub income_share_p2: Decimal,
    pub person1_goal_contribution: Decimal,
    pub person2_goal_contribution: Decimal,
    pub person1_goals_realized: Decimal,
    pub person2_goals_realized: Decimal,
    pub total_goal_savings: Decimal,
    /// Responsibility minus paid.
    pub person1_diff: Decimal,
    pub person2_diff: Decimal,
    pub who_transfers: WhoTransfers,
    pub transfer_amount: Decimal,
    pub person1_remaining: Decimal,
    pub person2_remaining: Decimal,
}

impl MonthlySummary {
    fn empty(month: &str) -> Self {
        let half = Decimal::new(5, 1);
        Self {
            month: month.to_string(),
            income_share_p1: half,
            income_share_p2: half,
            ..Self::default()
        }
    }

    /// Income share of `person` in percent, for display.
    pub fn income_share_percent(&self, person: Person) -> Decimal {
        let share = match person {
            Person::Person1 => self.income_share_p1,
            Person::Person2 => self.income_share_p2,
        };
        share * Decimal::ONE_HUNDRED
    }
}

/// Divisor turning `totalValue` into this month's contribution, or `None`
/// when the expense does not touch `month`.
fn installment_divisor(expense: &Expense, month: MonthKey) -> Option<Decimal> {
    let offset = month.months_since(MonthKey::from_date(expense.date));
    if offset < 0 {
        return None;
    }
    if expense.kind.is_recurring() {
        return Some(Decimal::ONE);
    }
    let n = expense.installments.max(1);
    (offset < i64::from(n)).then(|| Decimal::from(n))
}

/// What `expense` contributes to `month`, if anything.
pub fn amount_for_month(expense: &Expense, month: MonthKey) -> Option<Decimal> {
    installment_divisor(expense, month).map(|d| expense.total_value / d)
}

fn income_ratio(p1: Decimal, p2: Decimal, guard: Decimal) -> Decimal {
    let combined = p1 + p2;
    if combined.abs() <= guard {
        return Decimal::new(5, 1);
    }
    clamp_ratio(p1 / combined)
}

/// Person 1's share of the couple's template income (salaries or recurring
/// entries), without any month's one-off records. 50% when both are zero.
pub fn base_income_ratio(couple: &CoupleInfo, config: &EngineConfig) -> Decimal {
    income_ratio(
        couple.recurring_income(Person::Person1),
        couple.recurring_income(Person::Person2),
        config.guard_epsilon,
    )
}

fn split_responsibility(
    expense: &Expense,
    amount: Decimal,
    divisor: Decimal,
    ratio_p1: Decimal,
) -> (Decimal, Decimal) {
    let by_ratio = |value: Decimal, ratio: Decimal| {
        let p1 = value * ratio;
        (p1, value - p1)
    };
    if expense.kind == ExpenseType::Equal {
        return by_ratio(amount, Decimal::new(5, 1));
    }
    match expense.split {
        SplitPolicy::Proportional => by_ratio(amount, ratio_p1),
        SplitPolicy::Percentage(p1) => by_ratio(
            amount,
            p1.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED,
        ),
        SplitPolicy::Absolute(p1, p2) => {
            let (a1, a2) = (p1 / divisor, p2 / divisor);
            let rest = amount - a1 - a2;
            if rest > Decimal::ZERO {
                let (r1, r2) = by_ratio(rest, ratio_p1);
                (a1 + r1, a2 + r2)
            } else {
                (a1, a2)
            }
        }
    }
}

fn person_income(
    couple: &CoupleInfo,
    person: Person,
    month_incomes: &[&Income],
) -> (Decimal, IncomeBreakdown) {
    let mut breakdown = IncomeBreakdown {
        salary_recurring: couple.recurring_income(person),
        ..IncomeBreakdown::default()
    };
    let mut salary_recorded = false;
    for income in month_incomes.iter().filter(|i| i.paid_by == Some(person)) {
        match income.kind {
            IncomeKind::Salary => {
                salary_recorded = true;
                breakdown.salary_real += income.value;
            }
            IncomeKind::Other => breakdown.other += income.value,
        }
    }
    let salary = if salary_recorded {
        breakdown.salary_real
    } else {
        breakdown.salary_recurring
    };
    (salary + breakdown.other, breakdown)
}

/// Aggregates one month into settlement numbers.
///
/// Never fails: a malformed `month_key`, empty inputs or zero income all yield a
/// populated summary (zeros, with a 50/50 income share).
pub fn calculate_summary(
    expenses: &[Expense],
    incomes: &[Income],
    couple: &CoupleInfo,
    month_key: &str,
    goals: &[SavingsGoal],
    goal_transactions: &[GoalTransaction],
    config: &EngineConfig,
) -> MonthlySummary {
    let month = match month_key.parse::<MonthKey>() {
        Ok(month) => month,
        Err(err) => {
            tracing::warn!(%err, "returning empty monthly summary");
            return MonthlySummary::empty(month_key);
        }
    };
    let mut s = MonthlySummary::empty(&month.to_string());

    let month_incomes: Vec<&Income> = incomes.iter().filter(|i| month.contains(i.date)).collect();
    let (income1, breakdown1) = person_income(couple, Person::Person1, &month_incomes);
    let (income2, breakdown2) = person_income(couple, Person::Person2, &month_incomes);
    let ratio = income_ratio(income1, income2, config.guard_epsilon);
    s.person1_total_income = income1;
    s.person2_total_income = income2;
    s.p1_income_breakdown = breakdown1;
    s.p2_income_breakdown = breakdown2;
    s.income_share_p1 = ratio;
    s.income_share_p2 = Decimal::ONE - ratio;

    let mut contributing = 0usize;
    for expense in expenses {
        let Some(divisor) = installment_divisor(expense, month) else {
            continue;
        };
        contributing += 1;
        let amount = expense.total_value / divisor;
        match expense.kind {
            ExpenseType::PersonalP1 => {
                s.person1_personal_total += amount;
                continue;
            }
            ExpenseType::PersonalP2 => {
                s.person2_personal_total += amount;
                continue;
            }
            ExpenseType::Fixed => s.total_fixed += amount,
            ExpenseType::Common => s.total_common += amount,
            ExpenseType::Equal => s.total_equal += amount,
            ExpenseType::Reimbursement | ExpenseType::ReimbursementFixed => {
                s.total_reimbursement += amount
            }
        }
        s.total_shared += amount;
        let category = if expense.category.name.trim().is_empty() {
            UNCATEGORIZED
        } else {
            expense.category.name.as_str()
        };
        *s.category_totals.entry(category.to_string()).or_default() += amount;

        let (r1, r2) = split_responsibility(expense, amount, divisor, ratio);
        s.person1_responsibility += r1;
        s.person2_responsibility += r2;

        match expense.paid_by {
            Some(Person::Person1) => s.person1_paid += amount,
            Some(Person::Person2) => s.person2_paid += amount,
            None => s.unspecified_paid_by_count += 1,
        }
    }

    for goal in goals.iter().filter(|g| !g.is_completed) {
        s.person1_goal_contribution += goal.monthly_contribution_p1;
        s.person2_goal_contribution += goal.monthly_contribution_p2;
    }
    // Same attribution as goal balances; an unknown goal counts as shared.
    let owners: HashMap<i64, Owner> = goals.iter().map(|g| (g.id, g.goal_type.owner())).collect();
    for tx in goal_transactions.iter().filter(|t| {
        t.deleted_at.is_none() && t.kind == GoalMovementKind::Deposit && month.contains(t.date)
    }) {
        let owner = owners.get(&tx.goal_id).copied().unwrap_or(Owner::Couple);
        let (p1, p2) = attribute(tx.value, tx.person, owner);
        s.person1_goals_realized += p1;
        s.person2_goals_realized += p2;
    }
    s.total_goal_savings = s.person1_goals_realized + s.person2_goals_realized;

    s.person1_diff = s.person1_responsibility - s.person1_paid;
    s.person2_diff = s.person2_responsibility - s.person2_paid;
    if s.person1_diff.abs() < config.settlement_epsilon {
        s.who_transfers = WhoTransfers::None;
        s.transfer_amount = Decimal::ZERO;
    } else if s.person1_diff > Decimal::ZERO {
        s.who_transfers = WhoTransfers::Person1;
        s.transfer_amount = s.person1_diff;
    } else {
        s.who_transfers = WhoTransfers::Person2;
        s.transfer_amount = -s.person1_diff;
    }

    s.person1_remaining = income1 - s.person1_responsibility - s.person1_personal_total;
    s.person2_remaining = income2 - s.person2_responsibility - s.person2_personal_total;

    if s.unspecified_paid_by_count > 0 {
        tracing::debug!(
            month = %month,
            count = s.unspecified_paid_by_count,
            "shared expenses without payer distort the settlement"
        );
    }
    tracing::trace!(month = %month, contributing, "monthly summary computed");
    s
}
