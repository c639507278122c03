// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use duoledger::config::EngineConfig;
use duoledger::engine::ledger::{
    calculate_goal_stats, calculate_investment_stats, calculate_portfolio_summary,
};
use duoledger::models::{
    GoalMovementKind, GoalTransaction, GoalType, Investment, InvestmentMovement, MovementKind,
    Owner, Person, SavingsGoal,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(u64::from(n))
}

fn mv(id: i64, kind: MovementKind, value: Decimal, quantity: Option<Decimal>) -> InvestmentMovement {
    InvestmentMovement {
        id,
        investment_id: 1,
        kind,
        value,
        quantity,
        person: None,
        date: day(id as u32),
        deleted_at: None,
    }
}

fn fund() -> Investment {
    Investment::new(1, "Fundo DI", "fund", Owner::Couple)
}

#[test]
fn sell_reduces_balance_cost_and_quantity() {
    let movements = vec![
        mv(1, MovementKind::Buy, dec!(1000), Some(dec!(1))),
        mv(2, MovementKind::Sell, dec!(400), Some(dec!(0.4))),
    ];
    let s = calculate_investment_stats(&fund(), &movements, &EngineConfig::default());
    assert_eq!(s.total_balance, dec!(600));
    assert_eq!(s.invested_amount, dec!(600));
    assert_eq!(s.quantity, dec!(0.6));
}

#[test]
fn yield_keeps_cost_basis() {
    let movements = vec![
        mv(1, MovementKind::Buy, dec!(1000), Some(dec!(1))),
        mv(2, MovementKind::Yield, dec!(50), None),
    ];
    let s = calculate_investment_stats(&fund(), &movements, &EngineConfig::default());
    assert_eq!(s.total_balance, dec!(1050));
    assert_eq!(s.total_yield, dec!(50));
    assert_eq!(s.invested_amount, dec!(1000));
}

#[test]
fn adjustment_keeps_cost_basis() {
    let movements = vec![
        mv(1, MovementKind::Buy, dec!(1000), Some(dec!(1))),
        mv(2, MovementKind::Adjustment, dec!(-20), None),
    ];
    let s = calculate_investment_stats(&fund(), &movements, &EngineConfig::default());
    assert_eq!(s.total_balance, dec!(980));
    assert_eq!(s.invested_amount, dec!(1000));
    assert_eq!(s.profit, dec!(-20));
}

#[test]
fn profit_percentage_over_cost() {
    let movements = vec![
        mv(1, MovementKind::Buy, dec!(1000), Some(dec!(1))),
        mv(2, MovementKind::Yield, dec!(100), None),
    ];
    let s = calculate_investment_stats(&fund(), &movements, &EngineConfig::default());
    assert_eq!(s.profit, dec!(100));
    assert_eq!(s.profit_percentage, dec!(10));
}

#[test]
fn deleted_and_foreign_movements_are_ignored() {
    let mut gone = mv(2, MovementKind::Buy, dec!(5000), Some(dec!(5)));
    gone.deleted_at = Some("2025-02-01T00:00:00Z".into());
    let mut other = mv(3, MovementKind::Buy, dec!(700), None);
    other.investment_id = 2;
    let movements = vec![mv(1, MovementKind::Buy, dec!(100), None), gone, other];
    let s = calculate_investment_stats(&fund(), &movements, &EngineConfig::default());
    assert_eq!(s.total_balance, dec!(100));
}

#[test]
fn portfolio_totals_and_owner_buckets() {
    let investments = vec![
        Investment::new(1, "CDB", "fixed", Owner::Person1),
        Investment::new(2, "Acoes", "stock", Owner::Couple),
        Investment::new(3, "Vazio", "stock", Owner::Person2),
    ];
    let mut movements = vec![
        mv(1, MovementKind::Buy, dec!(1000), None),
        mv(2, MovementKind::Yield, dec!(100), None),
    ];
    let mut b = mv(3, MovementKind::Buy, dec!(2000), Some(dec!(10)));
    b.investment_id = 2;
    let mut y = mv(4, MovementKind::Yield, dec!(300), None);
    y.investment_id = 2;
    y.person = Some(Person::Person2);
    movements.extend([b, y]);

    let p = calculate_portfolio_summary(&investments, &movements, &EngineConfig::default());
    assert_eq!(p.total_cost, dec!(3000));
    assert_eq!(p.total_balance, dec!(3400));
    assert_eq!(p.total_yield, dec!(400));
    assert_eq!(p.total_profit, dec!(400));
    assert_eq!(p.total_yield_percentage.round_dp(4), dec!(13.3333));
    assert_eq!(p.person1_balance, dec!(2100));
    assert_eq!(p.person2_balance, dec!(1300));
    assert_eq!(p.stats_by_investment.len(), 3);
    assert_eq!(p.stats_by_investment[&3].total_balance, Decimal::ZERO);
    assert_eq!(p.stats_by_investment[&3].profit_percentage, Decimal::ZERO);
}

#[test]
fn goal_stats_track_people_and_last_deposit() {
    let mut goal = SavingsGoal::new(9, "Viagem", dec!(1000), GoalType::Couple);
    goal.monthly_contribution_p1 = dec!(100);
    let tx = |id: i64, kind: GoalMovementKind, value: Decimal, person: Person, d: u32| GoalTransaction {
        id,
        goal_id: 9,
        kind,
        value,
        person: Some(person),
        date: day(d),
        deleted_at: None,
    };
    let txs = vec![
        tx(1, GoalMovementKind::Deposit, dec!(300), Person::Person1, 1),
        tx(2, GoalMovementKind::Deposit, dec!(200), Person::Person2, 2),
        tx(3, GoalMovementKind::Withdraw, dec!(50), Person::Person1, 3),
        tx(5, GoalMovementKind::Deposit, dec!(80), Person::Person1, 10),
        tx(4, GoalMovementKind::Deposit, dec!(40), Person::Person1, 10),
    ];
    let s = calculate_goal_stats(&goal, &txs, &EngineConfig::default());
    assert_eq!(s.p1_balance, dec!(370));
    assert_eq!(s.p2_balance, dec!(200));
    assert_eq!(s.total_balance, dec!(570));
    assert_eq!(s.progress, dec!(57));
    assert!(!s.is_completed);
    assert_eq!(s.p1_last_deposit, Some(dec!(80)));
    assert_eq!(s.p2_last_deposit, Some(dec!(200)));

    let again = calculate_goal_stats(&goal, &txs, &EngineConfig::default());
    assert_eq!(again, s);
    assert_eq!(serde_json::to_string(&again).unwrap(), serde_json::to_string(&s).unwrap());
}

#[test]
fn overshooting_goal_is_complete_with_unclamped_progress() {
    let goal = SavingsGoal::new(1, "Reserva", dec!(100), GoalType::IndividualP2);
    let txs = vec![GoalTransaction {
        id: 1,
        goal_id: 1,
        kind: GoalMovementKind::Deposit,
        value: dec!(150),
        person: None,
        date: day(1),
        deleted_at: None,
    }];
    let s = calculate_goal_stats(&goal, &txs, &EngineConfig::default());
    assert_eq!(s.p2_balance, dec!(150));
    assert_eq!(s.progress, dec!(150));
    assert!(s.is_completed);
    assert_eq!(s.p2_last_deposit, None);
}

fn arb_movement() -> impl Strategy<Value = (u8, i64, bool)> {
    (0u8..4, -50_000i64..50_000, any::<bool>())
}

proptest! {
    #[test]
    fn balance_is_order_independent_signed_sum(
        raw in prop::collection::vec(arb_movement(), 0..40),
        seed in any::<u64>(),
    ) {
        let movements: Vec<InvestmentMovement> = raw
            .iter()
            .enumerate()
            .map(|(i, (k, cents, deleted))| {
                let kind = match k {
                    0 => MovementKind::Buy,
                    1 => MovementKind::Sell,
                    2 => MovementKind::Yield,
                    _ => MovementKind::Adjustment,
                };
                let mut m = mv(i as i64 + 1, kind, Decimal::new(*cents, 2), None);
                if *deleted {
                    m.deleted_at = Some("2025-03-01".into());
                }
                m
            })
            .collect();

        let expected: Decimal = movements
            .iter()
            .filter(|m| m.deleted_at.is_none())
            .map(|m| if m.kind == MovementKind::Sell { -m.value } else { m.value })
            .sum();

        let mut shuffled = movements.clone();
        if !shuffled.is_empty() {
            let n = shuffled.len();
            shuffled.rotate_left((seed as usize) % n);
            shuffled.reverse();
        }

        let cfg = EngineConfig::default();
        let a = calculate_investment_stats(&fund(), &movements, &cfg);
        let b = calculate_investment_stats(&fund(), &shuffled, &cfg);
        prop_assert_eq!(a.total_balance, expected);
        prop_assert_eq!(&a, &b);
    }
}
