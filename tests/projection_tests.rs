// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use duoledger::config::EngineConfig;
use duoledger::engine::ledger::GoalStats;
use duoledger::engine::projection::{
    Horizon, Rate, Simulation, SimulationParams, Term, analyze_bottleneck,
    effective_monthly_rate, project_goal, time_to_goal,
};
use duoledger::models::{GoalType, MonthKey, Person, SavingsGoal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn couple_goal() -> SavingsGoal {
    let mut g = SavingsGoal::new(1, "Apartamento", dec!(12000), GoalType::Couple);
    g.split_p1_percentage = dec!(50);
    g.monthly_contribution_p1 = dec!(1000);
    g.monthly_contribution_p2 = dec!(500);
    g
}

fn stats(p1: Decimal, p2: Decimal) -> GoalStats {
    GoalStats {
        p1_balance: p1,
        p2_balance: p2,
        total_balance: p1 + p2,
        ..GoalStats::default()
    }
}

#[test]
fn time_to_goal_edges() {
    assert_eq!(time_to_goal(dec!(500), dec!(500), dec!(0), dec!(0)), Horizon::Months(0));
    assert_eq!(time_to_goal(dec!(500), dec!(499), dec!(0), dec!(10)), Horizon::Never);
    assert_eq!(time_to_goal(dec!(500), dec!(0), dec!(100), dec!(0)), Horizon::Months(5));
    assert_eq!(time_to_goal(dec!(501), dec!(0), dec!(100), dec!(0)), Horizon::Months(6));
}

#[test]
fn interest_never_lengthens_the_horizon() {
    let linear = time_to_goal(dec!(20000), dec!(1000), dec!(250), dec!(0));
    let with_rate = time_to_goal(dec!(20000), dec!(1000), dec!(250), dec!(10));
    assert_eq!(linear, Horizon::Months(76));
    assert!(with_rate <= linear);
    assert!(with_rate.months().unwrap() > 0);
}

#[test]
fn slower_partner_is_flagged() {
    // 6000 each: p1 needs 6 months, p2 needs 12
    let b = analyze_bottleneck(&couple_goal(), &stats(dec!(0), dec!(0)), &EngineConfig::default())
        .unwrap();
    assert_eq!(b.p1_months, Horizon::Months(6));
    assert_eq!(b.p2_months, Horizon::Months(12));
    assert_eq!(b.bottleneck, Some(Person::Person2));
    assert_eq!(b.gap_months, Some(6));
}

#[test]
fn close_paces_are_not_a_bottleneck() {
    // p2 already has 4000: 2000 left at 500 is 4 months vs p1's 6
    let b = analyze_bottleneck(
        &couple_goal(),
        &stats(dec!(0), dec!(4000)),
        &EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(b.bottleneck, None);
    assert_eq!(b.gap_months, Some(2));
}

#[test]
fn partner_without_contribution_is_the_bottleneck() {
    let mut g = couple_goal();
    g.monthly_contribution_p1 = Decimal::ZERO;
    let b = analyze_bottleneck(&g, &stats(dec!(0), dec!(0)), &EngineConfig::default()).unwrap();
    assert_eq!(b.p1_months, Horizon::Never);
    assert_eq!(b.bottleneck, Some(Person::Person1));
    assert_eq!(b.gap_months, None);
}

#[test]
fn individual_goals_have_no_bottleneck() {
    let mut g = couple_goal();
    g.goal_type = GoalType::IndividualP1;
    assert!(analyze_bottleneck(&g, &stats(dec!(0), dec!(0)), &EngineConfig::default()).is_none());
}

#[test]
fn projection_reports_completion_month() {
    let from: MonthKey = "2025-11".parse().unwrap();
    let p = project_goal(&couple_goal(), &stats(dec!(1500), dec!(0)), from, &EngineConfig::default());
    // 10500 left at 1500 a month
    assert_eq!(p.months, Horizon::Months(7));
    assert_eq!(p.completion_month.unwrap().to_string(), "2026-06");
    assert!(p.bottleneck.is_some());
}

#[test]
fn annual_rate_converts_to_effective_monthly() {
    let r = effective_monthly_rate(dec!(12));
    // (1.12)^(1/12) - 1 ~ 0.0094888
    assert_eq!(r.round_dp(6), dec!(0.009489));
    assert_eq!(effective_monthly_rate(Decimal::ZERO), Decimal::ZERO);
}

#[test]
fn simulation_compounds_monthly() {
    let sim = Simulation::new(
        SimulationParams {
            initial_value: dec!(1000),
            monthly_contribution: dec!(100),
            rate: Rate::Monthly(dec!(1)),
            term: Term::Months(2),
        },
        &EngineConfig::default(),
    );
    let pts: Vec<_> = sim.points().collect();
    // 1000 * 1.01 + 100 = 1110; 1110 * 1.01 + 100 = 1221.1
    assert_eq!(pts[0].total, dec!(1110));
    assert_eq!(pts[1].total, dec!(1221.1));
    assert_eq!(pts[1].invested, dec!(1200));
    assert_eq!(pts[1].interest_accrued, dec!(21.1));
}

#[test]
fn series_is_restartable_and_bounded() {
    let cfg = EngineConfig::default();
    let sim = Simulation::new(
        SimulationParams {
            initial_value: dec!(0),
            monthly_contribution: dec!(200),
            rate: Rate::Annual(dec!(8)),
            term: Term::Years(30),
        },
        &cfg,
    );
    let first: Vec<_> = sim.points().collect();
    let second: Vec<_> = (&sim).into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 30);
    assert_eq!(first.last().unwrap().label, "Year 30");
    assert_eq!(sim.final_point().unwrap().month, 360);
    assert_eq!(sim.final_point().unwrap().invested, dec!(72000));

    let dense = Simulation::new(
        SimulationParams {
            initial_value: dec!(0),
            monthly_contribution: dec!(200),
            rate: Rate::Annual(dec!(8)),
            term: Term::Years(5),
        },
        &cfg,
    );
    assert_eq!(dense.points().count(), 60);
}

#[test]
fn zero_term_has_no_points() {
    let sim = Simulation::new(
        SimulationParams {
            initial_value: dec!(10),
            monthly_contribution: dec!(1),
            rate: Rate::Annual(dec!(5)),
            term: Term::Months(0),
        },
        &EngineConfig::default(),
    );
    assert_eq!(sim.points().count(), 0);
    assert!(sim.final_point().is_none());
}
