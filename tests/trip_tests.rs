// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use duoledger::config::EngineConfig;
use duoledger::engine::trips::calculate_trip_settlement;
use duoledger::models::{Person, ProportionType, Trip};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn beach_trip() -> Trip {
    serde_json::from_value(json!({
        "id": 7,
        "name": "Praia",
        "proportionType": "proportional",
        "expenses": [
            {"id": 1, "description": "Hotel", "value": 1200, "paidBy": "person1", "date": "2025-01-10"},
            {"id": 2, "description": "Jantar", "value": "300", "paidBy": "person2"},
            {"id": 3, "description": "Passeio", "value": 500, "paidBy": "fund"}
        ],
        "deposits": [
            {"id": 1, "person": "person1", "value": 400},
            {"id": 2, "person": "person2", "value": 200}
        ]
    }))
    .unwrap()
}

#[test]
fn proportional_trip_uses_salary_ratio() {
    let s = calculate_trip_settlement(&beach_trip(), dec!(0.6), &EngineConfig::default());
    assert_eq!(s.total_paid_by_p1, dec!(1200));
    assert_eq!(s.total_paid_by_p2, dec!(300));
    assert_eq!(s.total_paid_by_fund, dec!(500));
    assert_eq!(s.total_expenses, dec!(2000));
    assert_eq!(s.p1_responsibility, dec!(1200));
    assert_eq!(s.p2_responsibility, dec!(800));
    assert_eq!(s.fund_balance, dec!(100));
    // 1200 - (1200 + 400)
    assert_eq!(s.p1_balance, dec!(-400));
    // 800 - (300 + 200)
    assert_eq!(s.p2_balance, dec!(300));
    assert_eq!(s.balance_of(Person::Person2), dec!(300));
}

#[test]
fn custom_trip_ignores_salary_ratio() {
    let mut trip = beach_trip();
    trip.proportion_type = ProportionType::Custom;
    trip.custom_percentage1 = Some(dec!(25));
    let s = calculate_trip_settlement(&trip, dec!(0.9), &EngineConfig::default());
    assert_eq!(s.p1_responsibility, dec!(500));
    assert_eq!(s.p2_responsibility, dec!(1500));
}

#[test]
fn out_of_range_ratio_is_clamped() {
    let s = calculate_trip_settlement(&beach_trip(), dec!(1.7), &EngineConfig::default());
    assert_eq!(s.p1_responsibility, dec!(2000));
    assert_eq!(s.p2_responsibility, Decimal::ZERO);
}

#[test]
fn empty_trip_settles_to_zero() {
    let s = calculate_trip_settlement(&Trip::default(), dec!(0.5), &EngineConfig::default());
    assert_eq!(s.total_expenses, Decimal::ZERO);
    assert_eq!(s.p1_balance, Decimal::ZERO);
    assert_eq!(s.fund_balance, Decimal::ZERO);
}

#[test]
fn settlement_is_idempotent() {
    let trip = beach_trip();
    let cfg = EngineConfig::default();
    assert_eq!(
        calculate_trip_settlement(&trip, dec!(0.55), &cfg),
        calculate_trip_settlement(&trip, dec!(0.55), &cfg)
    );
}
