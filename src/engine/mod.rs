// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure calculators. None of them perform I/O, hold state, or call each other;
//! each takes record slices plus an [`EngineConfig`](crate::config::EngineConfig)
//! and returns a fully populated result.

pub mod ledger;
pub mod projection;
pub mod settlement;
pub mod trips;

use rust_decimal::Decimal;

use crate::models::{Owner, Person};

/// `part / whole * 100`, or zero when `whole` is within `guard` of zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal, guard: Decimal) -> Decimal {
    if whole.abs() > guard {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

pub(crate) fn clamp_ratio(ratio: Decimal) -> Decimal {
    ratio.clamp(Decimal::ZERO, Decimal::ONE)
}

/// Splits `amount` between the two people's buckets.
///
/// An explicit person takes it all; otherwise an individual owner does, and a
/// couple-owned record splits evenly.
pub(crate) fn attribute(amount: Decimal, person: Option<Person>, owner: Owner) -> (Decimal, Decimal) {
    match (person, owner) {
        (Some(Person::Person1), _) | (None, Owner::Person1) => (amount, Decimal::ZERO),
        (Some(Person::Person2), _) | (None, Owner::Person2) => (Decimal::ZERO, amount),
        (None, Owner::Couple) => {
            let half = amount / Decimal::TWO;
            (half, amount - half)
        }
    }
}
