// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::CoupleInfo;

/// Tunables shared by every calculator.
///
/// `EngineConfig::default()` reproduces the documented engine constants, so
/// callers only build one by hand when a dataset overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Below this absolute difference the month is considered settled.
    pub settlement_epsilon: Decimal,
    /// Denominators (income, cost basis, target) at or below this are treated as zero.
    pub guard_epsilon: Decimal,
    /// A couple goal flags a bottleneck only when the partners' paces differ by more months.
    pub bottleneck_threshold_months: u32,
    /// Simulations up to this many months emit one point per month; longer ones go yearly.
    pub dense_series_limit_months: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settlement_epsilon: Decimal::new(1, 2),
            guard_epsilon: Decimal::new(1, 2),
            bottleneck_threshold_months: 2,
            dense_series_limit_months: 60,
        }
    }
}

/// The one place default names and salaries live. Injected by callers
/// (the dataset loader, the CLI); never read from inside a calculator.
pub static DEFAULT_COUPLE_INFO: Lazy<CoupleInfo> = Lazy::new(|| CoupleInfo {
    person1_name: "Person 1".to_string(),
    person2_name: "Person 2".to_string(),
    ..CoupleInfo::default()
});
