// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_COUPLE_INFO, EngineConfig};
use crate::error::EngineError;
use crate::models::{
    CoupleInfo, Expense, GoalTransaction, Income, Investment, InvestmentMovement, SavingsGoal,
    Trip,
};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.duoledger", "Duoledger", "duoledger"));

pub const DATA_ENV: &str = "DUOLEDGER_DATA";

/// Every record the calculators read, as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub couple: CoupleInfo,
    pub settings: EngineConfig,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub goals: Vec<SavingsGoal>,
    pub goal_transactions: Vec<GoalTransaction>,
    pub investments: Vec<Investment>,
    pub investment_movements: Vec<InvestmentMovement>,
    pub trips: Vec<Trip>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            couple: DEFAULT_COUPLE_INFO.clone(),
            settings: EngineConfig::default(),
            expenses: Vec::new(),
            incomes: Vec::new(),
            goals: Vec::new(),
            goal_transactions: Vec::new(),
            investments: Vec::new(),
            investment_movements: Vec::new(),
            trips: Vec::new(),
        }
    }
}

impl Dataset {
    pub fn goal(&self, id: i64) -> Result<&SavingsGoal, EngineError> {
        self.goals
            .iter()
            .find(|g| g.id == id)
            .ok_or(EngineError::NotFound {
                kind: "goal",
                id: id.to_string(),
            })
    }

    pub fn trip(&self, id: i64) -> Result<&Trip, EngineError> {
        self.trips
            .iter()
            .find(|t| t.id == id)
            .ok_or(EngineError::NotFound {
                kind: "trip",
                id: id.to_string(),
            })
    }
}

/// `--data` wins, then `DUOLEDGER_DATA`, then the platform data dir.
pub fn data_path(flag: Option<&str>) -> Result<PathBuf> {
    if let Some(p) = flag.map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    if let Ok(p) = std::env::var(DATA_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p.trim()));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("duoledger.json"))
}

pub fn load(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read dataset at {}", path.display()))?;
    let ds: Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("Parse dataset at {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        expenses = ds.expenses.len(),
        goals = ds.goals.len(),
        investments = ds.investments.len(),
        trips = ds.trips.len(),
        "dataset loaded"
    );
    Ok(ds)
}

pub fn save(path: &Path, ds: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create directory {}", parent.display()))?;
    }
    fs::write(path, serde_json::to_string_pretty(ds)?)
        .with_context(|| format!("Write dataset at {}", path.display()))?;
    Ok(())
}

/// Writes an empty dataset unless one already exists. Returns whether it wrote.
pub fn init(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save(path, &Dataset::default())?;
    Ok(true)
}

/// A missing file reads as an empty dataset with the default couple.
pub fn open_or_default(path: &Path) -> Result<Dataset> {
    if path.exists() {
        load(path)
    } else {
        tracing::debug!(path = %path.display(), "no dataset yet; using defaults");
        Ok(Dataset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_sections_take_defaults() {
        let ds: Dataset = serde_json::from_str(r#"{"settings":{"guardEpsilon":"0.5"}}"#).unwrap();
        assert_eq!(ds.couple.person1_name, "Person 1");
        assert_eq!(ds.settings.guard_epsilon, rust_decimal::Decimal::new(5, 1));
        assert!(ds.expenses.is_empty());
    }

    #[test]
    fn init_writes_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        assert!(init(&path).unwrap());
        assert!(!init(&path).unwrap());
        assert_eq!(load(&path).unwrap(), Dataset::default());
    }

    #[test]
    fn flag_overrides_environment() {
        let p = data_path(Some("/tmp/explicit.json")).unwrap();
        assert_eq!(p, PathBuf::from("/tmp/explicit.json"));
    }

    #[test]
    fn unknown_goal_is_not_found() {
        let err = Dataset::default().goal(42).unwrap_err();
        assert_eq!(err.to_string(), "goal '42' not found");
    }
}
