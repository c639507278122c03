// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record shapes handed over by the persistence layer.
//!
//! Everything that can arrive in more than one shape is normalized here, at the
//! boundary, so the calculators only ever see one: categories become
//! [`Category`], the three interdependent custom-split fields become a
//! [`SplitPolicy`], and missing or unparseable amounts become zero.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Person {
    #[serde(rename = "person1")]
    Person1,
    #[serde(rename = "person2")]
    Person2,
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Person::Person1 => f.write_str("person1"),
            Person::Person2 => f.write_str("person2"),
        }
    }
}

/// Who holds an investment (or, for goals, whose savings they are).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    #[serde(rename = "person1")]
    Person1,
    #[serde(rename = "person2")]
    Person2,
    #[default]
    #[serde(rename = "couple")]
    Couple,
}

/// Calendar month in `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(EngineError::InvalidMonth(format!("{}-{}", year, month)))
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Signed number of months from `earlier` to `self`.
    pub fn months_since(self, earlier: MonthKey) -> i64 {
        self.index() - earlier.index()
    }

    pub fn add_months(self, months: u32) -> Self {
        Self::from_index(self.index() + i64::from(months))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for MonthKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| EngineError::InvalidMonth(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CategoryRecord")]
pub struct Category {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRecord {
    Name(String),
    Tagged {
        name: String,
        #[serde(default)]
        icon: Option<String>,
    },
}

impl From<CategoryRecord> for Category {
    fn from(value: CategoryRecord) -> Self {
        match value {
            CategoryRecord::Name(name) => Category { name, icon: None },
            CategoryRecord::Tagged { name, icon } => Category { name, icon },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
    #[serde(rename = "FIXED")]
    Fixed,
    #[serde(rename = "COMMON")]
    Common,
    #[serde(rename = "EQUAL")]
    Equal,
    #[serde(rename = "REIMBURSEMENT")]
    Reimbursement,
    #[serde(rename = "REIMBURSEMENT_FIXED")]
    ReimbursementFixed,
    #[serde(rename = "PERSONAL_P1")]
    PersonalP1,
    #[serde(rename = "PERSONAL_P2")]
    PersonalP2,
}

impl ExpenseType {
    /// Recurring types contribute their full value every month from their start.
    pub fn is_recurring(self) -> bool {
        matches!(self, ExpenseType::Fixed | ExpenseType::ReimbursementFixed)
    }

    /// Owner of a personal expense; `None` for shared ones.
    pub fn personal_owner(self) -> Option<Person> {
        match self {
            ExpenseType::PersonalP1 => Some(Person::Person1),
            ExpenseType::PersonalP2 => Some(Person::Person2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    #[default]
    Proportional,
    Custom,
}

/// How a shared expense is divided between the two people.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// By each person's share of the month's combined income.
    #[default]
    Proportional,
    /// Person 1 carries this percentage (0-100); person 2 the rest.
    Percentage(Decimal),
    /// Fixed amounts for person 1 and person 2; any remainder goes proportionally.
    Absolute(Decimal, Decimal),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReimbursementStatus {
    #[default]
    Open,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExpenseRecord", into = "ExpenseRecord")]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: ExpenseType,
    pub category: Category,
    pub description: String,
    pub total_value: Decimal,
    pub installments: u32,
    pub paid_by: Option<Person>,
    pub split: SplitPolicy,
    pub reimbursement_status: ReimbursementStatus,
}

impl Expense {
    /// A single-installment, proportionally split expense.
    pub fn new(date: NaiveDate, kind: ExpenseType, category: &str, total_value: Decimal) -> Self {
        Self {
            id: 0,
            date,
            kind,
            category: Category::named(category),
            description: String::new(),
            total_value,
            installments: 1,
            paid_by: None,
            split: SplitPolicy::Proportional,
            reimbursement_status: ReimbursementStatus::Open,
        }
    }

    pub fn paid_by(mut self, person: Person) -> Self {
        self.paid_by = Some(person);
        self
    }

    pub fn installments(mut self, n: u32) -> Self {
        self.installments = n.max(1);
        self
    }

    pub fn split(mut self, split: SplitPolicy) -> Self {
        self.split = split;
        self
    }
}

/// Row shape of an expense as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseRecord {
    #[serde(default)]
    id: i64,
    #[serde(deserialize_with = "lenient::date")]
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: ExpenseType,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    total_value: Decimal,
    #[serde(default = "one", deserialize_with = "lenient::installments")]
    installments: u32,
    #[serde(default, deserialize_with = "lenient::person")]
    paid_by: Option<Person>,
    #[serde(default)]
    split_method: SplitMethod,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    split_percentage1: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    specific_value_p1: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    specific_value_p2: Option<Decimal>,
    #[serde(default)]
    reimbursement_status: ReimbursementStatus,
}

fn one() -> u32 {
    1
}

fn fifty() -> Decimal {
    Decimal::from(50)
}

impl From<ExpenseRecord> for Expense {
    fn from(r: ExpenseRecord) -> Self {
        let split = match r.split_method {
            SplitMethod::Proportional => SplitPolicy::Proportional,
            SplitMethod::Custom => match (r.specific_value_p1, r.specific_value_p2) {
                (None, None) => {
                    let p1 = r.split_percentage1.unwrap_or_else(fifty);
                    let clamped = p1.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
                    if clamped != p1 {
                        tracing::warn!(id = r.id, percentage = %p1, "clamping split percentage");
                    }
                    SplitPolicy::Percentage(clamped)
                }
                (p1, p2) => SplitPolicy::Absolute(p1.unwrap_or_default(), p2.unwrap_or_default()),
            },
        };
        Expense {
            id: r.id,
            date: r.date,
            kind: r.kind,
            category: r.category,
            description: r.description,
            total_value: r.total_value,
            installments: r.installments.max(1),
            paid_by: r.paid_by,
            split,
            reimbursement_status: r.reimbursement_status,
        }
    }
}

impl From<Expense> for ExpenseRecord {
    fn from(e: Expense) -> Self {
        let (split_method, split_percentage1, specific_value_p1, specific_value_p2) = match e.split
        {
            SplitPolicy::Proportional => (SplitMethod::Proportional, None, None, None),
            SplitPolicy::Percentage(p1) => (SplitMethod::Custom, Some(p1), None, None),
            SplitPolicy::Absolute(p1, p2) => (SplitMethod::Custom, None, Some(p1), Some(p2)),
        };
        ExpenseRecord {
            id: e.id,
            date: e.date,
            kind: e.kind,
            category: e.category,
            description: e.description,
            total_value: e.total_value,
            installments: e.installments,
            paid_by: e.paid_by,
            split_method,
            split_percentage1,
            specific_value_p1,
            specific_value_p2,
            reimbursement_status: e.reimbursement_status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeKind {
    /// An actual salary payment; replaces the recurring template for its month.
    Salary,
    #[default]
    Other,
}

/// A one-off inflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(default)]
    pub id: i64,
    #[serde(deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
    #[serde(default, deserialize_with = "lenient::person")]
    pub paid_by: Option<Person>,
    #[serde(default)]
    pub kind: IncomeKind,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringIncome {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
}

/// Split configuration: salaries and named recurring incomes per person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoupleInfo {
    #[serde(default)]
    pub person1_name: String,
    #[serde(default)]
    pub person2_name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub salary1: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub salary2: Decimal,
    #[serde(default)]
    pub person1_recurring_incomes: Vec<RecurringIncome>,
    #[serde(default)]
    pub person2_recurring_incomes: Vec<RecurringIncome>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CoupleInfo {
    pub fn name_of(&self, person: Person) -> &str {
        match person {
            Person::Person1 => &self.person1_name,
            Person::Person2 => &self.person2_name,
        }
    }

    /// Monthly template income: the recurring entries when any exist, else the flat salary.
    pub fn recurring_income(&self, person: Person) -> Decimal {
        let (entries, salary) = match person {
            Person::Person1 => (&self.person1_recurring_incomes, self.salary1),
            Person::Person2 => (&self.person2_recurring_incomes, self.salary2),
        };
        if entries.is_empty() {
            salary
        } else {
            entries.iter().map(|e| e.value).sum()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalType {
    #[serde(rename = "individual_p1")]
    IndividualP1,
    #[serde(rename = "individual_p2")]
    IndividualP2,
    #[default]
    #[serde(rename = "couple")]
    Couple,
}

impl GoalType {
    pub fn owner(self) -> Owner {
        match self {
            GoalType::IndividualP1 => Owner::Person1,
            GoalType::IndividualP2 => Owner::Person2,
            GoalType::Couple => Owner::Couple,
        }
    }
}

/// A savings goal. Its balance is never stored; it is derived from its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub target_value: Decimal,
    #[serde(default)]
    pub goal_type: GoalType,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub monthly_contribution_p1: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub monthly_contribution_p2: Decimal,
    #[serde(default = "fifty", deserialize_with = "lenient::decimal")]
    pub split_p1_percentage: Decimal,
    /// Annual rate, in percent.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub interest_rate: Decimal,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_emergency: bool,
}

impl SavingsGoal {
    pub fn new(id: i64, name: &str, target_value: Decimal, goal_type: GoalType) -> Self {
        Self {
            id,
            name: name.to_string(),
            target_value,
            goal_type,
            monthly_contribution_p1: Decimal::ZERO,
            monthly_contribution_p2: Decimal::ZERO,
            split_p1_percentage: fifty(),
            interest_rate: Decimal::ZERO,
            is_completed: false,
            is_emergency: false,
        }
    }

    /// Person 1's share of the target in percent, clamped into [0, 100].
    pub fn split_p1(&self) -> Decimal {
        self.split_p1_percentage
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    pub fn split_p2_percentage(&self) -> Decimal {
        Decimal::ONE_HUNDRED - self.split_p1()
    }

    pub fn monthly_contribution(&self, person: Person) -> Decimal {
        match person {
            Person::Person1 => self.monthly_contribution_p1,
            Person::Person2 => self.monthly_contribution_p2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMovementKind {
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTransaction {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub goal_id: i64,
    #[serde(rename = "type")]
    pub kind: GoalMovementKind,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
    #[serde(default, deserialize_with = "lenient::person")]
    pub person: Option<Person>,
    #[serde(deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub asset_type: String,
    #[serde(default)]
    pub owner: Owner,
    // Legacy snapshot fields; the movement log is authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invested_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
}

impl Investment {
    pub fn new(id: i64, name: &str, asset_type: &str, owner: Owner) -> Self {
        Self {
            id,
            name: name.to_string(),
            asset_type: asset_type.to_string(),
            owner,
            current_value: None,
            invested_value: None,
            quantity: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Buy,
    Sell,
    Yield,
    Adjustment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentMovement {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub investment_id: i64,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::person")]
    pub person: Option<Person>,
    #[serde(deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProportionType {
    #[default]
    Proportional,
    Custom,
}

/// Who covered a trip expense; `Fund` is the shared pre-funded pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripPayer {
    Person1,
    Person2,
    Fund,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripExpense {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
    pub paid_by: TripPayer,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDeposit {
    #[serde(default)]
    pub id: i64,
    pub person: Person,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub value: Decimal,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub proportion_type: ProportionType,
    #[serde(default, deserialize_with = "lenient::opt_decimal")]
    pub custom_percentage1: Option<Decimal>,
    #[serde(default)]
    pub expenses: Vec<TripExpense>,
    #[serde(default)]
    pub deposits: Vec<TripDeposit>,
}

/// Deserializers that coerce instead of failing: a bad number must never
/// poison a monthly total, so it becomes zero.
mod lenient {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Person;
    use crate::error::EngineError;

    fn parse_str(s: &str) -> Option<Decimal> {
        let s = s.trim();
        Decimal::from_str(s)
            .ok()
            .or_else(|| Decimal::from_scientific(s).ok())
    }

    /// Largest magnitude a single amount may carry. Sums of any realistic
    /// number of rows stay far inside `Decimal`'s range.
    fn max_amount() -> Decimal {
        Decimal::from(1_000_000_000_000_000i64)
    }

    fn capped(value: Decimal) -> Decimal {
        let max = max_amount();
        if value.abs() > max {
            tracing::warn!(%value, %max, "capping out-of-range amount");
            value.clamp(-max, max)
        } else {
            value
        }
    }

    fn to_decimal(v: &Value) -> Option<Decimal> {
        raw_decimal(v).map(capped)
    }

    fn raw_decimal(v: &Value) -> Option<Decimal> {
        match v {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(Decimal::from(i));
                }
                parse_str(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64))
            }
            Value::String(s) => parse_str(s),
            _ => None,
        }
    }

    pub fn decimal<'de, D>(d: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        let parsed = v.as_ref().and_then(to_decimal);
        if parsed.is_none() && v.as_ref().is_some_and(|v| !v.is_null()) {
            tracing::warn!(value = ?v, "coercing unparseable amount to zero");
        }
        Ok(parsed.unwrap_or(Decimal::ZERO))
    }

    pub fn opt_decimal<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(to_decimal))
    }

    pub fn installments<'de, D>(d: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref()
            .and_then(to_decimal)
            .and_then(|n| n.trunc().to_u32())
            .unwrap_or(1)
            .max(1))
    }

    pub fn person<'de, D>(d: D) -> Result<Option<Person>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v.as_ref().and_then(Value::as_str).map(str::trim) {
            Some("person1") => Some(Person::Person1),
            Some("person2") => Some(Person::Person2),
            _ => None,
        })
    }

    fn parse_date(raw: &str) -> Result<NaiveDate, EngineError> {
        let head = raw.trim().get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .map_err(|_| EngineError::InvalidDate(raw.to_string()))
    }

    pub fn date<'de, D>(d: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        parse_date(&raw).map_err(D::Error::custom)
    }

    pub fn opt_date<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(d)?;
        match raw {
            Some(raw) if !raw.trim().is_empty() => parse_date(&raw).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn month_key_parses_and_formats() {
        let m: MonthKey = "2025-01".parse().unwrap();
        assert_eq!(m.year(), 2025);
        assert_eq!(m.month(), 1);
        assert_eq!(m.to_string(), "2025-01");
        assert!("2025-13".parse::<MonthKey>().is_err());
        assert!("january".parse::<MonthKey>().is_err());
    }

    #[test]
    fn month_key_new_validates_month() {
        assert_eq!(MonthKey::new(2024, 12).unwrap().to_string(), "2024-12");
        assert_eq!(MonthKey::new(2024, 12).unwrap(), "2024-12".parse().unwrap());
        assert!(MonthKey::new(2024, 0).is_err());
        assert!(MonthKey::new(2024, 13).is_err());
    }

    #[test]
    fn month_key_arithmetic_crosses_years() {
        let m: MonthKey = "2024-11".parse().unwrap();
        assert_eq!(m.add_months(3).to_string(), "2025-02");
        let later: MonthKey = "2025-02".parse().unwrap();
        assert_eq!(later.months_since(m), 3);
        assert_eq!(m.months_since(later), -3);
    }

    #[test]
    fn category_accepts_string_or_object() {
        let a: Category = serde_json::from_str(r#""Mercado""#).unwrap();
        let b: Category = serde_json::from_str(r#"{"name":"Mercado","icon":"cart"}"#).unwrap();
        assert_eq!(a.name, "Mercado");
        assert_eq!(a.icon, None);
        assert_eq!(b.name, "Mercado");
        assert_eq!(b.icon.as_deref(), Some("cart"));
    }

    #[test]
    fn custom_split_with_specific_values_becomes_absolute() {
        let e: Expense = serde_json::from_str(
            r#"{"date":"2025-03-10","type":"COMMON","category":"Casa","totalValue":"300",
                "splitMethod":"custom","splitPercentage1":70,"specificValueP1":100}"#,
        )
        .unwrap();
        assert_eq!(e.split, SplitPolicy::Absolute(dec!(100), dec!(0)));
    }

    #[test]
    fn custom_split_percentage_is_clamped() {
        let e: Expense = serde_json::from_str(
            r#"{"date":"2025-03-10","type":"COMMON","totalValue":10,
                "splitMethod":"custom","splitPercentage1":140}"#,
        )
        .unwrap();
        assert_eq!(e.split, SplitPolicy::Percentage(dec!(100)));
    }

    #[test]
    fn huge_amounts_are_capped() {
        let e: Expense = serde_json::from_str(
            r#"{"date":"2025-01-10","type":"COMMON","totalValue":"70000000000000000000000000000",
                "splitMethod":"custom","specificValueP1":"-9e27"}"#,
        )
        .unwrap();
        assert_eq!(e.total_value, dec!(1000000000000000));
        assert_eq!(e.split, SplitPolicy::Absolute(dec!(-1000000000000000), Decimal::ZERO));
    }

    #[test]
    fn malformed_numbers_coerce_to_defaults() {
        let e: Expense = serde_json::from_str(
            r#"{"date":"2025-03-10T12:00:00Z","type":"EQUAL","totalValue":"abc",
                "installments":null,"paidBy":""}"#,
        )
        .unwrap();
        assert_eq!(e.total_value, Decimal::ZERO);
        assert_eq!(e.installments, 1);
        assert_eq!(e.paid_by, None);
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn expense_serializes_back_to_row_shape() {
        let e = Expense::new(
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            ExpenseType::Common,
            "Casa",
            dec!(120),
        )
        .split(SplitPolicy::Percentage(dec!(60)));
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["splitMethod"], "custom");
        assert_eq!(v["type"], "COMMON");
        let back: Expense = serde_json::from_value(v).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn split_p2_is_derived_from_clamped_p1() {
        let mut g = SavingsGoal::new(1, "Casa", dec!(1000), GoalType::Couple);
        g.split_p1_percentage = dec!(-10);
        assert_eq!(g.split_p1(), Decimal::ZERO);
        assert_eq!(g.split_p2_percentage(), dec!(100));
    }

    #[test]
    fn recurring_entries_supersede_salary() {
        let info = CoupleInfo {
            salary1: dec!(5000),
            person1_recurring_incomes: vec![
                RecurringIncome { name: "CLT".into(), value: dec!(4000) },
                RecurringIncome { name: "Aluguel".into(), value: dec!(800) },
            ],
            salary2: dec!(3000),
            ..CoupleInfo::default()
        };
        assert_eq!(info.recurring_income(Person::Person1), dec!(4800));
        assert_eq!(info.recurring_income(Person::Person2), dec!(3000));
    }
}
