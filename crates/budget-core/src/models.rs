//! Domain models for the budget planner API
//!
//! Every record here is owned by the server. The client deserializes what the
//! API returns and serializes request bodies; it never persists these itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest day a recurring rule may fire on (keeps every month valid)
pub const MAX_RECURRING_DAY: u32 = 28;

/// Direction of money for transactions, categories and recurring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as returned by `GET /transactions`
///
/// `amount` is never negative; the sign lives in `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Set by the server when generated from a recurring rule
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_id: Option<String>,
}

/// Request body for creating or replacing a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl NewTransaction {
    /// Check the same constraints the entry form enforces before submitting
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        if self.description.trim().is_empty() {
            return Err(Error::InvalidData("description is required".into()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("category is required".into()));
        }
        Ok(())
    }
}

impl From<&Transaction> for NewTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date,
            amount: tx.amount,
            description: tx.description.clone(),
            category: tx.category.clone(),
            kind: tx.kind,
        }
    }
}

/// A recurring transaction rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub day_of_month: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for creating or replacing a recurring rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecurringRule {
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub day_of_month: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewRecurringRule {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        if !(1..=MAX_RECURRING_DAY).contains(&self.day_of_month) {
            return Err(Error::InvalidData(format!(
                "day of month must be between 1 and {}, got {}",
                MAX_RECURRING_DAY, self.day_of_month
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("category is required".into()));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(Error::InvalidData(format!(
                    "end date {} is before start date {}",
                    end, self.start_date
                )));
            }
        }
        Ok(())
    }
}

impl From<&RecurringRule> for NewRecurringRule {
    fn from(rule: &RecurringRule) -> Self {
        Self {
            amount: rule.amount,
            description: rule.description.clone(),
            category: rule.category.clone(),
            kind: rule.kind,
            day_of_month: rule.day_of_month,
            start_date: rule.start_date,
            end_date: rule.end_date,
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

/// A spending/income category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Seeded at signup; the server refuses to delete these
    #[serde(default)]
    pub is_predefined: bool,
}

/// Request body for creating or renaming a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// One row of the monthly budget table (`GET /analytics/monthly`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub category: String,
    pub actual: f64,
    pub planned: f64,
    /// planned - actual, computed by the server
    pub difference: f64,
}

impl BudgetEntry {
    pub fn is_over_budget(&self) -> bool {
        self.difference < 0.0
    }
}

/// Request body for `POST /budgets`; the server upserts by (category, month, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetWrite {
    pub category: String,
    pub month: u32,
    pub year: i32,
    pub planned_amount: f64,
}

/// A stored planned amount as returned by `GET /budgets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub month: u32,
    pub year: i32,
    pub planned_amount: f64,
}

/// Income/expense/balance for one labelled month
///
/// Shared by the yearly, fiscal-year and trend analytics endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthFlow {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Share of one category in a month's total (`GET /analytics/category-breakdown`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

/// Burn rate and runway (`GET /analytics/burn-rate`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnRate {
    pub monthly_burn_rate: f64,
    pub current_balance: f64,
    pub runway_months: f64,
}

/// Per-user display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Response of `POST /auth/login` and `POST /auth/signup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Generic `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub message: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub message: String,
    pub count: u32,
}

/// Outcome of a server-side CSV import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub message: String,
    pub imported: u32,
    /// Per-row failures ("Row 3: ..."); absent when every row imported
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl ImportReport {
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map(|e| e.len()).unwrap_or(0)
    }
}
