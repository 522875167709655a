//! Totals rendered under the budget and report tables
//!
//! The server computes every per-row figure; these are only the footer sums
//! the tables add up locally.

use crate::models::{BudgetEntry, MonthFlow};

/// Footer of the monthly budget table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyTotals {
    pub actual: f64,
    pub planned: f64,
    /// planned - actual; negative means the month is over budget
    pub remaining: f64,
    /// Categories whose actual spend exceeds the planned amount
    pub over_budget: Vec<String>,
}

impl MonthlyTotals {
    pub fn from_entries(entries: &[BudgetEntry]) -> Self {
        let actual: f64 = entries.iter().map(|e| e.actual).sum();
        let planned: f64 = entries.iter().map(|e| e.planned).sum();
        let over_budget = entries
            .iter()
            .filter(|e| e.is_over_budget())
            .map(|e| e.category.clone())
            .collect();

        Self {
            actual,
            planned,
            remaining: planned - actual,
            over_budget,
        }
    }
}

/// Footer of the yearly / fiscal-year tables
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl FlowTotals {
    pub fn from_months(months: &[MonthFlow]) -> Self {
        let income: f64 = months.iter().map(|m| m.income).sum();
        let expense: f64 = months.iter().map(|m| m.expense).sum();
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }

    /// Expense as a share of income, in percent (0 when there is no income)
    pub fn spend_ratio(&self) -> f64 {
        if self.income > 0.0 {
            self.expense / self.income * 100.0
        } else {
            0.0
        }
    }
}
