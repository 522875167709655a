//! Batch budget operations
//!
//! Two bulk writes are offered on the monthly budget table:
//! - apply edited planned amounts to the selected month and, by default, the
//!   eleven months after it (starting AT the selected month)
//! - copy every non-zero planned amount of the selected month to the twelve
//!   months AFTER it
//!
//! The offsets differ on purpose and are kept as-is. Writes are independent
//! upserts issued concurrently; the batch waits for every one of them before
//! reporting, and only reloads the month when all succeeded. A partial failure
//! leaves the successful writes in place and surfaces one aggregate error.

use std::collections::BTreeSet;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::{BudgetEntry, BudgetWrite};
use crate::period::{project_from, CalendarPeriod};

/// Number of months a bulk write covers
pub const PROJECTION_MONTHS: usize = 12;

/// Which months an edit of planned amounts is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyScope {
    /// Only the selected month
    CurrentMonth,
    /// The selected month and the eleven after it
    #[default]
    TwelveMonths,
}

impl ApplyScope {
    pub fn from_apply_to_future(apply_to_future: bool) -> Self {
        if apply_to_future {
            Self::TwelveMonths
        } else {
            Self::CurrentMonth
        }
    }

    pub fn months(&self) -> usize {
        match self {
            Self::CurrentMonth => 1,
            Self::TwelveMonths => PROJECTION_MONTHS,
        }
    }
}

/// Collapse repeated categories, keeping the last value at the first position
pub fn latest_per_category<T: Clone>(edits: &[(String, T)]) -> Vec<(String, T)> {
    let mut latest: Vec<(String, T)> = Vec::with_capacity(edits.len());
    for (category, value) in edits {
        match latest.iter_mut().find(|(c, _)| c == category) {
            Some(slot) => slot.1 = value.clone(),
            None => latest.push((category.clone(), value.clone())),
        }
    }
    latest
}

/// Parse raw planned-amount inputs keyed by category
///
/// A category given more than once keeps only its last value. Values that are
/// not finite numbers or are negative are then skipped, not reported. Input
/// order is preserved.
pub fn parse_planned_edits(edits: &[(String, String)]) -> Vec<(String, f64)> {
    latest_per_category(edits)
        .iter()
        .filter_map(|(category, raw)| match raw.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => Some((category.clone(), amount)),
            _ => {
                debug!("Skipping planned amount {:?} for {}", raw, category);
                None
            }
        })
        .collect()
}

/// Writes for "save planned amounts", starting at `period` itself
pub fn plan_apply_writes(
    period: CalendarPeriod,
    edits: &[(String, f64)],
    scope: ApplyScope,
) -> Vec<BudgetWrite> {
    let periods = project_from(period, scope.months());
    latest_per_category(edits)
        .into_iter()
        .flat_map(|(category, amount)| {
            periods.iter().map(move |p| BudgetWrite {
                category: category.clone(),
                month: p.month(),
                year: p.year(),
                planned_amount: amount,
            })
        })
        .collect()
}

/// Writes for "copy to next 12 months", starting the month after `period`
///
/// Categories with nothing planned are left out.
pub fn plan_copy_writes(period: CalendarPeriod, entries: &[BudgetEntry]) -> Vec<BudgetWrite> {
    let periods: Vec<CalendarPeriod> = project_from(period, PROJECTION_MONTHS + 1)
        .into_iter()
        .skip(1)
        .collect();
    entries
        .iter()
        .filter(|e| e.planned > 0.0)
        .flat_map(|entry| {
            periods.iter().map(move |p| BudgetWrite {
                category: entry.category.clone(),
                month: p.month(),
                year: p.year(),
                planned_amount: entry.planned,
            })
        })
        .collect()
}

/// Result of one concurrent batch of budget writes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Distinct categories the batch touched
    pub categories: usize,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    /// Collapse a partial failure into [`Error::BatchFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(Error::BatchFailed {
                failed: self.failed,
                attempted: self.attempted,
            })
        }
    }
}

/// Runs the bulk budget operations against the API
pub struct BudgetPlanner {
    client: ApiClient,
}

impl BudgetPlanner {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Save edited planned amounts and return the freshly reloaded month
    ///
    /// The reload happens once, after every write has finished, and only when
    /// none of them failed.
    pub async fn save_planned(
        &self,
        period: CalendarPeriod,
        edits: &[(String, f64)],
        scope: ApplyScope,
    ) -> Result<Vec<BudgetEntry>> {
        let writes = plan_apply_writes(period, edits, scope);
        let outcome = self.write_all(writes).await.into_result()?;
        info!(
            "Saved {} planned amounts across {} categories from {}",
            outcome.succeeded, outcome.categories, period
        );
        self.client.monthly(period).await
    }

    /// Copy the month's non-zero planned amounts to the next twelve months
    pub async fn copy_to_next_year(&self, period: CalendarPeriod) -> Result<BatchOutcome> {
        let entries = self.client.monthly(period).await?;
        let writes = plan_copy_writes(period, &entries);
        if writes.is_empty() {
            return Err(Error::InvalidData("No planned budgets to copy".into()));
        }
        let outcome = self.write_all(writes).await.into_result()?;
        info!(
            "Copied {} budgets from {} to the next {} months",
            outcome.categories, period, PROJECTION_MONTHS
        );
        Ok(outcome)
    }

    /// Issue every write concurrently and wait for all of them
    async fn write_all(&self, writes: Vec<BudgetWrite>) -> BatchOutcome {
        let categories: BTreeSet<&str> = writes.iter().map(|w| w.category.as_str()).collect();
        let mut outcome = BatchOutcome {
            attempted: writes.len(),
            categories: categories.len(),
            ..Default::default()
        };

        let mut tasks = JoinSet::new();
        for write in writes {
            let client = self.client.clone();
            tasks.spawn(async move {
                let result = client.save_budget(&write).await;
                (write, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(_))) => outcome.succeeded += 1,
                Ok((write, Err(e))) => {
                    warn!(
                        "Budget write failed for {} {:02}/{}: {}",
                        write.category, write.month, write.year, e
                    );
                    outcome.failed += 1;
                }
                Err(e) => {
                    warn!("Budget write task did not complete: {}", e);
                    outcome.failed += 1;
                }
            }
        }

        debug!(
            "Budget batch finished: {} ok, {} failed",
            outcome.succeeded, outcome.failed
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use crate::test_utils::{new_tx, planned_by_key, written_periods, MockBudgetApi};

    fn period(month: u32, year: i32) -> CalendarPeriod {
        CalendarPeriod::new(month, year).unwrap()
    }

    fn edits(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(c, v)| (c.to_string(), v.to_string()))
            .collect()
    }

    fn entry(category: &str, planned: f64) -> BudgetEntry {
        BudgetEntry {
            category: category.to_string(),
            actual: 0.0,
            planned,
            difference: planned,
        }
    }

    #[test]
    fn test_parse_planned_edits_skips_invalid() {
        let parsed = parse_planned_edits(&edits(&[
            ("Groceries", "6000"),
            ("Fuel", " 2000.50 "),
            ("Phone", "abc"),
            ("Internet", "-5"),
            ("Electricity", ""),
            ("Restaurants", "NaN"),
            ("Gifts", "0"),
        ]));
        assert_eq!(
            parsed,
            vec![
                ("Groceries".to_string(), 6000.0),
                ("Fuel".to_string(), 2000.5),
                ("Gifts".to_string(), 0.0),
            ]
        );
    }

    #[test]
    fn test_repeated_category_keeps_last_value() {
        let parsed = parse_planned_edits(&edits(&[
            ("Fuel", "1"),
            ("Groceries", "500"),
            ("Fuel", "2"),
        ]));
        assert_eq!(
            parsed,
            vec![("Fuel".to_string(), 2.0), ("Groceries".to_string(), 500.0)]
        );

        // The last value wins even when it is the invalid one
        let parsed = parse_planned_edits(&edits(&[("Fuel", "100"), ("Fuel", "abc")]));
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_apply_writes_one_per_category_and_period() {
        let writes = plan_apply_writes(
            period(3, 2025),
            &[("Fuel".to_string(), 1.0), ("Fuel".to_string(), 2.0)],
            ApplyScope::TwelveMonths,
        );
        assert_eq!(writes.len(), 12);
        assert!(writes.iter().all(|w| w.planned_amount == 2.0));
    }

    #[test]
    fn test_apply_twelve_months_starts_at_selected_month() {
        let writes = plan_apply_writes(
            period(11, 2024),
            &[("Groceries".to_string(), 6000.0)],
            ApplyScope::TwelveMonths,
        );
        assert_eq!(writes.len(), 12);
        assert_eq!((writes[0].month, writes[0].year), (11, 2024));
        assert_eq!((writes[1].month, writes[1].year), (12, 2024));
        assert_eq!((writes[2].month, writes[2].year), (1, 2025));
        assert_eq!((writes[11].month, writes[11].year), (10, 2025));
        assert!(writes.iter().all(|w| w.planned_amount == 6000.0));
    }

    #[test]
    fn test_apply_current_month_only() {
        let writes = plan_apply_writes(
            period(3, 2025),
            &[("Groceries".to_string(), 1.0), ("Fuel".to_string(), 2.0)],
            ApplyScope::CurrentMonth,
        );
        assert_eq!(writes.len(), 2);
        assert!(writes.iter().all(|w| w.month == 3 && w.year == 2025));
    }

    #[test]
    fn test_default_scope_is_twelve_months() {
        assert_eq!(ApplyScope::default(), ApplyScope::TwelveMonths);
        assert_eq!(ApplyScope::from_apply_to_future(false), ApplyScope::CurrentMonth);
    }

    #[test]
    fn test_copy_starts_next_month_and_skips_zero() {
        let writes = plan_copy_writes(
            period(12, 2024),
            &[entry("Groceries", 6000.0), entry("Fuel", 0.0)],
        );
        assert_eq!(writes.len(), 12);
        assert!(writes.iter().all(|w| w.category == "Groceries"));
        assert_eq!((writes[0].month, writes[0].year), (1, 2025));
        assert_eq!((writes[11].month, writes[11].year), (12, 2025));
    }

    #[test]
    fn test_copy_with_nothing_planned_is_empty() {
        assert!(plan_copy_writes(period(5, 2025), &[entry("Fuel", 0.0)]).is_empty());
    }

    #[test]
    fn test_batch_outcome_into_result() {
        let ok = BatchOutcome {
            attempted: 12,
            succeeded: 12,
            failed: 0,
            categories: 1,
        };
        assert!(ok.into_result().is_ok());

        let partial = BatchOutcome {
            attempted: 12,
            succeeded: 11,
            failed: 1,
            categories: 1,
        };
        let err = partial.into_result().unwrap_err();
        assert_eq!(err.to_string(), "1 of 12 budget writes failed");
    }

    #[tokio::test]
    async fn test_save_planned_writes_then_reloads() {
        let server = MockBudgetApi::start().await;
        server.add_transaction(new_tx(
            "2024-11-05",
            TransactionType::Expense,
            "Groceries",
            1500.0,
        ));
        let planner = BudgetPlanner::new(server.client());
        server.clear_requests();

        let entries = planner
            .save_planned(
                period(11, 2024),
                &[("Groceries".to_string(), 6000.0)],
                ApplyScope::TwelveMonths,
            )
            .await
            .unwrap();

        let groceries = entries.iter().find(|e| e.category == "Groceries").unwrap();
        assert_eq!(groceries.planned, 6000.0);
        assert_eq!(groceries.actual, 1500.0);
        assert_eq!(groceries.difference, 4500.0);

        let budgets = server.budgets();
        assert_eq!(budgets.len(), 12);
        let periods = written_periods(&budgets);
        assert_eq!(periods.first(), Some(&(11, 2024)));
        assert_eq!(periods.last(), Some(&(10, 2025)));

        // Exactly one reload, after every write
        let requests = server.requests();
        assert_eq!(requests.len(), 13);
        assert!(requests[..12].iter().all(|r| r == "POST /api/budgets"));
        assert!(requests[12].starts_with("GET /api/analytics/monthly"));
    }

    #[tokio::test]
    async fn test_save_planned_overwrites_existing() {
        let server = MockBudgetApi::start().await;
        server.set_budget("Fuel", 3, 2025, 1000.0);
        let planner = BudgetPlanner::new(server.client());

        planner
            .save_planned(
                period(3, 2025),
                &[("Fuel".to_string(), 2500.0)],
                ApplyScope::CurrentMonth,
            )
            .await
            .unwrap();

        let budgets = server.budgets();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].planned_amount, 2500.0);
    }

    #[tokio::test]
    async fn test_partial_failure_reports_aggregate_and_skips_reload() {
        let server = MockBudgetApi::start().await;
        server.fail_budget_writes_for(2, 2025);
        let planner = BudgetPlanner::new(server.client());
        server.clear_requests();

        let err = planner
            .save_planned(
                period(11, 2024),
                &[("Groceries".to_string(), 6000.0)],
                ApplyScope::TwelveMonths,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::BatchFailed {
                failed: 1,
                attempted: 12
            }
        ));

        // No rollback: the other eleven months were written
        let planned = planned_by_key(&server.budgets());
        assert_eq!(planned.len(), 11);
        assert!(!planned.contains_key(&("Groceries".to_string(), 2, 2025)));
        assert!(server
            .requests()
            .iter()
            .all(|r| !r.contains("/analytics/monthly")));
    }

    #[tokio::test]
    async fn test_copy_to_next_year() {
        let server = MockBudgetApi::start().await;
        server.set_budget("Groceries", 12, 2024, 6000.0);
        server.set_budget("Fuel", 12, 2024, 2000.0);
        let planner = BudgetPlanner::new(server.client());

        let outcome = planner.copy_to_next_year(period(12, 2024)).await.unwrap();
        assert_eq!(outcome.categories, 2);
        assert_eq!(outcome.attempted, 24);
        assert_eq!(outcome.succeeded, 24);

        let planned = planned_by_key(&server.budgets());
        assert_eq!(planned[&("Groceries".to_string(), 1, 2025)], 6000.0);
        assert_eq!(planned[&("Fuel".to_string(), 12, 2025)], 2000.0);
        assert!(!planned.contains_key(&("Fuel".to_string(), 1, 2026)));
    }

    #[tokio::test]
    async fn test_copy_with_nothing_planned_fails() {
        let server = MockBudgetApi::start().await;
        let planner = BudgetPlanner::new(server.client());

        let err = planner.copy_to_next_year(period(6, 2025)).await.unwrap_err();
        assert!(err.to_string().contains("No planned budgets to copy"));
        assert!(server.budgets().is_empty());
    }
}
