//! Report endpoints
//!
//! Every figure here is aggregated by the server.

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::{BudgetEntry, BurnRate, CategoryShare, MonthFlow, TransactionType};
use crate::period::CalendarPeriod;

impl ApiClient {
    /// Actual vs planned per expense category for one month
    pub async fn monthly(&self, period: CalendarPeriod) -> Result<Vec<BudgetEntry>> {
        let builder = self
            .request(Method::GET, "/analytics/monthly")
            .query(&[("month", period.month())])
            .query(&[("year", period.year())]);
        self.send_json(builder).await
    }

    /// Income/expense per calendar month of `year`
    pub async fn yearly(&self, year: i32) -> Result<Vec<MonthFlow>> {
        let builder = self
            .request(Method::GET, "/analytics/yearly")
            .query(&[("year", year)]);
        self.send_json(builder).await
    }

    /// Income/expense for the fiscal year April `start_year` to March `start_year + 1`
    pub async fn fiscal_year(&self, start_year: i32) -> Result<Vec<MonthFlow>> {
        let builder = self
            .request(Method::GET, "/analytics/fiscal-year")
            .query(&[("start_year", start_year)]);
        self.send_json(builder).await
    }

    /// Income/expense for the last `months` months, oldest first
    pub async fn trend(&self, months: u32) -> Result<Vec<MonthFlow>> {
        let builder = self
            .request(Method::GET, "/analytics/trend")
            .query(&[("months", months)]);
        self.send_json(builder).await
    }

    /// Per-category totals and shares for one month, largest first
    pub async fn category_breakdown(
        &self,
        period: CalendarPeriod,
        kind: TransactionType,
    ) -> Result<Vec<CategoryShare>> {
        let builder = self
            .request(Method::GET, "/analytics/category-breakdown")
            .query(&[("month", period.month())])
            .query(&[("year", period.year())])
            .query(&[("type", kind.as_str())]);
        self.send_json(builder).await
    }

    /// Average monthly spend over the last three months and the implied runway
    pub async fn burn_rate(&self) -> Result<BurnRate> {
        self.send_json(self.request(Method::GET, "/analytics/burn-rate"))
            .await
    }
}
