//! Planned budget endpoints

use reqwest::Method;

use super::ApiClient;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetWrite, MessageResponse};

impl ApiClient {
    /// Stored planned amounts, optionally narrowed to a month and/or year
    pub async fn list_budgets(&self, month: Option<u32>, year: Option<i32>) -> Result<Vec<Budget>> {
        let mut builder = self.request(Method::GET, "/budgets");
        if let Some(month) = month {
            builder = builder.query(&[("month", month)]);
        }
        if let Some(year) = year {
            builder = builder.query(&[("year", year)]);
        }
        self.send_json(builder).await
    }

    /// Create or overwrite the planned amount for one (category, month, year)
    pub async fn save_budget(&self, write: &BudgetWrite) -> Result<MessageResponse> {
        if !write.planned_amount.is_finite() || write.planned_amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "planned amount must be a non-negative number, got {}",
                write.planned_amount
            )));
        }
        self.send_json(self.request(Method::POST, "/budgets").json(write))
            .await
    }
}
