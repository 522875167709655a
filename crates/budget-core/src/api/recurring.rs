//! Recurring transaction endpoints

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::{
    GenerateResponse, MessageResponse, NewRecurringRule, RecurringRule, ToggleResponse,
};

impl ApiClient {
    pub async fn list_recurring(&self) -> Result<Vec<RecurringRule>> {
        self.send_json(self.request(Method::GET, "/recurring-transactions"))
            .await
    }

    pub async fn create_recurring(&self, rule: &NewRecurringRule) -> Result<RecurringRule> {
        rule.validate()?;
        self.send_json(
            self.request(Method::POST, "/recurring-transactions")
                .json(rule),
        )
        .await
    }

    pub async fn update_recurring(
        &self,
        id: &str,
        rule: &NewRecurringRule,
    ) -> Result<MessageResponse> {
        rule.validate()?;
        let path = format!("/recurring-transactions/{}", id);
        self.send_json(self.request(Method::PUT, &path).json(rule))
            .await
    }

    pub async fn delete_recurring(&self, id: &str) -> Result<MessageResponse> {
        let path = format!("/recurring-transactions/{}", id);
        self.send_json(self.request(Method::DELETE, &path)).await
    }

    /// Flip a rule between active and paused
    pub async fn toggle_recurring(&self, id: &str) -> Result<ToggleResponse> {
        let path = format!("/recurring-transactions/{}/toggle", id);
        self.send_json(self.request(Method::POST, &path)).await
    }

    /// Ask the server to create this month's transactions for active rules
    ///
    /// Idempotent server-side: a rule never produces two transactions for the
    /// same date.
    pub async fn generate_recurring(&self) -> Result<GenerateResponse> {
        self.send_json(self.request(Method::POST, "/recurring-transactions/generate"))
            .await
    }
}
