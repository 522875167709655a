//! Settings endpoints

use reqwest::Method;

use super::ApiClient;
use crate::error::{Error, Result};
use crate::models::{MessageResponse, Settings};

impl ApiClient {
    pub async fn settings(&self) -> Result<Settings> {
        self.send_json(self.request(Method::GET, "/settings")).await
    }

    /// Change the display currency symbol (sent as a query parameter)
    pub async fn update_currency(&self, currency: &str) -> Result<MessageResponse> {
        if currency.trim().is_empty() {
            return Err(Error::InvalidData("currency symbol is required".into()));
        }
        let builder = self
            .request(Method::PUT, "/settings")
            .query(&[("currency", currency.trim())]);
        self.send_json(builder).await
    }
}
