//! Category endpoints

use reqwest::Method;

use super::ApiClient;
use crate::error::{Error, Result};
use crate::models::{Category, MessageResponse, NewCategory, TransactionType};

impl ApiClient {
    /// List categories, optionally only income or only expense
    pub async fn list_categories(&self, kind: Option<TransactionType>) -> Result<Vec<Category>> {
        let mut builder = self.request(Method::GET, "/categories");
        if let Some(kind) = kind {
            builder = builder.query(&[("type", kind.as_str())]);
        }
        self.send_json(builder).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        validate_name(category)?;
        self.send_json(self.request(Method::POST, "/categories").json(category))
            .await
    }

    pub async fn update_category(
        &self,
        id: &str,
        category: &NewCategory,
    ) -> Result<MessageResponse> {
        validate_name(category)?;
        let path = format!("/categories/{}", id);
        self.send_json(self.request(Method::PUT, &path).json(category))
            .await
    }

    /// Delete a user-created category (predefined ones are refused by the server)
    pub async fn delete_category(&self, id: &str) -> Result<MessageResponse> {
        let path = format!("/categories/{}", id);
        self.send_json(self.request(Method::DELETE, &path)).await
    }
}

fn validate_name(category: &NewCategory) -> Result<()> {
    if category.name.trim().is_empty() {
        return Err(Error::InvalidData("category name is required".into()));
    }
    Ok(())
}
