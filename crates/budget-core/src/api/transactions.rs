//! Transaction endpoints

use reqwest::Method;
use serde_json::Value;
use tracing::warn;

use super::ApiClient;
use crate::error::Result;
use crate::models::{MessageResponse, NewTransaction, Transaction};

impl ApiClient {
    /// Every transaction of the current user, in server order
    ///
    /// Rows the server returns with an unreadable date or shape are skipped
    /// with a warning so one bad import cannot hide the rest.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows: Vec<Value> = self
            .send_json(self.request(Method::GET, "/transactions"))
            .await?;
        Ok(decode_transactions(rows))
    }

    pub async fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate()?;
        self.send_json(self.request(Method::POST, "/transactions").json(tx))
            .await
    }

    pub async fn update_transaction(
        &self,
        id: &str,
        tx: &NewTransaction,
    ) -> Result<MessageResponse> {
        tx.validate()?;
        let path = format!("/transactions/{}", id);
        self.send_json(self.request(Method::PUT, &path).json(tx))
            .await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<MessageResponse> {
        let path = format!("/transactions/{}", id);
        self.send_json(self.request(Method::DELETE, &path)).await
    }

    /// Look up one transaction by id from the full list
    ///
    /// The API has no single-transaction endpoint.
    pub async fn find_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let transactions = self.list_transactions().await?;
        Ok(transactions.into_iter().find(|t| t.id == id))
    }
}

/// Decode list rows one at a time, dropping the ones that do not parse
fn decode_transactions(rows: Vec<Value>) -> Vec<Transaction> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
            match serde_json::from_value::<Transaction>(row) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    warn!("Skipping transaction {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, date: &str) -> Value {
        json!({
            "id": id,
            "date": date,
            "amount": 12.5,
            "description": "Imported",
            "category": "Groceries",
            "type": "expense"
        })
    }

    #[test]
    fn test_malformed_dates_are_skipped() {
        let rows = vec![
            row("a", "2025-01-10"),
            row("b", "15/01/2025"),
            row("c", ""),
            row("d", "2025-02-01"),
        ];
        let ids: Vec<String> = decode_transactions(rows).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let rows = vec![json!({"id": "x", "date": "2025-01-10"}), row("y", "2025-03-03")];
        let txs = decode_transactions(rows);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].id, "y");
    }
}
