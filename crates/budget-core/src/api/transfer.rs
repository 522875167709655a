//! CSV import upload and export download

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;

use super::ApiClient;
use crate::error::{Error, Result};
use crate::models::ImportReport;

impl ApiClient {
    /// Upload a CSV file from disk
    ///
    /// The file name must end in `.csv`; this is checked before anything is sent.
    pub async fn import_csv_file(&self, path: &Path) -> Result<ImportReport> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidData(format!("Invalid file path: {}", path.display())))?
            .to_string();
        ensure_csv_name(&file_name)?;
        let bytes = tokio::fs::read(path).await?;
        self.import_csv(&file_name, bytes).await
    }

    /// Upload CSV content as the multipart field `file`
    pub async fn import_csv(&self, file_name: &str, bytes: Vec<u8>) -> Result<ImportReport> {
        ensure_csv_name(file_name)?;
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let report: ImportReport = self
            .send_json(self.request(Method::POST, "/import/csv").multipart(form))
            .await?;
        info!(
            "Imported {} transactions from {} ({} rows rejected)",
            report.imported,
            file_name,
            report.error_count()
        );
        Ok(report)
    }

    /// Download all transactions as CSV, or only one fiscal year (April to March)
    pub async fn export_csv(&self, fiscal_year: Option<i32>) -> Result<String> {
        let mut builder = self.request(Method::GET, "/export/csv");
        if let Some(year) = fiscal_year {
            builder = builder.query(&[("fiscal_year", year)]);
        }
        self.send_text(builder).await
    }
}

/// File name the export is saved under by default
pub fn export_file_name(fiscal_year: Option<i32>) -> String {
    match fiscal_year {
        Some(year) => format!("transactions_FY{}.csv", year),
        None => "transactions.csv".to_string(),
    }
}

fn ensure_csv_name(file_name: &str) -> Result<()> {
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(Error::InvalidData(format!(
            "Please upload a CSV file (got {})",
            file_name
        )));
    }
    Ok(())
}
