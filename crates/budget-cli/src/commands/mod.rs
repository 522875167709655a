//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `auth` - Session commands (signup, login, logout, whoami)
//! - `budget` - Monthly budget table, planned amounts, copy forward
//! - `categories` - Category management commands
//! - `recurring` - Recurring transaction commands
//! - `reports` - Yearly, fiscal-year, trend, breakdown and burn-rate reports
//! - `settings` - Currency setting
//! - `transactions` - Transaction commands (list, add, edit, delete)
//! - `transfer` - CSV import/export and templates

pub mod auth;
pub mod budget;
pub mod categories;
pub mod recurring;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod transfer;

// Re-export command functions for main.rs
pub use auth::*;
pub use budget::*;
pub use categories::*;
pub use recurring::*;
pub use reports::*;
pub use settings::*;
pub use transactions::*;
pub use transfer::*;

use anyhow::{bail, Context, Result};
use budget_core::models::TransactionType;
use budget_core::{ApiClient, CalendarPeriod, ClientConfig, SessionStore};
use chrono::NaiveDate;
use tracing::debug;

/// An authenticated client plus display defaults
pub struct ApiContext {
    pub client: ApiClient,
    pub currency_fallback: String,
}

impl ApiContext {
    pub fn new(client: ApiClient, currency_fallback: &str) -> Self {
        Self {
            client,
            currency_fallback: currency_fallback.to_string(),
        }
    }

    /// The user's currency symbol, or the configured fallback if settings can't be read
    pub async fn currency(&self) -> String {
        match self.client.settings().await {
            Ok(settings) => settings.currency,
            Err(e) => {
                debug!("Using fallback currency: {}", e);
                self.currency_fallback.clone()
            }
        }
    }
}

/// Load config, letting `--api-url` override everything else
pub fn load_config(api_url: Option<&str>) -> Result<ClientConfig> {
    let config = ClientConfig::load().context("Failed to load client config")?;
    Ok(match api_url {
        Some(url) => config.with_api_url(url),
        None => config,
    })
}

/// Client without credentials (login, signup)
pub fn open_anonymous(config: &ClientConfig) -> Result<ApiClient> {
    ApiClient::from_config(config).context("Failed to create API client")
}

/// Client carrying the stored session token
pub fn open_client(config: &ClientConfig, store: &SessionStore) -> Result<ApiContext> {
    let session = store
        .load()
        .context("Failed to read session")?
        .ok_or_else(|| {
            anyhow::anyhow!("Not logged in. Run: budget login --email <email> --password <password>")
        })?;
    let client = open_anonymous(config)?.with_token(session.token);
    Ok(ApiContext::new(client, &config.currency_fallback))
}

/// Month/year flags, each defaulting to today's
pub fn resolve_period(month: Option<u32>, year: Option<i32>) -> Result<CalendarPeriod> {
    let current = CalendarPeriod::current();
    CalendarPeriod::new(
        month.unwrap_or(current.month()),
        year.unwrap_or(current.year()),
    )
    .context("Invalid --month")
}

/// Parse a YYYY-MM-DD flag, defaulting to today
pub fn parse_date(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn parse_kind(value: &str) -> Result<TransactionType> {
    match value.parse::<TransactionType>() {
        Ok(kind) => Ok(kind),
        Err(e) => bail!("{} (use income or expense)", e),
    }
}

/// Format an amount with the currency symbol
pub fn money(currency: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", currency, amount.abs())
    } else {
        format!("{}{:.2}", currency, amount)
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
