//! HTTP client for the budget planner REST API
//!
//! All aggregation, persistence and CSV parsing happen server-side; this client
//! only moves typed values across the wire. Endpoint methods are grouped by
//! resource:
//! - `auth` - signup, login, current user
//! - `categories` - category CRUD
//! - `transactions` - transaction CRUD
//! - `budgets` - planned amount reads and upserts
//! - `analytics` - monthly/yearly/fiscal/trend/breakdown/burn-rate reports
//! - `recurring` - recurring rule CRUD, toggle, generation
//! - `settings` - display currency
//! - `transfer` - CSV import upload and export download
//!
//! Error bodies follow the `{"detail": "..."}` convention. 401 maps to
//! [`Error::Unauthorized`], 404 to [`Error::NotFound`], any other non-2xx
//! status to [`Error::Api`].

mod analytics;
mod auth;
mod budgets;
mod categories;
mod recurring;
mod settings;
mod transactions;
mod transfer;


pub use transfer::export_file_name;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Async client for one API base URL
///
/// Cloning is cheap (the underlying connection pool is shared), which lets
/// batch operations hand a copy to each spawned write.
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client with default HTTP settings
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create a client honouring the configured URL and timeout
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to every subsequent request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, adding the bearer token when one is set
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let builder = self.http_client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON response body
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Send a request and return the raw response body
    async fn send_text(&self, builder: RequestBuilder) -> Result<String> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.text().await?)
    }
}

/// Turn a non-2xx response into the matching error
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    debug!("API error {}: {}", status, detail);

    Err(match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(detail),
        StatusCode::NOT_FOUND => Error::NotFound(detail),
        _ => Error::Api {
            status: status.as_u16(),
            detail,
        },
    })
}

/// Pull a readable message out of an error body
///
/// `detail` is a string for application errors and a list of objects for
/// request validation errors; anything else falls back to the raw body.
fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(trimmed.to_string()),
        },
        Err(_) => Some(trimmed.to_string()),
    }
}
