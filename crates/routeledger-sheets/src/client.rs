//! Minimal Google Sheets v4 values client.
//!
//! Only two calls are needed: reading the target range to see whether the
//! sheet is empty, and appending a row. Token acquisition happens outside
//! this crate; the client receives a ready bearer token via [`SheetsConfig`].

use std::time::Duration;

use reqwest::{Client, Response, Url};
use routeledger_core::SheetsConfig;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::SheetsError;
use crate::sink::RowSink;

pub struct SheetsClient {
    client: Client,
    access_token: String,
    values_url: Url,
    append_url: Url,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsClient {
    /// Creates a client bound to one spreadsheet range.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidBaseUrl`] if the base
    /// URL does not parse.
    pub fn new(config: &SheetsConfig) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let values_url = build_values_url(&config.base_url, &config.spreadsheet_id, &config.range)?;
        let append_range = format!("{}:append", config.range);
        let mut append_url = build_values_url(&config.base_url, &config.spreadsheet_id, &append_range)?;
        append_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            values_url,
            append_url,
        })
    }

    /// Returns `true` when the configured range holds no values.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::Deserialize`] if the body is not a value range.
    pub async fn is_empty(&self) -> Result<bool, SheetsError> {
        let response = self
            .client
            .get(self.values_url.clone())
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let body = check_status(response).await?;
        let range: ValueRange =
            serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                context: self.values_url.to_string(),
                source: e,
            })?;
        Ok(range.values.iter().all(Vec::is_empty))
    }

    /// Appends `cells` as a single row.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SheetsError::Http`] on network failure.
    pub async fn append(&self, cells: &[Value]) -> Result<(), SheetsError> {
        let response = self
            .client
            .post(self.append_url.clone())
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [cells] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

impl RowSink for SheetsClient {
    async fn ensure_header(&self, header: &[&str]) -> Result<bool, SheetsError> {
        if !self.is_empty().await? {
            return Ok(false);
        }
        let cells: Vec<Value> = header.iter().map(|h| json!(h)).collect();
        self.append(&cells).await?;
        tracing::info!("sheet was empty; header row written");
        Ok(true)
    }

    async fn append_row(&self, cells: &[Value]) -> Result<(), SheetsError> {
        self.append(cells).await
    }
}

async fn check_status(response: Response) -> Result<String, SheetsError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(SheetsError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}

/// `{base}/v4/spreadsheets/{id}/values/{last}` with each segment percent-encoded.
fn build_values_url(base: &str, spreadsheet_id: &str, last: &str) -> Result<Url, SheetsError> {
    let invalid = |reason: String| SheetsError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let mut url = Url::parse(base.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["v4", "spreadsheets", spreadsheet_id, "values", last]);
    Ok(url)
}
