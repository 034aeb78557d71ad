//! REST-backed implementation of the CallHistorySink port.
//!
//! Targets a PostgREST-style endpoint: a single POST per record into the
//! `call_history` resource, authenticated with an API key sent both as the
//! `apikey` header and a bearer token.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use frontdesk_core::CallHistorySink;
use frontdesk_domain::{CallRecord, FrontdeskError, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

/// Call-history sink writing to a hosted REST table.
pub struct RestCallHistory {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestCallHistory {
    /// `base_url` is the service root; the sink appends the table path.
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/rest/v1/call_history", base_url.as_ref().trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CallHistoryRow<'a> {
    phone_number: Option<&'a str>,
    name: Option<&'a str>,
    meeting_date: Option<String>,
    notes: &'a str,
    created_at: String,
}

#[async_trait]
impl CallHistorySink for RestCallHistory {
    #[instrument(skip(self, record))]
    async fn record(&self, record: &CallRecord) -> Result<()> {
        let row = CallHistoryRow {
            phone_number: record.phone.as_deref(),
            name: record.name.as_deref(),
            meeting_date: record
                .meeting_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            notes: &record.notes,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(|e| FrontdeskError::Storage(format!("history request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".into());
            return Err(FrontdeskError::Storage(format!(
                "history API error ({status}): {error_text}"
            )));
        }

        debug!("call history row posted");
        Ok(())
    }
}
