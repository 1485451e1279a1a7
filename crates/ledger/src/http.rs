//! HTTP ledger client.
//!
//! [`HttpLedger`] POSTs a JSON summary of a win to the configured endpoint.
//! A 2xx answer counts as acceptance unless its JSON body says otherwise
//! (`"success": false` or `"status": "error"`). One attempt per record; there
//! is no retry.

use std::time::Duration;

use async_trait::async_trait;
use lucky_core::record::WinRecord;

use crate::ledger::Ledger;
use crate::LedgerError;

/// HTTP request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reports wins to a remote endpoint over HTTP.
pub struct HttpLedger {
    client: reqwest::Client,
    url: String,
}

impl HttpLedger {
    /// Build a client for `url` with a per-request `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// JSON body sent for one win.
pub fn win_payload(record: &WinRecord) -> serde_json::Value {
    serde_json::json!({
        "event_type": "prize.won",
        "voucher_code": record.id,
        "prize_id": record.prize_id,
        "label": record.label,
        "value": record.value,
        "timestamp": record.timestamp.timestamp_millis(),
        "message": record.message,
    })
}

/// Whether a 2xx response body confirms acceptance.
///
/// Empty or non-JSON bodies count as acceptance; only an explicit negative
/// answer declines.
pub fn body_confirms(body: &str) -> bool {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return true;
    };
    if json.get("success").and_then(|v| v.as_bool()) == Some(false) {
        return false;
    }
    json.get("status").and_then(|v| v.as_str()) != Some("error")
}

#[async_trait]
impl Ledger for HttpLedger {
    async fn log_win(&self, record: &WinRecord) -> Result<bool, LedgerError> {
        let response = self
            .client
            .post(&self.url)
            .json(&win_payload(record))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LedgerError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(body_confirms(&body))
    }
}
