//! HTTP lead-capture client

use super::types::{LeadOutcome, LeadSubmission};
use super::{BackendError, LeadBackend};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Forwards contact-form submissions to `POST {base}/api/contact/submit`
pub struct HttpLeadBackend {
    client: Client,
    endpoint: String,
}

impl HttpLeadBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/contact/submit", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl LeadBackend for HttpLeadBackend {
    async fn submit(&self, submission: &LeadSubmission) -> Result<LeadOutcome, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(submission)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            // The lead service explains rejections in a `message` field
            let reason = serde_json::from_str::<LeadOutcome>(&body)
                .ok()
                .and_then(|o| o.message)
                .unwrap_or(body);
            return Err(BackendError::from_status(status, &reason));
        }

        let outcome: LeadOutcome = serde_json::from_str(&body)
            .map_err(|e| BackendError::decode(format!("Failed to parse lead response: {e}")))?;

        tracing::info!(
            endpoint = %self.endpoint,
            success = outcome.success,
            "Lead submitted"
        );
        Ok(outcome)
    }
}
