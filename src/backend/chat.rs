//! HTTP assistant client

use super::types::{AssistantHistory, AssistantReply, AssistantRequest, HistoryRecord};
use super::{BackendError, ChatBackend};
use crate::dialogue::Message;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Talks to `POST {base}/api/chat` and `GET {base}/api/chat/history`
pub struct HttpChatBackend {
    client: Client,
    endpoint: String,
}

impl HttpChatBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(BackendError::from_status(status, &body));
        }
        Ok(body)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, user_id: &str, text: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AssistantRequest {
                user_id,
                user_input: text,
            })
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(&e))?;

        let body = Self::read_body(response).await?;
        let reply: AssistantReply = serde_json::from_str(&body)
            .map_err(|e| BackendError::decode(format!("Failed to parse reply: {e}")))?;
        Ok(reply.bot_response)
    }

    async fn history(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>, BackendError> {
        let response = self
            .client
            .get(format!("{}/history", self.endpoint))
            .query(&[
                ("userId", user_id.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(&e))?;

        let body = Self::read_body(response).await?;
        let history: AssistantHistory = serde_json::from_str(&body)
            .map_err(|e| BackendError::decode(format!("Failed to parse history: {e}")))?;

        Ok(history
            .chat_history
            .into_iter()
            .map(HistoryRecord::into_message)
            .collect())
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
