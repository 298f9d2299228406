//! Clients for the remote services the widget talks to
//!
//! The "smart" assistant answers free-form questions; the lead backend stores contact
//! form submissions. Both are plain JSON-over-HTTP services.

mod chat;
mod error;
mod leads;
mod types;

pub use chat::HttpChatBackend;
pub use error::{BackendError, BackendErrorKind};
pub use leads::HttpLeadBackend;
pub use types::*;

use crate::dialogue::Message;
use async_trait::async_trait;
use std::sync::Arc;

/// Default page size for assistant history
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Remote conversational assistant
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one user turn and return the assistant's reply
    async fn send_message(&self, user_id: &str, text: &str) -> Result<String, BackendError>;

    /// Page through a user's past exchanges, oldest first
    async fn history(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>, BackendError>;

    /// Where requests go (for logging)
    fn endpoint(&self) -> &str;
}

/// Lead-capture service
#[async_trait]
pub trait LeadBackend: Send + Sync {
    async fn submit(&self, submission: &LeadSubmission) -> Result<LeadOutcome, BackendError>;
}

/// Logging wrapper for chat backends
pub struct LoggingBackend {
    inner: Arc<dyn ChatBackend>,
    endpoint: String,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn ChatBackend>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl ChatBackend for LoggingBackend {
    async fn send_message(&self, user_id: &str, text: &str) -> Result<String, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.send_message(user_id, text).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    reply_chars = reply.chars().count(),
                    "Assistant request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Assistant request failed"
                );
            }
        }

        result
    }

    async fn history(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>, BackendError> {
        let result = self.inner.history(user_id, limit, offset).await;
        if let Err(e) = &result {
            tracing::warn!(
                endpoint = %self.endpoint,
                error = %e.message,
                "Assistant history request failed"
            );
        }
        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
