//! API request and response types

use crate::dialogue::{ContactMethod, ConversationState, Message, Phase};
use serde::{Deserialize, Serialize};

/// Request to submit typed text
#[derive(Debug, Deserialize)]
pub struct UtteranceRequest {
    pub text: String,
}

/// Request to click a quick reply
#[derive(Debug, Deserialize)]
pub struct OptionRequest {
    pub option: String,
}

/// Request to pick a contact channel
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub method: ContactMethod,
}

/// Session snapshot
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub phase: Phase,
    pub state: ConversationState,
}

impl SessionResponse {
    pub fn new(session_id: impl Into<String>, state: ConversationState) -> Self {
        Self {
            session_id: session_id.into(),
            phase: state.phase(),
            state,
        }
    }
}

/// Response for queued user actions
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Request to the remote assistant
#[derive(Debug, Deserialize)]
pub struct AssistantChatRequest {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantChatResponse {
    pub bot_response: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantHistoryResponse {
    pub messages: Vec<Message>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
