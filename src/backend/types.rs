//! Wire types for the remote services

use crate::dialogue::Message;
use serde::{Deserialize, Serialize};

// ============================================================================
// Assistant
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest<'a> {
    pub user_id: &'a str,
    pub user_input: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub bot_response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantHistory {
    #[serde(default)]
    pub chat_history: Vec<HistoryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRecord {
    pub role: String,
    pub content: String,
    #[serde(default)]
    #[allow(dead_code)] // Order is already chronological
    pub timestamp: Option<i64>,
}

impl HistoryRecord {
    /// `assistant` turns become bot messages, everything else is the visitor
    pub fn into_message(self) -> Message {
        if self.role == "assistant" {
            Message::bot_text(self.content)
        } else {
            Message::user(self.content)
        }
    }
}

// ============================================================================
// Lead capture
// ============================================================================

/// Contact form as filled in by the visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    pub message: String,
}

impl LeadForm {
    /// Name, email and message are required; email must look like one
    pub fn validate(&self) -> Result<(), LeadValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(LeadValidationError::Missing(field));
            }
        }
        if !self.email.contains('@') {
            return Err(LeadValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LeadValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Who submitted the form, captured server-side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: String,
}

/// What is forwarded upstream: the form fields and client info side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadSubmission {
    #[serde(flatten)]
    pub form: LeadForm,
    #[serde(flatten)]
    pub client: ClientInfo,
}

/// Upstream verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LeadForm {
        LeadForm {
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            phone: String::new(),
            company: "Acme".to_string(),
            message: "Need 3 kiosks".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(form().validate(), Ok(()));
    }

    #[test]
    fn test_missing_fields() {
        let mut f = form();
        f.message = "   ".to_string();
        assert_eq!(f.validate(), Err(LeadValidationError::Missing("message")));

        let mut f = form();
        f.name.clear();
        assert_eq!(f.validate(), Err(LeadValidationError::Missing("name")));
    }

    #[test]
    fn test_bad_email() {
        let mut f = form();
        f.email = "dana.example.com".to_string();
        assert!(matches!(
            f.validate(),
            Err(LeadValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_submission_is_flat() {
        let submission = LeadSubmission {
            form: form(),
            client: ClientInfo {
                ip_address: "203.0.113.7".to_string(),
                user_agent: "curl/8".to_string(),
            },
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["name"], "Dana");
        assert_eq!(json["ip_address"], "203.0.113.7");
        assert_eq!(json["user_agent"], "curl/8");
    }

    #[test]
    fn test_history_roles() {
        let bot = HistoryRecord {
            role: "assistant".to_string(),
            content: "hi".to_string(),
            timestamp: None,
        }
        .into_message();
        assert!(bot.is_bot());

        let user = HistoryRecord {
            role: "user".to_string(),
            content: "hello".to_string(),
            timestamp: Some(1),
        }
        .into_message();
        assert!(!user.is_bot());
    }
}
