//! Events that drive the dialogue

use super::script;
use serde::Deserialize;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Typed text or the literal label of a clicked quick reply
    Utterance { text: String },
    /// The typing pause for the utterance accepted at `turn` has elapsed
    ReplyDue { turn: u64, text: String },
    /// The post-farewell pause for `turn` has elapsed
    RestartDue { turn: u64 },
    /// Visitor picked one of the contact buttons
    ContactMethodChosen { method: ContactMethod },
}

impl Event {
    pub fn utterance(text: impl Into<String>) -> Self {
        Event::Utterance { text: text.into() }
    }
}

/// Contact channel offered by the contact sub-dialogue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ContactMethod {
    Call,
    Email,
    LiveChat,
    /// Anything else gets the generic contact line
    Other(String),
}

impl ContactMethod {
    pub fn parse(method: &str) -> Self {
        match method {
            "call" => ContactMethod::Call,
            "email" => ContactMethod::Email,
            "livechat" => ContactMethod::LiveChat,
            other => ContactMethod::Other(other.to_string()),
        }
    }

    pub fn contact_text(&self) -> &'static str {
        match self {
            ContactMethod::Call => script::CONTACT_CALL,
            ContactMethod::Email => script::CONTACT_EMAIL,
            ContactMethod::LiveChat => script::CONTACT_LIVE_CHAT,
            ContactMethod::Other(_) => script::CONTACT_DEFAULT,
        }
    }
}

impl From<String> for ContactMethod {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}
