//! Conversation state types

use super::message::Message;
use super::script::GREETING;
use serde::Serialize;
use std::time::Duration;

/// Default pause before the bot answers, simulating typing
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(800);

/// Default pause between the farewell and the automatic restart
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(2000);

/// Where the dialogue currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Ready for the next utterance
    Idle,
    /// Waiting for the visitor to pick phone, email or live chat
    AwaitingContactChoice,
}

/// State of one chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationState {
    /// Full history, oldest first
    pub transcript: Vec<Message>,
    pub awaiting_contact_choice: bool,
    /// Number of visitor actions (utterances, contact choices) accepted so far.
    ///
    /// Survives restarts. A scheduled restart carries the turn it was scheduled for
    /// and is dropped once a newer action has arrived.
    pub turn: u64,
}

impl ConversationState {
    /// Fresh conversation holding only the greeting
    pub fn new() -> Self {
        Self {
            transcript: vec![seed_message()],
            awaiting_contact_choice: false,
            turn: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.awaiting_contact_choice {
            Phase::AwaitingContactChoice
        } else {
            Phase::Idle
        }
    }

    /// True when the transcript is exactly the seeded greeting
    pub fn is_seeded(&self) -> bool {
        self.transcript.len() == 1 && self.transcript[0] == seed_message()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.transcript.last()
    }

    /// Reset to the greeting, keeping the turn counter
    pub(crate) fn reset(&mut self) {
        self.transcript = vec![seed_message()];
        self.awaiting_contact_choice = false;
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// The single bot message every new or restarted conversation starts with
pub fn seed_message() -> Message {
    Message::bot(GREETING.text, GREETING.options.iter().copied())
}

/// Pacing configuration (immutable for the life of a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueContext {
    pub reply_delay: Duration,
    pub restart_delay: Duration,
}

impl DialogueContext {
    pub fn new(reply_delay: Duration, restart_delay: Duration) -> Self {
        Self {
            reply_delay,
            restart_delay,
        }
    }
}

impl Default for DialogueContext {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY, DEFAULT_RESTART_DELAY)
    }
}
