//! Effects produced by state transitions

use super::message::Message;
use std::time::Duration;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Drop the pending post-farewell restart, if any
    CancelRestart,

    /// Deliver `Event::ReplyDue` for `turn` after `delay`; only teardown cancels it
    ScheduleReply {
        delay: Duration,
        turn: u64,
        text: String,
    },

    /// Deliver `Event::RestartDue` for `turn` after `delay`
    ScheduleRestart { delay: Duration, turn: u64 },

    /// A message was appended to the transcript
    NotifyMessage { message: Message },

    /// Transcript was reset to the greeting
    NotifyReset,

    /// Renderer should show the phone/email/chat buttons
    NotifyContactChoice,
}

impl Effect {
    pub fn notify_message(message: &Message) -> Self {
        Effect::NotifyMessage {
            message: message.clone(),
        }
    }
}
