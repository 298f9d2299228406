//! Pure state transition function
//!
//! Given the same state, context and event this always yields the same result; timers
//! and client notifications are returned as effects for the runtime to execute.

use super::rules::{self, Intent};
use super::script::{self, CONTACT_FOLLOW_UP, CONTACT_FOLLOW_UP_OPTIONS};
use super::{ContactMethod, ConversationState, DialogueContext, Effect, Event, Message};

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// No state change, no effects
    pub fn unchanged(state: &ConversationState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function
pub fn transition(
    state: &ConversationState,
    context: &DialogueContext,
    event: Event,
) -> TransitionResult {
    match event {
        // Whitespace-only input never reaches the transcript
        Event::Utterance { text } if text.trim().is_empty() => TransitionResult::unchanged(state),

        Event::Utterance { text } => {
            let message = Message::user(text.as_str());
            let mut next = state.clone();
            next.transcript.push(message.clone());
            next.awaiting_contact_choice = false;
            next.turn += 1;
            let turn = next.turn;

            TransitionResult::new(next)
                .with_effect(Effect::CancelRestart)
                .with_effect(Effect::notify_message(&message))
                .with_effect(Effect::ScheduleReply {
                    delay: context.reply_delay,
                    turn,
                    text,
                })
        }

        // Every accepted utterance gets its reply, in order
        Event::ReplyDue { turn, text } => respond(state, context, turn, &text),

        Event::RestartDue { turn } if turn == state.turn => {
            let mut next = state.clone();
            next.reset();
            TransitionResult::new(next).with_effect(Effect::NotifyReset)
        }

        // A newer action superseded the farewell
        Event::RestartDue { .. } => TransitionResult::unchanged(state),

        Event::ContactMethodChosen { method } => choose_contact(state, &method),
    }
}

fn respond(
    state: &ConversationState,
    context: &DialogueContext,
    turn: u64,
    text: &str,
) -> TransitionResult {
    let rule = rules::resolve(text);
    let mut next = state.clone();

    match rule.intent {
        Intent::Restart => {
            next.reset();
            TransitionResult::new(next).with_effect(Effect::NotifyReset)
        }
        Intent::End => {
            let farewell = Message::bot_text(script::FAREWELL);
            next.transcript.push(farewell.clone());
            let result =
                TransitionResult::new(next).with_effect(Effect::notify_message(&farewell));

            // The visitor already moved on while this reply was pending
            if turn != state.turn {
                return result;
            }
            result.with_effect(Effect::ScheduleRestart {
                delay: context.restart_delay,
                turn,
            })
        }
        Intent::Reply(reply) => {
            let message = Message::bot(reply.text(), reply.options().iter().copied());
            next.transcript.push(message.clone());
            TransitionResult::new(next).with_effect(Effect::notify_message(&message))
        }
        Intent::RequestContact => {
            next.awaiting_contact_choice = true;
            TransitionResult::new(next).with_effect(Effect::NotifyContactChoice)
        }
    }
}

fn choose_contact(state: &ConversationState, method: &ContactMethod) -> TransitionResult {
    let message = Message::bot(
        format!("{}\n\n{CONTACT_FOLLOW_UP}", method.contact_text()),
        CONTACT_FOLLOW_UP_OPTIONS.iter().copied(),
    );

    let mut next = state.clone();
    next.transcript.push(message.clone());
    next.awaiting_contact_choice = false;
    // Counts as a visitor action: any pending restart is now stale
    next.turn += 1;

    TransitionResult::new(next)
        .with_effect(Effect::CancelRestart)
        .with_effect(Effect::notify_message(&message))
}
