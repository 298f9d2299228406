//! Test helpers for driving whole dialogue turns

use super::{transition, ConversationState, DialogueContext, Effect, Event, TransitionResult};

/// Accept `utterance` and resolve its reply immediately, skipping the typing pause.
///
/// Every other effect (notifications, restart scheduling) is kept in order.
pub fn complete_turn(
    state: &ConversationState,
    context: &DialogueContext,
    utterance: &str,
) -> TransitionResult {
    let accepted = transition(state, context, Event::utterance(utterance));

    let mut effects = Vec::with_capacity(accepted.effects.len());
    let mut due = None;
    for effect in accepted.effects {
        match effect {
            Effect::ScheduleReply { turn, text, .. } => due = Some(Event::ReplyDue { turn, text }),
            other => effects.push(other),
        }
    }

    // Empty input: nothing was accepted
    let Some(due) = due else {
        return TransitionResult {
            new_state: accepted.new_state,
            effects,
        };
    };

    let mut replied = transition(&accepted.new_state, context, due);
    effects.append(&mut replied.effects);
    TransitionResult {
        new_state: replied.new_state,
        effects,
    }
}
