//! Property-based tests for the dialogue reducer
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::rules::{resolve, Intent, Reply};
use super::state::seed_message;
use super::testing::complete_turn;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Every label the bot can offer, plus the restart and end keys
fn arb_known_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Main Options"),
        Just("New Question"),
        Just("Start Over"),
        Just("No, I'm done"),
        Just("No, thank you"),
        Just("Product Information"),
        Just("Pricing Questions"),
        Just("Technical Support"),
        Just("Account Help"),
        Just("Feature Details"),
        Just("No, thanks"),
        Just("No, I need more help"),
        Just("Contact Support"),
        Just("Yes, another question"),
        Just("Schedule Demo"),
    ]
    .prop_map(String::from)
}

fn arb_free_text() -> impl Strategy<Value = String> {
    "[a-zA-Z ,']{0,30}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![arb_known_label(), arb_free_text()]
}

fn arb_contact_method() -> impl Strategy<Value = ContactMethod> {
    prop_oneof![
        Just(ContactMethod::Call),
        Just(ContactMethod::Email),
        Just(ContactMethod::LiveChat),
        "[a-z]{1,8}".prop_map(|m| ContactMethod::parse(&m)),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::Utterance { text }),
        (0u64..6, arb_text()).prop_map(|(turn, text)| Event::ReplyDue { turn, text }),
        (0u64..6).prop_map(|turn| Event::RestartDue { turn }),
        arb_contact_method().prop_map(|method| Event::ContactMethodChosen { method }),
    ]
}

fn ctx() -> DialogueContext {
    DialogueContext::default()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Options only ever hang off bot messages, and the seed is always first
    #[test]
    fn prop_options_only_on_bot_messages(events in proptest::collection::vec(arb_event(), 0..25)) {
        let mut state = ConversationState::new();
        for event in events {
            state = transition(&state, &ctx(), event).new_state;
            prop_assert_eq!(&state.transcript[0], &seed_message());
            for message in &state.transcript {
                prop_assert!(message.is_bot() || message.options().is_empty());
            }
        }
    }

    // Apart from resets, the transcript only grows and never rewrites history
    #[test]
    fn prop_transcript_append_only(events in proptest::collection::vec(arb_event(), 0..25)) {
        let mut state = ConversationState::new();
        for event in events {
            let result = transition(&state, &ctx(), event);
            let reset = result.effects.contains(&Effect::NotifyReset);
            if !reset {
                prop_assert!(result.new_state.transcript.len() >= state.transcript.len());
                prop_assert_eq!(
                    &result.new_state.transcript[..state.transcript.len()],
                    &state.transcript[..]
                );
            } else {
                prop_assert!(result.new_state.is_seeded());
            }
            state = result.new_state;
        }
    }

    // The turn counter never goes backwards
    #[test]
    fn prop_turn_monotonic(events in proptest::collection::vec(arb_event(), 0..25)) {
        let mut state = ConversationState::new();
        for event in events {
            let next = transition(&state, &ctx(), event).new_state;
            prop_assert!(next.turn >= state.turn);
            state = next;
        }
    }

    // Scheduled continuations always target the turn that produced them
    #[test]
    fn prop_schedules_target_current_turn(events in proptest::collection::vec(arb_event(), 0..25)) {
        let mut state = ConversationState::new();
        for event in events {
            let result = transition(&state, &ctx(), event);
            for effect in &result.effects {
                match effect {
                    Effect::ScheduleReply { turn, .. } | Effect::ScheduleRestart { turn, .. } => {
                        prop_assert_eq!(*turn, result.new_state.turn);
                    }
                    _ => {}
                }
            }
            state = result.new_state;
        }
    }

    // Restart keys reset regardless of history
    #[test]
    fn prop_restart_from_anywhere(
        history in proptest::collection::vec(arb_text(), 0..10),
        trigger in prop_oneof![Just("Main Options"), Just("New Question"), Just("Start Over")],
    ) {
        let mut state = ConversationState::new();
        for text in &history {
            state = complete_turn(&state, &ctx(), text).new_state;
        }
        let result = complete_turn(&state, &ctx(), trigger);
        prop_assert!(result.new_state.is_seeded());
        prop_assert!(!result.new_state.awaiting_contact_choice);
    }

    // Every accepted turn produces exactly one user message and at most one bot message
    #[test]
    fn prop_turn_shape(text in arb_text()) {
        prop_assume!(!text.trim().is_empty());
        let before = ConversationState::new();
        let after = complete_turn(&before, &ctx(), &text).new_state;

        match resolve(&text).intent {
            Intent::Restart => prop_assert!(after.is_seeded()),
            Intent::RequestContact => {
                prop_assert_eq!(after.transcript.len(), before.transcript.len() + 1);
                prop_assert!(after.awaiting_contact_choice);
            }
            Intent::End | Intent::Reply(_) => {
                prop_assert_eq!(after.transcript.len(), before.transcript.len() + 2);
                prop_assert!(after.transcript[1].author() == Author::User);
                prop_assert!(after.transcript[2].is_bot());
            }
        }
    }

    // Unrecognised text always gets the same fallback
    #[test]
    fn prop_fallback_total(text in "[xyzq]{3,12}") {
        let after = complete_turn(&ConversationState::new(), &ctx(), &text).new_state;
        let reply = after.last_message().unwrap();
        prop_assert_eq!(reply.text(), Reply::Fallback.text());
        prop_assert_eq!(reply.options(), ["Main Options", "Contact Support"]);
    }
}
