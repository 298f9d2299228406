//! Canned-response dialogue engine
//!
//! Implements the help-desk decision tree as a pure reducer: every call takes a
//! `ConversationState` and an `Event` and returns the next state plus the effects
//! (timers, client notifications) the runtime must carry out.

mod effect;
pub mod event;
pub mod message;
pub mod rules;
mod script;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod testing;

pub use effect::Effect;
pub use event::{ContactMethod, Event};
pub use message::{Author, Message};
pub use state::{ConversationState, DialogueContext, Phase};
pub use transition::{transition, TransitionResult};
