//! Session runtime executor

use super::ClientEvent;
use crate::dialogue::{transition, ConversationState, DialogueContext, Effect, Event};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Owns one conversation and executes the effects its transitions produce
pub struct SessionRuntime {
    session_id: String,
    context: DialogueContext,
    state: ConversationState,
    event_rx: mpsc::Receiver<Event>,
    /// Cloned into timer tasks so they can deliver their continuation
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ClientEvent>,
    state_tx: watch::Sender<ConversationState>,
    /// Cancelled when the session is closed; parent of every timer
    shutdown: CancellationToken,
    /// Guards the post-farewell restart; replaced on `Effect::CancelRestart`
    restart: CancellationToken,
}

impl SessionRuntime {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: String,
        context: DialogueContext,
        state: ConversationState,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<ClientEvent>,
        state_tx: watch::Sender<ConversationState>,
        shutdown: CancellationToken,
    ) -> Self {
        let restart = shutdown.child_token();
        Self {
            session_id,
            context,
            state,
            event_rx,
            event_tx,
            broadcast_tx,
            state_tx,
            shutdown,
            restart,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting session runtime");

        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event),
                    None => break,
                },
            }
        }

        // Teardown: nothing scheduled may touch the discarded state
        self.shutdown.cancel();
        tracing::info!(session_id = %self.session_id, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        tracing::debug!(session_id = %self.session_id, event = ?event, "Processing event");

        // Pure state transition
        let result = transition(&self.state, &self.context, event);

        if result.new_state != self.state {
            self.state = result.new_state;
            self.state_tx.send_replace(self.state.clone());
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CancelRestart => {
                self.restart.cancel();
                self.restart = self.shutdown.child_token();
            }

            Effect::ScheduleReply { delay, turn, text } => {
                let cancel = self.shutdown.child_token();
                self.schedule(delay, Event::ReplyDue { turn, text }, cancel);
            }

            Effect::ScheduleRestart { delay, turn } => {
                tracing::info!(
                    session_id = %self.session_id,
                    delay_ms = %delay.as_millis(),
                    "Conversation ended, restart scheduled"
                );
                let cancel = self.restart.clone();
                self.schedule(delay, Event::RestartDue { turn }, cancel);
            }

            Effect::NotifyMessage { message } => {
                let _ = self.broadcast_tx.send(ClientEvent::Message { message });
            }

            Effect::NotifyReset => {
                let _ = self.broadcast_tx.send(ClientEvent::Reset {
                    state: self.state.clone(),
                });
            }

            Effect::NotifyContactChoice => {
                let _ = self.broadcast_tx.send(ClientEvent::ContactChoice);
            }
        }
    }

    /// Deliver `event` back to this runtime after `delay` unless `cancel` fires first
    fn schedule(&self, delay: Duration, event: Event, cancel: CancellationToken) {
        let event_tx = self.event_tx.clone();
        let session_id = self.session_id.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tracing::debug!(session_id = %session_id, "Delayed continuation cancelled");
                }

                () = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(event).await;
                }
            }
        });
    }
}
