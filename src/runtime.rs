//! Runtime for live chat sessions
//!
//! Each open chat widget gets its own `SessionRuntime` task that owns the
//! `ConversationState`, feeds events through the pure dialogue reducer and runs the
//! resulting timer effects. The `SessionManager` keeps handles to every live session.

mod executor;

use executor::SessionRuntime;

use crate::dialogue::{ContactMethod, ConversationState, DialogueContext, Event, Message};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Events pushed to connected renderers
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Full snapshot, sent first on every new stream
    Init { state: ConversationState },
    Message { message: Message },
    /// Renderer should show the phone/email/chat buttons
    ContactChoice,
    /// Transcript went back to the greeting
    Reset { state: ConversationState },
    Error { message: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Session closed: {0}")]
    Closed(String),
}

/// How often the manager looks for abandoned sessions
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub id: String,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ClientEvent>,
    state_rx: watch::Receiver<ConversationState>,
    shutdown: CancellationToken,
}

impl SessionHandle {
    async fn send(&self, event: Event) -> Result<(), SessionError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| SessionError::Closed(self.id.clone()))
    }

    /// Visitor typed and sent `text`
    pub async fn submit_utterance(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Event::utterance(text)).await
    }

    /// Quick replies submit their literal label
    pub async fn select_option(&self, option: impl Into<String>) -> Result<(), SessionError> {
        self.submit_utterance(option).await
    }

    pub async fn select_contact_method(&self, method: ContactMethod) -> Result<(), SessionError> {
        self.send(Event::ContactMethodChosen { method }).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Latest published state
    pub fn snapshot(&self) -> ConversationState {
        self.state_rx.borrow().clone()
    }

    /// Watch channel for the session state
    pub fn state(&self) -> watch::Receiver<ConversationState> {
        self.state_rx.clone()
    }
}

struct SessionEntry {
    handle: SessionHandle,
    last_activity: Instant,
}

impl SessionEntry {
    /// Untouched for `timeout` and nobody is streaming it
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.duration_since(self.last_activity) >= timeout
            && self.handle.broadcast_tx.receiver_count() == 0
    }
}

/// Manager for all chat sessions
pub struct SessionManager {
    context: DialogueContext,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionManager {
    /// Create a manager and start its idle-session sweep
    pub fn new(context: DialogueContext, idle_timeout: Duration) -> Arc<Self> {
        let manager = Arc::new(Self {
            context,
            idle_timeout,
            sessions: RwLock::new(HashMap::new()),
        });

        // Weak reference so the sweep does not keep the manager alive
        let manager_weak = Arc::downgrade(&manager);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(SWEEP_INTERVAL).await;
                let Some(manager) = manager_weak.upgrade() else {
                    tracing::debug!("SessionManager dropped, sweep exiting");
                    break;
                };
                manager.reap_idle().await;
            }
        });

        manager
    }

    /// Start a fresh session holding only the greeting
    pub async fn create(&self) -> SessionHandle {
        let id = uuid::Uuid::new_v4().to_string();
        let initial = ConversationState::new();

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let shutdown = CancellationToken::new();

        let runtime = SessionRuntime::new(
            id.clone(),
            self.context,
            initial,
            event_rx,
            event_tx.clone(),
            broadcast_tx.clone(),
            state_tx,
            shutdown.clone(),
        );

        let session_id = id.clone();
        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(session_id = %session_id, "Session runtime finished");
        });

        let handle = SessionHandle {
            id: id.clone(),
            event_tx,
            broadcast_tx,
            state_rx,
            shutdown,
        };
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_activity: Instant::now(),
            },
        );
        handle
    }

    /// Look a session up, marking it active
    pub async fn get(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        entry.last_activity = Instant::now();
        Ok(entry.handle.clone())
    }

    pub async fn snapshot(&self, session_id: &str) -> Result<ConversationState, SessionError> {
        Ok(self.get(session_id).await?.snapshot())
    }

    /// Tear a session down, cancelling any pending reply or restart
    pub async fn close(&self, session_id: &str) -> Result<(), SessionError> {
        let entry = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        entry.handle.shutdown.cancel();
        tracing::info!(session_id = %session_id, "Session closed");
        Ok(())
    }

    /// Close every session whose widget went away without saying so
    async fn reap_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let idle: Vec<String> = sessions
            .iter()
            .filter(|(_, entry)| entry.is_idle(now, self.idle_timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &idle {
            if let Some(entry) = sessions.remove(id) {
                entry.handle.shutdown.cancel();
                tracing::info!(session_id = %id, "Reaped idle session");
            }
        }
        idle.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
