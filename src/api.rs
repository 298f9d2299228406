//! HTTP API consumed by the chat widget and the contact page

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::backend::{ChatBackend, LeadBackend};
use crate::runtime::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    /// Remote assistant, if configured
    pub assistant: Option<Arc<dyn ChatBackend>>,
    /// Lead-capture service, if configured
    pub leads: Option<Arc<dyn LeadBackend>>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self {
            sessions,
            assistant: None,
            leads: None,
        }
    }

    pub fn with_assistant(mut self, assistant: Arc<dyn ChatBackend>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    pub fn with_leads(mut self, leads: Arc<dyn LeadBackend>) -> Self {
        self.leads = Some(leads);
        self
    }
}
