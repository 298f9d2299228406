//! Service configuration from the environment

use crate::dialogue::state::{DEFAULT_REPLY_DELAY, DEFAULT_RESTART_DELAY};
use crate::dialogue::DialogueContext;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub reply_delay: Duration,
    pub restart_delay: Duration,
    /// Base URL of the remote assistant (`{base}/api/chat`)
    pub chat_backend_url: Option<String>,
    /// Base URL of the lead-capture backend (`{base}/api/contact/submit`)
    pub lead_backend_url: Option<String>,
    pub http_timeout: Duration,
    /// Sessions untouched this long with no open stream are closed
    pub session_idle_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            reply_delay: DEFAULT_REPLY_DELAY,
            restart_delay: DEFAULT_RESTART_DELAY,
            chat_backend_url: None,
            lead_backend_url: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable numbers fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_millis)
        };
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_secs)
        };
        let url = |key: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            port: lookup("VISITOR_ASSIST_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            reply_delay: millis("VISITOR_ASSIST_REPLY_DELAY_MS", defaults.reply_delay),
            restart_delay: millis("VISITOR_ASSIST_RESTART_DELAY_MS", defaults.restart_delay),
            chat_backend_url: url("VISITOR_ASSIST_CHAT_BACKEND_URL"),
            lead_backend_url: url("VISITOR_ASSIST_LEAD_BACKEND_URL"),
            http_timeout: secs("VISITOR_ASSIST_HTTP_TIMEOUT_SECS", defaults.http_timeout),
            session_idle_timeout: secs(
                "VISITOR_ASSIST_SESSION_IDLE_SECS",
                defaults.session_idle_timeout,
            ),
        }
    }

    pub fn dialogue_context(&self) -> DialogueContext {
        DialogueContext::new(self.reply_delay, self.restart_delay)
    }
}
