//! Visitor Assist - help-desk chat backend
//!
//! Hosts the canned decision-tree chatbot for the visitor-management site, one
//! session runtime per open chat widget, plus proxies to the remote assistant and
//! the lead-capture service.

mod api;
mod backend;
mod config;
mod dialogue;
mod runtime;

use api::{create_router, AppState};
use backend::{HttpChatBackend, HttpLeadBackend, LoggingBackend};
use config::Config;
use runtime::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visitor_assist=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        reply_delay_ms = %config.reply_delay.as_millis(),
        restart_delay_ms = %config.restart_delay.as_millis(),
        session_idle_secs = config.session_idle_timeout.as_secs(),
        "Dialogue timing configured"
    );

    let sessions = SessionManager::new(config.dialogue_context(), config.session_idle_timeout);
    let mut state = AppState::new(sessions);

    // Remote assistant
    if let Some(url) = &config.chat_backend_url {
        let client = HttpChatBackend::new(url, config.http_timeout)?;
        tracing::info!(url = %url, "Assistant backend configured");
        state = state.with_assistant(Arc::new(LoggingBackend::new(Arc::new(client))));
    } else {
        tracing::warn!(
            "No assistant backend configured. Set VISITOR_ASSIST_CHAT_BACKEND_URL to enable /api/assistant."
        );
    }

    // Lead capture
    if let Some(url) = &config.lead_backend_url {
        let client = HttpLeadBackend::new(url, config.http_timeout)?;
        tracing::info!(url = %url, "Lead backend configured");
        state = state.with_leads(Arc::new(client));
    } else {
        tracing::warn!(
            "No lead backend configured. Set VISITOR_ASSIST_LEAD_BACKEND_URL to enable /api/contact/submit."
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
