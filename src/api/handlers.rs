//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    AssistantChatRequest, AssistantChatResponse, AssistantHistoryResponse, ContactRequest,
    ErrorResponse, OptionRequest, QueuedResponse, SessionResponse, SuccessResponse,
    UtteranceRequest,
};
use super::AppState;
use crate::backend::{
    BackendError, BackendErrorKind, ClientInfo, LeadForm, LeadOutcome, LeadSubmission,
    DEFAULT_HISTORY_LIMIT,
};
use crate::runtime::{ClientEvent, SessionError};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{headers::UserAgent, TypedHeader};
use serde::Deserialize;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat sessions
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:id",
            get(get_session).delete(close_session),
        )
        .route("/api/sessions/:id/stream", get(stream_session))
        // Visitor actions
        .route("/api/sessions/:id/utterance", post(submit_utterance))
        .route("/api/sessions/:id/option", post(select_option))
        .route("/api/sessions/:id/contact", post(select_contact_method))
        // Remote assistant
        .route("/api/assistant/chat", post(assistant_chat))
        .route("/api/assistant/history", get(assistant_history))
        // Lead capture
        .route("/api/contact/submit", post(submit_lead))
        // Version
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================
// Chat Sessions
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let handle = state.sessions.create().await;
    let active = state.sessions.len().await;
    tracing::info!(session_id = %handle.id, active, "Session created");
    Json(SessionResponse::new(handle.id.clone(), handle.snapshot()))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.sessions.snapshot(&id).await?;
    Ok(Json(SessionResponse::new(id, snapshot)))
}

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let handle = state.sessions.get(&id).await?;

    // Subscribe before taking the snapshot so nothing falls in between
    let broadcast_rx = handle.subscribe();
    let init_event = ClientEvent::Init {
        state: handle.snapshot(),
    };

    Ok(sse_stream(init_event, broadcast_rx))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.close(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Visitor Actions
// ============================================================

async fn submit_utterance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UtteranceRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    state.sessions.get(&id).await?.submit_utterance(req.text).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn select_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<OptionRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    state.sessions.get(&id).await?.select_option(req.option).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

async fn select_contact_method(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    state
        .sessions
        .get(&id)
        .await?
        .select_contact_method(req.method)
        .await?;
    Ok(Json(QueuedResponse { queued: true }))
}

// ============================================================
// Remote Assistant
// ============================================================

async fn assistant_chat(
    State(state): State<AppState>,
    Json(req): Json<AssistantChatRequest>,
) -> Result<Json<AssistantChatResponse>, AppError> {
    let assistant = state
        .assistant
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Assistant backend not configured".to_string()))?;

    if req.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id is required".to_string()));
    }
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("text is required".to_string()));
    }

    let bot_response = assistant.send_message(&req.user_id, text).await?;
    Ok(Json(AssistantChatResponse { bot_response }))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    user_id: String,
    limit: Option<u32>,
    offset: Option<u32>,
}

async fn assistant_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<AssistantHistoryResponse>, AppError> {
    let assistant = state
        .assistant
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Assistant backend not configured".to_string()))?;

    let messages = assistant
        .history(
            &query.user_id,
            query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
            query.offset.unwrap_or(0),
        )
        .await?;
    Ok(Json(AssistantHistoryResponse { messages }))
}

// ============================================================
// Lead Capture
// ============================================================

async fn submit_lead(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    user_agent: Option<TypedHeader<UserAgent>>,
    headers: HeaderMap,
    Json(form): Json<LeadForm>,
) -> Result<Json<LeadOutcome>, AppError> {
    form.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let leads = state
        .leads
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Lead backend not configured".to_string()))?;

    let client = ClientInfo {
        ip_address: client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr)),
        user_agent: user_agent
            .map(|TypedHeader(ua)| ua.as_str().to_string())
            .unwrap_or_default(),
    };

    let outcome = leads.submit(&LeadSubmission { form, client }).await?;
    Ok(Json(outcome))
}

/// First `X-Forwarded-For` hop, else the peer address
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("visitor-assist ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Gone(String),
    BadGateway(String),
    Unavailable(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => AppError::NotFound(e.to_string()),
            SessionError::Closed(_) => AppError::Gone(e.to_string()),
        }
    }
}

impl From<BackendError> for AppError {
    fn from(e: BackendError) -> Self {
        match e.kind {
            BackendErrorKind::InvalidRequest => AppError::BadRequest(e.message),
            BackendErrorKind::Network
            | BackendErrorKind::ServerError
            | BackendErrorKind::Decode => AppError::BadGateway(e.message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Gone(msg) => (StatusCode::GONE, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChatBackend, LeadBackend};
    use crate::dialogue::{ConversationState, DialogueContext, Message};
    use crate::runtime::SessionManager;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    // ------------------------------------------------------------
    // Mocks
    // ------------------------------------------------------------

    struct EchoAssistant;

    #[async_trait]
    impl ChatBackend for EchoAssistant {
        async fn send_message(&self, user_id: &str, text: &str) -> Result<String, BackendError> {
            Ok(format!("{user_id}: {text}"))
        }

        async fn history(
            &self,
            _user_id: &str,
            limit: u32,
            _offset: u32,
        ) -> Result<Vec<Message>, BackendError> {
            Ok(vec![Message::user("hi"), Message::bot_text(format!("limit={limit}"))])
        }

        fn endpoint(&self) -> &str {
            "mock://assistant"
        }
    }

    struct DownAssistant;

    #[async_trait]
    impl ChatBackend for DownAssistant {
        async fn send_message(&self, _user_id: &str, _text: &str) -> Result<String, BackendError> {
            Err(BackendError::network("connection refused"))
        }

        async fn history(
            &self,
            _user_id: &str,
            _limit: u32,
            _offset: u32,
        ) -> Result<Vec<Message>, BackendError> {
            Err(BackendError::network("connection refused"))
        }

        fn endpoint(&self) -> &str {
            "mock://down"
        }
    }

    #[derive(Default)]
    struct RecordingLeads {
        submissions: Mutex<Vec<LeadSubmission>>,
    }

    #[async_trait]
    impl LeadBackend for RecordingLeads {
        async fn submit(&self, submission: &LeadSubmission) -> Result<LeadOutcome, BackendError> {
            self.submissions.lock().unwrap().push(submission.clone());
            Ok(LeadOutcome {
                success: true,
                message: Some("Thanks, we'll be in touch".to_string()),
            })
        }
    }

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------

    fn app_state() -> AppState {
        AppState::new(SessionManager::new(
            DialogueContext::new(Duration::ZERO, Duration::ZERO),
            Duration::from_secs(30 * 60),
        ))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn wait_for_len(state: &AppState, id: &str, len: usize) -> ConversationState {
        let handle = state.sessions.get(id).await.unwrap();
        let mut rx = handle.state();
        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.transcript.len() == len),
        )
        .await
        .expect("timed out")
        .expect("runtime stopped");
        snapshot.clone()
    }

    // ------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------

    #[tokio::test]
    async fn test_create_session_returns_greeting() {
        let app = create_router(app_state());
        let (status, body) = call(&app, Method::POST, "/api/sessions", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "idle");
        let transcript = body["state"]["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0]["author"], "bot");
        assert_eq!(transcript[0]["options"][0], "Product Information");
    }

    #[tokio::test]
    async fn test_utterance_flow() {
        let state = app_state();
        let app = create_router(state.clone());
        let (_, created) = call(&app, Method::POST, "/api/sessions", None).await;
        let id = created["session_id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/sessions/{id}/utterance"),
            Some(json!({ "text": "Technical Support" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["queued"], true);

        wait_for_len(&state, &id, 3).await;
        let (_, snapshot) = call(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
        let last = &snapshot["state"]["transcript"][2];
        assert_eq!(
            last["options"],
            json!(["Yes, resolved", "No, I need more help", "Main Options"])
        );
    }

    #[tokio::test]
    async fn test_contact_flow() {
        let state = app_state();
        let app = create_router(state.clone());
        let (_, created) = call(&app, Method::POST, "/api/sessions", None).await;
        let id = created["session_id"].as_str().unwrap().to_string();

        call(
            &app,
            Method::POST,
            &format!("/api/sessions/{id}/option"),
            Some(json!({ "option": "Contact Support" })),
        )
        .await;
        wait_for_len(&state, &id, 2).await;

        let handle = state.sessions.get(&id).await.unwrap();
        let mut rx = handle.state();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.awaiting_contact_choice))
            .await
            .unwrap()
            .unwrap();
        let (_, snapshot) = call(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
        assert_eq!(snapshot["phase"], "awaiting_contact_choice");

        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/api/sessions/{id}/contact"),
            Some(json!({ "method": "livechat" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let done = wait_for_len(&state, &id, 3).await;
        assert!(!done.awaiting_contact_choice);
        assert!(done
            .last_message()
            .unwrap()
            .text()
            .contains("'Contact Us' page"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = create_router(app_state());
        let (status, body) = call(&app, Method::GET, "/api/sessions/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/sessions/nope/utterance",
            Some(json!({ "text": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_close_session() {
        let app = create_router(app_state());
        let (_, created) = call(&app, Method::POST, "/api/sessions", None).await;
        let id = created["session_id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = call(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ------------------------------------------------------------
    // Assistant
    // ------------------------------------------------------------

    #[tokio::test]
    async fn test_assistant_unconfigured_is_503() {
        let app = create_router(app_state());
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/assistant/chat",
            Some(json!({ "user_id": "u-1", "text": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_assistant_proxy() {
        let app = create_router(app_state().with_assistant(Arc::new(EchoAssistant)));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/assistant/chat",
            Some(json!({ "user_id": "u-1", "text": "  hello  " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bot_response"], "u-1: hello");

        let (status, body) = call(
            &app,
            Method::GET,
            "/api/assistant/history?user_id=u-1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][0]["author"], "user");
        assert_eq!(body["messages"][1]["text"], "limit=10");
    }

    #[tokio::test]
    async fn test_assistant_rejects_blank_text() {
        let app = create_router(app_state().with_assistant(Arc::new(EchoAssistant)));
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/assistant/chat",
            Some(json!({ "user_id": "u-1", "text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assistant_upstream_failure_is_502() {
        let app = create_router(app_state().with_assistant(Arc::new(DownAssistant)));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/assistant/chat",
            Some(json!({ "user_id": "u-1", "text": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "connection refused");
    }

    // ------------------------------------------------------------
    // Leads
    // ------------------------------------------------------------

    #[tokio::test]
    async fn test_lead_forwarded_with_client_info() {
        let leads = Arc::new(RecordingLeads::default());
        let app = create_router(app_state().with_leads(leads.clone()));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/contact/submit")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "Mozilla/5.0 test")
            .header("x-forwarded-for", "198.51.100.4, 10.0.0.1")
            .body(Body::from(
                json!({
                    "name": "Dana",
                    "email": "dana@example.com",
                    "message": "Quote for 3 sites"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let submissions = leads.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].client.ip_address, "198.51.100.4");
        assert_eq!(submissions[0].client.user_agent, "Mozilla/5.0 test");
        assert_eq!(submissions[0].form.phone, "");
    }

    #[tokio::test]
    async fn test_invalid_lead_is_400() {
        let leads = Arc::new(RecordingLeads::default());
        let app = create_router(app_state().with_leads(leads.clone()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/contact/submit",
            Some(json!({ "name": "Dana", "email": "not-an-email", "message": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid email"));
        assert!(leads.submissions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.9:51000".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "192.0.2.9");
        assert_eq!(client_ip(&HeaderMap::new(), None), "");
    }

    #[tokio::test]
    async fn test_version() {
        let app = create_router(app_state());
        let response = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).starts_with("visitor-assist "));
    }
}
