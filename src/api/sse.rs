//! Server-Sent Events support

use crate::runtime::ClientEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    init_event: ClientEvent,
    broadcast_rx: tokio::sync::broadcast::Receiver<ClientEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Create stream that starts with init event then broadcasts
    let init = futures::stream::once(async move { Ok(client_event_to_axum(init_event)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).map(|result| {
        let event = match result {
            Ok(event) => event,
            // Renderer should refetch the snapshot
            Err(BroadcastStreamRecvError::Lagged(missed)) => ClientEvent::Error {
                message: format!("missed {missed} events"),
            },
        };
        Ok(client_event_to_axum(event))
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn client_event_to_axum(event: ClientEvent) -> Event {
    let (event_type, data) = match event {
        ClientEvent::Init { state } => (
            "init",
            json!({
                "type": "init",
                "phase": state.phase(),
                "state": state
            }),
        ),
        ClientEvent::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        ClientEvent::ContactChoice => (
            "contact_choice",
            json!({
                "type": "contact_choice",
                "methods": ["call", "email", "livechat"]
            }),
        ),
        ClientEvent::Reset { state } => (
            "reset",
            json!({
                "type": "reset",
                "state": state
            }),
        ),
        ClientEvent::Error { message } => (
            "error",
            json!({
                "type": "error",
                "message": message
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}
