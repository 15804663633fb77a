//! Server-Sent Events support

use crate::runtime::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    init_event: SseEvent,
    broadcast_rx: tokio::sync::broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Create stream that starts with init event then broadcasts
    let init = futures::stream::once(async move { Ok(sse_event_to_axum(init_event)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(sse_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn sse_event_to_axum(event: SseEvent) -> Event {
    let (event_type, data) = sse_event_payload(event);
    Event::default().event(event_type).data(data.to_string())
}

fn sse_event_payload(event: SseEvent) -> (String, serde_json::Value) {
    match event {
        SseEvent::Init {
            conversation_id,
            round,
        } => (
            "init".to_string(),
            json!({
                "type": "init",
                "conversation_id": conversation_id,
                "round": round
            }),
        ),
        SseEvent::Activity { activity } => (
            "activity".to_string(),
            json!({
                "type": "activity",
                "activity": activity
            }),
        ),
        SseEvent::Notify { event_type, data } => (
            event_type.clone(),
            json!({
                "type": event_type,
                "data": data
            }),
        ),
        SseEvent::Error { message } => (
            "error".to_string(),
            json!({
                "type": "error",
                "message": message
            }),
        ),
    }
}
