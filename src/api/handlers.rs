//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ActivitiesResponse, ConversationListResponse, ConversationSummary, ErrorResponse,
    MembersAddedRequest, MessageRequest, RoundResponse, StoryPointsResponse,
};
use super::AppState;
use crate::db::DbError;
use crate::prompt::{self, STORY_POINT_SCALE};
use crate::runtime::{RuntimeError, SseEvent};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Conversation listing
        .route("/api/conversations", get(list_conversations))
        // Inbound traffic from the transport
        .route("/api/conversations/:id/messages", post(post_message))
        .route("/api/conversations/:id/members", post(post_members))
        // Round inspection
        .route("/api/conversations/:id/round", get(get_round))
        // SSE streaming
        .route("/api/conversations/:id/stream", get(stream_conversation))
        // Canonical options for client rendering
        .route("/api/story-points", get(get_story_points))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Inbound Messages
// ============================================================

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<ActivitiesResponse>, AppError> {
    if req.from.id.is_empty() {
        return Err(AppError::BadRequest("Sender id is required".to_string()));
    }

    tracing::debug!(conv_id = %id, from = %req.from.id, "Inbound message");
    let activities = state
        .runtime
        .handle_message(&id, &req.text, req.from)
        .await?;

    Ok(Json(ActivitiesResponse { activities }))
}

async fn post_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MembersAddedRequest>,
) -> Result<Json<ActivitiesResponse>, AppError> {
    let activities = state
        .runtime
        .handle_members_added(&id, req.members)
        .await?;

    Ok(Json(ActivitiesResponse { activities }))
}

// ============================================================
// Conversation Retrieval
// ============================================================

async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ConversationListResponse>, AppError> {
    let conversations = state
        .runtime
        .db()
        .list_conversations()?
        .into_iter()
        .map(|c| ConversationSummary {
            id: c.id,
            round: c.round,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ConversationListResponse { conversations }))
}

async fn get_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoundResponse>, AppError> {
    let conversation = state.runtime.db().get_conversation(&id)?;

    Ok(Json(RoundResponse {
        open: conversation.round.is_open(),
        conversation_id: conversation.id,
        round: conversation.round,
    }))
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Subscribe first so nothing between the snapshot and the stream is lost
    let broadcast_rx = state.runtime.subscribe(&id).await?;
    let conversation = state.runtime.db().get_conversation(&id)?;

    let init_event = SseEvent::Init {
        conversation_id: conversation.id,
        round: serde_json::to_value(&conversation.round).unwrap_or_default(),
    };

    Ok(sse_stream(init_event, broadcast_rx))
}

// ============================================================
// Story Points
// ============================================================

async fn get_story_points() -> Json<StoryPointsResponse> {
    Json(StoryPointsResponse {
        values: STORY_POINT_SCALE.to_vec(),
        actions: prompt::vote_options(),
    })
}

async fn get_version() -> &'static str {
    concat!("story-point-poker ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::ConversationNotFound(_) => AppError::NotFound(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
