//! Routes for player sessions: the chat transport's entry points.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use odyssey_core::player::PlayerId;
use odyssey_session::application::{command_handlers, query_handlers};
use odyssey_session::domain::commands;
use odyssey_session::domain::values::{Reply, SummaryValue};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::presenter;
use crate::state::AppState;

/// Request body for POST /{player_id}/input.
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    /// The player's raw chat message.
    pub text: String,
}

/// Response body for an accepted player action.
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    /// Chat text to relay to the player.
    pub reply: String,
    /// Structured engine output.
    #[serde(flatten)]
    pub engine: Reply,
}

impl From<Reply> for ReplyResponse {
    fn from(engine: Reply) -> Self {
        Self {
            reply: presenter::render_reply(&engine),
            engine,
        }
    }
}

/// Response body for GET /{player_id}/summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Chat text to relay to the player.
    pub reply: String,
    /// Final counters.
    #[serde(flatten)]
    pub summary: SummaryValue,
}

/// POST /{player_id}/start
#[instrument(skip(state))]
async fn start_session(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
        player_id: PlayerId::new(player_id),
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let reply = command_handlers::handle_start_session(&command, state.game()).await?;

    Ok(Json(reply.into()))
}

/// POST /{player_id}/input
#[instrument(skip(state, request))]
async fn submit_input(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(request): Json<InputRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let command = commands::SubmitInput {
        correlation_id: Uuid::new_v4(),
        player_id: PlayerId::new(player_id),
        raw_text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_input command");

    let reply = command_handlers::handle_submit_input(&command, state.game()).await?;

    Ok(Json(reply.into()))
}

/// GET /{player_id}
async fn get_session(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<query_handlers::SessionView>, ApiError> {
    let view = query_handlers::get_session(&PlayerId::new(player_id), &state.store)?;
    Ok(Json(view))
}

/// GET /{player_id}/summary
async fn get_summary(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = query_handlers::get_summary(&PlayerId::new(player_id), &state.store)?;
    Ok(Json(SummaryResponse {
        reply: presenter::render_summary(&summary),
        summary,
    }))
}

/// DELETE /{player_id}
#[instrument(skip(state))]
async fn end_session(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    command_handlers::handle_end_session(&PlayerId::new(player_id), &state.store)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for player sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{player_id}", get(get_session).delete(end_session))
        .route("/{player_id}/start", post(start_session))
        .route("/{player_id}/input", post(submit_input))
        .route("/{player_id}/summary", get(get_summary))
}
