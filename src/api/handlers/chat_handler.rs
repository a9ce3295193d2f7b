//! Chat endpoint handler.
//!
//! Thin wrapper over the orchestrator: once the body validates, the
//! endpoint always answers 200 with `success: true` - action failures
//! are degraded inside the orchestrator, never surfaced as errors.

use axum::{extract::State, response::Json, Extension};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::ChatData;
use crate::types::ApiResponse;

/// Chat request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Free-text user message
    #[validate(length(min = 1, message = "Message is required"))]
    #[schema(example = "hello, show me deals")]
    pub message: String,
    /// Opaque session identifier; generated when absent, never read
    /// back server-side
    #[schema(example = "session_1736500000000_a1b2c3d4e")]
    pub session_id: Option<String>,
}

/// Handle one chat turn
#[utoipa::path(
    post,
    path = "/api/app/chat",
    tag = "Chat",
    request_body = ChatRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Chat reply with structured data", body = ChatData),
        (status = 400, description = "Message missing or empty"),
        (status = 401, description = "Missing bearer token")
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> AppResult<Json<ApiResponse<ChatData>>> {
    let reply = state
        .chat_service
        .respond(user.id, &payload.message, payload.session_id)
        .await;

    Ok(Json(ApiResponse::success(reply.message, reply.data)))
}
