use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
};
use super::{
    chat_dto::SendChatMessageRequest,
    chat_models::{ChatExchange, ChatMessage, ChatSession},
};

/// Ask the educational assistant
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = SendChatMessageRequest,
    responses(
        (status = 200, description = "Stored question and reply", body = ChatExchange),
        (status = 400, description = "Message content is required"),
        (status = 404, description = "Chat session not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_chat_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SendChatMessageRequest>,
) -> Result<Json<ChatExchange>> {
    payload.validate()?;
    Ok(Json(state.chat_service.send_message(user_id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/chat/sessions",
    tag = "chat",
    responses(
        (status = 200, description = "Caller's sessions, most recent first", body = Vec<ChatSession>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_chat_sessions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ChatSession>>> {
    Ok(Json(state.chat_service.list_sessions(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/chat/sessions/{id}/messages",
    tag = "chat",
    params(("id" = Uuid, Path, description = "Chat session ID")),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<ChatMessage>),
        (status = 404, description = "Chat session not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_chat_messages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>> {
    Ok(Json(state.chat_service.list_messages(user_id, session_id).await?))
}
