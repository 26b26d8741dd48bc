use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Sse,
    },
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
    message::{
        conversation::{Conversation, Inbox},
        message_dto::{CreateGroupRequest, InboxQuery, SendMessageRequest, UnreadCountResponse},
        message_models::{GroupListItem, Message, MessageGroup, MessageView},
    },
};

/// Send a direct or group message
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent successfully", body = Message),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of the group"),
        (status = 404, description = "Receiver not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let message = state.message_service.send_message(user_id, payload).await?;

    // Err only means nobody is listening
    if let Some(receiver_id) = message.receiver_id {
        let _ = state.message_tx.send((receiver_id, message.clone()));
    }

    Ok((StatusCode::CREATED, Json(message)))
}

/// Direct-message conversations, most recent first
#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    tag = "messages",
    responses(
        (status = 200, description = "Conversations", body = Vec<Conversation>)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_conversations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Conversation>>> {
    Ok(Json(state.message_service.get_conversations(user_id).await?))
}

/// Open the thread with another user and mark their messages read
#[utoipa::path(
    get,
    path = "/api/messages/conversations/{user_id}",
    tag = "messages",
    params(("user_id" = Uuid, Path, description = "Conversation partner")),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<MessageView>)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(partner_id): Path<Uuid>,
) -> Result<Json<Vec<MessageView>>> {
    Ok(Json(state.message_service.open_conversation(user_id, partner_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/messages/conversations/{user_id}/read",
    tag = "messages",
    params(("user_id" = Uuid, Path, description = "Conversation partner")),
    responses(
        (status = 204, description = "Conversation marked as read")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_conversation_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(partner_id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .message_service
        .mark_conversation_read(user_id, partner_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/messages/{id}/read",
    tag = "messages",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 204, description = "Message marked as read"),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Message not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_message_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.message_service.mark_read(user_id, message_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/messages/unread-count",
    tag = "messages",
    responses(
        (status = 200, description = "Unread direct messages", body = UnreadCountResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UnreadCountResponse>> {
    let unread_count = state.message_service.unread_count(user_id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// Conversations and groups in one payload
#[utoipa::path(
    get,
    path = "/api/messages/inbox",
    tag = "messages",
    params(InboxQuery),
    responses(
        (status = 200, description = "Inbox", body = Inbox)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_inbox(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<InboxQuery>,
) -> Result<Json<Inbox>> {
    Ok(Json(
        state
            .message_service
            .inbox(user_id, query.search.as_deref())
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/messages/groups",
    tag = "messages",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = MessageGroup),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Member not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let group = state.message_service.create_group(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/messages/groups",
    tag = "messages",
    responses(
        (status = 200, description = "Caller's groups", body = Vec<GroupListItem>)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_groups(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GroupListItem>>> {
    Ok(Json(state.message_service.list_groups(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/messages/groups/{id}",
    tag = "messages",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group messages, oldest first", body = Vec<MessageView>),
        (status = 403, description = "Not a member of the group")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_group_messages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<MessageView>>> {
    Ok(Json(
        state
            .message_service
            .get_group_messages(user_id, group_id)
            .await?,
    ))
}

/// Real-time message stream (SSE)
#[utoipa::path(
    get,
    path = "/api/messages/stream",
    tag = "messages",
    responses(
        (status = 200, description = "Message stream established"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn message_stream(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.message_tx.subscribe();
    let stream = BroadcastStream::new(rx)
        .filter_map(move |result| match result {
            Ok((receiver_id, message)) if receiver_id == user_id => {
                let json = serde_json::to_string(&message).ok()?;
                Some(Ok(Event::default().event("message").data(json)))
            }
            _ => None,
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
