use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    middleware::{AuthUser, CurrentUser},
    state::AppState,
};
use super::{
    announcement_dto::{CreateAnnouncementCommentRequest, CreateAnnouncementRequest},
    announcement_models::{Announcement, AnnouncementComment, AnnouncementDetail, AnnouncementListItem},
};

/// Post an announcement to a program (staff only)
#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = "announcements",
    request_body = CreateAnnouncementRequest,
    responses(
        (status = 201, description = "Announcement created", body = Announcement),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Program not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<impl IntoResponse> {
    user.require_staff()?;
    payload.validate()?;

    let announcement = state
        .announcement_service
        .create_announcement(user.id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

#[utoipa::path(
    get,
    path = "/api/programs/{id}/announcements",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Announcements, newest first", body = Vec<AnnouncementListItem>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_program_announcements(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> Result<Json<Vec<AnnouncementListItem>>> {
    Ok(Json(
        state
            .announcement_service
            .list_program_announcements(program_id)
            .await?,
    ))
}

/// Announcements of the caller's programs
#[utoipa::path(
    get,
    path = "/api/announcements/me",
    tag = "announcements",
    responses(
        (status = 200, description = "Announcement feed", body = Vec<AnnouncementListItem>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_announcements(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<AnnouncementListItem>>> {
    Ok(Json(state.announcement_service.student_feed(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/announcements/{id}",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement with comments", body = AnnouncementDetail),
        (status = 404, description = "Announcement not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnnouncementDetail>> {
    Ok(Json(state.announcement_service.get_announcement(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/announcements/{id}/comments",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement ID")),
    request_body = CreateAnnouncementCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = AnnouncementComment),
        (status = 404, description = "Announcement not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_announcement_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(announcement_id): Path<Uuid>,
    Json(payload): Json<CreateAnnouncementCommentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let comment = state
        .announcement_service
        .add_comment(announcement_id, user_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
