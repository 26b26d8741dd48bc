use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
    user::{
        user_dto::{
            StudentListItem, StudentQuery, UpdateUserRequest, UserDetailResponse,
            UserWithEnrollmentCount,
        },
        user_models::UserResponse,
    },
};

/// Get current user profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    responses(
        (status = 200, description = "User profile retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>> {
    Ok(Json(state.user_service.get_current_user(user_id).await?))
}

/// List every user with their enrollment count (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "Users, newest first", body = Vec<UserWithEnrollmentCount>),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserWithEnrollmentCount>>> {
    Ok(Json(state.user_service.list_users().await?))
}

/// A user with enrollments and documents (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User detail", body = UserDetailResponse),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserDetailResponse>> {
    Ok(Json(state.user_service.get_user_detail(user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    payload.validate()?;
    Ok(Json(state.user_service.update_user(user_id, payload).await?))
}

/// Delete a user and everything that references them (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User still owns programs or groups")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.user_service.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Student directory (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/students",
    tag = "admin",
    params(StudentQuery),
    responses(
        (status = 200, description = "Students, newest first", body = Vec<StudentListItem>)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<Vec<StudentListItem>>> {
    Ok(Json(state.user_service.list_students(query.search.as_deref()).await?))
}
