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
    enrollment_dto::{CreateEnrollmentRequest, UpdateEnrollmentStatusRequest},
    enrollment_models::{Enrollment, EnrollmentDetail, EnrollmentWithProgram, ProgramEnrollee},
};

/// Apply to a program
#[utoipa::path(
    post,
    path = "/api/enrollments",
    tag = "enrollments",
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created", body = Enrollment),
        (status = 404, description = "Program not found"),
        (status = 409, description = "Already enrolled or program full")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEnrollmentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let enrollment = state
        .enrollment_service
        .create_enrollment(user_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Enrollments of the caller, with their programs
#[utoipa::path(
    get,
    path = "/api/enrollments/me",
    tag = "enrollments",
    responses(
        (status = 200, description = "Caller's enrollments", body = Vec<EnrollmentWithProgram>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_enrollments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<EnrollmentWithProgram>>> {
    Ok(Json(state.enrollment_service.list_user_enrollments(user_id).await?))
}

/// Enrollments of a program (staff only)
#[utoipa::path(
    get,
    path = "/api/programs/{id}/enrollments",
    tag = "enrollments",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Program enrollees", body = Vec<ProgramEnrollee>),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Program not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_program_enrollments(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(program_id): Path<Uuid>,
) -> Result<Json<Vec<ProgramEnrollee>>> {
    user.require_staff()?;
    Ok(Json(state.enrollment_service.list_program_enrollments(program_id).await?))
}

/// Every enrollment (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/enrollments",
    tag = "admin",
    responses(
        (status = 200, description = "All enrollments", body = Vec<EnrollmentDetail>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_all_enrollments(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentDetail>>> {
    Ok(Json(state.enrollment_service.list_enrollments().await?))
}

/// Approve, reject, complete or withdraw an enrollment (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/enrollments/{id}/status",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentStatusRequest,
    responses(
        (status = 200, description = "Enrollment updated", body = Enrollment),
        (status = 404, description = "Enrollment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_enrollment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEnrollmentStatusRequest>,
) -> Result<Json<Enrollment>> {
    Ok(Json(state.enrollment_service.update_status(id, payload.status).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/enrollments/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Enrollment deleted"),
        (status = 404, description = "Enrollment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.enrollment_service.delete_enrollment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
