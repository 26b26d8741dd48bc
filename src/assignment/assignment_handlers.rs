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
    assignment_dto::{
        CreateAssignmentRequest, CreateCommentRequest, GradeSubmissionRequest,
        SubmitAssignmentRequest,
    },
    assignment_models::{
        Assignment, AssignmentDetail, AssignmentListItem, Comment, StudentAssignment, Submission,
    },
};

/// Create an assignment (staff only)
#[utoipa::path(
    post,
    path = "/api/assignments",
    tag = "assignments",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Program not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<impl IntoResponse> {
    user.require_staff()?;
    payload.validate()?;

    let assignment = state.assignment_service.create_assignment(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Assignments of a program, earliest due first
#[utoipa::path(
    get,
    path = "/api/programs/{id}/assignments",
    tag = "assignments",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Assignments", body = Vec<AssignmentListItem>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_program_assignments(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> Result<Json<Vec<AssignmentListItem>>> {
    Ok(Json(state.assignment_service.list_program_assignments(program_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    tag = "assignments",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment with submissions and comments", body = AssignmentDetail),
        (status = 404, description = "Assignment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentDetail>> {
    Ok(Json(state.assignment_service.get_assignment(id).await?))
}

/// Assignments of the caller's programs with their progress
#[utoipa::path(
    get,
    path = "/api/assignments/me",
    tag = "assignments",
    responses(
        (status = 200, description = "Student assignments", body = Vec<StudentAssignment>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_assignments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<StudentAssignment>>> {
    Ok(Json(state.assignment_service.student_assignments(user_id).await?))
}

/// Submit (or resubmit) work for an assignment
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submissions",
    tag = "assignments",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = SubmitAssignmentRequest,
    responses(
        (status = 201, description = "Submission stored", body = Submission),
        (status = 400, description = "Content is required"),
        (status = 404, description = "Assignment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_assignment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(assignment_id): Path<Uuid>,
    Json(payload): Json<SubmitAssignmentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let submission = state
        .assignment_service
        .submit(assignment_id, user_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// Grade a submission (staff only)
#[utoipa::path(
    put,
    path = "/api/submissions/{id}/grade",
    tag = "assignments",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = GradeSubmissionRequest,
    responses(
        (status = 200, description = "Submission graded", body = Submission),
        (status = 400, description = "Grade must be between 0 and 100"),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Submission not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn grade_submission(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(submission_id): Path<Uuid>,
    Json(payload): Json<GradeSubmissionRequest>,
) -> Result<Json<Submission>> {
    user.require_staff()?;
    payload.validate()?;

    Ok(Json(state.assignment_service.grade(submission_id, payload).await?))
}

/// Comment on an assignment or a submission
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "assignments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Target not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let comment = state.assignment_service.add_comment(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
