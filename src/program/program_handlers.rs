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
use super::{program_dto::CreateProgramRequest, program_models::Program};

/// Create a program (staff only)
#[utoipa::path(
    post,
    path = "/api/programs",
    tag = "programs",
    request_body = CreateProgramRequest,
    responses(
        (status = 201, description = "Program created", body = Program),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_program(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateProgramRequest>,
) -> Result<impl IntoResponse> {
    user.require_staff()?;
    payload.validate()?;

    let program = state.program_service.create_program(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(program)))
}

/// List all programs, newest first
#[utoipa::path(
    get,
    path = "/api/programs",
    tag = "programs",
    responses(
        (status = 200, description = "Programs", body = Vec<Program>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_programs(State(state): State<AppState>) -> Result<Json<Vec<Program>>> {
    Ok(Json(state.program_service.list_programs().await?))
}

/// Programs created by the caller
#[utoipa::path(
    get,
    path = "/api/programs/mine",
    tag = "programs",
    responses(
        (status = 200, description = "Programs created by the caller", body = Vec<Program>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_programs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Program>>> {
    Ok(Json(state.program_service.list_programs_by_creator(user_id).await?))
}

/// Get a program by id
#[utoipa::path(
    get,
    path = "/api/programs/{id}",
    tag = "programs",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Program", body = Program),
        (status = 404, description = "Program not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_program(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> Result<Json<Program>> {
    Ok(Json(state.program_service.get_program(program_id).await?))
}
