use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::Result,
    middleware::CurrentUser,
    state::AppState,
};
use super::{
    attendance_dto::{MarkAttendanceRequest, RosterQuery, StudentAttendanceQuery},
    attendance_models::{Attendance, AttendanceStats, AttendanceWithProgram, RosterEntry},
};

/// Record attendance for one student and day (staff only)
#[utoipa::path(
    post,
    path = "/api/attendance",
    tag = "attendance",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = Attendance),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<Json<Attendance>> {
    user.require_staff()?;
    Ok(Json(state.attendance_service.mark(payload).await?))
}

/// Attendance roster of a program for a day (staff only)
#[utoipa::path(
    get,
    path = "/api/programs/{id}/attendance",
    tag = "attendance",
    params(("id" = Uuid, Path, description = "Program ID"), RosterQuery),
    responses(
        (status = 200, description = "Roster", body = Vec<RosterEntry>),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_program_attendance(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(program_id): Path<Uuid>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<Vec<RosterEntry>>> {
    user.require_staff()?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    Ok(Json(state.attendance_service.roster(program_id, date).await?))
}

#[utoipa::path(
    get,
    path = "/api/programs/{id}/attendance/stats",
    tag = "attendance",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Attendance totals", body = AttendanceStats),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_attendance_stats(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(program_id): Path<Uuid>,
) -> Result<Json<AttendanceStats>> {
    user.require_staff()?;
    Ok(Json(state.attendance_service.stats(program_id).await?))
}

/// The caller's own attendance records
#[utoipa::path(
    get,
    path = "/api/attendance/me",
    tag = "attendance",
    params(StudentAttendanceQuery),
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceWithProgram>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_attendance(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<StudentAttendanceQuery>,
) -> Result<Json<Vec<AttendanceWithProgram>>> {
    Ok(Json(
        state
            .attendance_service
            .student_records(user.id, query.program_id)
            .await?,
    ))
}

/// A student's attendance records (staff only)
#[utoipa::path(
    get,
    path = "/api/users/{id}/attendance",
    tag = "attendance",
    params(("id" = Uuid, Path, description = "Student ID"), StudentAttendanceQuery),
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceWithProgram>),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(student_id): Path<Uuid>,
    Query(query): Query<StudentAttendanceQuery>,
) -> Result<Json<Vec<AttendanceWithProgram>>> {
    user.require_staff()?;
    Ok(Json(
        state
            .attendance_service
            .student_records(student_id, query.program_id)
            .await?,
    ))
}
