use axum::{extract::State, Json};

use crate::{error::Result, state::AppState};
use super::analytics_models::{ChartPoint, DashboardSummary, RecentActivity, UpcomingSession};

/// Enrollments per month over the last six months
#[utoipa::path(
    get,
    path = "/api/analytics/enrollment-trends",
    tag = "analytics",
    responses((status = 200, description = "Monthly enrollment counts", body = Vec<ChartPoint>)),
    security(("bearer_auth" = []))
)]
pub async fn get_enrollment_trends(State(state): State<AppState>) -> Result<Json<Vec<ChartPoint>>> {
    Ok(Json(state.analytics_service.enrollment_trends().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/program-popularity",
    tag = "analytics",
    responses((status = 200, description = "Top five programs by enrollments", body = Vec<ChartPoint>)),
    security(("bearer_auth" = []))
)]
pub async fn get_program_popularity(State(state): State<AppState>) -> Result<Json<Vec<ChartPoint>>> {
    Ok(Json(state.analytics_service.program_popularity().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/enrollment-status",
    tag = "analytics",
    responses((status = 200, description = "Enrollments per status", body = Vec<ChartPoint>)),
    security(("bearer_auth" = []))
)]
pub async fn get_enrollment_status_distribution(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChartPoint>>> {
    Ok(Json(state.analytics_service.enrollment_status_distribution().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/program-status",
    tag = "analytics",
    responses((status = 200, description = "Programs per status", body = Vec<ChartPoint>)),
    security(("bearer_auth" = []))
)]
pub async fn get_program_status_distribution(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChartPoint>>> {
    Ok(Json(state.analytics_service.program_status_distribution().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/user-roles",
    tag = "analytics",
    responses((status = 200, description = "Users per role", body = Vec<ChartPoint>)),
    security(("bearer_auth" = []))
)]
pub async fn get_user_role_distribution(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChartPoint>>> {
    Ok(Json(state.analytics_service.user_role_distribution().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/recent-activity",
    tag = "analytics",
    responses((status = 200, description = "Activity over the last seven days", body = RecentActivity)),
    security(("bearer_auth" = []))
)]
pub async fn get_recent_activity(State(state): State<AppState>) -> Result<Json<RecentActivity>> {
    Ok(Json(state.analytics_service.recent_activity().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/completion-rates",
    tag = "analytics",
    responses((status = 200, description = "Completion percentage per program", body = Vec<ChartPoint>)),
    security(("bearer_auth" = []))
)]
pub async fn get_completion_rates(State(state): State<AppState>) -> Result<Json<Vec<ChartPoint>>> {
    Ok(Json(state.analytics_service.completion_rates().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    tag = "analytics",
    responses((status = 200, description = "Dashboard totals", body = DashboardSummary)),
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard_summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>> {
    Ok(Json(state.analytics_service.summary().await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/upcoming-sessions",
    tag = "analytics",
    responses((status = 200, description = "Active programs starting soon", body = Vec<UpcomingSession>)),
    security(("bearer_auth" = []))
)]
pub async fn get_upcoming_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<UpcomingSession>>> {
    Ok(Json(state.analytics_service.upcoming_sessions().await?))
}
