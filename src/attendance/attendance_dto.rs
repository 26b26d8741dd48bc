use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::attendance_models::AttendanceStatus;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendanceRequest {
    pub user_id: Uuid,
    pub program_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RosterQuery {
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentAttendanceQuery {
    pub program_id: Option<Uuid>,
}
