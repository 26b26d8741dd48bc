use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::program::ProgramStatus;

/// PENDING → APPROVED | REJECTED → COMPLETED | WITHDRAWN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "enrollment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Withdrawn,
}

impl EnrollmentStatus {
    pub const ALL: [EnrollmentStatus; 5] = [
        EnrollmentStatus::Pending,
        EnrollmentStatus::Approved,
        EnrollmentStatus::Rejected,
        EnrollmentStatus::Completed,
        EnrollmentStatus::Withdrawn,
    ];

    /// Whether an enrollment in this state occupies one of the program's seats.
    pub fn holds_seat(&self) -> bool {
        matches!(
            self,
            EnrollmentStatus::Pending | EnrollmentStatus::Approved | EnrollmentStatus::Completed
        )
    }

    /// Whether the student takes part in the program's coursework.
    pub fn is_participating(&self) -> bool {
        matches!(self, EnrollmentStatus::Approved | EnrollmentStatus::Completed)
    }

    /// Statuses counted against capacity, bound as `status = ANY(..)`.
    pub fn seat_holding() -> Vec<EnrollmentStatus> {
        Self::ALL.into_iter().filter(|s| s.holds_seat()).collect()
    }

    /// Statuses that see coursework, attendance and announcements.
    pub fn participating() -> Vec<EnrollmentStatus> {
        Self::ALL.into_iter().filter(|s| s.is_participating()).collect()
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Pending => write!(f, "PENDING"),
            EnrollmentStatus::Approved => write!(f, "APPROVED"),
            EnrollmentStatus::Rejected => write!(f, "REJECTED"),
            EnrollmentStatus::Completed => write!(f, "COMPLETED"),
            EnrollmentStatus::Withdrawn => write!(f, "WITHDRAWN"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub program_id: Uuid,
    pub status: EnrollmentStatus,
    pub message: String,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A student's enrollment together with the program it refers to.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrollmentWithProgram {
    pub id: Uuid,
    pub user_id: Uuid,
    pub program_id: Uuid,
    pub status: EnrollmentStatus,
    pub message: String,
    pub registered_at: DateTime<Utc>,
    pub program_name: String,
    pub program_description: String,
    pub program_status: ProgramStatus,
    pub program_start_date: Option<DateTime<Utc>>,
    pub program_end_date: Option<DateTime<Utc>>,
}

/// Admin listing row: enrollment with student and program summaries.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrollmentDetail {
    pub id: Uuid,
    pub status: EnrollmentStatus,
    pub message: String,
    pub registered_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub program_id: Uuid,
    pub program_name: String,
    pub program_start_date: Option<DateTime<Utc>>,
    pub program_end_date: Option<DateTime<Utc>>,
}

/// Program listing row: enrollment with the student's contact details.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ProgramEnrollee {
    pub id: Uuid,
    pub status: EnrollmentStatus,
    pub message: String,
    pub registered_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_status_display() {
        assert_eq!(EnrollmentStatus::Pending.to_string(), "PENDING");
        assert_eq!(EnrollmentStatus::Approved.to_string(), "APPROVED");
        assert_eq!(EnrollmentStatus::Rejected.to_string(), "REJECTED");
        assert_eq!(EnrollmentStatus::Completed.to_string(), "COMPLETED");
        assert_eq!(EnrollmentStatus::Withdrawn.to_string(), "WITHDRAWN");
    }

    #[test]
    fn test_rejected_and_withdrawn_release_seats() {
        assert_eq!(
            EnrollmentStatus::seat_holding(),
            vec![
                EnrollmentStatus::Pending,
                EnrollmentStatus::Approved,
                EnrollmentStatus::Completed
            ]
        );
    }

    #[test]
    fn test_only_approved_and_completed_participate() {
        assert_eq!(
            EnrollmentStatus::participating(),
            vec![EnrollmentStatus::Approved, EnrollmentStatus::Completed]
        );
    }

    #[test]
    fn test_participants_always_hold_a_seat() {
        let seats = EnrollmentStatus::seat_holding();
        assert!(EnrollmentStatus::participating()
            .iter()
            .all(|s| seats.contains(s)));
    }
}

impl sqlx::postgres::PgHasArrayType for EnrollmentStatus {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_enrollment_status")
    }
}
