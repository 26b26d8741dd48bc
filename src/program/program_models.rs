use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "program_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgramStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl ProgramStatus {
    pub const ALL: [ProgramStatus; 4] = [
        ProgramStatus::Upcoming,
        ProgramStatus::Active,
        ProgramStatus::Completed,
        ProgramStatus::Cancelled,
    ];
}

impl std::fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramStatus::Upcoming => write!(f, "UPCOMING"),
            ProgramStatus::Active => write!(f, "ACTIVE"),
            ProgramStatus::Completed => write!(f, "COMPLETED"),
            ProgramStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Length in weeks.
    pub duration: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub capacity: i32,
    pub status: ProgramStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProgramSummary {
    pub id: Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_status_display() {
        assert_eq!(ProgramStatus::Upcoming.to_string(), "UPCOMING");
        assert_eq!(ProgramStatus::Active.to_string(), "ACTIVE");
        assert_eq!(ProgramStatus::Completed.to_string(), "COMPLETED");
        assert_eq!(ProgramStatus::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn test_program_status_serializes_uppercase() {
        let json = serde_json::to_string(&ProgramStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
    }
}
