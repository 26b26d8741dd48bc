use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    document::Document,
    enrollment::{EnrollmentStatus, EnrollmentWithProgram},
    user::user_models::{UserResponse, UserRole},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name and email are required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct UserWithEnrollmentCount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub enrollment_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailResponse {
    pub user: UserResponse,
    pub enrollments: Vec<EnrollmentWithProgram>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentQuery {
    /// Case-insensitive match on name, email or id.
    pub search: Option<String>,
}

/// A student joined with their earliest enrollment, if any.
#[derive(Debug, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub program_name: Option<String>,
    pub enrollment_status: Option<EnrollmentStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub program: String,
    pub registration_date: DateTime<Utc>,
    pub status: String,
}

const NOT_ENROLLED: &str = "Not Enrolled";

impl From<StudentRow> for StudentListItem {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            program: row.program_name.unwrap_or_else(|| NOT_ENROLLED.to_string()),
            registration_date: row.created_at,
            status: row
                .enrollment_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| NOT_ENROLLED.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_without_enrollment_shows_not_enrolled() {
        let item = StudentListItem::from(StudentRow {
            id: Uuid::new_v4(),
            name: "John Smith".into(),
            email: "student@example.com".into(),
            created_at: Utc::now(),
            program_name: None,
            enrollment_status: None,
        });
        assert_eq!(item.program, "Not Enrolled");
        assert_eq!(item.status, "Not Enrolled");
    }

    #[test]
    fn test_student_with_enrollment_shows_program_and_status() {
        let item = StudentListItem::from(StudentRow {
            id: Uuid::new_v4(),
            name: "John Smith".into(),
            email: "student@example.com".into(),
            created_at: Utc::now(),
            program_name: Some("STEM Preparation".into()),
            enrollment_status: Some(EnrollmentStatus::Approved),
        });
        assert_eq!(item.program, "STEM Preparation");
        assert_eq!(item.status, "APPROVED");
    }
}
