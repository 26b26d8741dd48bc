use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub program_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitAssignmentRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub file_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionRequest {
    #[validate(range(min = 0, max = 100, message = "Grade must be between 0 and 100"))]
    pub grade: i32,
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_comment_target", skip_on_field_errors = false))]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub assignment_id: Option<Uuid>,
    pub submission_id: Option<Uuid>,
}

fn validate_comment_target(payload: &CreateCommentRequest) -> Result<(), ValidationError> {
    if payload.assignment_id.is_none() && payload.submission_id.is_none() {
        let mut err = ValidationError::new("comment_target");
        err.message = Some("Either assignment_id or submission_id is required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_grade_bounds() {
        let grade = |grade| GradeSubmissionRequest { grade, feedback: None };

        assert!(grade(0).validate().is_ok());
        assert!(grade(100).validate().is_ok());
        assert!(grade(-1).validate().is_err());

        let err: AppError = grade(101).validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Grade must be between 0 and 100"));
    }

    #[test]
    fn test_comment_requires_target() {
        let payload = CreateCommentRequest {
            content: "Nice work".into(),
            assignment_id: None,
            submission_id: None,
        };
        assert!(payload.validate().is_err());

        let payload = CreateCommentRequest {
            content: "Nice work".into(),
            assignment_id: None,
            submission_id: Some(Uuid::new_v4()),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_submission_requires_content() {
        let payload = SubmitAssignmentRequest {
            content: String::new(),
            file_url: None,
        };
        let err: AppError = payload.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Content is required"));
    }
}
