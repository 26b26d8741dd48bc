use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: String,
    pub program_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementCommentRequest {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_announcement_content_minimum() {
        let payload = CreateAnnouncementRequest {
            title: "Schedule change".into(),
            content: "Moved".into(),
            program_id: Uuid::new_v4(),
        };
        let err: AppError = payload.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Content must be at least 10 characters"));
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let payload = CreateAnnouncementRequest {
            title: "X".into(),
            content: "short".into(),
            program_id: Uuid::new_v4(),
        };
        let err: AppError = payload.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Content must be at least 10 characters"));
    }
}
