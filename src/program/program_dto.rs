use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::program_models::ProgramStatus;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_date_range", skip_on_field_errors = false))]
pub struct CreateProgramRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(range(min = 1, message = "Duration must be a positive number"))]
    pub duration: i32,
    #[validate(range(min = 1, message = "Capacity must be a positive number"))]
    pub capacity: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<ProgramStatus>,
}

fn validate_date_range(payload: &CreateProgramRequest) -> Result<(), ValidationError> {
    match (payload.start_date, payload.end_date) {
        (Some(start), Some(end)) if end < start => {
            let mut err = ValidationError::new("date_range");
            err.message = Some("End date must not be before start date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::Duration;

    fn request() -> CreateProgramRequest {
        CreateProgramRequest {
            name: "STEM Preparation".into(),
            description: "Prepare students for STEM fields.".into(),
            duration: 12,
            capacity: 50,
            start_date: None,
            end_date: None,
            status: None,
        }
    }

    #[test]
    fn test_valid_program_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut payload = request();
        payload.capacity = 0;
        let err: AppError = payload.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Capacity must be a positive number"));
    }

    #[test]
    fn test_short_description_rejected() {
        let mut payload = request();
        payload.description = "short".into();
        let err: AppError = payload.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Description must be at least 10 characters"));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut payload = request();
        let start = Utc::now();
        payload.start_date = Some(start);
        payload.end_date = Some(start - Duration::days(1));
        assert!(payload.validate().is_err());
    }
}
