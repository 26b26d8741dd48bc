use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enrollment_models::EnrollmentStatus;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEnrollmentRequest {
    pub program_id: Uuid,
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEnrollmentStatusRequest {
    pub status: EnrollmentStatus,
}
