use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Exactly one of `receiver_id` and `group_id` must be given.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Message content is required"))]
    pub content: String,
    pub receiver_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, message = "Group name is required"))]
    pub name: String,
    pub program_id: Option<Uuid>,
    #[validate(length(min = 1, message = "At least one member is required"))]
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InboxQuery {
    pub search: Option<String>,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}
