use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendChatMessageRequest {
    #[validate(length(min = 1, message = "Message content is required"))]
    pub content: String,
    /// Continue an existing session; a new one is started when absent.
    pub session_id: Option<Uuid>,
}
