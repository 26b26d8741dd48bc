use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub content: String,
    pub is_user_message: bool,
    pub created_at: DateTime<Utc>,
}

/// The user's message and the assistant's reply, as stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatExchange {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
}

/// Session title derived from the opening message.
pub fn session_title(first_message: &str) -> String {
    first_message.trim().chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_kept() {
        assert_eq!(session_title("  Help with algebra "), "Help with algebra");
    }

    #[test]
    fn test_long_title_truncated_by_chars() {
        let message = "é".repeat(80);
        let title = session_title(&message);
        assert_eq!(title.chars().count(), 50);
        assert!(message.starts_with(&title));
    }
}
