use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::user::UserSummary;

/// A direct message has no `group_id`; its `receiver_id` becomes `None` once
/// the receiver's account is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender_id: Uuid,
    pub receiver_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_direct(&self) -> bool {
        self.group_id.is_none()
    }
}

/// A message together with the profiles of the people it connects.
/// A profile is `None` when that account no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MessageView {
    pub message: Message,
    pub sender: Option<UserSummary>,
    pub receiver: Option<UserSummary>,
}

#[derive(Debug, FromRow)]
pub struct MessageViewRow {
    #[sqlx(flatten)]
    pub message: Message,
    pub sender_name: Option<String>,
    pub sender_image: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_image: Option<String>,
}

impl From<MessageViewRow> for MessageView {
    fn from(row: MessageViewRow) -> Self {
        let sender = row.sender_name.map(|name| UserSummary {
            id: row.message.sender_id,
            name,
            image: row.sender_image,
        });
        let receiver = match (row.message.receiver_id, row.receiver_name) {
            (Some(id), Some(name)) => Some(UserSummary {
                id,
                name,
                image: row.receiver_image,
            }),
            _ => None,
        };

        Self {
            message: row.message,
            sender,
            receiver,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MessageGroup {
    pub id: Uuid,
    pub name: String,
    pub program_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct GroupListItem {
    pub id: Uuid,
    pub name: String,
    pub program_id: Option<Uuid>,
    pub member_count: i64,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(receiver_id: Option<Uuid>, receiver_name: Option<&str>) -> MessageViewRow {
        MessageViewRow {
            message: Message {
                id: Uuid::new_v4(),
                content: "Hello".into(),
                sender_id: Uuid::new_v4(),
                receiver_id,
                group_id: None,
                is_read: false,
                created_at: Utc::now(),
            },
            sender_name: Some("Alice".into()),
            sender_image: None,
            receiver_name: receiver_name.map(String::from),
            receiver_image: None,
        }
    }

    #[test]
    fn test_view_carries_both_profiles() {
        let receiver_id = Uuid::new_v4();
        let view = MessageView::from(row(Some(receiver_id), Some("Bob")));

        assert_eq!(view.sender.as_ref().map(|s| s.name.as_str()), Some("Alice"));
        assert_eq!(view.sender.as_ref().map(|s| s.id), Some(view.message.sender_id));
        assert_eq!(view.receiver.map(|r| r.id), Some(receiver_id));
    }

    #[test]
    fn test_deleted_receiver_has_no_profile() {
        let view = MessageView::from(row(None, None));
        assert!(view.receiver.is_none());
        assert!(view.message.is_direct());
    }
}
