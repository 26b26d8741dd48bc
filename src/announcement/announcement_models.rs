use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::program::ProgramSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Announcement {
    pub id: Uuid,
    pub program_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AnnouncementListItem {
    pub id: Uuid,
    pub program_id: Uuid,
    pub program_name: String,
    pub title: String,
    pub content: String,
    pub created_by: Uuid,
    pub creator_name: String,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AnnouncementComment {
    pub id: Uuid,
    pub announcement_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AnnouncementCommentWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_image: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnnouncementDetail {
    pub announcement: Announcement,
    pub program: ProgramSummary,
    pub creator_name: String,
    pub comments: Vec<AnnouncementCommentWithAuthor>,
}
