use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::announcement_models::{
    Announcement, AnnouncementComment, AnnouncementCommentWithAuthor, AnnouncementListItem,
};

#[derive(sqlx::FromRow)]
struct AnnouncementContextRow {
    #[sqlx(flatten)]
    announcement: Announcement,
    program_name: String,
    creator_name: String,
}

const LIST_COLUMNS: &str = "SELECT a.id, a.program_id, p.name AS program_name, a.title, a.content,
                a.created_by, u.name AS creator_name,
                (SELECT COUNT(*) FROM announcement_comments c WHERE c.announcement_id = a.id) AS comment_count,
                a.created_at
         FROM announcements a
         JOIN programs p ON p.id = a.program_id
         JOIN users u ON u.id = a.created_by";

#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        program_id: Uuid,
        title: &str,
        content: &str,
        created_by: Uuid,
    ) -> Result<Announcement> {
        let announcement = sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements (program_id, title, content, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING *"
        )
        .bind(program_id)
        .bind(title)
        .bind(content)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(announcement)
    }

    pub async fn find_by_program(&self, program_id: Uuid) -> Result<Vec<AnnouncementListItem>> {
        let query = format!("{} WHERE a.program_id = $1 ORDER BY a.created_at DESC", LIST_COLUMNS);
        let announcements = sqlx::query_as::<_, AnnouncementListItem>(&query)
            .bind(program_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(announcements)
    }

    pub async fn find_by_programs(&self, program_ids: &[Uuid]) -> Result<Vec<AnnouncementListItem>> {
        let query = format!("{} WHERE a.program_id = ANY($1) ORDER BY a.created_at DESC", LIST_COLUMNS);
        let announcements = sqlx::query_as::<_, AnnouncementListItem>(&query)
            .bind(program_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(announcements)
    }

    pub async fn find_with_context(&self, id: Uuid) -> Result<Option<(Announcement, String, String)>> {
        let row = sqlx::query_as::<_, AnnouncementContextRow>(
            "SELECT a.*, p.name AS program_name, u.name AS creator_name
             FROM announcements a
             JOIN programs p ON p.id = a.program_id
             JOIN users u ON u.id = a.created_by
             WHERE a.id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| (r.announcement, r.program_name, r.creator_name)))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM announcements WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn find_comments(&self, announcement_id: Uuid) -> Result<Vec<AnnouncementCommentWithAuthor>> {
        let comments = sqlx::query_as::<_, AnnouncementCommentWithAuthor>(
            "SELECT c.id, c.user_id, u.name AS user_name, u.image AS user_image,
                    c.content, c.created_at
             FROM announcement_comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.announcement_id = $1
             ORDER BY c.created_at DESC"
        )
        .bind(announcement_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn create_comment(
        &self,
        announcement_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<AnnouncementComment> {
        let comment = sqlx::query_as::<_, AnnouncementComment>(
            "INSERT INTO announcement_comments (announcement_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING *"
        )
        .bind(announcement_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }
}
