use crate::{
    error::Result,
    message::message_models::{GroupListItem, Message, MessageGroup, MessageView, MessageViewRow},
};
use sqlx::PgPool;
use uuid::Uuid;

const VIEW_SELECT: &str = "SELECT m.*,
                s.name AS sender_name, s.image AS sender_image,
                r.name AS receiver_name, r.image AS receiver_image
         FROM messages m
         LEFT JOIN users s ON s.id = m.sender_id
         LEFT JOIN users r ON r.id = m.receiver_id";

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_direct(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (sender_id, receiver_id, content)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Inserts the message and bumps the group's `updated_at`.
    pub async fn create_group_message(&self, sender_id: Uuid, group_id: Uuid, content: &str) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            "WITH inserted AS (
                INSERT INTO messages (sender_id, group_id, content)
                VALUES ($1, $2, $3)
                RETURNING *
             ), touched AS (
                UPDATE message_groups SET updated_at = NOW() WHERE id = $2
             )
             SELECT * FROM inserted",
        )
        .bind(sender_id)
        .bind(group_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn find_by_id(&self, message_id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(message)
    }

    /// Every direct message the user sent or received, with both profiles.
    pub async fn find_direct_messages(&self, user_id: Uuid) -> Result<Vec<MessageView>> {
        let query = format!(
            "{} WHERE m.group_id IS NULL AND (m.sender_id = $1 OR m.receiver_id = $1)
             ORDER BY m.created_at DESC",
            VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, MessageViewRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(MessageView::from).collect())
    }

    pub async fn find_conversation(&self, user_id: Uuid, other_user_id: Uuid) -> Result<Vec<MessageView>> {
        let query = format!(
            "{} WHERE (m.sender_id = $1 AND m.receiver_id = $2)
                OR (m.sender_id = $2 AND m.receiver_id = $1)
             ORDER BY m.created_at ASC",
            VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, MessageViewRow>(&query)
            .bind(user_id)
            .bind(other_user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(MessageView::from).collect())
    }

    pub async fn find_group_messages(&self, group_id: Uuid) -> Result<Vec<MessageView>> {
        let query = format!("{} WHERE m.group_id = $1 ORDER BY m.created_at ASC", VIEW_SELECT);
        let rows = sqlx::query_as::<_, MessageViewRow>(&query)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(MessageView::from).collect())
    }

    /// Flips exactly the given messages; which ones is decided by `apply_read_receipt`.
    pub async fn mark_ids_as_read(&self, message_ids: &[Uuid]) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE messages
             SET is_read = true
             WHERE id = ANY($1) AND is_read = false",
        )
        .bind(message_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages
             WHERE receiver_id = $1 AND group_id IS NULL AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn create_group_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
        program_id: Option<Uuid>,
        created_by: Uuid,
    ) -> Result<MessageGroup> {
        let group = sqlx::query_as::<_, MessageGroup>(
            "INSERT INTO message_groups (name, program_id, created_by)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(name)
        .bind(program_id)
        .bind(created_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(group)
    }

    pub async fn add_members_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        group_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO message_group_members (group_id, user_id)
             SELECT $1, member FROM UNNEST($2::uuid[]) AS member
             ON CONFLICT (group_id, user_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(user_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    pub async fn is_group_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool> {
        let is_member: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM message_group_members WHERE group_id = $1 AND user_id = $2
             )",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(is_member)
    }

    /// Groups the user belongs to, most recently active first.
    pub async fn find_groups_for_user(&self, user_id: Uuid) -> Result<Vec<GroupListItem>> {
        let groups = sqlx::query_as::<_, GroupListItem>(
            "SELECT g.id, g.name, g.program_id,
                    (SELECT COUNT(*) FROM message_group_members gm WHERE gm.group_id = g.id) AS member_count,
                    latest.content AS last_message,
                    latest.created_at AS last_message_at,
                    g.updated_at
             FROM message_groups g
             JOIN message_group_members me ON me.group_id = g.id AND me.user_id = $1
             LEFT JOIN LATERAL (
                SELECT m.content, m.created_at
                FROM messages m
                WHERE m.group_id = g.id
                ORDER BY m.created_at DESC
                LIMIT 1
             ) latest ON true
             ORDER BY g.updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }
}
