use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::chat_models::{ChatMessage, ChatSession};

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, sqlx::Postgres>> {
        Ok(self.pool.begin().await?)
    }

    pub async fn create_session_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        title: &str,
    ) -> Result<ChatSession> {
        let session = sqlx::query_as::<_, ChatSession>(
            "INSERT INTO chat_sessions (user_id, title)
             VALUES ($1, $2)
             RETURNING *"
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(&mut **tx)
        .await?;

        Ok(session)
    }

    pub async fn touch_session_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        session_id: Uuid,
    ) -> Result<()> {
        sqlx::query("UPDATE chat_sessions SET updated_at = NOW() WHERE id = $1")
            .bind(session_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub async fn create_message_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        session_id: Uuid,
        content: &str,
        is_user_message: bool,
    ) -> Result<ChatMessage> {
        let message = sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_messages (session_id, content, is_user_message)
             VALUES ($1, $2, $3)
             RETURNING *"
        )
        .bind(session_id)
        .bind(content)
        .bind(is_user_message)
        .fetch_one(&mut **tx)
        .await?;

        Ok(message)
    }

    pub async fn find_session(&self, session_id: Uuid) -> Result<Option<ChatSession>> {
        let session = sqlx::query_as::<_, ChatSession>("SELECT * FROM chat_sessions WHERE id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    pub async fn find_sessions_by_user(&self, user_id: Uuid) -> Result<Vec<ChatSession>> {
        let sessions = sqlx::query_as::<_, ChatSession>(
            "SELECT * FROM chat_sessions WHERE user_id = $1 ORDER BY updated_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    pub async fn find_messages(&self, session_id: Uuid) -> Result<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_messages WHERE session_id = $1 ORDER BY created_at ASC"
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
