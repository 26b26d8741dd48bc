use crate::{auth::auth_models::RefreshToken, error::Result, user::User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Persisted refresh tokens; a token is usable only while its row exists.
#[derive(Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a freshly issued token and drops the user's expired ones.
    pub async fn store_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken> {
        let stored = sqlx::query_as::<_, RefreshToken>(
            "WITH purged AS (
                DELETE FROM refresh_tokens
                WHERE user_id = $1 AND expires_at <= NOW()
             )
             INSERT INTO refresh_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(stored)
    }

    /// The account an unexpired token was issued to.
    pub async fn find_owner(&self, token: &str) -> Result<Option<User>> {
        let owner = sqlx::query_as::<_, User>(
            "SELECT u.*
             FROM refresh_tokens t
             JOIN users u ON u.id = t.user_id
             WHERE t.token = $1 AND t.expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    pub async fn revoke(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Returns false when the token was already gone.
    pub async fn revoke_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        token: &str,
    ) -> Result<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
