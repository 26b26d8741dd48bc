use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::{
    user_dto::{StudentRow, UserWithEnrollmentCount},
    user_models::{User, UserRole},
};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
        email: &str,
        password_hash: &str,
        phone: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, phone, role)
             VALUES ($1, $2, $3, $4, 'STUDENT')
             RETURNING *"
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .fetch_one(&mut **tx)
        .await?;

        Ok(user)
    }

    pub async fn upsert_admin_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
        email: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, role)
             VALUES ($1, $2, 'ADMIN')
             ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                image = NULL,
                role = 'ADMIN',
                updated_at = NOW()
             RETURNING *"
        )
        .bind(name)
        .bind(email)
        .fetch_one(&mut **tx)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn count_existing(&self, user_ids: &[Uuid]) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ANY($1)")
            .bind(user_ids)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn find_all_with_enrollment_counts(&self) -> Result<Vec<UserWithEnrollmentCount>> {
        let users = sqlx::query_as::<_, UserWithEnrollmentCount>(
            "SELECT u.id, u.name, u.email, u.role, u.phone, u.created_at,
                    COUNT(e.id) AS enrollment_count
             FROM users u
             LEFT JOIN enrollments e ON e.user_id = u.id
             GROUP BY u.id
             ORDER BY u.created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn find_students(&self, search: Option<&str>) -> Result<Vec<StudentRow>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let students = sqlx::query_as::<_, StudentRow>(
            "SELECT u.id, u.name, u.email, u.created_at,
                    first_enrollment.program_name,
                    first_enrollment.status AS enrollment_status
             FROM users u
             LEFT JOIN LATERAL (
                SELECT p.name AS program_name, e.status
                FROM enrollments e
                JOIN programs p ON p.id = e.program_id
                WHERE e.user_id = u.id
                ORDER BY e.registered_at ASC
                LIMIT 1
             ) first_enrollment ON true
             WHERE u.role = 'STUDENT'
               AND ($1::text IS NULL
                    OR u.name ILIKE $1
                    OR u.email ILIKE $1
                    OR u.id::text ILIKE $1)
             ORDER BY u.created_at DESC"
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
        phone: Option<&str>,
        role: Option<UserRole>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET name = $2,
                 email = $3,
                 phone = COALESCE($4, phone),
                 role = COALESCE($5, role),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *"
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Removes a user and every row that references them.
    pub async fn delete_with_dependents(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
    ) -> Result<u64> {
        const DEPENDENTS: [&str; 9] = [
            "DELETE FROM documents WHERE user_id = $1",
            "DELETE FROM enrollments WHERE user_id = $1",
            "DELETE FROM attendance WHERE user_id = $1",
            "DELETE FROM comments WHERE user_id = $1",
            "DELETE FROM submissions WHERE user_id = $1",
            "DELETE FROM announcement_comments WHERE user_id = $1",
            "DELETE FROM messages WHERE sender_id = $1 OR receiver_id = $1",
            "DELETE FROM message_group_members WHERE user_id = $1",
            "DELETE FROM chat_sessions WHERE user_id = $1",
        ];

        for statement in DEPENDENTS {
            sqlx::query(statement).bind(user_id).execute(&mut **tx).await?;
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}
