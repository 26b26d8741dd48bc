use crate::{
    enrollment::enrollment_models::{
        Enrollment, EnrollmentDetail, EnrollmentStatus, EnrollmentWithProgram, ProgramEnrollee,
    },
    error::Result,
};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_and_program_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        program_id: Uuid,
    ) -> Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND program_id = $2"
        )
        .bind(user_id)
        .bind(program_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(enrollment)
    }

    /// Enrollments that occupy a seat (see `EnrollmentStatus::holds_seat`).
    pub async fn count_seats_taken_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        program_id: Uuid,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrollments
             WHERE program_id = $1
               AND status = ANY($2)"
        )
        .bind(program_id)
        .bind(EnrollmentStatus::seat_holding())
        .fetch_one(&mut **tx)
        .await?;

        Ok(count)
    }

    pub async fn create_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        program_id: Uuid,
        message: &str,
    ) -> Result<Enrollment> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (user_id, program_id, status, message)
             VALUES ($1, $2, 'PENDING', $3)
             RETURNING *"
        )
        .bind(user_id)
        .bind(program_id)
        .bind(message)
        .fetch_one(&mut **tx)
        .await?;

        Ok(enrollment)
    }

    pub async fn find_all_detailed(&self) -> Result<Vec<EnrollmentDetail>> {
        let enrollments = sqlx::query_as::<_, EnrollmentDetail>(
            "SELECT e.id, e.status, e.message, e.registered_at,
                    u.id AS user_id, u.name AS user_name, u.email AS user_email,
                    p.id AS program_id, p.name AS program_name,
                    p.start_date AS program_start_date, p.end_date AS program_end_date
             FROM enrollments e
             JOIN users u ON u.id = e.user_id
             JOIN programs p ON p.id = e.program_id
             ORDER BY e.registered_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<EnrollmentWithProgram>> {
        let enrollments = sqlx::query_as::<_, EnrollmentWithProgram>(
            "SELECT e.id, e.user_id, e.program_id, e.status, e.message, e.registered_at,
                    p.name AS program_name, p.description AS program_description,
                    p.status AS program_status,
                    p.start_date AS program_start_date, p.end_date AS program_end_date
             FROM enrollments e
             JOIN programs p ON p.id = e.program_id
             WHERE e.user_id = $1
             ORDER BY e.registered_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    pub async fn find_by_program(&self, program_id: Uuid) -> Result<Vec<ProgramEnrollee>> {
        let enrollments = sqlx::query_as::<_, ProgramEnrollee>(
            "SELECT e.id, e.status, e.message, e.registered_at,
                    u.id AS user_id, u.name AS user_name, u.email AS user_email,
                    u.phone AS user_phone
             FROM enrollments e
             JOIN users u ON u.id = e.user_id
             WHERE e.program_id = $1
             ORDER BY e.registered_at DESC"
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    /// Enrollees taking part in the program (see `EnrollmentStatus::is_participating`).
    pub async fn find_participants(&self, program_id: Uuid) -> Result<Vec<ProgramEnrollee>> {
        let enrollments = sqlx::query_as::<_, ProgramEnrollee>(
            "SELECT e.id, e.status, e.message, e.registered_at,
                    u.id AS user_id, u.name AS user_name, u.email AS user_email,
                    u.phone AS user_phone
             FROM enrollments e
             JOIN users u ON u.id = e.user_id
             WHERE e.program_id = $1
               AND e.status = ANY($2)
             ORDER BY u.name ASC"
        )
        .bind(program_id)
        .bind(EnrollmentStatus::participating())
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    /// Programs whose coursework the user takes part in.
    pub async fn find_participating_program_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT program_id FROM enrollments
             WHERE user_id = $1
               AND status = ANY($2)"
        )
        .bind(user_id)
        .bind(EnrollmentStatus::participating())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    pub async fn update_status(&self, id: Uuid, status: EnrollmentStatus) -> Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "UPDATE enrollments
             SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *"
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
