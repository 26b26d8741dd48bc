use crate::error::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use super::attendance_models::{Attendance, AttendanceStatus, AttendanceWithProgram};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert(
        &self,
        user_id: Uuid,
        program_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: &str,
    ) -> Result<Attendance> {
        let attendance = sqlx::query_as::<_, Attendance>(
            "INSERT INTO attendance (user_id, program_id, date, status, notes)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, program_id, date) DO UPDATE SET
                status = EXCLUDED.status,
                notes = EXCLUDED.notes,
                updated_at = NOW()
             RETURNING *"
        )
        .bind(user_id)
        .bind(program_id)
        .bind(date)
        .bind(status)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendance)
    }

    pub async fn find_by_program_and_date(
        &self,
        program_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendance WHERE program_id = $1 AND date = $2"
        )
        .bind(program_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        program_id: Option<Uuid>,
    ) -> Result<Vec<AttendanceWithProgram>> {
        let records = sqlx::query_as::<_, AttendanceWithProgram>(
            "SELECT a.id, a.user_id, a.program_id, p.name AS program_name,
                    a.date, a.status, a.notes
             FROM attendance a
             JOIN programs p ON p.id = a.program_id
             WHERE a.user_id = $1
               AND ($2::uuid IS NULL OR a.program_id = $2)
             ORDER BY a.date DESC"
        )
        .bind(user_id)
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn count_by_status(&self, program_id: Uuid) -> Result<Vec<(AttendanceStatus, i64)>> {
        let counts = sqlx::query_as::<_, (AttendanceStatus, i64)>(
            "SELECT status, COUNT(*) FROM attendance WHERE program_id = $1 GROUP BY status"
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
