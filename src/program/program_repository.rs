use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use super::program_models::{Program, ProgramStatus};

#[derive(Clone)]
pub struct ProgramRepository {
    pool: PgPool,
}

pub struct NewProgram<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub duration: i32,
    pub capacity: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: ProgramStatus,
    pub created_by: Uuid,
}

impl ProgramRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, program: NewProgram<'_>) -> Result<Program> {
        let program = sqlx::query_as::<_, Program>(
            "INSERT INTO programs (name, description, duration, capacity, start_date, end_date, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
        .bind(program.name)
        .bind(program.description)
        .bind(program.duration)
        .bind(program.capacity)
        .bind(program.start_date)
        .bind(program.end_date)
        .bind(program.status)
        .bind(program.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(program)
    }

    pub async fn find_all(&self) -> Result<Vec<Program>> {
        let programs = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(programs)
    }

    pub async fn find_by_creator(&self, user_id: Uuid) -> Result<Vec<Program>> {
        let programs = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs WHERE created_by = $1 ORDER BY created_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(programs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Program>> {
        let program = sqlx::query_as::<_, Program>("SELECT * FROM programs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(program)
    }

    /// Reads the program while holding a row lock until the transaction ends,
    /// serializing concurrent enrollments into the same program.
    pub async fn find_for_update(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
    ) -> Result<Option<Program>> {
        let program = sqlx::query_as::<_, Program>(
            "SELECT * FROM programs WHERE id = $1 FOR UPDATE"
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(program)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM programs WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
