use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::document_models::{Document, NewDocument};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, url: &str, document: &NewDocument) -> Result<Document> {
        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO documents (name, url, content_type, size, user_id, enrollment_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
        .bind(&document.name)
        .bind(url)
        .bind(&document.content_type)
        .bind(document.size)
        .bind(user_id)
        .bind(document.enrollment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(document)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE user_id = $1 ORDER BY uploaded_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    pub async fn find_by_enrollment(&self, enrollment_id: Uuid) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE enrollment_id = $1 ORDER BY uploaded_at DESC"
        )
        .bind(enrollment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
