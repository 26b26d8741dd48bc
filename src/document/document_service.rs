use crate::document::document_models::{document_url, Document, NewDocument};
use crate::document::document_repository::DocumentRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use uuid::Uuid;

#[derive(Clone)]
pub struct DocumentService {
    repo: DocumentRepository,
    base_url: String,
}

impl DocumentService {
    pub fn new(repo: DocumentRepository, base_url: String) -> Self {
        Self { repo, base_url }
    }

    pub async fn upload(&self, user_id: Uuid, document: NewDocument) -> Result<Document> {
        if document.name.trim().is_empty() {
            return Err(AppError::Validation("File name is required".into()));
        }

        let url = document_url(&self.base_url, Uuid::new_v4(), &document.name);
        let stored = self.repo.create(user_id, &url, &document).await?;

        tracing::info!("Document {} ({} bytes) recorded for {}", stored.id, stored.size, user_id);
        Ok(stored)
    }

    /// Users see their own documents; admins see anyone's.
    pub async fn list_for_user(&self, requester: CurrentUser, user_id: Uuid) -> Result<Vec<Document>> {
        if requester.id != user_id {
            requester.require_admin()?;
        }
        self.repo.find_by_user(user_id).await
    }

    pub async fn list_for_enrollment(&self, enrollment_id: Uuid) -> Result<Vec<Document>> {
        self.repo.find_by_enrollment(enrollment_id).await
    }

    pub async fn delete(&self, requester: CurrentUser, id: Uuid) -> Result<()> {
        let document = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".into()))?;

        if document.user_id != requester.id {
            requester.require_admin()?;
        }

        self.repo.delete(id).await?;
        Ok(())
    }
}
