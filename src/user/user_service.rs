use crate::{
    db::DbPool,
    document::DocumentRepository,
    enrollment::EnrollmentRepository,
    error::{AppError, Result},
    user::{
        user_dto::{StudentListItem, UpdateUserRequest, UserDetailResponse, UserWithEnrollmentCount},
        user_models::UserResponse,
        user_repository::UserRepository,
    },
};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    db: DbPool,
    user_repository: UserRepository,
    enrollment_repository: EnrollmentRepository,
    document_repository: DocumentRepository,
}

impl UserService {
    pub fn new(
        db: DbPool,
        user_repository: UserRepository,
        enrollment_repository: EnrollmentRepository,
        document_repository: DocumentRepository,
    ) -> Self {
        Self {
            db,
            user_repository,
            enrollment_repository,
            document_repository,
        }
    }

    pub async fn get_current_user(&self, user_id: Uuid) -> Result<UserResponse> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn list_users(&self) -> Result<Vec<UserWithEnrollmentCount>> {
        self.user_repository.find_all_with_enrollment_counts().await
    }

    pub async fn get_user_detail(&self, user_id: Uuid) -> Result<UserDetailResponse> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let enrollments = self.enrollment_repository.find_by_user(user_id).await?;
        let documents = self.document_repository.find_by_user(user_id).await?;

        Ok(UserDetailResponse {
            user: user.into(),
            enrollments,
            documents,
        })
    }

    pub async fn update_user(&self, user_id: Uuid, payload: UpdateUserRequest) -> Result<UserResponse> {
        let user = self
            .user_repository
            .update(
                user_id,
                payload.name.trim(),
                payload.email.trim(),
                payload.phone.as_deref(),
                payload.role,
            )
            .await
            .map_err(|e| e.on_unique_violation("users_email_key", "User with this email already exists"))?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let deleted = self
            .user_repository
            .delete_with_dependents(&mut tx, user_id)
            .await
            .map_err(|e| match e {
                AppError::Database(sqlx::Error::Database(ref db_err))
                    if db_err.is_foreign_key_violation() =>
                {
                    AppError::Conflict(
                        "User still owns programs, assignments, announcements or groups".to_string(),
                    )
                }
                other => other,
            })?;

        if deleted == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tx.commit().await?;
        tracing::info!("Deleted user {} and dependent records", user_id);

        Ok(())
    }

    pub async fn list_students(&self, search: Option<&str>) -> Result<Vec<StudentListItem>> {
        let rows = self.user_repository.find_students(search).await?;
        Ok(rows.into_iter().map(StudentListItem::from).collect())
    }
}
