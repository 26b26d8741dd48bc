use crate::db::DbPool;
use crate::enrollment::enrollment_dto::CreateEnrollmentRequest;
use crate::enrollment::enrollment_models::{
    Enrollment, EnrollmentDetail, EnrollmentStatus, EnrollmentWithProgram, ProgramEnrollee,
};
use crate::enrollment::enrollment_repository::EnrollmentRepository;
use crate::error::{AppError, Result};
use crate::program::ProgramRepository;
use uuid::Uuid;

/// Admission rule for a new enrollment given the current state of the program.
pub fn check_admission(already_enrolled: bool, seats_taken: i64, capacity: i32) -> Result<()> {
    if already_enrolled {
        return Err(AppError::Conflict("You are already enrolled in this program".into()));
    }
    if seats_taken >= i64::from(capacity) {
        return Err(AppError::CapacityExceeded("Program has reached its capacity".into()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct EnrollmentService {
    db: DbPool,
    repo: EnrollmentRepository,
    program_repo: ProgramRepository,
}

impl EnrollmentService {
    pub fn new(db: DbPool, repo: EnrollmentRepository, program_repo: ProgramRepository) -> Self {
        Self {
            db,
            repo,
            program_repo,
        }
    }

    /// Admits the user into the program. The program row stays locked until
    /// commit so concurrent admissions for it are serialized.
    pub async fn create_enrollment(
        &self,
        user_id: Uuid,
        payload: CreateEnrollmentRequest,
    ) -> Result<Enrollment> {
        let mut tx = self.db.begin().await?;

        let program = self
            .program_repo
            .find_for_update(&mut tx, payload.program_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Program not found".into()))?;

        let existing = self
            .repo
            .find_by_user_and_program_with_tx(&mut tx, user_id, program.id)
            .await?;
        let seats_taken = self.repo.count_seats_taken_with_tx(&mut tx, program.id).await?;

        check_admission(existing.is_some(), seats_taken, program.capacity)?;

        let message = payload.message.as_deref().map(str::trim).unwrap_or_default();
        let enrollment = self
            .repo
            .create_with_tx(&mut tx, user_id, program.id, message)
            .await
            .map_err(|e| {
                e.on_unique_violation(
                    "enrollments_user_program_key",
                    "You are already enrolled in this program",
                )
            })?;

        tx.commit().await?;
        tracing::info!("User {} enrolled in program {}", user_id, program.id);

        Ok(enrollment)
    }

    pub async fn list_enrollments(&self) -> Result<Vec<EnrollmentDetail>> {
        self.repo.find_all_detailed().await
    }

    pub async fn list_user_enrollments(&self, user_id: Uuid) -> Result<Vec<EnrollmentWithProgram>> {
        self.repo.find_by_user(user_id).await
    }

    pub async fn list_program_enrollments(&self, program_id: Uuid) -> Result<Vec<ProgramEnrollee>> {
        if !self.program_repo.exists(program_id).await? {
            return Err(AppError::NotFound("Program not found".into()));
        }
        self.repo.find_by_program(program_id).await
    }

    pub async fn update_status(&self, id: Uuid, status: EnrollmentStatus) -> Result<Enrollment> {
        let enrollment = self
            .repo
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".into()))?;

        tracing::info!("Enrollment {} moved to {}", id, status);
        Ok(enrollment)
    }

    pub async fn delete_enrollment(&self, id: Uuid) -> Result<()> {
        if self.repo.delete(id).await? == 0 {
            return Err(AppError::NotFound("Enrollment not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_admission_succeeds_with_free_seats() {
        assert!(check_admission(false, 0, 1).is_ok());
        assert!(check_admission(false, 29, 30).is_ok());
    }

    #[test]
    fn test_admission_rejects_duplicate() {
        let err = check_admission(true, 0, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "You are already enrolled in this program"));
    }

    #[test]
    fn test_admission_rejects_full_program() {
        let err = check_admission(false, 10, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);

        let err = check_admission(false, 12, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_duplicate_wins_over_capacity() {
        let err = check_admission(true, 10, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
