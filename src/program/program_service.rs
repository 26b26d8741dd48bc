use crate::error::{AppError, Result};
use crate::program::program_dto::CreateProgramRequest;
use crate::program::program_models::{Program, ProgramStatus};
use crate::program::program_repository::{NewProgram, ProgramRepository};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProgramService {
    repo: ProgramRepository,
}

impl ProgramService {
    pub fn new(repo: ProgramRepository) -> Self {
        Self { repo }
    }

    pub async fn create_program(&self, created_by: Uuid, payload: CreateProgramRequest) -> Result<Program> {
        let program = self
            .repo
            .create(NewProgram {
                name: payload.name.trim(),
                description: payload.description.trim(),
                duration: payload.duration,
                capacity: payload.capacity,
                start_date: payload.start_date,
                end_date: payload.end_date,
                status: payload.status.unwrap_or(ProgramStatus::Upcoming),
                created_by,
            })
            .await?;

        tracing::info!("Program {} created by {}", program.id, created_by);
        Ok(program)
    }

    pub async fn list_programs(&self) -> Result<Vec<Program>> {
        self.repo.find_all().await
    }

    pub async fn list_programs_by_creator(&self, user_id: Uuid) -> Result<Vec<Program>> {
        self.repo.find_by_creator(user_id).await
    }

    pub async fn get_program(&self, id: Uuid) -> Result<Program> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Program not found".into()))
    }
}
