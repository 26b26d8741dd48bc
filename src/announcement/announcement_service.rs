use crate::announcement::announcement_dto::{CreateAnnouncementCommentRequest, CreateAnnouncementRequest};
use crate::announcement::announcement_models::{
    Announcement, AnnouncementComment, AnnouncementDetail, AnnouncementListItem,
};
use crate::announcement::announcement_repository::AnnouncementRepository;
use crate::enrollment::EnrollmentRepository;
use crate::error::{AppError, Result};
use crate::program::{ProgramRepository, ProgramSummary};
use uuid::Uuid;

#[derive(Clone)]
pub struct AnnouncementService {
    repo: AnnouncementRepository,
    program_repo: ProgramRepository,
    enrollment_repo: EnrollmentRepository,
}

impl AnnouncementService {
    pub fn new(
        repo: AnnouncementRepository,
        program_repo: ProgramRepository,
        enrollment_repo: EnrollmentRepository,
    ) -> Self {
        Self {
            repo,
            program_repo,
            enrollment_repo,
        }
    }

    pub async fn create_announcement(
        &self,
        created_by: Uuid,
        payload: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        if !self.program_repo.exists(payload.program_id).await? {
            return Err(AppError::NotFound("Program not found".into()));
        }

        let announcement = self
            .repo
            .create(payload.program_id, payload.title.trim(), payload.content.trim(), created_by)
            .await?;

        tracing::info!("Announcement {} posted to program {}", announcement.id, announcement.program_id);
        Ok(announcement)
    }

    pub async fn list_program_announcements(&self, program_id: Uuid) -> Result<Vec<AnnouncementListItem>> {
        self.repo.find_by_program(program_id).await
    }

    pub async fn get_announcement(&self, id: Uuid) -> Result<AnnouncementDetail> {
        let (announcement, program_name, creator_name) = self
            .repo
            .find_with_context(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".into()))?;

        let comments = self.repo.find_comments(id).await?;

        Ok(AnnouncementDetail {
            program: ProgramSummary {
                id: announcement.program_id,
                name: program_name,
            },
            announcement,
            creator_name,
            comments,
        })
    }

    pub async fn add_comment(
        &self,
        announcement_id: Uuid,
        user_id: Uuid,
        payload: CreateAnnouncementCommentRequest,
    ) -> Result<AnnouncementComment> {
        if !self.repo.exists(announcement_id).await? {
            return Err(AppError::NotFound("Announcement not found".into()));
        }

        self.repo
            .create_comment(announcement_id, user_id, payload.content.trim())
            .await
    }

    /// Announcements of every program the student takes part in, newest first.
    pub async fn student_feed(&self, user_id: Uuid) -> Result<Vec<AnnouncementListItem>> {
        let program_ids = self.enrollment_repo.find_participating_program_ids(user_id).await?;
        if program_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.find_by_programs(&program_ids).await
    }
}
