use crate::assignment::assignment_dto::{
    CreateAssignmentRequest, CreateCommentRequest, GradeSubmissionRequest, SubmitAssignmentRequest,
};
use crate::assignment::assignment_models::{
    build_student_assignments, Assignment, AssignmentDetail, AssignmentListItem, Comment,
    StudentAssignment, Submission,
};
use crate::assignment::assignment_repository::AssignmentRepository;
use crate::enrollment::EnrollmentRepository;
use crate::error::{AppError, Result};
use crate::program::{ProgramRepository, ProgramSummary};
use chrono::Utc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AssignmentService {
    repo: AssignmentRepository,
    program_repo: ProgramRepository,
    enrollment_repo: EnrollmentRepository,
}

impl AssignmentService {
    pub fn new(
        repo: AssignmentRepository,
        program_repo: ProgramRepository,
        enrollment_repo: EnrollmentRepository,
    ) -> Self {
        Self {
            repo,
            program_repo,
            enrollment_repo,
        }
    }

    pub async fn create_assignment(
        &self,
        created_by: Uuid,
        payload: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        if !self.program_repo.exists(payload.program_id).await? {
            return Err(AppError::NotFound("Program not found".into()));
        }

        let assignment = self
            .repo
            .create(
                payload.program_id,
                payload.title.trim(),
                payload.description.trim(),
                payload.due_date,
                created_by,
            )
            .await?;

        tracing::info!("Assignment {} created for program {}", assignment.id, assignment.program_id);
        Ok(assignment)
    }

    pub async fn list_program_assignments(&self, program_id: Uuid) -> Result<Vec<AssignmentListItem>> {
        self.repo.find_by_program(program_id).await
    }

    pub async fn get_assignment(&self, id: Uuid) -> Result<AssignmentDetail> {
        let (assignment, program_name, creator_name) = self
            .repo
            .find_with_context(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".into()))?;

        let submissions = self.repo.find_submissions_by_assignment(id).await?;
        let comments = self.repo.find_comments_by_assignment(id).await?;

        Ok(AssignmentDetail {
            program: ProgramSummary {
                id: assignment.program_id,
                name: program_name,
            },
            assignment,
            creator_name,
            submissions,
            comments,
        })
    }

    pub async fn submit(
        &self,
        assignment_id: Uuid,
        user_id: Uuid,
        payload: SubmitAssignmentRequest,
    ) -> Result<Submission> {
        self.repo
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".into()))?;

        self.repo
            .upsert_submission(assignment_id, user_id, &payload.content, payload.file_url.as_deref())
            .await
    }

    pub async fn grade(&self, submission_id: Uuid, payload: GradeSubmissionRequest) -> Result<Submission> {
        let submission = self
            .repo
            .grade_submission(submission_id, payload.grade, payload.feedback.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))?;

        tracing::info!("Submission {} graded {}", submission.id, payload.grade);
        Ok(submission)
    }

    pub async fn add_comment(&self, user_id: Uuid, payload: CreateCommentRequest) -> Result<Comment> {
        if let Some(assignment_id) = payload.assignment_id {
            if self.repo.find_by_id(assignment_id).await?.is_none() {
                return Err(AppError::NotFound("Assignment not found".into()));
            }
        }
        if let Some(submission_id) = payload.submission_id {
            if !self.repo.submission_exists(submission_id).await? {
                return Err(AppError::NotFound("Submission not found".into()));
            }
        }

        self.repo
            .create_comment(
                user_id,
                payload.content.trim(),
                payload.assignment_id,
                payload.submission_id,
            )
            .await
    }

    /// Assignments of every program the student takes part in.
    pub async fn student_assignments(&self, user_id: Uuid) -> Result<Vec<StudentAssignment>> {
        let program_ids = self.enrollment_repo.find_participating_program_ids(user_id).await?;
        if program_ids.is_empty() {
            return Ok(Vec::new());
        }

        let assignments = self.repo.find_by_programs(&program_ids).await?;
        let submissions = self.repo.find_submissions_by_user(user_id).await?;

        Ok(build_student_assignments(assignments, submissions, Utc::now()))
    }
}
