use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::assignment_models::{
    Assignment, AssignmentListItem, AssignmentWithProgram, Comment, CommentWithAuthor, Submission,
    SubmissionWithStudent,
};

#[derive(sqlx::FromRow)]
struct AssignmentContextRow {
    #[sqlx(flatten)]
    assignment: Assignment,
    program_name: String,
    creator_name: String,
}

#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        program_id: Uuid,
        title: &str,
        description: &str,
        due_date: chrono::DateTime<chrono::Utc>,
        created_by: Uuid,
    ) -> Result<Assignment> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "INSERT INTO assignments (program_id, title, description, due_date, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *"
        )
        .bind(program_id)
        .bind(title)
        .bind(description)
        .bind(due_date)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(assignment)
    }

    /// The assignment with its program's name and its creator's name.
    pub async fn find_with_context(&self, id: Uuid) -> Result<Option<(Assignment, String, String)>> {
        let row = sqlx::query_as::<_, AssignmentContextRow>(
            "SELECT a.*, p.name AS program_name, u.name AS creator_name
             FROM assignments a
             JOIN programs p ON p.id = a.program_id
             JOIN users u ON u.id = a.created_by
             WHERE a.id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| (r.assignment, r.program_name, r.creator_name)))
    }

    pub async fn find_by_program(&self, program_id: Uuid) -> Result<Vec<AssignmentListItem>> {
        let assignments = sqlx::query_as::<_, AssignmentListItem>(
            "SELECT a.id, a.program_id, a.title, a.description, a.due_date, a.created_by,
                    u.name AS creator_name,
                    (SELECT COUNT(*) FROM submissions s WHERE s.assignment_id = a.id) AS submission_count,
                    a.created_at
             FROM assignments a
             JOIN users u ON u.id = a.created_by
             WHERE a.program_id = $1
             ORDER BY a.due_date ASC"
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_by_programs(&self, program_ids: &[Uuid]) -> Result<Vec<AssignmentWithProgram>> {
        let assignments = sqlx::query_as::<_, AssignmentWithProgram>(
            "SELECT a.id, a.program_id, p.name AS program_name, a.title, a.description,
                    a.due_date, a.created_at
             FROM assignments a
             JOIN programs p ON p.id = a.program_id
             WHERE a.program_id = ANY($1)
             ORDER BY a.due_date ASC"
        )
        .bind(program_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_submissions_by_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Vec<SubmissionWithStudent>> {
        let submissions = sqlx::query_as::<_, SubmissionWithStudent>(
            "SELECT s.id, s.assignment_id, s.user_id, u.name AS user_name, u.email AS user_email,
                    s.content, s.file_url, s.status, s.grade, s.feedback,
                    s.created_at, s.updated_at
             FROM submissions s
             JOIN users u ON u.id = s.user_id
             WHERE s.assignment_id = $1
             ORDER BY s.created_at DESC"
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    pub async fn find_submissions_by_user(&self, user_id: Uuid) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE user_id = $1"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    /// Comments on the assignment itself and on any of its submissions.
    pub async fn find_comments_by_assignment(
        &self,
        assignment_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.user_id, u.name AS user_name, c.content,
                    c.assignment_id, c.submission_id, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.assignment_id = $1
                OR c.submission_id IN (SELECT id FROM submissions WHERE assignment_id = $1)
             ORDER BY c.created_at DESC"
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Creates the student's submission or replaces its content, resetting it
    /// to SUBMITTED.
    pub async fn upsert_submission(
        &self,
        assignment_id: Uuid,
        user_id: Uuid,
        content: &str,
        file_url: Option<&str>,
    ) -> Result<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            "INSERT INTO submissions (assignment_id, user_id, content, file_url, status)
             VALUES ($1, $2, $3, $4, 'SUBMITTED')
             ON CONFLICT (assignment_id, user_id) DO UPDATE SET
                content = EXCLUDED.content,
                file_url = EXCLUDED.file_url,
                status = 'SUBMITTED',
                updated_at = NOW()
             RETURNING *"
        )
        .bind(assignment_id)
        .bind(user_id)
        .bind(content)
        .bind(file_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    pub async fn grade_submission(
        &self,
        submission_id: Uuid,
        grade: i32,
        feedback: Option<&str>,
    ) -> Result<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            "UPDATE submissions
             SET grade = $2, feedback = $3, status = 'GRADED', updated_at = NOW()
             WHERE id = $1
             RETURNING *"
        )
        .bind(submission_id)
        .bind(grade)
        .bind(feedback)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    pub async fn submission_exists(&self, submission_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM submissions WHERE id = $1)")
            .bind(submission_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn create_comment(
        &self,
        user_id: Uuid,
        content: &str,
        assignment_id: Option<Uuid>,
        submission_id: Option<Uuid>,
    ) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (user_id, content, assignment_id, submission_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *"
        )
        .bind(user_id)
        .bind(content)
        .bind(assignment_id)
        .bind(submission_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }
}
