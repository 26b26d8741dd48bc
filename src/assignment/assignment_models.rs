use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::program::ProgramSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "submission_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
    Returned,
}

/// What a student sees next to each assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentProgress {
    Pending,
    Overdue,
    Submitted,
    Graded,
    Returned,
}

impl From<SubmissionStatus> for AssignmentProgress {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Submitted => AssignmentProgress::Submitted,
            SubmissionStatus::Graded => AssignmentProgress::Graded,
            SubmissionStatus::Returned => AssignmentProgress::Returned,
        }
    }
}

/// A submission decides the progress; without one the assignment is overdue
/// once the due date has passed.
pub fn derive_progress(
    submission: Option<SubmissionStatus>,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AssignmentProgress {
    match submission {
        Some(status) => status.into(),
        None if due_date < now => AssignmentProgress::Overdue,
        None => AssignmentProgress::Pending,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub program_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Program listing row.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssignmentListItem {
    pub id: Uuid,
    pub program_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub created_by: Uuid,
    pub creator_name: String,
    pub submission_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AssignmentWithProgram {
    pub id: Uuid,
    pub program_id: Uuid,
    pub program_name: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub file_url: Option<String>,
    pub status: SubmissionStatus,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SubmissionWithStudent {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub content: String,
    pub file_url: Option<String>,
    pub status: SubmissionStatus,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub assignment_id: Option<Uuid>,
    pub submission_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub content: String,
    pub assignment_id: Option<Uuid>,
    pub submission_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignmentDetail {
    pub assignment: Assignment,
    pub program: ProgramSummary,
    pub creator_name: String,
    pub submissions: Vec<SubmissionWithStudent>,
    pub comments: Vec<CommentWithAuthor>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentAssignment {
    pub assignment: AssignmentWithProgram,
    pub submission: Option<Submission>,
    pub status: AssignmentProgress,
}

/// Pairs each assignment with the student's own submission, if any.
pub fn build_student_assignments(
    assignments: Vec<AssignmentWithProgram>,
    submissions: Vec<Submission>,
    now: DateTime<Utc>,
) -> Vec<StudentAssignment> {
    let mut by_assignment: HashMap<Uuid, Submission> = submissions
        .into_iter()
        .map(|s| (s.assignment_id, s))
        .collect();

    assignments
        .into_iter()
        .map(|assignment| {
            let submission = by_assignment.remove(&assignment.id);
            let status = derive_progress(
                submission.as_ref().map(|s| s.status),
                assignment.due_date,
                now,
            );
            StudentAssignment {
                assignment,
                submission,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn assignment(due_date: DateTime<Utc>) -> AssignmentWithProgram {
        AssignmentWithProgram {
            id: Uuid::new_v4(),
            program_id: Uuid::new_v4(),
            program_name: "Web Development".into(),
            title: "Portfolio".into(),
            description: "Build a personal portfolio site".into(),
            due_date,
            created_at: Utc::now(),
        }
    }

    fn submission_for(assignment_id: Uuid, status: SubmissionStatus) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            assignment_id,
            user_id: Uuid::new_v4(),
            content: "https://github.com/student/portfolio".into(),
            file_url: None,
            status,
            grade: None,
            feedback: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_pending_before_due_date() {
        let now = Utc::now();
        assert_eq!(
            derive_progress(None, now + Duration::days(1), now),
            AssignmentProgress::Pending
        );
    }

    #[test]
    fn test_progress_overdue_after_due_date() {
        let now = Utc::now();
        assert_eq!(
            derive_progress(None, now - Duration::hours(1), now),
            AssignmentProgress::Overdue
        );
    }

    #[test]
    fn test_submission_status_wins_over_due_date() {
        let now = Utc::now();
        let past = now - Duration::days(3);
        assert_eq!(
            derive_progress(Some(SubmissionStatus::Submitted), past, now),
            AssignmentProgress::Submitted
        );
        assert_eq!(
            derive_progress(Some(SubmissionStatus::Graded), past, now),
            AssignmentProgress::Graded
        );
    }

    #[test]
    fn test_student_assignments_match_submissions() {
        let now = Utc::now();
        let done = assignment(now - Duration::days(2));
        let missed = assignment(now - Duration::days(1));
        let upcoming = assignment(now + Duration::days(5));
        let submissions = vec![submission_for(done.id, SubmissionStatus::Graded)];

        let view = build_student_assignments(vec![done, missed, upcoming], submissions, now);

        let statuses: Vec<_> = view.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                AssignmentProgress::Graded,
                AssignmentProgress::Overdue,
                AssignmentProgress::Pending
            ]
        );
        assert!(view[0].submission.is_some());
        assert!(view[1].submission.is_none());
    }
}
