use crate::attendance::attendance_dto::MarkAttendanceRequest;
use crate::attendance::attendance_models::{
    build_roster, summarize, Attendance, AttendanceStats, AttendanceWithProgram, RosterEntry,
};
use crate::attendance::attendance_repository::AttendanceRepository;
use crate::enrollment::EnrollmentRepository;
use crate::error::Result;
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Clone)]
pub struct AttendanceService {
    repo: AttendanceRepository,
    enrollment_repo: EnrollmentRepository,
}

impl AttendanceService {
    pub fn new(repo: AttendanceRepository, enrollment_repo: EnrollmentRepository) -> Self {
        Self {
            repo,
            enrollment_repo,
        }
    }

    pub async fn mark(&self, payload: MarkAttendanceRequest) -> Result<Attendance> {
        let notes = payload.notes.as_deref().map(str::trim).unwrap_or_default();
        let attendance = self
            .repo
            .upsert(payload.user_id, payload.program_id, payload.date, payload.status, notes)
            .await?;

        tracing::debug!(
            "Attendance for {} in {} on {} set to {:?}",
            payload.user_id,
            payload.program_id,
            payload.date,
            payload.status
        );
        Ok(attendance)
    }

    pub async fn roster(&self, program_id: Uuid, date: NaiveDate) -> Result<Vec<RosterEntry>> {
        let participants = self.enrollment_repo.find_participants(program_id).await?;
        let records = self.repo.find_by_program_and_date(program_id, date).await?;

        Ok(build_roster(participants, records))
    }

    pub async fn student_records(
        &self,
        user_id: Uuid,
        program_id: Option<Uuid>,
    ) -> Result<Vec<AttendanceWithProgram>> {
        self.repo.find_by_user(user_id, program_id).await
    }

    pub async fn stats(&self, program_id: Uuid) -> Result<AttendanceStats> {
        let counts = self.repo.count_by_status(program_id).await?;
        Ok(summarize(&counts))
    }
}
