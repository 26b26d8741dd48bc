use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{enrollment::enrollment_models::ProgramEnrollee, rates::percentage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub program_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceWithProgram {
    pub id: Uuid,
    pub user_id: Uuid,
    pub program_id: Uuid,
    pub program_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: String,
}

/// One participant's line on the roster for a given day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RosterEntry {
    pub enrollment_id: Uuid,
    pub user_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub status: AttendanceStatus,
    pub notes: String,
    pub attendance_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AttendanceStats {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    /// Whole-number percentage of PRESENT records.
    pub attendance_rate: i64,
}

/// Participants without a record for the day are listed as ABSENT.
pub fn build_roster(participants: Vec<ProgramEnrollee>, records: Vec<Attendance>) -> Vec<RosterEntry> {
    let mut by_user: HashMap<Uuid, Attendance> =
        records.into_iter().map(|r| (r.user_id, r)).collect();

    participants
        .into_iter()
        .map(|enrollee| {
            let record = by_user.remove(&enrollee.user_id);
            RosterEntry {
                enrollment_id: enrollee.id,
                user_id: enrollee.user_id,
                student_name: enrollee.user_name,
                student_email: enrollee.user_email,
                status: record.as_ref().map_or(AttendanceStatus::Absent, |r| r.status),
                attendance_id: record.as_ref().map(|r| r.id),
                notes: record.map(|r| r.notes).unwrap_or_default(),
            }
        })
        .collect()
}

pub fn summarize(counts: &[(AttendanceStatus, i64)]) -> AttendanceStats {
    let mut stats = AttendanceStats::default();
    for &(status, count) in counts {
        match status {
            AttendanceStatus::Present => stats.present += count,
            AttendanceStatus::Absent => stats.absent += count,
            AttendanceStatus::Late => stats.late += count,
            AttendanceStatus::Excused => stats.excused += count,
        }
        stats.total += count;
    }
    stats.attendance_rate = percentage(stats.present, stats.total);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrollment::EnrollmentStatus;

    fn enrollee(name: &str) -> ProgramEnrollee {
        ProgramEnrollee {
            id: Uuid::new_v4(),
            status: EnrollmentStatus::Approved,
            message: String::new(),
            registered_at: Utc::now(),
            user_id: Uuid::new_v4(),
            user_name: name.into(),
            user_email: format!("{}@example.com", name.to_lowercase()),
            user_phone: None,
        }
    }

    fn record(user_id: Uuid, status: AttendanceStatus, notes: &str) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            user_id,
            program_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            status,
            notes: notes.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_roster_defaults_to_absent() {
        let alice = enrollee("Alice");
        let bob = enrollee("Bob");
        let records = vec![record(alice.user_id, AttendanceStatus::Late, "Bus delay")];

        let roster = build_roster(vec![alice.clone(), bob.clone()], records);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].status, AttendanceStatus::Late);
        assert_eq!(roster[0].notes, "Bus delay");
        assert!(roster[0].attendance_id.is_some());

        assert_eq!(roster[1].user_id, bob.user_id);
        assert_eq!(roster[1].status, AttendanceStatus::Absent);
        assert_eq!(roster[1].notes, "");
        assert!(roster[1].attendance_id.is_none());
    }

    #[test]
    fn test_roster_ignores_records_of_non_participants() {
        let alice = enrollee("Alice");
        let records = vec![record(Uuid::new_v4(), AttendanceStatus::Present, "")];

        let roster = build_roster(vec![alice], records);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].status, AttendanceStatus::Absent);
    }

    #[test]
    fn test_stats_rate_is_rounded() {
        let stats = summarize(&[
            (AttendanceStatus::Present, 2),
            (AttendanceStatus::Absent, 1),
        ]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.present, 2);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.attendance_rate, 67);
    }

    #[test]
    fn test_stats_empty_program() {
        let stats = summarize(&[]);
        assert_eq!(stats, AttendanceStats::default());
        assert_eq!(stats.attendance_rate, 0);
    }
}
