use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A labelled value, the common shape of every chart series.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct ChartPoint {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow, ToSchema)]
pub struct RecentActivity {
    pub new_users: i64,
    pub new_enrollments: i64,
    pub updated_programs: i64,
    pub approved_enrollments: i64,
    pub rejected_enrollments: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_students: i64,
    pub total_programs: i64,
    pub total_enrollments: i64,
    pub active_programs: i64,
    pub pending_enrollments: i64,
    pub completion_rate: i64,
}

#[derive(Debug, FromRow)]
pub struct SummaryCounts {
    pub total_students: i64,
    pub total_programs: i64,
    pub total_enrollments: i64,
    pub active_programs: i64,
    pub pending_enrollments: i64,
    pub completed_enrollments: i64,
}

#[derive(Debug, FromRow)]
pub struct ProgramCompletionRow {
    pub name: String,
    pub total: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UpcomingSession {
    pub id: Uuid,
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub enrollments: i64,
}

/// A half-open `[start, end)` range covering one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthWindow {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The last `count` calendar months, oldest first. The current month ends at
/// `now`; earlier months end where the following month starts.
pub fn month_windows(now: DateTime<Utc>, count: u32) -> Vec<MonthWindow> {
    let today = now.date_naive();
    let this_month = today.with_day(1).unwrap_or(today);

    let month_start = |back: u32| {
        this_month
            .checked_sub_months(Months::new(back))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    };

    let mut windows: Vec<MonthWindow> = (0..count)
        .filter_map(|back| {
            let start = month_start(back)?;
            let end = if back == 0 { now } else { month_start(back - 1)? };
            Some(MonthWindow {
                label: start.format("%b %Y").to_string(),
                start,
                end,
            })
        })
        .collect();

    windows.reverse();
    windows
}

/// One point per value of `all`, in that order, with 0 for values missing
/// from `counts`.
pub fn zero_fill<T>(all: &[T], counts: &[(T, i64)]) -> Vec<ChartPoint>
where
    T: PartialEq + std::fmt::Display,
{
    all.iter()
        .map(|item| ChartPoint {
            name: item.to_string(),
            value: counts
                .iter()
                .filter(|(key, _)| key == item)
                .map(|(_, count)| *count)
                .sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrollment::EnrollmentStatus;
    use crate::user::UserRole;

    #[test]
    fn test_month_windows_cover_six_months() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 30, 0).unwrap();
        let windows = month_windows(now, 6);

        let labels: Vec<_> = windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Oct 2024", "Nov 2024", "Dec 2024", "Jan 2025", "Feb 2025", "Mar 2025"]
        );

        assert_eq!(windows[0].start, Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[0].end, Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[5].start, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[5].end, now);
    }

    #[test]
    fn test_month_windows_are_contiguous() {
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let windows = month_windows(now, 6);
        assert_eq!(windows.len(), 6);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(windows[4].label, "Dec 2024");
    }

    #[test]
    fn test_zero_fill_keeps_declared_order() {
        let counts = vec![(EnrollmentStatus::Completed, 4), (EnrollmentStatus::Pending, 2)];
        let points = zero_fill(&EnrollmentStatus::ALL, &counts);

        let values: Vec<_> = points.iter().map(|p| (p.name.as_str(), p.value)).collect();
        assert_eq!(
            values,
            vec![
                ("PENDING", 2),
                ("APPROVED", 0),
                ("REJECTED", 0),
                ("COMPLETED", 4),
                ("WITHDRAWN", 0)
            ]
        );
    }

    #[test]
    fn test_zero_fill_empty_counts() {
        let points = zero_fill(&UserRole::ALL, &[]);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.value == 0));
        assert_eq!(points[2].name, "STUDENT");
    }
}
