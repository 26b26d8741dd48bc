use crate::analytics::analytics_models::{
    month_windows, zero_fill, ChartPoint, DashboardSummary, ProgramCompletionRow, RecentActivity,
    SummaryCounts, UpcomingSession,
};
use crate::db::DbPool;
use crate::enrollment::EnrollmentStatus;
use crate::error::Result;
use crate::program::ProgramStatus;
use crate::rates::percentage;
use crate::user::UserRole;
use chrono::{Duration, Utc};

const TREND_MONTHS: u32 = 6;
const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Read-only aggregate queries for the admin dashboard.
#[derive(Clone)]
pub struct AnalyticsService {
    db: DbPool,
}

impl AnalyticsService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// New enrollments per calendar month, oldest first.
    pub async fn enrollment_trends(&self) -> Result<Vec<ChartPoint>> {
        let mut points = Vec::with_capacity(TREND_MONTHS as usize);

        for window in month_windows(Utc::now(), TREND_MONTHS) {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM enrollments WHERE registered_at >= $1 AND registered_at < $2"
            )
            .bind(window.start)
            .bind(window.end)
            .fetch_one(&self.db)
            .await?;

            points.push(ChartPoint {
                name: window.label,
                value: count,
            });
        }

        Ok(points)
    }

    pub async fn program_popularity(&self) -> Result<Vec<ChartPoint>> {
        let points = sqlx::query_as::<_, ChartPoint>(
            "SELECT p.name, COUNT(e.id) AS value
             FROM programs p
             LEFT JOIN enrollments e ON e.program_id = p.id
             GROUP BY p.id, p.name
             ORDER BY value DESC, p.name ASC
             LIMIT 5"
        )
        .fetch_all(&self.db)
        .await?;

        Ok(points)
    }

    pub async fn enrollment_status_distribution(&self) -> Result<Vec<ChartPoint>> {
        let counts = sqlx::query_as::<_, (EnrollmentStatus, i64)>(
            "SELECT status, COUNT(*) FROM enrollments GROUP BY status"
        )
        .fetch_all(&self.db)
        .await?;

        Ok(zero_fill(&EnrollmentStatus::ALL, &counts))
    }

    pub async fn program_status_distribution(&self) -> Result<Vec<ChartPoint>> {
        let counts = sqlx::query_as::<_, (ProgramStatus, i64)>(
            "SELECT status, COUNT(*) FROM programs GROUP BY status"
        )
        .fetch_all(&self.db)
        .await?;

        Ok(zero_fill(&ProgramStatus::ALL, &counts))
    }

    pub async fn user_role_distribution(&self) -> Result<Vec<ChartPoint>> {
        let counts = sqlx::query_as::<_, (UserRole, i64)>(
            "SELECT role, COUNT(*) FROM users GROUP BY role"
        )
        .fetch_all(&self.db)
        .await?;

        Ok(zero_fill(&UserRole::ALL, &counts))
    }

    pub async fn recent_activity(&self) -> Result<RecentActivity> {
        let since = Utc::now() - Duration::days(ACTIVITY_WINDOW_DAYS);

        let activity = sqlx::query_as::<_, RecentActivity>(
            "SELECT
                (SELECT COUNT(*) FROM users WHERE created_at >= $1) AS new_users,
                (SELECT COUNT(*) FROM enrollments WHERE registered_at >= $1) AS new_enrollments,
                (SELECT COUNT(*) FROM programs WHERE updated_at >= $1) AS updated_programs,
                (SELECT COUNT(*) FROM enrollments
                    WHERE status = 'APPROVED' AND updated_at >= $1) AS approved_enrollments,
                (SELECT COUNT(*) FROM enrollments
                    WHERE status = 'REJECTED' AND updated_at >= $1) AS rejected_enrollments"
        )
        .bind(since)
        .fetch_one(&self.db)
        .await?;

        Ok(activity)
    }

    /// Share of COMPLETED enrollments for up to five running or finished programs.
    pub async fn completion_rates(&self) -> Result<Vec<ChartPoint>> {
        let rows = sqlx::query_as::<_, ProgramCompletionRow>(
            "SELECT p.name,
                    COUNT(e.id) AS total,
                    COUNT(e.id) FILTER (WHERE e.status = 'COMPLETED') AS completed
             FROM programs p
             LEFT JOIN enrollments e ON e.program_id = p.id
             WHERE p.status IN ('ACTIVE', 'COMPLETED')
             GROUP BY p.id, p.name, p.created_at
             ORDER BY p.created_at ASC
             LIMIT 5"
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ChartPoint {
                value: percentage(row.completed, row.total),
                name: row.name,
            })
            .collect())
    }

    pub async fn summary(&self) -> Result<DashboardSummary> {
        let counts = sqlx::query_as::<_, SummaryCounts>(
            "SELECT
                (SELECT COUNT(*) FROM users WHERE role = 'STUDENT') AS total_students,
                (SELECT COUNT(*) FROM programs) AS total_programs,
                (SELECT COUNT(*) FROM enrollments) AS total_enrollments,
                (SELECT COUNT(*) FROM programs WHERE status = 'ACTIVE') AS active_programs,
                (SELECT COUNT(*) FROM enrollments WHERE status = 'PENDING') AS pending_enrollments,
                (SELECT COUNT(*) FROM enrollments WHERE status = 'COMPLETED') AS completed_enrollments"
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardSummary {
            total_students: counts.total_students,
            total_programs: counts.total_programs,
            total_enrollments: counts.total_enrollments,
            active_programs: counts.active_programs,
            pending_enrollments: counts.pending_enrollments,
            completion_rate: percentage(counts.completed_enrollments, counts.total_enrollments),
        })
    }

    /// ACTIVE programs starting within the next week, or already started.
    pub async fn upcoming_sessions(&self) -> Result<Vec<UpcomingSession>> {
        let horizon = Utc::now() + Duration::days(ACTIVITY_WINDOW_DAYS);

        let sessions = sqlx::query_as::<_, UpcomingSession>(
            "SELECT p.id, p.name, p.start_date AS date, COUNT(e.id) AS enrollments
             FROM programs p
             LEFT JOIN enrollments e ON e.program_id = p.id
             WHERE p.status = 'ACTIVE' AND p.start_date <= $1
             GROUP BY p.id, p.name, p.start_date
             ORDER BY p.start_date ASC
             LIMIT 3"
        )
        .bind(horizon)
        .fetch_all(&self.db)
        .await?;

        Ok(sessions)
    }
}
