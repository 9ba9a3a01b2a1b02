// src/services/stats_service.rs
use crate::{
    error::AppResult,
    models::assignment::{Assignment, AssignmentFilter, Status},
    services::assignment_service,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

/// Contadores do painel principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub due_today: usize,
    pub this_week: usize,
    pub completed: usize,
    pub total_active: usize,
}

pub async fn dashboard_stats(
    db_pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
) -> AppResult<DashboardStats> {
    let assignments =
        assignment_service::list_assignments(db_pool, user_id, &AssignmentFilter::default()).await?;
    Ok(compute_stats(&assignments, now))
}

/// "Hoje" é o dia civil UTC de `now`; "esta semana" vai do início de hoje a +7 dias.
pub fn compute_stats(assignments: &[Assignment], now: DateTime<Utc>) -> DashboardStats {
    let today = now.date_naive();
    let start_of_today = today.and_time(NaiveTime::MIN).and_utc();
    let week_end = start_of_today + Duration::days(7);

    let mut stats = DashboardStats::default();
    for assignment in assignments {
        if assignment.status == Status::Completed {
            stats.completed += 1;
            continue;
        }
        stats.total_active += 1;
        if assignment.due_date.date_naive() == today {
            stats.due_today += 1;
        }
        if assignment.due_date >= start_of_today && assignment.due_date <= week_end {
            stats.this_week += 1;
        }
    }
    stats
}
