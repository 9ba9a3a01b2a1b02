// src/web/dashboard_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::assignment::Assignment,
    services::{
        assignment_service,
        stats_service::{self, DashboardStats},
    },
    state::AppState,
    web::mw_auth::UserId,
};
use axum::{
    extract::{Extension, Query, State},
    Json,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

// GET /api/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> AppResult<Json<DashboardStats>> {
    let stats = stats_service::dashboard_stats(&state.db_pool, &user_id, Utc::now()).await?;
    Ok(Json(stats))
}

// GET /api/calendar?year=&month=
// Tarefas do mês agrupadas por dia de entrega ("AAAA-MM-DD" -> tarefas)
pub async fn calendar(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Query(params): Query<CalendarParams>,
) -> AppResult<Json<BTreeMap<String, Vec<Assignment>>>> {
    let today = Utc::now().date_naive();
    let year = params.year.unwrap_or(today.year());
    let month = params.month.unwrap_or(today.month());
    let (from, to) = month_bounds(year, month)
        .ok_or_else(|| AppError::BadRequest(format!("mês inválido: {}-{}", year, month)))?;

    let assignments =
        assignment_service::assignments_in_range(&state.db_pool, &user_id, from, to).await?;
    tracing::debug!(
        "Calendário {}-{:02} de {}: {} tarefas",
        year,
        month,
        user_id,
        assignments.len()
    );
    Ok(Json(group_by_day(assignments)))
}

/// `[primeiro dia do mês, primeiro dia do mês seguinte)` em UTC.
fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        first.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    ))
}

fn group_by_day(assignments: Vec<Assignment>) -> BTreeMap<String, Vec<Assignment>> {
    let mut days: BTreeMap<String, Vec<Assignment>> = BTreeMap::new();
    for assignment in assignments {
        let key = assignment.due_date.date_naive().format("%Y-%m-%d").to_string();
        days.entry(key).or_default().push(assignment);
    }
    days
}
