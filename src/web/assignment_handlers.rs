// src/web/assignment_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::assignment::{
        Assignment, AssignmentChanges, AssignmentFilter, CreateAssignmentPayload, NewAssignment,
        Priority, Status, UpdateAssignmentPayload,
    },
    services::assignment_service::{self, DEFAULT_UPCOMING_LIMIT},
    state::AppState,
    web::mw_auth::UserId,
};
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
    pub limit: Option<i64>,
}

// --- Validação estrita (a API não faz a inferência da importação) ---

fn parse_priority(raw: Option<&str>) -> AppResult<Option<Priority>> {
    raw.map(|s| s.parse::<Priority>().map_err(AppError::BadRequest))
        .transpose()
}

fn parse_status(raw: Option<&str>) -> AppResult<Option<Status>> {
    raw.map(|s| s.parse::<Status>().map_err(AppError::BadRequest))
        .transpose()
}

fn check_progress(progress: Option<i64>) -> AppResult<Option<i64>> {
    match progress {
        Some(p) if !(0..=100).contains(&p) => Err(AppError::BadRequest(format!(
            "progresso fora de [0, 100]: {}",
            p
        ))),
        other => Ok(other),
    }
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("o campo '{}' é obrigatório", field)));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// GET /api/assignments?status=&subject=
pub async fn list_assignments(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Query(filter): Query<AssignmentFilter>,
) -> AppResult<Json<Vec<Assignment>>> {
    parse_status(filter.status.as_deref())?;
    let assignments =
        assignment_service::list_assignments(&state.db_pool, &user_id, &filter).await?;
    Ok(Json(assignments))
}

// GET /api/assignments/upcoming?limit=
pub async fn upcoming_assignments(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Query(params): Query<UpcomingParams>,
) -> AppResult<Json<Vec<Assignment>>> {
    let limit = params.limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    let assignments =
        assignment_service::upcoming_assignments(&state.db_pool, &user_id, Utc::now(), limit)
            .await?;
    Ok(Json(assignments))
}

// GET /api/assignments/{id}
pub async fn get_assignment(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(id): Path<String>,
) -> AppResult<Json<Assignment>> {
    let assignment = assignment_service::find_assignment(&state.db_pool, &user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Tarefa"))?;
    Ok(Json(assignment))
}

// POST /api/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Json(payload): Json<CreateAssignmentPayload>,
) -> AppResult<(StatusCode, Json<Assignment>)> {
    let new = NewAssignment {
        user_id,
        title: required("title", &payload.title)?,
        description: optional_text(payload.description),
        subject: required("subject", &payload.subject)?,
        due_date: payload.due_date,
        priority: parse_priority(payload.priority.as_deref())?.unwrap_or_default(),
        status: parse_status(payload.status.as_deref())?.unwrap_or_default(),
        progress: check_progress(payload.progress)?.unwrap_or(0),
        teacher: optional_text(payload.teacher),
    };
    let assignment = assignment_service::create_assignment(&state.db_pool, &new).await?;
    tracing::info!("✅ Tarefa '{}' criada ({})", assignment.title, assignment.id);
    Ok((StatusCode::CREATED, Json(assignment)))
}

// PUT /api/assignments/{id}
pub async fn update_assignment(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAssignmentPayload>,
) -> AppResult<Json<Assignment>> {
    let changes = AssignmentChanges {
        title: payload.title.as_deref().map(|t| required("title", t)).transpose()?,
        description: payload.description.map(|d| optional_text(Some(d))),
        subject: payload.subject.as_deref().map(|s| required("subject", s)).transpose()?,
        due_date: payload.due_date,
        priority: parse_priority(payload.priority.as_deref())?,
        status: parse_status(payload.status.as_deref())?,
        progress: check_progress(payload.progress)?,
        teacher: payload.teacher.map(|t| optional_text(Some(t))),
    };
    let assignment = assignment_service::update_assignment(&state.db_pool, &user_id, &id, changes)
        .await?
        .ok_or(AppError::NotFound("Tarefa"))?;
    Ok(Json(assignment))
}

// DELETE /api/assignments/{id}
pub async fn delete_assignment(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !assignment_service::delete_assignment(&state.db_pool, &user_id, &id).await? {
        return Err(AppError::NotFound("Tarefa"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/assignments
pub async fn clear_assignments(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> AppResult<Json<Value>> {
    let deleted = assignment_service::clear_assignments(&state.db_pool, &user_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_vocabulary() {
        assert_eq!(parse_priority(Some("high")).unwrap(), Some(Priority::High));
        assert_eq!(parse_priority(None).unwrap(), None);
        assert!(matches!(parse_priority(Some("URGENT")), Err(AppError::BadRequest(_))));
        assert_eq!(parse_status(Some("in-progress")).unwrap(), Some(Status::InProgress));
        assert!(matches!(parse_status(Some("done")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn progress_bounds() {
        let cases = vec![
            (Some(0), true),
            (Some(100), true),
            (None, true),
            (Some(-1), false),
            (Some(101), false),
        ];
        for (progress, ok) in cases {
            assert_eq!(check_progress(progress).is_ok(), ok, "progresso {:?}", progress);
        }
    }
}
