// src/web/subject_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::subject::{CreateSubjectPayload, Subject, UpdateSubjectPayload},
    services::subject_service,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

// GET /api/subjects
pub async fn list_subjects(State(state): State<AppState>) -> AppResult<Json<Vec<Subject>>> {
    Ok(Json(subject_service::list_subjects(&state.db_pool).await?))
}

// POST /api/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubjectPayload>,
) -> AppResult<(StatusCode, Json<Subject>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("o nome da disciplina é obrigatório".into()));
    }
    let subject = subject_service::create_subject(
        &state.db_pool,
        name,
        payload.color.trim(),
        payload.teacher.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

// PUT /api/subjects/{id}
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSubjectPayload>,
) -> AppResult<Json<Subject>> {
    let subject = subject_service::update_subject(
        &state.db_pool,
        &id,
        payload.name.as_deref(),
        payload.color.as_deref(),
        payload.teacher.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound("Disciplina"))?;
    Ok(Json(subject))
}

// DELETE /api/subjects/{id}
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !subject_service::delete_subject(&state.db_pool, &id).await? {
        return Err(AppError::NotFound("Disciplina"));
    }
    Ok(StatusCode::NO_CONTENT)
}
