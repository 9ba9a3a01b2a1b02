// src/web/user_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUserPayload, SwitchUserPayload, User},
    services::user_service,
    state::AppState,
    web::mw_auth::{UserId, SESSION_USER_KEY},
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use tower_sessions::Session;

// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = user_service::find_all_users(&state.db_pool).await?;
    Ok(Json(users))
}

// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> AppResult<(StatusCode, Json<User>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("o nome é obrigatório".into()));
    }
    let user = user_service::create_user(
        &state.db_pool,
        name,
        payload.email.as_deref(),
        payload.avatar.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// GET /api/users/current (protegido)
pub async fn current_user(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> AppResult<Json<User>> {
    tracing::debug!("GET /api/users/current: {}", user_id);
    let user = user_service::find_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or_else(|| {
            // A sessão aponta para um utilizador que já não existe
            tracing::warn!("user_id '{}' da sessão não existe na DB", user_id);
            AppError::NotFound("Utilizador")
        })?;
    Ok(Json(user))
}

// POST /api/users/switch (público): define o utilizador ativo da sessão
pub async fn switch_user(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SwitchUserPayload>,
) -> AppResult<Json<User>> {
    let user = user_service::find_user_by_id(&state.db_pool, &payload.user_id)
        .await?
        .ok_or(AppError::NotFound("Utilizador"))?;

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
    session
        .insert(SESSION_USER_KEY, &user.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))?;

    tracing::info!("Sessão passou a usar o utilizador '{}'", user.id);
    Ok(Json(user))
}
