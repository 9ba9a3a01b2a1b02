// src/web/upload_handlers.rs
use crate::{
    error::{AppError, AppResult},
    import::{self, spreadsheet::is_accepted_filename, ImportOptions, ImportSummary},
    models::upload_log::UploadLog,
    services::upload_log_service,
    state::AppState,
    web::mw_auth::UserId,
};
use axum::{
    extract::{multipart::MultipartError, Extension, Multipart, State},
    http::StatusCode,
    Json,
};

// Nome do campo multipart com o ficheiro
const FILE_FIELD: &str = "file";

// O limite de DefaultBodyLimit chega como erro de multipart com 413
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejeitado: acima de MAX_UPLOAD_BYTES");
        return AppError::PayloadTooLarge(e.body_text());
    }
    AppError::BadRequest(format!("{}: {}", context, e))
}

// POST /api/spreadsheet/upload
pub async fn upload_spreadsheet(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("multipart inválido", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("falha ao ler o ficheiro", e))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let Some((filename, bytes)) = upload else {
        tracing::warn!("Upload sem campo '{}'", FILE_FIELD);
        return Err(AppError::BadRequest("nenhum ficheiro enviado".into()));
    };
    if !is_accepted_filename(&filename) {
        return Err(AppError::UnsupportedFileType(filename));
    }

    let options = ImportOptions::from_config(&state.config);
    let summary =
        import::import_spreadsheet(&state.db_pool, &user_id, &filename, &bytes, &options).await?;
    Ok(Json(summary))
}

// GET /api/uploads
pub async fn list_uploads(
    State(state): State<AppState>,
    Extension(UserId(user_id)): Extension<UserId>,
) -> AppResult<Json<Vec<UploadLog>>> {
    Ok(Json(upload_log_service::list_upload_logs(&state.db_pool, &user_id).await?))
}
