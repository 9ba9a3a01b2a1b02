// src/services/upload_log_service.rs
use crate::{
    error::AppResult,
    models::upload_log::{NewUploadLog, UploadLog, UploadLogUpdate, UploadStatus},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const UPLOAD_LOG_COLUMNS: &str =
    "id, user_id, filename, status, assignments_created, error_message, created_at, processed_at";

/// Regista uma nova importação no estado `processing`.
pub async fn create_upload_log(db_pool: &SqlitePool, new: &NewUploadLog) -> AppResult<UploadLog> {
    let sql = format!(
        r#"
        INSERT INTO upload_logs (id, user_id, filename, status, assignments_created, created_at)
        VALUES (?1, ?2, ?3, ?4, 0, ?5)
        RETURNING {UPLOAD_LOG_COLUMNS}
        "#
    );
    let log = sqlx::query_as::<_, UploadLog>(&sql)
        .bind(Uuid::new_v4().to_string())
        .bind(&new.user_id)
        .bind(&new.filename)
        .bind(UploadStatus::Processing)
        .bind(Utc::now())
        .fetch_one(db_pool)
        .await?;
    tracing::debug!("Upload log '{}' criado para '{}'", log.id, log.filename);
    Ok(log)
}

pub async fn update_upload_log(
    db_pool: &SqlitePool,
    log_id: &str,
    update: &UploadLogUpdate,
) -> AppResult<Option<UploadLog>> {
    let sql = format!(
        r#"
        UPDATE upload_logs
        SET status = ?1, assignments_created = ?2, error_message = ?3, processed_at = ?4
        WHERE id = ?5
        RETURNING {UPLOAD_LOG_COLUMNS}
        "#
    );
    let log = sqlx::query_as::<_, UploadLog>(&sql)
        .bind(update.status)
        .bind(update.assignments_created)
        .bind(update.error_message.as_deref())
        .bind(update.processed_at)
        .bind(log_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(log)
}

/// Histórico de importações do utilizador, mais recentes primeiro.
pub async fn list_upload_logs(db_pool: &SqlitePool, user_id: &str) -> AppResult<Vec<UploadLog>> {
    let sql = format!(
        "SELECT {UPLOAD_LOG_COLUMNS} FROM upload_logs WHERE user_id = ?1 ORDER BY created_at DESC"
    );
    let logs = sqlx::query_as::<_, UploadLog>(&sql)
        .bind(user_id)
        .fetch_all(db_pool)
        .await?;
    Ok(logs)
}
