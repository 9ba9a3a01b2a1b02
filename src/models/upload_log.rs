// src/models/upload_log.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Estado de uma importação: `processing -> {completed | failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UploadStatus {
    Processing,
    Completed,
    Failed,
}

/// Uma linha da tabela `upload_logs` (histórico, só acrescenta).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLog {
    pub id: String,
    pub user_id: String,
    pub filename: String,
    pub status: UploadStatus,
    pub assignments_created: i64,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewUploadLog {
    pub user_id: String,
    pub filename: String,
}

/// Estado final gravado quando a importação termina.
#[derive(Debug, Clone)]
pub struct UploadLogUpdate {
    pub status: UploadStatus,
    pub assignments_created: i64,
    pub error_message: Option<String>,
    pub processed_at: DateTime<Utc>,
}
