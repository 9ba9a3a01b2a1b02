// src/models/subject.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cores usadas quando uma disciplina é criada implicitamente (ex: importação).
pub const SUBJECT_PALETTE: &[&str] = &[
    "#2196F3", "#4CAF50", "#FF9800", "#9C27B0", "#F44336", "#009688", "#795548", "#607D8B",
];

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub color: String,
    pub teacher: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubjectPayload {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub teacher: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubjectPayload {
    pub name: Option<String>,
    pub color: Option<String>,
    pub teacher: Option<String>,
}
