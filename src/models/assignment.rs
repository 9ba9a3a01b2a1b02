// src/models/assignment.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = String;

    // Vocabulário estrito (API); a importação usa a inferência de `import::fields`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("prioridade desconhecida: '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "in-progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            other => Err(format!("estado desconhecido: '{}'", other)),
        }
    }
}

/// Representa uma linha da tabela `assignments`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub status: Status,
    pub progress: i64,
    pub teacher: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados para criar uma tarefa (já validados).
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub status: Status,
    pub progress: i64,
    pub teacher: Option<String>,
}

/// Corpo JSON de POST /api/assignments
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default)]
    pub teacher: Option<String>,
}

/// Corpo JSON de PUT /api/assignments/{id}: todos os campos opcionais
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub progress: Option<i64>,
    pub teacher: Option<String>,
}

/// Alterações já validadas a aplicar numa tarefa existente.
/// Nos campos opcionais, `Some(None)` apaga o valor gravado.
#[derive(Debug, Default, Clone)]
pub struct AssignmentChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub subject: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub progress: Option<i64>,
    pub teacher: Option<Option<String>>,
}

/// Filtros de GET /api/assignments
#[derive(Debug, Default, Deserialize)]
pub struct AssignmentFilter {
    pub status: Option<String>,
    pub subject: Option<String>,
}
