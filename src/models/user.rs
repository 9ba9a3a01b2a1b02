// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Utilizador criado pelas migrações, usado enquanto não há outro
pub const DEFAULT_USER_ID: &str = "default";

// Representa um utilizador lido da tabela 'users'
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

// Corpo de POST /api/users/switch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchUserPayload {
    pub user_id: String,
}
