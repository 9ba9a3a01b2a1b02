// src/services/user_service.rs
use crate::{error::AppResult, models::user::User};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Busca um utilizador na base de dados pelo seu ID.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, avatar, created_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;

    if user.is_some() {
        tracing::debug!("Utilizador '{}' encontrado.", user_id);
    } else {
        tracing::debug!("Utilizador '{}' não encontrado.", user_id);
    }
    Ok(user)
}

/// Busca todos os utilizadores.
pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    tracing::debug!("Buscando todos os utilizadores...");
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, avatar, created_at
        FROM users
        ORDER BY name ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} utilizadores.", users.len());
    Ok(users)
}

pub async fn create_user(
    db_pool: &SqlitePool,
    name: &str,
    email: Option<&str>,
    avatar: Option<&str>,
) -> AppResult<User> {
    let id = Uuid::new_v4().to_string();
    tracing::info!("Criando utilizador '{}' ({})", name, id);

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, avatar, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, name, email, avatar, created_at
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(avatar)
    .bind(Utc::now())
    .fetch_one(db_pool)
    .await?;

    tracing::info!("✅ Utilizador '{}' criado com sucesso.", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, models::user::DEFAULT_USER_ID};

    #[tokio::test]
    async fn default_user_is_seeded() {
        let pool = db::create_memory_pool().await.unwrap();
        let user = find_user_by_id(&pool, DEFAULT_USER_ID).await.unwrap();
        assert!(user.is_some());
    }

    #[tokio::test]
    async fn created_user_is_listed() {
        let pool = db::create_memory_pool().await.unwrap();
        let created = create_user(&pool, "Ana", Some("ana@escola.pt"), None).await.unwrap();

        let users = find_all_users(&pool).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users
            .iter()
            .any(|u| u.id == created.id && u.email.as_deref() == Some("ana@escola.pt")));
    }
}
