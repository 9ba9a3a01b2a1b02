// src/services/subject_service.rs
use crate::{
    error::{AppError, AppResult},
    models::subject::{Subject, SUBJECT_PALETTE},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const SUBJECT_COLUMNS: &str = "id, name, color, teacher, created_at";

pub async fn list_subjects(db_pool: &SqlitePool) -> AppResult<Vec<Subject>> {
    let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY name ASC");
    let subjects = sqlx::query_as::<_, Subject>(&sql).fetch_all(db_pool).await?;
    Ok(subjects)
}

pub async fn find_subject_by_name(db_pool: &SqlitePool, name: &str) -> AppResult<Option<Subject>> {
    let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE name = ?1");
    let subject = sqlx::query_as::<_, Subject>(&sql)
        .bind(name)
        .fetch_optional(db_pool)
        .await?;
    Ok(subject)
}

pub async fn create_subject(
    db_pool: &SqlitePool,
    name: &str,
    color: &str,
    teacher: Option<&str>,
) -> AppResult<Subject> {
    tracing::info!("Criando disciplina '{}'", name);
    let sql = format!(
        r#"
        INSERT INTO subjects (id, name, color, teacher, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING {SUBJECT_COLUMNS}
        "#
    );
    let result = sqlx::query_as::<_, Subject>(&sql)
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(color)
        .bind(teacher)
        .bind(Utc::now())
        .fetch_one(db_pool)
        .await;

    // Nome duplicado (UNIQUE) é um erro do cliente, não do servidor
    if let Err(sqlx::Error::Database(db_err)) = &result {
        if db_err.is_unique_violation() {
            tracing::warn!("Falha ao criar disciplina: '{}' já existe.", name);
            return Err(AppError::BadRequest(format!("a disciplina '{}' já existe", name)));
        }
    }
    Ok(result?)
}

pub async fn update_subject(
    db_pool: &SqlitePool,
    subject_id: &str,
    name: Option<&str>,
    color: Option<&str>,
    teacher: Option<&str>,
) -> AppResult<Option<Subject>> {
    let sql = format!(
        r#"
        UPDATE subjects
        SET name = COALESCE(?1, name),
            color = COALESCE(?2, color),
            teacher = COALESCE(?3, teacher)
        WHERE id = ?4
        RETURNING {SUBJECT_COLUMNS}
        "#
    );
    let subject = sqlx::query_as::<_, Subject>(&sql)
        .bind(name)
        .bind(color)
        .bind(teacher)
        .bind(subject_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(subject)
}

pub async fn delete_subject(db_pool: &SqlitePool, subject_id: &str) -> AppResult<bool> {
    let rows_affected = sqlx::query("DELETE FROM subjects WHERE id = ?1")
        .bind(subject_id)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

/// Garante que existe uma disciplina com este nome, criando-a com uma cor da paleta se preciso.
pub async fn ensure_subject(db_pool: &SqlitePool, name: &str) -> AppResult<Subject> {
    if let Some(subject) = find_subject_by_name(db_pool, name).await? {
        return Ok(subject);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
        .fetch_one(db_pool)
        .await?;
    let color = SUBJECT_PALETTE[count as usize % SUBJECT_PALETTE.len()];
    tracing::info!("Disciplina '{}' não existe, criando implicitamente ({})", name, color);

    sqlx::query(
        r#"
        INSERT INTO subjects (id, name, color, teacher, created_at)
        VALUES (?1, ?2, ?3, NULL, ?4)
        ON CONFLICT(name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(color)
    .bind(Utc::now())
    .execute(db_pool)
    .await?;

    find_subject_by_name(db_pool, name)
        .await?
        .ok_or(AppError::InternalServerError)
}
