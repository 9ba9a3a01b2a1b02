// src/services/assignment_service.rs
use crate::{
    error::AppResult,
    models::assignment::{Assignment, AssignmentChanges, AssignmentFilter, NewAssignment},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

pub const DEFAULT_UPCOMING_LIMIT: i64 = 10;

const ASSIGNMENT_COLUMNS: &str = "id, user_id, title, description, subject, due_date, priority, \
     status, progress, teacher, created_at, updated_at";

/// Lista as tarefas de um utilizador, ordenadas pela data de entrega.
pub async fn list_assignments(
    db_pool: &SqlitePool,
    user_id: &str,
    filter: &AssignmentFilter,
) -> AppResult<Vec<Assignment>> {
    tracing::debug!("Listando tarefas de {} (filtro: {:?})", user_id, filter);
    // NULL num filtro significa "sem restrição"
    let sql = format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM assignments
        WHERE user_id = ?1
          AND (?2 IS NULL OR status = ?2)
          AND (?3 IS NULL OR subject = ?3)
        ORDER BY due_date ASC, created_at ASC
        "#
    );
    let assignments = sqlx::query_as::<_, Assignment>(&sql)
        .bind(user_id)
        .bind(filter.status.as_deref())
        .bind(filter.subject.as_deref())
        .fetch_all(db_pool)
        .await?;
    Ok(assignments)
}

pub async fn find_assignment(
    db_pool: &SqlitePool,
    user_id: &str,
    assignment_id: &str,
) -> AppResult<Option<Assignment>> {
    let sql =
        format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?1 AND user_id = ?2");
    let assignment = sqlx::query_as::<_, Assignment>(&sql)
        .bind(assignment_id)
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(assignment)
}

pub async fn create_assignment(db_pool: &SqlitePool, new: &NewAssignment) -> AppResult<Assignment> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    tracing::debug!("Criando tarefa '{}' ({}) para {}", new.title, new.subject, new.user_id);

    let sql = format!(
        r#"
        INSERT INTO assignments
            (id, user_id, title, description, subject, due_date, priority, status, progress,
             teacher, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    );
    let assignment = sqlx::query_as::<_, Assignment>(&sql)
        .bind(&id)
        .bind(&new.user_id)
        .bind(&new.title)
        .bind(new.description.as_deref())
        .bind(&new.subject)
        .bind(new.due_date)
        .bind(new.priority)
        .bind(new.status)
        .bind(new.progress)
        .bind(new.teacher.as_deref())
        .bind(now)
        .fetch_one(db_pool)
        .await?;
    Ok(assignment)
}

/// Aplica alterações parciais. Devolve `None` se a tarefa não existir para este utilizador.
pub async fn update_assignment(
    db_pool: &SqlitePool,
    user_id: &str,
    assignment_id: &str,
    changes: AssignmentChanges,
) -> AppResult<Option<Assignment>> {
    let Some(existing) = find_assignment(db_pool, user_id, assignment_id).await? else {
        tracing::warn!("Tarefa '{}' não encontrada para {}", assignment_id, user_id);
        return Ok(None);
    };

    let title = changes.title.unwrap_or(existing.title);
    let description = changes.description.unwrap_or(existing.description);
    let subject = changes.subject.unwrap_or(existing.subject);
    let due_date = changes.due_date.unwrap_or(existing.due_date);
    let priority = changes.priority.unwrap_or(existing.priority);
    let status = changes.status.unwrap_or(existing.status);
    let progress = changes.progress.unwrap_or(existing.progress);
    let teacher = changes.teacher.unwrap_or(existing.teacher);

    let sql = format!(
        r#"
        UPDATE assignments
        SET title = ?1, description = ?2, subject = ?3, due_date = ?4, priority = ?5,
            status = ?6, progress = ?7, teacher = ?8, updated_at = ?9
        WHERE id = ?10 AND user_id = ?11
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    );
    let updated = sqlx::query_as::<_, Assignment>(&sql)
        .bind(title)
        .bind(description)
        .bind(subject)
        .bind(due_date)
        .bind(priority)
        .bind(status)
        .bind(progress)
        .bind(teacher)
        .bind(Utc::now())
        .bind(assignment_id)
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?;

    tracing::info!("✅ Tarefa '{}' atualizada.", assignment_id);
    Ok(updated)
}

pub async fn delete_assignment(
    db_pool: &SqlitePool,
    user_id: &str,
    assignment_id: &str,
) -> AppResult<bool> {
    let rows_affected = sqlx::query("DELETE FROM assignments WHERE id = ?1 AND user_id = ?2")
        .bind(assignment_id)
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();
    Ok(rows_affected > 0)
}

/// Apaga todas as tarefas do utilizador. Devolve quantas foram apagadas.
pub async fn clear_assignments(db_pool: &SqlitePool, user_id: &str) -> AppResult<u64> {
    let rows_affected = sqlx::query("DELETE FROM assignments WHERE user_id = ?1")
        .bind(user_id)
        .execute(db_pool)
        .await?
        .rows_affected();
    tracing::info!("🧹 {} tarefas apagadas para {}", rows_affected, user_id);
    Ok(rows_affected)
}

/// Próximas tarefas por entregar (a partir de `now`, excluindo concluídas).
pub async fn upcoming_assignments(
    db_pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
    limit: i64,
) -> AppResult<Vec<Assignment>> {
    let sql = format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM assignments
        WHERE user_id = ?1 AND due_date >= ?2 AND status != 'completed'
        ORDER BY due_date ASC
        LIMIT ?3
        "#
    );
    let assignments = sqlx::query_as::<_, Assignment>(&sql)
        .bind(user_id)
        .bind(now)
        .bind(limit.max(0))
        .fetch_all(db_pool)
        .await?;
    Ok(assignments)
}

/// Tarefas com entrega em `[from, to)`.
pub async fn assignments_in_range(
    db_pool: &SqlitePool,
    user_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<Vec<Assignment>> {
    let sql = format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM assignments
        WHERE user_id = ?1 AND due_date >= ?2 AND due_date < ?3
        ORDER BY due_date ASC
        "#
    );
    let assignments = sqlx::query_as::<_, Assignment>(&sql)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db_pool)
        .await?;
    Ok(assignments)
}
