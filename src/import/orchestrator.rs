// src/import/orchestrator.rs
use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    import::{
        columns::map_row,
        dates::{normalize_due_date, SlashDateOrder},
        duplicates::DuplicateIndex,
        error::RowError,
        fields::validate,
        row::ImportRow,
        spreadsheet::read_rows,
        store::ImportStore,
    },
    models::upload_log::{NewUploadLog, UploadLogUpdate, UploadStatus},
};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub slash_date_order: SlashDateOrder,
}

impl ImportOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            slash_date_order: config.slash_date_order,
        }
    }
}

/// Resposta de uma importação: `{assignmentsCreated, errors?, message}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub assignments_created: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub message: String,
}

impl ImportSummary {
    fn new(assignments_created: usize, errors: Vec<String>) -> Self {
        let message = if assignments_created > 0 {
            format!("{} tarefas importadas com sucesso", assignments_created)
        } else {
            "Nenhuma tarefa foi importada - verifique os erros abaixo".to_string()
        };
        Self {
            assignments_created,
            errors,
            message,
        }
    }
}

/// Importa as linhas de uma folha para o utilizador indicado.
///
/// Erros de linha ficam na lista do resumo e não interrompem o ciclo.
/// Qualquer outro erro depois de criado o registo de upload (ficheiro
/// ilegível, falha da base de dados) marca-o como `failed` antes de ser
/// devolvido; um ficheiro ilegível é `AppError::UploadFatal`.
pub async fn import_spreadsheet<S>(
    store: &S,
    user_id: &str,
    filename: &str,
    bytes: &[u8],
    options: &ImportOptions,
) -> AppResult<ImportSummary>
where
    S: ImportStore + ?Sized,
{
    tracing::info!("Importação de '{}' ({} bytes) para {}", filename, bytes.len(), user_id);

    let log = store
        .create_upload_log(&NewUploadLog {
            user_id: user_id.to_string(),
            filename: filename.to_string(),
        })
        .await?;

    let mut created = 0usize;
    match run_import(store, user_id, &log.id, filename, bytes, options, &mut created).await {
        Ok(summary) => Ok(summary),
        Err(e) => {
            tracing::warn!("Importação de '{}' falhou: {}", filename, e);
            let failed = UploadLogUpdate {
                status: UploadStatus::Failed,
                assignments_created: created as i64,
                error_message: Some(e.to_string()),
                processed_at: Utc::now(),
            };
            if let Err(update_err) = store.update_upload_log(&log.id, &failed).await {
                tracing::error!(
                    "Falha ao marcar o upload '{}' como failed: {}",
                    log.id,
                    update_err
                );
            }
            Err(e)
        }
    }
}

// Tudo o que acontece depois de o registo de upload existir
async fn run_import<S>(
    store: &S,
    user_id: &str,
    log_id: &str,
    filename: &str,
    bytes: &[u8],
    options: &ImportOptions,
    created: &mut usize,
) -> AppResult<ImportSummary>
where
    S: ImportStore + ?Sized,
{
    let rows = read_rows(filename, bytes).map_err(|e| AppError::UploadFatal(e.to_string()))?;

    let existing = store.list_assignments(user_id).await?;
    let mut index = DuplicateIndex::from_assignments(&existing);

    let mut errors = Vec::new();
    for row in &rows {
        match import_row(store, user_id, row, options, &mut index).await {
            Ok(()) => *created += 1,
            Err(e) => {
                if e.is_informational() {
                    tracing::info!("Linha {}: {}", row.line, e);
                } else {
                    tracing::warn!("Linha {}: {}", row.line, e);
                }
                errors.push(format!("Linha {}: {}", row.line, e));
            }
        }
    }

    store
        .update_upload_log(
            log_id,
            &UploadLogUpdate {
                status: UploadStatus::Completed,
                assignments_created: *created as i64,
                error_message: (!errors.is_empty()).then(|| errors.join("; ")),
                processed_at: Utc::now(),
            },
        )
        .await?;

    tracing::info!(
        "Importação de '{}' concluída: {} criadas, {} erros ({} linhas)",
        filename,
        created,
        errors.len(),
        rows.len()
    );
    Ok(ImportSummary::new(*created, errors))
}

async fn import_row<S>(
    store: &S,
    user_id: &str,
    row: &ImportRow,
    options: &ImportOptions,
    index: &mut DuplicateIndex,
) -> Result<(), RowError>
where
    S: ImportStore + ?Sized,
{
    let validated = validate(map_row(row))?;

    let Some(due_date) = normalize_due_date(&validated.due_date, options.slash_date_order) else {
        return Err(RowError::InvalidDate {
            title: validated.title,
            raw: validated.due_date.as_text(),
        });
    };

    let candidate = validated.into_new_assignment(user_id, due_date);
    if index.is_duplicate(&candidate) {
        return Err(RowError::DuplicateRow {
            title: candidate.title,
            subject: candidate.subject,
        });
    }

    // Disciplina primeiro: uma falha aqui não deixa a tarefa gravada
    store
        .ensure_subject(&candidate.subject)
        .await
        .map_err(|e| RowError::RowProcessing(e.to_string()))?;
    let assignment = store
        .create_assignment(&candidate)
        .await
        .map_err(|e| RowError::RowProcessing(e.to_string()))?;

    index.record(&assignment);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db,
        models::{
            assignment::{Assignment, AssignmentFilter, NewAssignment, Priority, Status},
            subject::Subject,
            upload_log::{NewUploadLog, UploadLog},
        },
        services::{assignment_service, subject_service, upload_log_service},
    };
    use async_trait::async_trait;
    use sqlx::SqlitePool;

    const USER: &str = "default";

    fn options() -> ImportOptions {
        ImportOptions::default()
    }

    // Pool real, mas `create_assignment` falha para um título escolhido
    // e `list_assignments` pode falhar por completo
    struct FailingStore {
        pool: SqlitePool,
        fail_title: &'static str,
        fail_listing: bool,
    }

    #[async_trait]
    impl ImportStore for FailingStore {
        async fn list_assignments(&self, user_id: &str) -> AppResult<Vec<Assignment>> {
            if self.fail_listing {
                return Err(AppError::InternalServerError);
            }
            self.pool.list_assignments(user_id).await
        }

        async fn create_assignment(&self, new: &NewAssignment) -> AppResult<Assignment> {
            if new.title == self.fail_title {
                return Err(AppError::InternalServerError);
            }
            self.pool.create_assignment(new).await
        }

        async fn ensure_subject(&self, name: &str) -> AppResult<Subject> {
            self.pool.ensure_subject(name).await
        }

        async fn create_upload_log(&self, new: &NewUploadLog) -> AppResult<UploadLog> {
            self.pool.create_upload_log(new).await
        }

        async fn update_upload_log(
            &self,
            log_id: &str,
            update: &UploadLogUpdate,
        ) -> AppResult<Option<UploadLog>> {
            self.pool.update_upload_log(log_id, update).await
        }
    }

    const TEN_ROWS: &str = "\
Title,Subject,Due Date,Priority,Status,Progress
Ensaio,English,2024-03-15,high,pending,0
Relatório,Science,03/20/2024,URGENT!!,,
Ensaio,English,2024-03-15,low,done,100
Leitura,History,45000,,,
Teste,Mathematics,2024-04-02,,Finished,150
Ensaio,English,2024-03-15T18:00:00Z,,,
Sem disciplina,,2024-04-05,,,
Projeto,Geografia,2024-04-10,,in progress,45%
Relatório,Science,03/20/2024,,,
Exercícios,Mathematics,2024-04-12,,,
";

    #[tokio::test]
    async fn ten_rows_with_three_duplicates_and_one_missing_field() {
        let pool = db::create_memory_pool().await.unwrap();

        let summary =
            import_spreadsheet(&pool, USER, "tarefas.csv", TEN_ROWS.as_bytes(), &options())
                .await
                .unwrap();

        assert_eq!(summary.assignments_created, 6);
        assert_eq!(summary.errors.len(), 4, "{:?}", summary.errors);
        assert_eq!(summary.message, "6 tarefas importadas com sucesso");
        assert!(summary.errors.iter().any(|e| e.starts_with("Linha 8: campos obrigatórios")));
        assert_eq!(
            summary.errors.iter().filter(|e| e.contains("duplicada")).count(),
            3
        );

        let all = assignment_service::list_assignments(&pool, USER, &AssignmentFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 6);

        let report = all.iter().find(|a| a.title == "Relatório").unwrap();
        assert_eq!(report.priority, Priority::High);
        let test = all.iter().find(|a| a.title == "Teste").unwrap();
        assert_eq!(test.status, Status::Completed);
        assert_eq!(test.progress, 100);
        let project = all.iter().find(|a| a.title == "Projeto").unwrap();
        assert_eq!(project.status, Status::InProgress);
        assert_eq!(project.progress, 45);
        let reading = all.iter().find(|a| a.title == "Leitura").unwrap();
        assert_eq!(reading.due_date.date_naive().to_string(), "2023-03-15");

        // Disciplina desconhecida criada implicitamente
        assert!(subject_service::find_subject_by_name(&pool, "Geografia")
            .await
            .unwrap()
            .is_some());

        let logs = upload_log_service::list_upload_logs(&pool, USER).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, UploadStatus::Completed);
        assert_eq!(logs[0].assignments_created, 6);
        assert_eq!(logs[0].error_message.as_deref(), Some(summary.errors.join("; ").as_str()));
        assert!(logs[0].processed_at.is_some());
    }

    #[tokio::test]
    async fn reimport_creates_nothing() {
        let pool = db::create_memory_pool().await.unwrap();
        import_spreadsheet(&pool, USER, "a.csv", TEN_ROWS.as_bytes(), &options())
            .await
            .unwrap();

        let second = import_spreadsheet(&pool, USER, "a.csv", TEN_ROWS.as_bytes(), &options())
            .await
            .unwrap();
        assert_eq!(second.assignments_created, 0);
        assert_eq!(second.errors.len(), 10);
        assert!(second.message.starts_with("Nenhuma tarefa"));

        let logs = upload_log_service::list_upload_logs(&pool, USER).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.status == UploadStatus::Completed));
    }

    #[tokio::test]
    async fn invalid_date_is_reported_with_raw_value() {
        let pool = db::create_memory_pool().await.unwrap();
        let data = "Title,Subject,Due Date\nEnsaio,English,amanhã\nLeitura,English,25/12/2024\n";

        let summary = import_spreadsheet(&pool, USER, "d.csv", data.as_bytes(), &options())
            .await
            .unwrap();
        assert_eq!(summary.assignments_created, 0);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].contains("amanhã"), "{}", summary.errors[0]);

        let day_first = ImportOptions {
            slash_date_order: SlashDateOrder::DayFirst,
        };
        let summary = import_spreadsheet(&pool, USER, "d.csv", data.as_bytes(), &day_first)
            .await
            .unwrap();
        assert_eq!(summary.assignments_created, 1);
    }

    #[tokio::test]
    async fn store_failure_does_not_stop_the_loop() {
        let pool = db::create_memory_pool().await.unwrap();
        let store = FailingStore {
            pool: pool.clone(),
            fail_title: "Relatório",
            fail_listing: false,
        };
        let data = "Title,Subject,Due Date\n\
                    Ensaio,English,2024-03-15\n\
                    Relatório,Science,2024-03-16\n\
                    Teste,History,2024-03-17\n";

        let summary = import_spreadsheet(&store, USER, "f.csv", data.as_bytes(), &options())
            .await
            .unwrap();
        assert_eq!(summary.assignments_created, 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("Linha 3: erro ao processar a tarefa"));
    }

    #[tokio::test]
    async fn storage_failure_after_log_creation_marks_log_failed() {
        let pool = db::create_memory_pool().await.unwrap();
        let store = FailingStore {
            pool: pool.clone(),
            fail_title: "",
            fail_listing: true,
        };
        let data = "Title,Subject,Due Date\nEnsaio,English,2024-03-15\n";

        let result = import_spreadsheet(&store, USER, "a.csv", data.as_bytes(), &options()).await;
        assert!(matches!(result, Err(AppError::InternalServerError)));

        let logs = upload_log_service::list_upload_logs(&pool, USER).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, UploadStatus::Failed);
        assert_eq!(logs[0].assignments_created, 0);
        assert!(logs[0].processed_at.is_some());
        assert!(logs[0].error_message.is_some());
    }

    #[tokio::test]
    async fn unreadable_file_marks_log_failed() {
        let pool = db::create_memory_pool().await.unwrap();

        let result =
            import_spreadsheet(&pool, USER, "lixo.xlsx", b"nada de zip aqui", &options()).await;
        assert!(matches!(result, Err(AppError::UploadFatal(_))));

        let logs = upload_log_service::list_upload_logs(&pool, USER).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, UploadStatus::Failed);
        assert_eq!(logs[0].assignments_created, 0);
        assert!(logs[0].error_message.is_some());

        let all = assignment_service::list_assignments(&pool, USER, &AssignmentFilter::default())
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn summary_json_omits_empty_errors() {
        let json = serde_json::to_value(ImportSummary::new(2, Vec::new())).unwrap();
        assert_eq!(json["assignmentsCreated"], 2);
        assert!(json.get("errors").is_none());

        let json = serde_json::to_value(ImportSummary::new(0, vec!["x".into()])).unwrap();
        assert_eq!(json["errors"][0], "x");
    }
}
