// src/import/store.rs
use crate::{
    error::AppResult,
    models::{
        assignment::{Assignment, AssignmentFilter, NewAssignment},
        subject::Subject,
        upload_log::{NewUploadLog, UploadLog, UploadLogUpdate},
    },
    services::{assignment_service, subject_service, upload_log_service},
};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Persistência usada pela importação. Implementada pelo pool SQLite;
/// os testes podem envolver outra implementação para injetar falhas.
#[async_trait]
pub trait ImportStore: Send + Sync {
    async fn list_assignments(&self, user_id: &str) -> AppResult<Vec<Assignment>>;

    async fn create_assignment(&self, new: &NewAssignment) -> AppResult<Assignment>;

    async fn ensure_subject(&self, name: &str) -> AppResult<Subject>;

    async fn create_upload_log(&self, new: &NewUploadLog) -> AppResult<UploadLog>;

    async fn update_upload_log(
        &self,
        log_id: &str,
        update: &UploadLogUpdate,
    ) -> AppResult<Option<UploadLog>>;
}

#[async_trait]
impl ImportStore for SqlitePool {
    async fn list_assignments(&self, user_id: &str) -> AppResult<Vec<Assignment>> {
        assignment_service::list_assignments(self, user_id, &AssignmentFilter::default()).await
    }

    async fn create_assignment(&self, new: &NewAssignment) -> AppResult<Assignment> {
        assignment_service::create_assignment(self, new).await
    }

    async fn ensure_subject(&self, name: &str) -> AppResult<Subject> {
        subject_service::ensure_subject(self, name).await
    }

    async fn create_upload_log(&self, new: &NewUploadLog) -> AppResult<UploadLog> {
        upload_log_service::create_upload_log(self, new).await
    }

    async fn update_upload_log(
        &self,
        log_id: &str,
        update: &UploadLogUpdate,
    ) -> AppResult<Option<UploadLog>> {
        upload_log_service::update_upload_log(self, log_id, update).await
    }
}
