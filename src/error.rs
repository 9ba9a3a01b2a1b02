// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuração inválida: {0}")]
    Config(String),

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("Não autorizado")]
    Unauthorized,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Pedido inválido: {0}")]
    BadRequest(String),

    #[error("Tipo de ficheiro não suportado: {0}")]
    UnsupportedFileType(String),

    #[error("Ficheiro demasiado grande: {0}")]
    PayloadTooLarge(String),

    // Falha ao nível do ficheiro inteiro (ilegível, sem folhas, ...)
    #[error("Falha ao processar a folha de cálculo: {0}")]
    UploadFatal(String),

    #[error("Erro interno inesperado")]
    InternalServerError,
}

// Como converter AppError numa resposta HTTP (JSON)
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let (status, user_message, detail) = match &self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao aceder aos dados.", None)
            }
            AppError::EnvVarError(_) | AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro de configuração.", None)
            }
            AppError::SessionError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro na gestão da sua sessão.", None)
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Autenticação necessária.", None)
            }
            AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Recurso não encontrado.", Some(self.to_string()))
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Pedido inválido.", Some(msg.clone()))
            }
            AppError::UnsupportedFileType(_) => (
                StatusCode::BAD_REQUEST,
                "Apenas ficheiros Excel (.xlsx, .xls) e CSV são aceites.",
                Some(self.to_string()),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "O ficheiro excede o tamanho máximo permitido.",
                Some(msg.clone()),
            ),
            AppError::UploadFatal(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Falha ao processar a folha de cálculo.",
                Some(msg.clone()),
            ),
            AppError::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.", None)
            }
        };

        let body = match detail {
            Some(error) => json!({ "message": user_message, "error": error }),
            None => json!({ "message": user_message }),
        };

        (status, Json(body)).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
