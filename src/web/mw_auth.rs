// src/web/mw_auth.rs
use crate::error::AppError;
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

// Chave da sessão onde fica o utilizador ativo
pub const SESSION_USER_KEY: &str = "user_id";

// Middleware que exige um utilizador ativo na sessão
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<String>(SESSION_USER_KEY).await {
        Ok(Some(user_id)) => {
            tracing::debug!("Autenticação MW: utilizador '{}' ativo.", user_id);
            // Os handlers protegidos leem o id daqui, nunca da sessão
            request.extensions_mut().insert(UserId(user_id));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::debug!("Autenticação MW: sem user_id na sessão.");
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            tracing::error!("Autenticação MW: erro ao ler sessão: {:?}", e);
            Err(AppError::SessionError(format!("Erro ao verificar sessão: {}", e)))
        }
    }
}

// user_id do pedido, posto nas extensões pelo middleware
#[derive(Clone, Debug)]
pub struct UserId(pub String);
