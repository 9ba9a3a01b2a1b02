// src/config.rs
use crate::{
    error::{AppError, AppResult},
    import::dates::SlashDateOrder,
};
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
// tower_sessions::cookie::Key exige pelo menos 64 bytes
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// Configuração da aplicação, lida uma vez no arranque.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_secret: String,
    pub slash_date_order: SlashDateOrder,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Lê a configuração das variáveis de ambiente (com suporte a `.env`).
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Constrói a configuração a partir de uma função de lookup qualquer.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL não definida".into()))?;

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR inválido '{}': {}", bind_raw, e)))?;

        let session_secret = lookup("SESSION_SECRET")
            .ok_or_else(|| AppError::Config("SESSION_SECRET não definida".into()))?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "SESSION_SECRET precisa de pelo menos {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }

        let slash_date_order = match lookup("SLASH_DATE_ORDER") {
            Some(raw) => raw.parse::<SlashDateOrder>().map_err(AppError::Config)?,
            None => SlashDateOrder::default(),
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AppError::Config(format!("MAX_UPLOAD_BYTES inválido '{}': {}", raw, e))
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            database_url,
            bind_addr,
            session_secret,
            slash_date_order,
            max_upload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn secret() -> String {
        "s".repeat(MIN_SESSION_SECRET_LEN)
    }

    #[test]
    fn defaults_are_applied() {
        let secret = secret();
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://data.db"),
            ("SESSION_SECRET", secret.as_str()),
        ]))
        .unwrap();

        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.slash_date_order, SlashDateOrder::MonthFirst);
        assert_eq!(cfg.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn day_first_can_be_selected() {
        let secret = secret();
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://data.db"),
            ("SESSION_SECRET", secret.as_str()),
            ("SLASH_DATE_ORDER", "DMY"),
            ("MAX_UPLOAD_BYTES", "2048"),
        ]))
        .unwrap();

        assert_eq!(cfg.slash_date_order, SlashDateOrder::DayFirst);
        assert_eq!(cfg.max_upload_bytes, 2048);
    }

    #[test]
    fn rejects_bad_values() {
        let secret = secret();
        let cases: Vec<Vec<(&str, &str)>> = vec![
            vec![("SESSION_SECRET", secret.as_str())],
            vec![("DATABASE_URL", "sqlite://x.db"), ("SESSION_SECRET", "curta")],
            vec![
                ("DATABASE_URL", "sqlite://x.db"),
                ("SESSION_SECRET", secret.as_str()),
                ("SLASH_DATE_ORDER", "ymd"),
            ],
            vec![
                ("DATABASE_URL", "sqlite://x.db"),
                ("SESSION_SECRET", secret.as_str()),
                ("BIND_ADDR", "localhost"),
            ],
        ];

        for pairs in cases {
            let result = AppConfig::from_lookup(lookup_from(&pairs));
            assert!(matches!(result, Err(AppError::Config(_))), "esperava erro para {:?}", pairs);
        }
    }
}
