// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    // A única falha que o painel conhece: "não consegui carregar as métricas".
    // A mensagem é legível e vai direto para o painel de erro.
    #[error("{0}")]
    MetricsLoadFailure(String),

    #[error("Erro de validação da configuração")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Configuração inválida: {0}")]
    ConfigError(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Colapsa qualquer falha de acesso a dados em `MetricsLoadFailure`,
    /// preservando o texto da causa original.
    pub fn into_load_failure(self) -> AppError {
        match self {
            AppError::MetricsLoadFailure(_) => self,
            AppError::DatabaseError(e) => AppError::MetricsLoadFailure(e.to_string()),
            AppError::InternalServerError(e) => AppError::MetricsLoadFailure(e.to_string()),
            other => AppError::MetricsLoadFailure(other.to_string()),
        }
    }

    // Texto mostrado ao usuário, sem o prefixo do painel.
    pub fn user_message(&self) -> String {
        match self {
            AppError::MetricsLoadFailure(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        match self {
            AppError::MetricsLoadFailure(message) => ApiError {
                status: StatusCode::BAD_GATEWAY,
                message: format!("{} {}", locale.messages().load_error_prefix, message),
            },
            AppError::ValidationError(_) | AppError::ConfigError(_) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: self.to_string(),
            },
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: locale.messages().unexpected_error.to_string(),
                }
            }
        }
    }
}

// O erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_collapse_into_load_failure() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_load_failure();
        match err {
            AppError::MetricsLoadFailure(message) => {
                assert_eq!(message, sqlx::Error::PoolTimedOut.to_string())
            }
            other => panic!("esperava MetricsLoadFailure, veio {other:?}"),
        }
    }

    #[test]
    fn load_failure_keeps_its_own_message() {
        let err = AppError::MetricsLoadFailure("network timeout".into()).into_load_failure();
        assert_eq!(err.user_message(), "network timeout");
    }

    #[test]
    fn api_error_prefixes_the_failure_text() {
        let api = AppError::MetricsLoadFailure("network timeout".into()).to_api_error(&Locale::Pt);
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert!(api.message.starts_with(Locale::Pt.messages().load_error_prefix));
        assert!(api.message.ends_with("network timeout"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let api =
            AppError::InternalServerError(anyhow::anyhow!("segredo")).to_api_error(&Locale::En);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("segredo"));
    }
}
