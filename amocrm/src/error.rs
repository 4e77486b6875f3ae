//! Tipos de erro para o crate amocrm

use thiserror::Error;

/// Erros do cliente amoCRM
#[derive(Debug, Error)]
pub enum AmoCrmError {
    /// Erro de requisição HTTP (conexão, timeout do reqwest, etc)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro da API do amoCRM (status code não-2xx)
    #[error("amoCRM API error (status {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        /// Corpo bruto da resposta, para log
        body: String,
    },

    /// Erro de autenticação (sem token, sem código de autorização, etc)
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Erro de leitura/escrita do arquivo de token
    #[error("Token storage error: {0}")]
    IoError(#[from] std::io::Error),

    /// Recurso esperado ausente na resposta (pipeline, id de contato, etc)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AmoCrmError {
    /// `true` para respostas 401/403, que disparam refresh forçado + retry
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AmoCrmError::ApiError { status: 401 | 403, .. })
    }

    /// Corpo retornado pelo amoCRM, quando houver
    pub fn remote_payload(&self) -> Option<&str> {
        match self {
            AmoCrmError::ApiError { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, AmoCrmError>;
