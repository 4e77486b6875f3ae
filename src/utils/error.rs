use amocrm::AmoCrmError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Mensagem genérica devolvida ao formulário em falhas internas
pub const LEAD_FAILURE_MESSAGE: &str = "Произошла ошибка при создании заявки";

#[derive(Debug)]
pub enum AppError {
    AmoCrm(AmoCrmError),
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AmoCrm(err) => write!(f, "{}", err),
            AppError::ValidationError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AmoCrmError> for AppError {
    fn from(err: AmoCrmError) -> Self {
        AppError::AmoCrm(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::ValidationError(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    axum::Json(json!({
                        "success": false,
                        "message": msg
                    })),
                )
                    .into_response();
            }
            other => json!({
                "success": false,
                "message": LEAD_FAILURE_MESSAGE,
                "error": other.to_string()
            }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
