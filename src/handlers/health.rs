use axum::response::Json;
use serde_json::{json, Value};

use crate::utils::logging::*;

pub const ALIVE_MESSAGE: &str = "Сервер работает";

/// `GET /`
pub async fn root() -> &'static str {
    ALIVE_MESSAGE
}

/// `GET /api/health`
pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "ok",
        "message": ALIVE_MESSAGE
    }))
}
