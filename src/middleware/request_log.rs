//! Registro de cada requisição recebida
//!
//! O IP vem de `X-Forwarded-For` (primeiro endereço) ou `X-Real-IP`, já
//! que o serviço roda atrás de proxy.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::utils::logging::log_request_received;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let client_ip = client_ip(request.headers());
    log_request_received(request.uri().path(), request.method().as_str(), &client_ip);

    next.run(request).await
}

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
