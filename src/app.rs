//! Montagem do router HTTP

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{create_lead, health_check, root};
use crate::middleware::log_requests;
use crate::utils::logging::log_warning;
use crate::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings.cors.origins);

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/amocrm/lead", post(create_lead))
        .route("/api/lead", post(create_lead))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(log_requests)),
        )
        .with_state(state)
}

/// CORS com credenciais para as origens configuradas
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log_warning(&format!("⚠️ Origem CORS inválida ignorada: {}", origin));
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
