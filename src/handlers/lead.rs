use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use std::sync::Arc;

use crate::models::{LeadRequest, LeadResponse, MISSING_FIELDS_MESSAGE};
use crate::utils::{logging::*, AppError, AppResult};
use crate::AppState;

/// `POST /api/amocrm/lead` (alias `POST /api/lead`)
///
/// Valida nome e telefone antes de qualquer chamada ao amoCRM e executa o
/// fluxo contato → funil → lead → nota.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadRequest>, JsonRejection>,
) -> AppResult<Json<LeadResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        log_validation_error("body", &rejection.body_text());
        AppError::ValidationError(MISSING_FIELDS_MESSAGE.to_string())
    })?;

    if let Ok(body) = serde_json::to_string(&request) {
        log_request_body(&body);
    }

    log_lead_received(
        request.name.as_deref().unwrap_or_default(),
        request.phone.as_deref().unwrap_or_default(),
        request.city.as_deref(),
        request.form_type.as_deref(),
    );

    let submission = request.into_submission().map_err(|field| {
        log_validation_error(field, MISSING_FIELDS_MESSAGE);
        AppError::ValidationError(MISSING_FIELDS_MESSAGE.to_string())
    })?;

    match state.amocrm.create_lead_with_contact(&submission).await {
        Ok(created) => {
            log_lead_created(created.lead_id, created.contact_id);
            Ok(Json(LeadResponse::created(created)))
        }
        Err(e) => {
            log_lead_failed(&e.to_string());
            Err(AppError::from(e))
        }
    }
}
