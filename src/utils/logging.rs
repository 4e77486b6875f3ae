use std::path::Path;

use tracing::{debug, error, info, warn};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};

/// Diretório dos arquivos de log diários
pub const LOG_DIR: &str = "logs";

/// Um arquivo por dia em `dir`, no formato `YYYY-MM-DD.log` (UTC)
pub fn daily_log_appender(dir: impl AsRef<Path>) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_suffix("log")
        .build(dir)
}

pub fn log_request_received(endpoint: &str, method: &str, client_ip: &str) {
    info!("{} {} - IP: {}", method, endpoint, client_ip);
}

pub fn log_request_body(body: &str) {
    info!("Corpo da requisição: {}", body);
}

pub fn log_lead_received(name: &str, phone: &str, city: Option<&str>, form_type: Option<&str>) {
    info!(
        "Pedido recebido de {} ({}, {}), formulário: {}",
        name,
        phone,
        city.unwrap_or("cidade não informada"),
        form_type.unwrap_or("não informado")
    );
}

pub fn log_lead_created(lead_id: u64, contact_id: u64) {
    info!("✅ Lead criada. ID da lead: {}, ID do contato: {}", lead_id, contact_id);
}

pub fn log_lead_failed(error: &str) {
    error!("❌ Erro ao criar lead: {}", error);
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 amoCRM lead relay starting on port {}", port);
}

pub fn log_server_ready(host: &str, port: u16) {
    info!("✅ Server ready and listening on http://{}:{}", host, port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
