//! amoCRM lead relay
//!
//! - Recebe pedidos de retorno do formulário do site
//! - Cria contato, lead e nota no amoCRM
//! - Mantém o token OAuth2 renovado em segundo plano
//! - Loga no stdout e em `logs/YYYY-MM-DD.log`

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use amocrm::AmoCrmClient;
use amocrm_lead_relay::{app::build_router, config::Settings, utils::logging::*, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env é opcional; em produção as variáveis vêm do ambiente
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Stdout e logs/YYYY-MM-DD.log; o guard precisa viver até o fim do main
    let (file_writer, _log_guard) =
        tracing_appender::non_blocking(daily_log_appender(LOG_DIR).context("Failed to open log directory")?);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    if dotenv_loaded {
        log_info("✅ Arquivo .env carregado");
    }

    let settings = Settings::new().context("Failed to load settings")?;
    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    let amocrm = AmoCrmClient::new(settings.amocrm.client_config()).context("Failed to create amoCRM client")?;

    if amocrm.tokens().has_auth_code().await {
        log_info("🔑 Código de autorização disponível para a primeira troca de token");
    }

    let interval = Duration::from_secs(settings.amocrm.refresh_interval_hours.max(1) * 3600);
    let _scheduler = amocrm.tokens().clone().spawn_refresh_scheduler(interval);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    log_server_startup(port);

    let state = Arc::new(AppState { settings, amocrm });
    let app = build_router(state);

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    log_server_ready(&host, port);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
