//! Cliente HTTP para a API v4 do amoCRM

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{AmoCrmConfig, TokenManager};
use crate::error::{AmoCrmError, Result};

/// Cliente para interagir com a API do amoCRM
///
/// Cada instância carrega a própria configuração e o próprio
/// [`TokenManager`]; não há estado global.
///
/// # Timeouts
///
/// - Total: 30s
/// - Connect: 5s
#[derive(Clone)]
pub struct AmoCrmClient {
    http_client: HttpClient,
    config: Arc<AmoCrmConfig>,
    tokens: Arc<TokenManager>,
}

impl AmoCrmClient {
    pub fn new(config: AmoCrmConfig) -> Result<Self> {
        Self::with_timeouts(config, 30, 5)
    }

    pub fn with_timeouts(
        config: AmoCrmConfig,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| AmoCrmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let tokens = Arc::new(TokenManager::new(config.clone(), http_client.clone()));

        Ok(Self {
            http_client,
            config: Arc::new(config),
            tokens,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn config(&self) -> &AmoCrmConfig {
        &self.config
    }

    /// GET autenticado com parse de JSON
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.request(Method::GET, endpoint, None).await?;
        Ok(response.json().await?)
    }

    /// POST autenticado com parse de JSON
    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let response = self.post(endpoint, body).await?;
        Ok(response.json().await?)
    }

    /// POST autenticado, sem interpretar o corpo da resposta
    pub(crate) async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Response> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, endpoint, Some(&body)).await
    }

    /// Executa a requisição com bearer token
    ///
    /// Um 401/403 força a renovação do token e repete a chamada uma única
    /// vez; uma segunda falha é propagada.
    async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Response> {
        tracing::info!("Requisição: {} {}", method, endpoint);

        let result = async {
            let token = self.tokens.get_access_token().await?;

            match self.execute(method.clone(), endpoint, body, &token).await {
                Err(e) if e.is_auth_failure() => {
                    tracing::warn!("Resposta {} do amoCRM, renovando token e repetindo a requisição...", status_of(&e));
                    let token = self.tokens.force_refresh(&token).await?;
                    self.execute(method.clone(), endpoint, body, &token).await
                }
                other => other,
            }
        }
        .await;

        if let Err(e) = &result {
            tracing::error!("Erro na requisição ao amoCRM ({} {}): {}", method, endpoint, e);
            if let Some(payload) = e.remote_payload() {
                tracing::error!("Resposta do amoCRM: {}", payload);
            }
        }

        result
    }

    async fn execute(&self, method: Method, endpoint: &str, body: Option<&Value>, token: &str) -> Result<Response> {
        let url = self.config.api_url(endpoint);

        let mut builder = self
            .http_client
            .request(method, &url)
            .bearer_auth(token)
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            tracing::debug!("Body: {}", body);
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        self.handle_response(response).await
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

        // amoCRM responde com application/problem+json (title/detail)
        let message = serde_json::from_str::<Value>(&error_body)
            .ok()
            .and_then(|json| {
                json.get("detail")
                    .or_else(|| json.get("title"))
                    .or_else(|| json.get("hint"))
                    .or_else(|| json.get("message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        Err(AmoCrmError::ApiError {
            status: status_code,
            message,
            body: error_body,
        })
    }
}

fn status_of(error: &AmoCrmError) -> u16 {
    match error {
        AmoCrmError::ApiError { status, .. } => *status,
        _ => 0,
    }
}
