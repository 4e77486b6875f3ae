//! Token Manager
//!
//! Fornece um access token válido: reaproveita o token salvo enquanto ele
//! estiver fora da margem de expiração e renova via `refresh_token`, com
//! fallback para o `authorization_code`, quando necessário.

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::token::AccessTokenRequest;
use super::{env_file, AmoCrmConfig, Grant, TokenRecord, TokenResponse, TokenStore};
use crate::error::{AmoCrmError, Result};

/// Margem usada a cada requisição à API
pub const REQUEST_MARGIN_MINUTES: i64 = 5;

/// Margem usada na verificação periódica
pub const SCHEDULER_MARGIN_MINUTES: i64 = 60;

/// Estado protegido pelo lock de renovação
#[derive(Debug)]
struct RefreshState {
    /// Código de autorização ainda não consumido
    auth_code: Option<String>,
}

/// Gerenciador de tokens OAuth2 do amoCRM
pub struct TokenManager {
    config: AmoCrmConfig,
    http_client: Client,
    store: TokenStore,
    state: Mutex<RefreshState>,
}

impl TokenManager {
    pub fn new(config: AmoCrmConfig, http_client: Client) -> Self {
        let store = TokenStore::new(config.token_path.clone());
        let state = Mutex::new(RefreshState {
            auth_code: config.auth_code.clone(),
        });

        Self {
            config,
            http_client,
            store,
            state,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// `true` enquanto o código de autorização não foi usado
    pub async fn has_auth_code(&self) -> bool {
        self.state.lock().await.auth_code.is_some()
    }

    /// Access token válido por pelo menos [`REQUEST_MARGIN_MINUTES`]
    pub async fn get_access_token(&self) -> Result<String> {
        if let Some(record) = self.store.load().await {
            if record.is_valid_for(Duration::minutes(REQUEST_MARGIN_MINUTES)) {
                return Ok(record.access_token);
            }
        }

        self.ensure_fresh(Duration::minutes(REQUEST_MARGIN_MINUTES)).await
    }

    /// Renova o token somente se ele estiver ausente ou dentro de `margin`
    pub async fn ensure_fresh(&self, margin: Duration) -> Result<String> {
        let mut state = self.state.lock().await;

        let current = self.store.load().await;
        if let Some(record) = &current {
            if record.is_valid_for(margin) {
                tracing::info!(
                    "Token válido por mais {} horas",
                    (record.remaining().num_minutes() as f64 / 60.0).round()
                );
                return Ok(record.access_token.clone());
            }
        }

        tracing::info!("Token ausente ou perto de expirar, obtendo um novo...");
        let record = self.renew(&mut state, current).await?;
        Ok(record.access_token)
    }

    /// Renovação incondicional, usada depois de um 401/403
    ///
    /// `rejected` é o token recusado pela API. Se outra requisição já tiver
    /// renovado o token enquanto esta esperava o lock, o token novo é
    /// devolvido sem outra chamada ao endpoint OAuth.
    pub async fn force_refresh(&self, rejected: &str) -> Result<String> {
        let mut state = self.state.lock().await;

        let current = self.store.load().await;
        if let Some(record) = &current {
            if record.access_token != rejected && record.is_valid_for(Duration::zero()) {
                tracing::debug!("Token já renovado por outra requisição");
                return Ok(record.access_token.clone());
            }
        }

        tracing::info!("Forçando renovação do token");
        let record = self.renew(&mut state, current).await?;
        Ok(record.access_token)
    }

    /// refresh_token primeiro, depois authorization_code
    async fn renew(&self, state: &mut RefreshState, current: Option<TokenRecord>) -> Result<TokenRecord> {
        let refresh_token = current
            .map(|record| record.refresh_token)
            .filter(|token| !token.is_empty())
            .or_else(|| self.config.refresh_token.clone());

        if let Some(refresh_token) = refresh_token {
            match self.refresh(Grant::RefreshToken(&refresh_token)).await {
                Ok(record) => return Ok(record),
                Err(e) => {
                    tracing::warn!(
                        "Não foi possível renovar via refresh_token ({}), tentando código de autorização...",
                        e
                    );
                }
            }
        }

        let code = state.auth_code.clone().ok_or_else(|| {
            AmoCrmError::AuthError("Código de autorização ausente e refresh_token expirado".to_string())
        })?;

        let record = self
            .refresh(Grant::AuthorizationCode(&code))
            .await
            .map_err(|e| {
                AmoCrmError::AuthError(format!(
                    "Falha ao trocar o código de autorização, talvez ele tenha expirado. \
                     Gere um novo código na integração do amoCRM: {}",
                    e
                ))
            })?;

        state.auth_code = None;

        if let Some(env_path) = &self.config.env_file {
            if let Err(e) = env_file::update_env_file(env_path, &record.refresh_token).await {
                tracing::error!("Erro ao atualizar {}: {}", env_path.display(), e);
            }
        }

        Ok(record)
    }

    /// Chama o endpoint de token e persiste o resultado
    ///
    /// Em caso de erro o arquivo de token não é alterado.
    pub(crate) async fn refresh(&self, grant: Grant<'_>) -> Result<TokenRecord> {
        tracing::info!("Solicitando token ({})...", grant.grant_type());

        let body = AccessTokenRequest::new(
            &self.config.client_id,
            &self.config.client_secret,
            &self.config.redirect_uri,
            grant,
        );

        let response = self
            .http_client
            .post(self.config.token_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!("Falha ao obter token [{}]: {}", status, error_body);
            return Err(AmoCrmError::ApiError {
                status: status.as_u16(),
                message: format!("token endpoint rejected {} grant", grant.grant_type()),
                body: error_body,
            });
        }

        let token_response: TokenResponse = response.json().await?;
        let previous_refresh = match grant {
            Grant::RefreshToken(token) => token,
            Grant::AuthorizationCode(_) => "",
        };
        let record = TokenRecord::issued(token_response, Utc::now(), previous_refresh)?;

        self.store.save(&record).await?;
        tracing::info!("Token obtido e salvo em {}", self.store.path().display());

        Ok(record)
    }

    /// Verificação periódica do token
    ///
    /// O primeiro tick do intervalo é imediato, então o token é conferido
    /// logo na subida do serviço.
    pub fn spawn_refresh_scheduler(self: Arc<Self>, every: std::time::Duration) -> JoinHandle<()> {
        tracing::info!(
            "Agendador de renovação de token iniciado (intervalo: {} horas)",
            every.as_secs() / 3600
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                if let Err(e) = self.ensure_fresh(Duration::minutes(SCHEDULER_MARGIN_MINUTES)).await {
                    tracing::error!("Erro na verificação/renovação do token: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(server: &MockServer, dir: &tempfile::TempDir) -> AmoCrmConfig {
        AmoCrmConfig::for_domain("okon.amocrm.ru", "client-1", "secret-1", "https://okon.kg")
            .with_base_url(server.base_url())
            .with_token_path(dir.path().join("token.json"))
    }

    fn manager(config: AmoCrmConfig) -> TokenManager {
        TokenManager::new(config, Client::new())
    }

    fn record(access: &str, refresh: &str, expires_in: Duration) -> TokenRecord {
        TokenRecord {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            expires_at: Utc::now() + expires_in,
        }
    }

    fn token_body(access: &str, refresh: &str) -> serde_json::Value {
        json!({
            "token_type": "Bearer",
            "expires_in": 86400,
            "access_token": access,
            "refresh_token": refresh
        })
    }

    #[tokio::test]
    async fn test_valid_token_is_reused() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let oauth = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(200).json_body(token_body("new", "r-new"));
            })
            .await;

        let tokens = manager(config(&server, &dir));
        let saved = record("cached", "r-old", Duration::hours(2));
        tokens.store().save(&saved).await.unwrap();

        assert_eq!(tokens.get_access_token().await.unwrap(), "cached");
        assert_eq!(tokens.store().load().await.unwrap().refresh_token, "r-old");
        oauth.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_token_inside_margin_is_refreshed() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let oauth = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth2/access_token")
                    .json_body_partial(r#"{"grant_type":"refresh_token","refresh_token":"r-old","client_id":"client-1"}"#);
                then.status(200).json_body(token_body("fresh", "r-new"));
            })
            .await;

        let tokens = manager(config(&server, &dir));
        tokens.store().save(&record("stale", "r-old", Duration::minutes(3))).await.unwrap();

        assert_eq!(tokens.get_access_token().await.unwrap(), "fresh");
        oauth.assert_hits_async(1).await;

        let saved = tokens.store().load().await.unwrap();
        assert_eq!(saved.refresh_token, "r-new");
        assert!(saved.is_valid_for(Duration::hours(23)));
    }

    #[tokio::test]
    async fn test_scheduler_margin_is_wider() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let oauth = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(200).json_body(token_body("fresh", "r-new"));
            })
            .await;

        let tokens = manager(config(&server, &dir));
        tokens.store().save(&record("cached", "r-old", Duration::minutes(30))).await.unwrap();

        // 30 min restantes: suficiente por requisição, insuficiente para o agendador
        assert_eq!(tokens.get_access_token().await.unwrap(), "cached");
        oauth.assert_hits_async(0).await;

        let token = tokens
            .ensure_fresh(Duration::minutes(SCHEDULER_MARGIN_MINUTES))
            .await
            .unwrap();
        assert_eq!(token, "fresh");
        oauth.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_falls_back_to_auth_code_once() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let refresh_grant = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth2/access_token")
                    .json_body_partial(r#"{"grant_type":"refresh_token"}"#);
                then.status(400).json_body(json!({"hint": "Token has been revoked"}));
            })
            .await;
        let code_grant = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth2/access_token")
                    .json_body_partial(r#"{"grant_type":"authorization_code","code":"code-1"}"#);
                then.status(200).json_body(token_body("from-code", "r-code"));
            })
            .await;

        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "AMO_AUTH_CODE=code-1\n").unwrap();

        let tokens = manager(
            config(&server, &dir)
                .with_auth_code(Some("code-1".to_string()))
                .with_env_file(Some(env_path.clone())),
        );
        tokens.store().save(&record("expired", "r-revoked", Duration::hours(-1))).await.unwrap();

        assert_eq!(tokens.get_access_token().await.unwrap(), "from-code");
        assert!(!tokens.has_auth_code().await);
        refresh_grant.assert_hits_async(1).await;
        code_grant.assert_hits_async(1).await;

        let env = std::fs::read_to_string(&env_path).unwrap();
        assert_eq!(env, "# AMO_AUTH_CODE=code-1\nAMO_REFRESH_TOKEN=r-code\n");
    }

    #[tokio::test]
    async fn test_fails_without_refresh_token_or_code() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let oauth = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(200).json_body(token_body("never", "never"));
            })
            .await;

        let tokens = manager(config(&server, &dir));

        let err = tokens.get_access_token().await.unwrap_err();
        assert!(matches!(err, AmoCrmError::AuthError(_)));
        oauth.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_record() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(500).body("boom");
            })
            .await;

        let tokens = manager(config(&server, &dir));
        let previous = record("old", "r-old", Duration::minutes(1));
        tokens.store().save(&previous).await.unwrap();

        assert!(tokens.refresh(Grant::RefreshToken("r-old")).await.is_err());
        let saved = tokens.store().load().await.unwrap();
        assert_eq!(saved.access_token, "old");
        assert_eq!(saved.refresh_token, "r-old");
    }

    #[tokio::test]
    async fn test_seed_refresh_token_from_config() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let oauth = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth2/access_token")
                    .json_body_partial(r#"{"grant_type":"refresh_token","refresh_token":"seed"}"#);
                then.status(200).json_body(token_body("seeded", "r-next"));
            })
            .await;

        let tokens = manager(config(&server, &dir).with_refresh_token(Some("seed".to_string())));

        assert_eq!(tokens.get_access_token().await.unwrap(), "seeded");
        oauth.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_force_refresh_skips_when_already_rotated() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        let oauth = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(200).json_body(token_body("fresh", "r-new"));
            })
            .await;

        let tokens = manager(config(&server, &dir));
        tokens.store().save(&record("rotated", "r-1", Duration::hours(5))).await.unwrap();

        assert_eq!(tokens.force_refresh("rejected").await.unwrap(), "rotated");
        oauth.assert_hits_async(0).await;

        assert_eq!(tokens.force_refresh("rotated").await.unwrap(), "fresh");
        oauth.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_out_of_range_expires_in_is_an_error() {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().unwrap();
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/access_token");
                then.status(200).json_body(json!({
                    "access_token": "a", "refresh_token": "r", "expires_in": 1_000_000_000_000_000i64
                }));
            })
            .await;

        let tokens = manager(config(&server, &dir).with_refresh_token(Some("seed".to_string())));

        let err = tokens.get_access_token().await.unwrap_err();
        assert!(matches!(err, AmoCrmError::AuthError(_)));
        assert!(tokens.store().load().await.is_none());
    }
}
