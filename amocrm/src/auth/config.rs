//! Configuração OAuth2 e endpoints do amoCRM

use std::path::PathBuf;

/// Caminho padrão do arquivo de token
pub const DEFAULT_TOKEN_PATH: &str = "token.json";

#[derive(Debug, Clone)]
pub struct AmoCrmConfig {
    /// URL base da conta, ex: `https://okon.amocrm.ru`
    pub base_url: String,

    /// ID da integração (client_id)
    pub client_id: String,

    /// Chave secreta da integração
    pub client_secret: String,

    /// Redirect URI registrada na integração
    pub redirect_uri: String,

    /// Código de autorização (uso único)
    pub auth_code: Option<String>,

    /// Refresh token semente, usado quando ainda não existe arquivo de token
    pub refresh_token: Option<String>,

    /// Arquivo JSON onde o TokenRecord é persistido
    pub token_path: PathBuf,

    /// `.env` a ser atualizado depois da troca do código de autorização
    pub env_file: Option<PathBuf>,
}

impl AmoCrmConfig {
    /// Configuração para um domínio amoCRM (`subdominio.amocrm.ru`)
    pub fn for_domain(
        domain: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            base_url: format!("https://{}", domain.trim_end_matches('/')),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_code: None,
            refresh_token: None,
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            env_file: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_auth_code(mut self, code: Option<String>) -> Self {
        self.auth_code = code.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_refresh_token(mut self, token: Option<String>) -> Self {
        self.refresh_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn with_env_file(mut self, path: Option<PathBuf>) -> Self {
        self.env_file = path;
        self
    }

    /// Endpoint OAuth2 de emissão de tokens
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/access_token", self.base_url)
    }

    /// URL de um recurso da API v4 (`contacts`, `leads/pipelines`, ...)
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/v4/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}
