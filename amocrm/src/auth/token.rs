use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AmoCrmError, Result};

/// Par access/refresh token persistido em disco
///
/// `expires_at` é gravado em milissegundos desde a época Unix, o mesmo
/// formato dos `token.json` já existentes em produção.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Monta o registro a partir da resposta do endpoint de token
    ///
    /// Se o amoCRM não devolver um refresh token novo, mantém `previous_refresh`.
    /// Um `expires_in` fora do intervalo de datas representável é rejeitado.
    pub fn issued(response: TokenResponse, now: DateTime<Utc>, previous_refresh: &str) -> Result<Self> {
        let expires_at = Duration::try_seconds(response.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AmoCrmError::AuthError(format!("expires_in inválido: {}", response.expires_in))
            })?;

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| previous_refresh.to_string()),
            expires_at,
        })
    }

    /// Válido somente se expira depois de `now + margin`
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        !self.access_token.is_empty() && self.expires_at > now + margin
    }

    pub fn is_valid_for(&self, margin: Duration) -> bool {
        self.is_valid_at(Utc::now(), margin)
    }

    /// Tempo restante até a expiração (negativo se já expirou)
    pub fn remaining(&self) -> Duration {
        self.expires_at - Utc::now()
    }
}

/// Resposta do `POST /oauth2/access_token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Grant OAuth2 usado para emitir um novo token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant<'a> {
    RefreshToken(&'a str),
    AuthorizationCode(&'a str),
}

impl Grant<'_> {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::RefreshToken(_) => "refresh_token",
            Grant::AuthorizationCode(_) => "authorization_code",
        }
    }
}

/// Corpo JSON do pedido de token
#[derive(Debug, Serialize)]
pub(crate) struct AccessTokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    pub redirect_uri: &'a str,
}

impl<'a> AccessTokenRequest<'a> {
    pub fn new(client_id: &'a str, client_secret: &'a str, redirect_uri: &'a str, grant: Grant<'a>) -> Self {
        let (refresh_token, code) = match grant {
            Grant::RefreshToken(token) => (Some(token), None),
            Grant::AuthorizationCode(code) => (None, Some(code)),
        };

        Self {
            client_id,
            client_secret,
            grant_type: grant.grant_type(),
            refresh_token,
            code,
            redirect_uri,
        }
    }
}
