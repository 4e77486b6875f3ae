use std::path::PathBuf;

use amocrm::AmoCrmConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub amocrm: AmoCrmSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AmoCrmSettings {
    pub domain: String,
    /// Sobrescreve `https://{domain}` (útil para testes/proxy)
    pub base_url: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_code: Option<String>,
    pub refresh_token: Option<String>,
    pub token_path: String,
    pub env_file: Option<String>,
    pub refresh_interval_hours: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorsSettings {
    pub origins: Vec<String>,
}

impl AmoCrmSettings {
    /// Configuração do cliente amoCRM
    pub fn client_config(&self) -> AmoCrmConfig {
        let mut config = AmoCrmConfig::for_domain(
            &self.domain,
            self.client_id.clone(),
            self.client_secret.clone(),
            self.redirect_uri.clone(),
        )
        .with_auth_code(self.auth_code.clone())
        .with_refresh_token(self.refresh_token.clone())
        .with_token_path(&self.token_path)
        .with_env_file(self.env_file.as_ref().map(PathBuf::from));

        if let Some(base_url) = self.base_url.as_ref().filter(|u| !u.is_empty()) {
            config = config.with_base_url(base_url.clone());
        }

        config
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 9000)?
            .set_default("amocrm.domain", "")?
            .set_default("amocrm.client_id", "")?
            .set_default("amocrm.client_secret", "")?
            .set_default("amocrm.redirect_uri", "")?
            .set_default("amocrm.token_path", amocrm::auth::config::DEFAULT_TOKEN_PATH)?
            .set_default("amocrm.env_file", ".env")?
            .set_default("amocrm.refresh_interval_hours", 12)?
            .set_default("cors.origins", vec!["http://localhost:3000", "https://okon.kg"])?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente herdadas do deploy atual
        let overrides = [
            ("PORT", "server.port"),
            ("AMO_DOMAIN", "amocrm.domain"),
            ("AMO_BASE_URL", "amocrm.base_url"),
            ("AMO_CLIENT_ID", "amocrm.client_id"),
            ("AMO_CLIENT_SECRET", "amocrm.client_secret"),
            ("AMO_REDIRECT_URI", "amocrm.redirect_uri"),
            ("AMO_AUTH_CODE", "amocrm.auth_code"),
            ("AMO_REFRESH_TOKEN", "amocrm.refresh_token"),
            ("AMO_TOKEN_PATH", "amocrm.token_path"),
        ];
        for (var, key) in overrides {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        // CORS_ORIGIN é somado às origens padrão
        if let Ok(origin) = std::env::var("CORS_ORIGIN") {
            if !origin.trim().is_empty() {
                builder = builder.set_override(
                    "cors.origins",
                    vec![origin, "http://localhost:3000".to_string(), "https://okon.kg".to_string()],
                )?;
            }
        }

        builder = builder.add_source(Environment::with_prefix("LEAD_RELAY").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("AMO_DOMAIN", &self.amocrm.domain),
            ("AMO_CLIENT_ID", &self.amocrm.client_id),
            ("AMO_CLIENT_SECRET", &self.amocrm.client_secret),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} não configurado", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amocrm_settings() -> AmoCrmSettings {
        AmoCrmSettings {
            domain: "okon.amocrm.ru".to_string(),
            base_url: None,
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://okon.kg".to_string(),
            auth_code: Some(String::new()),
            refresh_token: None,
            token_path: "data/token.json".to_string(),
            env_file: Some(".env".to_string()),
            refresh_interval_hours: 12,
        }
    }

    #[test]
    fn test_client_config_from_settings() {
        let config = amocrm_settings().client_config();

        assert_eq!(config.base_url, "https://okon.amocrm.ru");
        assert_eq!(config.token_path, PathBuf::from("data/token.json"));
        assert_eq!(config.env_file, Some(PathBuf::from(".env")));
        assert!(config.auth_code.is_none());
    }

    #[test]
    fn test_base_url_override() {
        let mut settings = amocrm_settings();
        settings.base_url = Some("http://127.0.0.1:8081".to_string());

        assert_eq!(settings.client_config().base_url, "http://127.0.0.1:8081");
    }

    #[test]
    fn test_validate_requires_credentials() {
        let mut settings = Settings {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 9000,
            },
            amocrm: amocrm_settings(),
            cors: CorsSettings { origins: vec![] },
        };
        assert!(settings.validate().is_ok());

        settings.amocrm.client_secret = " ".to_string();
        assert!(settings.validate().is_err());
    }
}
