//! # Autenticação OAuth2 do amoCRM
//!
//! - `config.rs`: credenciais da integração e URLs
//! - `token.rs`: TokenRecord persistido e payloads do endpoint OAuth
//! - `store.rs`: arquivo JSON com o token atual
//! - `manager.rs`: renovação (refresh_token → authorization_code) e agendador
//! - `env_file.rs`: atualização do `.env` depois do código consumido

pub mod config;
pub mod env_file;
pub mod manager;
pub mod store;
pub mod token;

pub use config::AmoCrmConfig;
pub use manager::{TokenManager, REQUEST_MARGIN_MINUTES, SCHEDULER_MARGIN_MINUTES};
pub use store::TokenStore;
pub use token::{Grant, TokenRecord, TokenResponse};
