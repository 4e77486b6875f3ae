//! # amoCRM
//!
//! Cliente da API v4 do amoCRM usado pelo relay de leads do site.
//!
//! - OAuth2 com token persistido em arquivo ([`auth`])
//! - contatos, funis, leads e notas
//! - fluxo completo de um pedido do formulário
//!   ([`AmoCrmClient::create_lead_with_contact`])
//!
//! ```no_run
//! use amocrm::{AmoCrmClient, AmoCrmConfig, LeadSubmission};
//!
//! # async fn run() -> amocrm::Result<()> {
//! let config = AmoCrmConfig::for_domain("okon.amocrm.ru", "client-id", "secret", "https://okon.kg")
//!     .with_token_path("token.json");
//! let client = AmoCrmClient::new(config)?;
//!
//! let created = client
//!     .create_lead_with_contact(&LeadSubmission::new("Айбек", "+996700123456"))
//!     .await?;
//! println!("lead {} / contact {}", created.lead_id, created.contact_id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod contacts;
pub mod error;
pub mod leads;
pub mod matching;
pub mod notes;
pub mod pipelines;
pub mod types;

pub use auth::{AmoCrmConfig, Grant, TokenManager, TokenRecord, TokenStore};
pub use client::AmoCrmClient;
pub use error::{AmoCrmError, Result};
pub use matching::Locality;
pub use types::{FormType, LeadCreated, LeadSubmission, Pipeline, Status};
