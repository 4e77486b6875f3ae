//! Operações de contatos

use crate::client::AmoCrmClient;
use crate::error::{AmoCrmError, Result};
use crate::types::{ContactsCreated, NewContact};

impl AmoCrmClient {
    /// Cria um contato com telefone de trabalho e retorna o ID
    pub async fn create_contact(&self, name: &str, phone: &str) -> Result<u64> {
        tracing::info!("Criando contato: {}, {}", name, phone);

        let payload = vec![NewContact::with_work_phone(name, phone)];
        let created: ContactsCreated = self.post_json("contacts", &payload).await?;

        let contact_id = created
            .embedded
            .contacts
            .first()
            .map(|c| c.id)
            .ok_or_else(|| AmoCrmError::NotFound("contact id in create response".to_string()))?;

        tracing::info!("Contato criado, ID: {}", contact_id);
        Ok(contact_id)
    }
}
