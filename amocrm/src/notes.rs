//! Notas em leads

use crate::client::AmoCrmClient;
use crate::error::Result;
use crate::types::NewNote;

impl AmoCrmClient {
    /// Adiciona uma nota comum à lead
    pub async fn try_add_note(&self, lead_id: u64, text: &str) -> Result<()> {
        let payload = vec![NewNote::common(lead_id, text)];
        self.post("leads/notes", &payload).await?;
        Ok(())
    }

    /// Versão best-effort de [`AmoCrmClient::try_add_note`]: falhas só são logadas
    pub async fn add_note(&self, lead_id: u64, text: &str) -> bool {
        tracing::info!("Adicionando nota à lead {}", lead_id);

        match self.try_add_note(lead_id, text).await {
            Ok(()) => {
                tracing::info!("Nota adicionada à lead {}", lead_id);
                true
            }
            Err(e) => {
                tracing::error!("Erro ao adicionar nota à lead {}: {}", lead_id, e);
                false
            }
        }
    }
}
