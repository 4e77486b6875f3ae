//! Criação de leads e fluxo completo contato → funil → lead → nota

use crate::client::AmoCrmClient;
use crate::error::{AmoCrmError, Result};
use crate::matching::select_status;
use crate::types::{ContactRef, LeadCreated, LeadSubmission, LeadsCreated, NewLead, NewLeadEmbedded, Pipeline};

impl AmoCrmClient {
    /// Cria a lead no funil informado, vinculada ao contato
    pub async fn create_lead(&self, submission: &LeadSubmission, contact_id: u64, pipeline: &Pipeline) -> Result<u64> {
        tracing::info!(
            "Criando lead para o contato {}, cidade {}",
            contact_id,
            submission.city_or_unknown()
        );

        for (index, status) in pipeline.statuses().iter().enumerate() {
            tracing::debug!("{}. {} (ID: {})", index, status.name, status.id);
        }

        let status = select_status(pipeline.statuses());
        match status {
            Some(status) => tracing::info!("Etapa selecionada: {} (ID: {})", status.name, status.id),
            None => tracing::warn!("Funil {} sem etapas, usando a etapa padrão do amoCRM", pipeline.id),
        }

        let payload = vec![NewLead {
            name: submission.lead_title(),
            pipeline_id: pipeline.id,
            status_id: status.map(|s| s.id),
            embedded: NewLeadEmbedded {
                contacts: vec![ContactRef { id: contact_id }],
                tags: submission.tags(),
            },
        }];

        let created: LeadsCreated = self.post_json("leads", &payload).await?;
        let lead_id = created
            .embedded
            .leads
            .first()
            .map(|l| l.id)
            .ok_or_else(|| AmoCrmError::NotFound("lead id in create response".to_string()))?;

        tracing::info!("Lead criada, ID: {}", lead_id);
        Ok(lead_id)
    }

    /// Fluxo completo de um pedido do formulário
    ///
    /// 1. cria o contato
    /// 2. escolhe o funil pela cidade
    /// 3. cria a lead
    /// 4. anexa a nota (best-effort)
    pub async fn create_lead_with_contact(&self, submission: &LeadSubmission) -> Result<LeadCreated> {
        tracing::info!(
            "Processando pedido: {}, {}, {}",
            submission.name,
            submission.phone,
            submission.city_or_unknown()
        );

        let contact_id = self.create_contact(&submission.name, &submission.phone).await?;
        let pipeline = self.resolve_pipeline(submission.city_or_unknown()).await?;
        let lead_id = self.create_lead(submission, contact_id, &pipeline).await?;

        if let Some(text) = submission.note_text() {
            self.add_note(lead_id, &text).await;
        }

        Ok(LeadCreated { lead_id, contact_id })
    }
}
