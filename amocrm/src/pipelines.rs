//! Operações de funis (pipelines)

use crate::client::AmoCrmClient;
use crate::error::{AmoCrmError, Result};
use crate::matching::{select_pipeline, Locality};
use crate::types::{Pipeline, PipelinesResponse};

impl AmoCrmClient {
    /// Lista todos os funis com suas etapas
    pub async fn list_pipelines(&self) -> Result<Vec<Pipeline>> {
        let response: PipelinesResponse = self.get_json("leads/pipelines").await?;
        Ok(response.into_pipelines())
    }

    /// Funil correspondente à cidade
    ///
    /// Sem correspondência, usa o primeiro funil retornado pela API.
    pub async fn resolve_pipeline(&self, city: &str) -> Result<Pipeline> {
        tracing::info!("Buscando funil para a cidade: {}", city);

        let pipelines = self.list_pipelines().await?;
        if pipelines.is_empty() {
            return Err(AmoCrmError::NotFound("no pipelines available".to_string()));
        }

        for pipeline in &pipelines {
            tracing::debug!("  ├─ {} (ID: {})", pipeline.name, pipeline.id);
        }

        let pipeline = select_pipeline(&pipelines, city)
            .cloned()
            .ok_or_else(|| AmoCrmError::NotFound("no pipelines available".to_string()))?;

        match Locality::detect(city) {
            Some(locality) if locality.matches(&pipeline.name) => {
                tracing::info!("Funil selecionado: {} (ID: {})", pipeline.name, pipeline.id);
            }
            _ => {
                tracing::info!(
                    "Nenhum funil para a cidade \"{}\", usando o primeiro disponível: {} (ID: {})",
                    city, pipeline.name, pipeline.id
                );
            }
        }

        Ok(pipeline)
    }
}
