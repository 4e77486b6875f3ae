use serde::{Deserialize, Serialize};

/// Resposta de `GET /api/v4/leads/pipelines`
#[derive(Debug, Clone, Deserialize)]
pub struct PipelinesResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<PipelinesEmbedded>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelinesEmbedded {
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
}

impl PipelinesResponse {
    pub fn into_pipelines(self) -> Vec<Pipeline> {
        self.embedded.map(|e| e.pipelines).unwrap_or_default()
    }
}

/// Funil de vendas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub name: String,
    #[serde(rename = "_embedded", default)]
    pub embedded: PipelineEmbedded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineEmbedded {
    #[serde(default)]
    pub statuses: Vec<Status>,
}

impl Pipeline {
    pub fn statuses(&self) -> &[Status] {
        &self.embedded.statuses
    }
}

/// Etapa de um funil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_editable: Option<bool>,
}

impl Status {
    pub fn is_editable(&self) -> bool {
        self.is_editable.unwrap_or(false)
    }
}
