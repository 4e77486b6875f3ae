//! Escolha de funil pela cidade e de etapa inicial da lead

use crate::types::{Pipeline, Status};

/// Cidades com funil próprio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locality {
    Bishkek,
    Osh,
}

impl Locality {
    pub const ALL: [Locality; 2] = [Locality::Bishkek, Locality::Osh];

    /// Grafias aceitas, já em minúsculas
    pub fn variants(&self) -> &'static [&'static str] {
        match self {
            Locality::Bishkek => &["бишкек", "bishkek"],
            Locality::Osh => &["ош", "osh"],
        }
    }

    /// `true` se o texto contém alguma das grafias (sem diferenciar maiúsculas)
    pub fn matches(&self, text: &str) -> bool {
        let text = normalize(text);
        self.variants().iter().any(|variant| text.contains(variant))
    }

    /// Localidade citada no nome da cidade, na ordem de [`Locality::ALL`]
    pub fn detect(city: &str) -> Option<Locality> {
        Self::ALL.into_iter().find(|locality| locality.matches(city))
    }
}

/// Minúsculas (Unicode) e sem espaços nas pontas
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Funil da cidade, ou o primeiro da lista quando não há correspondência
pub fn select_pipeline<'a>(pipelines: &'a [Pipeline], city: &str) -> Option<&'a Pipeline> {
    let matched = Locality::detect(city)
        .and_then(|locality| pipelines.iter().find(|p| locality.matches(&p.name)));

    matched.or_else(|| pipelines.first())
}

/// Etapa inicial da lead
///
/// Primeira etapa editável depois do índice 0; senão a segunda etapa da
/// lista; senão a primeira.
pub fn select_status(statuses: &[Status]) -> Option<&Status> {
    statuses
        .iter()
        .skip(1)
        .find(|status| status.is_editable())
        .or_else(|| statuses.get(1))
        .or_else(|| statuses.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PipelineEmbedded;

    fn pipeline(id: u64, name: &str) -> Pipeline {
        Pipeline {
            id,
            name: name.to_string(),
            embedded: PipelineEmbedded::default(),
        }
    }

    fn status(id: u64, editable: Option<bool>) -> Status {
        Status {
            id,
            name: format!("status-{}", id),
            is_editable: editable,
        }
    }

    fn pipelines() -> Vec<Pipeline> {
        vec![
            pipeline(1, "Основная воронка"),
            pipeline(2, "Воронка Бишкек"),
            pipeline(3, "Osh sales"),
        ]
    }

    #[test]
    fn test_bishkek_any_case() {
        let pipelines = pipelines();
        for city in ["Бишкек", "БИШКЕК", "bishkek", "  Bishkek ", "г. Бишкек"] {
            assert_eq!(select_pipeline(&pipelines, city).unwrap().id, 2, "city: {}", city);
        }
    }

    #[test]
    fn test_osh_matches_both_alphabets() {
        let pipelines = pipelines();
        assert_eq!(select_pipeline(&pipelines, "Ош").unwrap().id, 3);
        assert_eq!(select_pipeline(&pipelines, "OSH").unwrap().id, 3);
    }

    #[test]
    fn test_unmatched_city_falls_back_to_first() {
        let pipelines = pipelines();
        assert_eq!(select_pipeline(&pipelines, "Талас").unwrap().id, 1);
        assert_eq!(select_pipeline(&pipelines, "").unwrap().id, 1);
    }

    #[test]
    fn test_known_city_without_pipeline_falls_back_to_first() {
        let pipelines = vec![pipeline(7, "Main"), pipeline(8, "Партнеры")];
        assert_eq!(select_pipeline(&pipelines, "Бишкек").unwrap().id, 7);
    }

    #[test]
    fn test_no_pipelines() {
        assert!(select_pipeline(&[], "Бишкек").is_none());
    }

    #[test]
    fn test_status_first_editable_after_index_zero() {
        let statuses = vec![
            status(10, Some(true)),
            status(11, Some(false)),
            status(12, Some(true)),
        ];
        assert_eq!(select_status(&statuses).unwrap().id, 12);
    }

    #[test]
    fn test_status_falls_back_to_second_then_first() {
        let statuses = vec![status(10, Some(false)), status(11, Some(false))];
        assert_eq!(select_status(&statuses).unwrap().id, 11);

        let statuses = vec![status(10, Some(true))];
        assert_eq!(select_status(&statuses).unwrap().id, 10);

        assert!(select_status(&[]).is_none());
    }
}
