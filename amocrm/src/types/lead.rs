use serde::{Deserialize, Serialize};

use super::CreatedEntity;

/// Tags fixas de toda lead vinda do site
pub const SITE_TAG: &str = "Заявка с сайта";
pub const CALLBACK_FORM_TAG: &str = "Форма обратного звонка";

/// Valor usado quando o formulário não informa a cidade
pub const UNKNOWN_CITY: &str = "Не указан";

/// Variante do formulário que gerou a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormType {
    Desktop,
    Mobile,
}

impl FormType {
    /// `"desktop"` é desktop; qualquer outro valor é tratado como mobile
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("desktop") {
            FormType::Desktop
        } else {
            FormType::Mobile
        }
    }

    /// Rótulo usado no texto da nota
    pub fn note_label(&self) -> &'static str {
        match self {
            FormType::Desktop => "Десктопная",
            FormType::Mobile => "Мобильная",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FormType::Desktop => "Десктопная форма",
            FormType::Mobile => "Мобильная форма",
        }
    }
}

/// Pedido de retorno recebido do formulário, já validado
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadSubmission {
    pub name: String,
    pub phone: String,
    pub city: Option<String>,
    pub comment: Option<String>,
    pub form_type: Option<FormType>,
    pub utm: Vec<(String, String)>,
}

impl LeadSubmission {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    /// Cidade informada, ou [`UNKNOWN_CITY`]
    pub fn city_or_unknown(&self) -> &str {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CITY)
    }

    fn has_details(&self) -> bool {
        self.comment.as_deref().map_or(false, |c| !c.trim().is_empty())
            || self.form_type.is_some()
            || !self.utm.is_empty()
    }

    /// Texto da nota anexada à lead
    ///
    /// `None` quando o formulário não trouxe comentário, tipo de formulário
    /// nem UTM; nesse caso nenhuma nota é criada.
    pub fn note_text(&self) -> Option<String> {
        if !self.has_details() {
            return None;
        }

        let mut text = format!("Город: {}\n", self.city_or_unknown());

        if let Some(form_type) = self.form_type {
            text.push_str(&format!("Форма: {}\n", form_type.note_label()));
        }

        if let Some(comment) = self.comment.as_deref().filter(|c| !c.trim().is_empty()) {
            text.push_str(&format!("Комментарий: {}\n", comment));
        }

        if !self.utm.is_empty() {
            text.push_str("\n\nUTM-метки:\n");
            for (key, value) in &self.utm {
                text.push_str(&format!("{}: {}\n", key, value));
            }
        }

        Some(text)
    }

    /// Tags da lead: fixas, cidade e tipo de formulário
    pub fn tags(&self) -> Vec<Tag> {
        vec![
            Tag::new(SITE_TAG),
            Tag::new(CALLBACK_FORM_TAG),
            Tag::new(self.city_or_unknown()),
            Tag::new(self.form_type.unwrap_or(FormType::Mobile).tag()),
        ]
    }

    pub fn lead_title(&self) -> String {
        format!("Заявка на обратный звонок от {}", self.name)
    }
}

/// Resultado do fluxo completo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadCreated {
    pub lead_id: u64,
    pub contact_id: u64,
}

/// Lead para `POST /api/v4/leads`
#[derive(Debug, Clone, Serialize)]
pub struct NewLead {
    pub name: String,
    pub pipeline_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    #[serde(rename = "_embedded")]
    pub embedded: NewLeadEmbedded,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLeadEmbedded {
    pub contacts: Vec<ContactRef>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContactRef {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadsCreated {
    #[serde(rename = "_embedded")]
    pub embedded: LeadsEmbedded,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadsEmbedded {
    #[serde(default)]
    pub leads: Vec<CreatedEntity>,
}
