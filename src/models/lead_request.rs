use amocrm::{FormType, LeadCreated, LeadSubmission};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mensagem devolvida quando faltam nome ou telefone
pub const MISSING_FIELDS_MESSAGE: &str = "Пожалуйста, укажите имя и телефон";

/// Corpo de `POST /api/amocrm/lead` enviado pelo formulário do site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub utm: Option<Map<String, Value>>,
    #[serde(default)]
    pub form_type: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl LeadRequest {
    /// Valida os campos obrigatórios e monta o pedido para o amoCRM
    pub fn into_submission(self) -> Result<LeadSubmission, &'static str> {
        let (name, phone) = match (non_blank(&self.name), non_blank(&self.phone)) {
            (Some(name), Some(phone)) => (name.to_string(), phone.to_string()),
            (None, _) => return Err("name"),
            (_, None) => return Err("phone"),
        };

        let utm = self
            .utm
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        Ok(LeadSubmission {
            name,
            phone,
            city: non_blank(&self.city).map(str::to_string),
            comment: non_blank(&self.comment).map(str::to_string),
            form_type: non_blank(&self.form_type).map(FormType::from_label),
            utm,
        })
    }
}

/// Resposta de sucesso
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: LeadCreated,
}

impl LeadResponse {
    pub fn created(data: LeadCreated) -> Self {
        Self {
            success: true,
            message: "Заявка успешно создана в amoCRM",
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> LeadRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_missing_name_or_phone() {
        assert_eq!(request(json!({"phone": "+996700"})).into_submission().unwrap_err(), "name");
        assert_eq!(request(json!({"name": "Айбек", "phone": "  "})).into_submission().unwrap_err(), "phone");
    }

    #[test]
    fn test_full_request() {
        let submission = request(json!({
            "name": " Айбек ",
            "phone": "+996700123456",
            "city": "",
            "comment": "Позвоните",
            "form_type": "desktop",
            "utm": {"utm_source": "google", "utm_id": 42}
        }))
        .into_submission()
        .unwrap();

        assert_eq!(submission.name, "Айбек");
        assert_eq!(submission.city, None);
        assert_eq!(submission.form_type, Some(FormType::Desktop));
        assert_eq!(
            submission.utm,
            vec![
                ("utm_id".to_string(), "42".to_string()),
                ("utm_source".to_string(), "google".to_string())
            ]
        );
    }
}
