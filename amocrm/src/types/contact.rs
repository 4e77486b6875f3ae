use serde::{Deserialize, Serialize};

use super::CreatedEntity;

/// Contato para `POST /api/v4/contacts`
#[derive(Debug, Clone, Serialize)]
pub struct NewContact {
    pub name: String,
    pub custom_fields_values: Vec<CustomFieldValues>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomFieldValues {
    pub field_code: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumValue {
    pub value: String,
    pub enum_code: String,
}

impl NewContact {
    /// Contato com telefone de trabalho
    pub fn with_work_phone(name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            custom_fields_values: vec![CustomFieldValues {
                field_code: "PHONE".to_string(),
                values: vec![EnumValue {
                    value: phone.to_string(),
                    enum_code: "WORK".to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactsCreated {
    #[serde(rename = "_embedded")]
    pub embedded: ContactsEmbedded,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactsEmbedded {
    #[serde(default)]
    pub contacts: Vec<CreatedEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_payload() {
        let contact = NewContact::with_work_phone("Айбек", "+996700123456");

        assert_eq!(
            serde_json::to_value(vec![contact]).unwrap(),
            json!([{
                "name": "Айбек",
                "custom_fields_values": [{
                    "field_code": "PHONE",
                    "values": [{"value": "+996700123456", "enum_code": "WORK"}]
                }]
            }])
        );
    }
}
