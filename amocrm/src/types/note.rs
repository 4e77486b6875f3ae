use serde::Serialize;

/// Nota para `POST /api/v4/leads/notes`
#[derive(Debug, Clone, Serialize)]
pub struct NewNote {
    pub entity_id: u64,
    pub note_type: &'static str,
    pub params: NoteParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteParams {
    pub text: String,
}

impl NewNote {
    pub fn common(entity_id: u64, text: &str) -> Self {
        Self {
            entity_id,
            note_type: "common",
            params: NoteParams {
                text: text.to_string(),
            },
        }
    }
}
