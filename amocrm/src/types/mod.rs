pub mod contact;
pub mod lead;
pub mod note;
pub mod pipeline;

pub use contact::*;
pub use lead::*;
pub use note::*;
pub use pipeline::*;

use serde::Deserialize;

/// Resposta de criação em lote: `{"_embedded": {"<entidade>": [{"id": ..}]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEntity {
    pub id: u64,
}
