pub mod health;
pub mod lead;

pub use health::{health_check, root};
pub use lead::create_lead;
