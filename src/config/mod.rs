pub mod settings;

pub use settings::{AmoCrmSettings, CorsSettings, ServerSettings, Settings};
