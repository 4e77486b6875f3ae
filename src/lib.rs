// Biblioteca do relay de leads para o amoCRM
// Expõe módulos para uso em testes e no binário

pub mod app;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod utils;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub amocrm: amocrm::AmoCrmClient,
}
