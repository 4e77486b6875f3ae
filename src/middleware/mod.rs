//! Middleware do router
//!
//! - Log de requisições com IP do cliente

pub mod request_log;

pub use request_log::log_requests;
