pub mod lead_request;

pub use lead_request::*;
