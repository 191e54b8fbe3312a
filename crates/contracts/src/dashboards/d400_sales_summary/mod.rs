pub mod dto;
pub mod service;

pub use dto::*;
pub use service::aggregate;
