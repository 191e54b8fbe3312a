//! Получение записей продаж из удалённого API

pub mod api_client;
pub mod source;

pub use api_client::TobaccoApiClient;
pub use source::{FetchError, SalesSource};
