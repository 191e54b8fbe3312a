use async_trait::async_trait;
use contracts::projections::p900_tobacco_sales::TobaccoSaleDto;
use thiserror::Error;

/// Ошибки получения данных из удалённого API
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Upstream API URL is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// Источник записей продаж.
///
/// Один вызов `fetch_all` делает один запрос к источнику: без повторов,
/// без кэша и без постраничной загрузки.
#[async_trait]
pub trait SalesSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<TobaccoSaleDto>, FetchError>;
}
