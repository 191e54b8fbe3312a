use async_trait::async_trait;
use contracts::projections::p900_tobacco_sales::{TobaccoSaleDto, UpstreamEnvelope};

use super::source::{FetchError, SalesSource};
use crate::shared::config::UpstreamConfig;

/// HTTP-клиент удалённого API реестра продаж
pub struct TobaccoApiClient {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl TobaccoApiClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            url: config.url.trim().to_string(),
            api_token: config
                .api_token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SalesSource for TobaccoApiClient {
    async fn fetch_all(&self) -> Result<Vec<TobaccoSaleDto>, FetchError> {
        if self.url.is_empty() {
            return Err(FetchError::NotConfigured);
        }

        tracing::info!(
            "Upstream API: GET {} (token={})",
            self.url,
            if self.api_token.is_some() { "***" } else { "none" }
        );

        let mut request = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Upstream API network error for {}: {}", self.url, e);
            FetchError::Network(e)
        })?;

        let status = response.status();
        tracing::info!("Upstream API response: {} for {}", status, self.url);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let records = decode_payload(&text)?;
        tracing::info!("Upstream API: got {} records", records.len());
        Ok(records)
    }
}

/// Разбирает тело ответа: массив записей или конверт `{count, data}`.
///
/// Форма определяется по первому символу, поэтому ошибка serde относится
/// к реальной форме ответа и содержит строку и колонку.
pub fn decode_payload(text: &str) -> Result<Vec<TobaccoSaleDto>, FetchError> {
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    match text.trim_start().chars().next() {
        Some('[') => serde_json::from_str::<Vec<TobaccoSaleDto>>(text)
            .map_err(|e| FetchError::Decode(format!("record array: {}", e))),
        Some('{') => {
            let envelope: UpstreamEnvelope = serde_json::from_str(text)
                .map_err(|e| FetchError::Decode(format!("envelope: {}", e)))?;
            if let Some(count) = envelope.count {
                if count != envelope.data.len() as i64 {
                    tracing::warn!(
                        "Upstream envelope count={} differs from data length={}",
                        count,
                        envelope.data.len()
                    );
                }
            }
            Ok(envelope.data)
        }
        _ => {
            let preview: String = text.trim().chars().take(80).collect();
            Err(FetchError::Decode(format!(
                "expected a JSON array or an object with \"data\", got: {}",
                preview
            )))
        }
    }
}
