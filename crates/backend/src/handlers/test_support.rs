use async_trait::async_trait;
use contracts::projections::p900_tobacco_sales::TobaccoSaleDto;
use std::sync::Arc;

use crate::routes::AppState;
use crate::shared::upstream::{FetchError, SalesSource};

/// Источник с фиксированным набором записей
pub struct FakeSource(pub Vec<TobaccoSaleDto>);

#[async_trait]
impl SalesSource for FakeSource {
    async fn fetch_all(&self) -> Result<Vec<TobaccoSaleDto>, FetchError> {
        Ok(self.0.clone())
    }
}

/// Источник, который всегда отвечает ошибкой HTTP
pub struct FailingSource;

#[async_trait]
impl SalesSource for FailingSource {
    async fn fetch_all(&self) -> Result<Vec<TobaccoSaleDto>, FetchError> {
        Err(FetchError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
    }
}

pub fn sample_records() -> Vec<TobaccoSaleDto> {
    let rows = [
        ("T3", "2024-03-02", "Harare", "Alliance", 120.0, 360.0),
        ("T1", "2024-03-01", "Harare", "TSL", 100.0, 250.0),
        ("T4", "2024-03-02", "Karoi", "Alliance", 80.0, 200.0),
        ("T2", "2024-03-01", "Harare", "Alliance", 60.0, 150.0),
    ];
    rows.iter()
        .map(|(ticket, date, station, buyer, mass, value)| TobaccoSaleDto {
            id: ticket.to_string(),
            ticket_no: ticket.to_string(),
            sale_date: date.to_string(),
            station: station.to_string(),
            buyer: buyer.to_string(),
            bales: 1,
            mass_kg: *mass,
            value: *value,
            ..Default::default()
        })
        .collect()
}

pub fn fake_state() -> AppState {
    AppState::new(Arc::new(FakeSource(sample_records())))
}

pub fn failing_state() -> AppState {
    AppState::new(Arc::new(FailingSource))
}
