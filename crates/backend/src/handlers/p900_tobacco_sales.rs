use axum::extract::{Query, State};
use axum::Json;
use contracts::projections::p900_tobacco_sales::{
    TobaccoSaleDto, TobaccoSalesListParams, TobaccoSalesListResponse,
};
use contracts::shared::filtering::SalesFilter;

use crate::projections::p900_tobacco_sales::service;
use crate::routes::AppState;
use crate::shared::error::ApiError;

/// Handler: все записи из удалённого API (фильтрация на клиенте)
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<TobaccoSaleDto>>, ApiError> {
    let records = state.source.fetch_all().await?;
    Ok(Json(records))
}

/// Handler для списка продаж с фильтрами, сортировкой и страницей
pub async fn list_sales(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
    Query(params): Query<TobaccoSalesListParams>,
) -> Result<Json<TobaccoSalesListResponse>, ApiError> {
    let records = state.source.fetch_all().await?;
    Ok(Json(service::list_sales(&records, &filter, &params)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{failing_state, fake_state};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use contracts::shared::sorting::SortColumn;

    #[tokio::test]
    async fn test_list_all_returns_every_record() {
        let Json(records) = list_all(State(fake_state())).await.unwrap();
        assert_eq!(records.len(), 4);
    }

    #[tokio::test]
    async fn test_list_sales_pages_filtered_records() {
        let filter = SalesFilter {
            station: Some("Harare".to_string()),
            ..Default::default()
        };
        let params = TobaccoSalesListParams {
            sort: Some(SortColumn::Ticket),
            page_size: 1,
            ..Default::default()
        };
        let Json(page) = list_sales(State(fake_state()), Query(filter), Query(params))
            .await
            .unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items[0].ticket_no, "T1");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let err = list_all(State(failing_state())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
