use contracts::projections::p900_tobacco_sales::TobaccoSaleDto;

use crate::shared::api_utils::get_json;

const API_BASE: &str = "/api/p900/tobacco-sales";

/// Все записи реестра одним запросом; фильтрация и сортировка на клиенте
pub async fn fetch_all_sales() -> Result<Vec<TobaccoSaleDto>, String> {
    get_json(&format!("{}/all", API_BASE)).await
}
