use contracts::dashboards::d400_sales_summary::ReportSettings;

use crate::shared::api_utils::get_json;

/// Шапка печатного отчёта из конфигурации сервера
pub async fn fetch_report_settings() -> Result<ReportSettings, String> {
    get_json("/api/d400/report-meta").await
}
