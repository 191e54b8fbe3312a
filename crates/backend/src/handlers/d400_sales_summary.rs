use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::dashboards::d400_sales_summary::{
    GroupBy, ReportSettings, SalesSummary, SalesSummaryParams,
};
use contracts::shared::filtering::SalesFilter;
use contracts::shared::report::ReportFormat;
use serde::Deserialize;

use crate::dashboards::d400_sales_summary::service;
use crate::routes::AppState;
use crate::shared::config;
use crate::shared::error::ApiError;

/// Query экспорта: формат и автопечать для HTML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub print: Option<bool>,
}

/// Handler для сводки продаж в JSON
pub async fn get_summary(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
    Query(params): Query<SalesSummaryParams>,
) -> Result<Json<SalesSummary>, ApiError> {
    let group_by = parse_group_by(&params)?;
    let records = state.source.fetch_all().await?;
    Ok(Json(service::build_summary(&records, &filter, &group_by)))
}

/// Handler для выгрузки отчёта (CSV скачивается, HTML открывается для печати)
pub async fn export_summary(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
    Query(params): Query<SalesSummaryParams>,
    Query(export): Query<ExportParams>,
) -> Result<Response, ApiError> {
    let group_by = parse_group_by(&params)?;
    let format: ReportFormat = export
        .format
        .as_deref()
        .unwrap_or("csv")
        .parse()
        .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?;

    let records = state.source.fetch_all().await?;
    let summary = service::build_summary(&records, &filter, &group_by);
    let report = service::render_report(
        &summary,
        &group_by,
        &filter,
        format,
        export.print.unwrap_or(false),
        &config::get().report,
    )?;

    tracing::info!(
        "D400 export {} ({} bytes)",
        report.file_name,
        report.content.len()
    );

    let disposition = match format {
        ReportFormat::Csv => format!("attachment; filename=\"{}\"", report.file_name),
        ReportFormat::Html => format!("inline; filename=\"{}\"", report.file_name),
    };

    Ok((
        [
            (header::CONTENT_TYPE, report.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.content,
    )
        .into_response())
}

/// Handler для шапки печатного отчёта (секция `[report]` конфигурации)
pub async fn get_report_settings() -> Json<ReportSettings> {
    Json(ReportSettings::from(&config::get().report))
}

fn parse_group_by(params: &SalesSummaryParams) -> Result<GroupBy, ApiError> {
    params
        .group_by()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{failing_state, fake_state};
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use contracts::dashboards::d400_sales_summary::Dimension;

    fn group(value: &str) -> Query<SalesSummaryParams> {
        Query(SalesSummaryParams {
            group_by: Some(value.to_string()),
        })
    }

    #[tokio::test]
    async fn test_summary_by_station_and_date() {
        let Json(summary) = get_summary(
            State(fake_state()),
            Query(SalesFilter::default()),
            group("station,date"),
        )
        .await
        .unwrap();
        assert_eq!(summary.dimensions, vec![Dimension::Station, Dimension::Date]);
        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.rows[0].key, vec!["Harare", "2024-03-01"]);
        assert_eq!(summary.rows[0].totals.records, 2);
        assert_eq!(summary.totals.value, 960.0);
    }

    #[tokio::test]
    async fn test_invalid_group_by_is_bad_request() {
        let err = get_summary(
            State(fake_state()),
            Query(SalesFilter::default()),
            group("warehouse"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_csv_is_attachment() {
        let response = export_summary(
            State(fake_state()),
            Query(SalesFilter::default()),
            group("buyer"),
            Query(ExportParams::default()),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"sales_by_buyer_"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Alliance;3;3;260.0;710.00"));
    }

    #[tokio::test]
    async fn test_report_settings_follow_config() {
        let Json(settings) = get_report_settings().await;
        assert_eq!(settings, ReportSettings::from(&config::get().report));
        assert!(!settings.title.is_empty());
    }

    #[tokio::test]
    async fn test_export_unknown_format() {
        let err = export_summary(
            State(fake_state()),
            Query(SalesFilter::default()),
            group("buyer"),
            Query(ExportParams {
                format: Some("xlsx".to_string()),
                print: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_html_upstream_failure() {
        let err = export_summary(
            State(failing_state()),
            Query(SalesFilter::default()),
            group("date"),
            Query(ExportParams {
                format: Some("html".to_string()),
                print: Some(true),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
