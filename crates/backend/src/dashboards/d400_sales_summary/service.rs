use anyhow::Result;
use chrono::Local;
use contracts::dashboards::d400_sales_summary::{aggregate, GroupBy, ReportSettings, SalesSummary};
use contracts::projections::p900_tobacco_sales::TobaccoSaleDto;
use contracts::shared::filtering::{filter_records, SalesFilter};
use contracts::shared::report::{
    render_summary_csv, render_summary_html, report_file_name, ReportFormat, ReportMeta,
};

use crate::shared::config::ReportConfig;

/// Готовый к отдаче файл отчёта
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub content: String,
    pub mime_type: &'static str,
    pub file_name: String,
}

/// Сводка по отфильтрованным записям
pub fn build_summary(
    records: &[TobaccoSaleDto],
    filter: &SalesFilter,
    group_by: &GroupBy,
) -> SalesSummary {
    let invalid = filter.invalid_bounds();
    if !invalid.is_empty() {
        tracing::warn!("D400: ignoring unparsable date bounds: {:?}", invalid);
    }

    let filtered = filter_records(records, filter);
    let summary = aggregate(&filtered, group_by);
    tracing::info!(
        "D400 summary by {}: {} of {} records in {} groups",
        group_by.to_query_value(),
        filtered.len(),
        records.len(),
        summary.rows.len()
    );
    summary
}

/// Отчёт в нужном формате (CSV или печатный HTML)
pub fn render_report(
    summary: &SalesSummary,
    group_by: &GroupBy,
    filter: &SalesFilter,
    format: ReportFormat,
    auto_print: bool,
    report_config: &ReportConfig,
) -> Result<RenderedReport> {
    let now = Local::now();

    let content = match format {
        ReportFormat::Csv => render_summary_csv(summary)?,
        ReportFormat::Html => {
            let settings = ReportSettings::from(report_config);
            let meta = ReportMeta {
                title: settings.title_for(group_by),
                organization: settings.organization,
                generated_at: now.format("%d.%m.%Y %H:%M").to_string(),
                filters: filter.describe(),
                currency: settings.currency,
                auto_print,
            };
            render_summary_html(summary, &meta)
        }
    };

    Ok(RenderedReport {
        content,
        mime_type: format.mime_type(),
        file_name: report_file_name(group_by, format, now.date_naive()),
    })
}
