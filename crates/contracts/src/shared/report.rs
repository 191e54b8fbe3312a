//! Построение отчётов: CSV (для Excel) и печатная HTML-страница.
//!
//! Одна пара функций на все группировки: вид отчёта задаётся `GroupBy`.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::dashboards::d400_sales_summary::{Dimension, GroupBy, SalesSummary, SummaryTotals};
use crate::projections::p900_tobacco_sales::TobaccoSaleDto;
use crate::shared::format::{format_count, format_date, format_mass, format_money};

/// Разделитель CSV: Excel в локалях с десятичной запятой ожидает ';'
pub const CSV_DELIMITER: u8 = b';';

/// UTF-8 BOM для корректного отображения в Excel
const BOM: char = '\u{FEFF}';

const TOTALS_HEADERS: [&str; 5] = ["Records", "Bales", "Mass (kg)", "Value", "Avg price"];

const RECORD_HEADERS: [&str; 11] = [
    "Date",
    "Ticket",
    "Station",
    "Buyer",
    "Grower",
    "Grade",
    "Bales",
    "Mass (kg)",
    "Price/kg",
    "Value",
    "Status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Csv,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv;charset=utf-8",
            ReportFormat::Html => "text/html;charset=utf-8",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "html" | "print" | "pdf" => Ok(ReportFormat::Html),
            other => Err(anyhow::anyhow!("Unknown report format: {}", other)),
        }
    }
}

/// Шапка печатного отчёта
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMeta {
    pub title: String,
    pub organization: String,
    /// Уже отформатированная дата/время формирования
    pub generated_at: String,
    /// Описание активных фильтров (`SalesFilter::describe`)
    pub filters: Vec<String>,
    pub currency: String,
    /// Вызвать диалог печати сразу после загрузки страницы
    pub auto_print: bool,
}

/// CSV сводки: заголовок, строка на группу, итог
pub fn render_summary_csv(summary: &SalesSummary) -> Result<String> {
    let mut writer = csv_writer();

    let mut header: Vec<String> = summary
        .dimensions
        .iter()
        .map(|d| d.title().to_string())
        .collect();
    header.extend(TOTALS_HEADERS.iter().map(|h| h.to_string()));
    writer.write_record(&header)?;

    for row in &summary.rows {
        let mut record = row.key.clone();
        record.extend(totals_cells(&row.totals));
        writer.write_record(&record)?;
    }

    // Итог: "Total" в первой колонке ключа, остальные колонки ключа пустые
    let mut total = vec!["Total".to_string()];
    total.extend(std::iter::repeat(String::new()).take(summary.dimensions.len().saturating_sub(1)));
    total.extend(totals_cells(&summary.totals));
    writer.write_record(&total)?;

    finish_csv(writer)
}

/// CSV реестра: строка на запись, в текущем порядке
pub fn render_records_csv(records: &[TobaccoSaleDto]) -> Result<String> {
    let mut writer = csv_writer();
    writer.write_record(RECORD_HEADERS)?;

    for sale in records {
        writer.write_record([
            sale.sale_date.clone(),
            sale.ticket_no.clone(),
            sale.station.clone(),
            sale.buyer.clone(),
            sale.grower_label(),
            sale.grade.clone(),
            sale.bales.to_string(),
            format!("{:.1}", sale.mass_kg),
            format!("{:.2}", sale.price_per_kg),
            format!("{:.2}", sale.value),
            sale.status_label().to_string(),
        ])?;
    }

    finish_csv(writer)
}

/// Печатная HTML-страница сводки (браузер сохраняет её в PDF через печать)
pub fn render_summary_html(summary: &SalesSummary, meta: &ReportMeta) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\"/>\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&meta.title)));
    html.push_str(PRINT_CSS);
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    if !meta.organization.is_empty() {
        html.push_str(&format!(
            "<div class=\"org\">{}</div>\n",
            escape_html(&meta.organization)
        ));
    }
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&meta.title)));
    html.push_str(&format!(
        "<div class=\"meta\">Grouped by: {} · Generated: {}</div>\n",
        escape_html(&group_title(summary)),
        escape_html(&meta.generated_at)
    ));
    if !meta.filters.is_empty() {
        html.push_str("<ul class=\"filters\">\n");
        for filter in &meta.filters {
            html.push_str(&format!("<li>{}</li>\n", escape_html(filter)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</header>\n");

    html.push_str("<table>\n<thead>\n<tr>");
    for dim in &summary.dimensions {
        html.push_str(&format!("<th>{}</th>", escape_html(dim.title())));
    }
    let value_header = if meta.currency.is_empty() {
        "Value".to_string()
    } else {
        format!("Value ({})", meta.currency)
    };
    for header in ["Records", "Bales", "Mass (kg)", value_header.as_str(), "Avg price"] {
        html.push_str(&format!("<th class=\"num\">{}</th>", escape_html(header)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    if summary.rows.is_empty() {
        html.push_str(&format!(
            "<tr><td colspan=\"{}\" class=\"empty\">No records match the selected filters</td></tr>\n",
            summary.dimensions.len() + TOTALS_HEADERS.len()
        ));
    }

    for row in &summary.rows {
        html.push_str("<tr>");
        for (dim, part) in summary.dimensions.iter().zip(&row.key) {
            let shown = if *dim == Dimension::Date {
                format_date(part)
            } else {
                part.clone()
            };
            html.push_str(&format!("<td>{}</td>", escape_html(&shown)));
        }
        push_totals_cells(&mut html, &row.totals);
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n<tfoot>\n<tr>");
    html.push_str(&format!(
        "<td colspan=\"{}\">Total</td>",
        summary.dimensions.len().max(1)
    ));
    push_totals_cells(&mut html, &summary.totals);
    html.push_str("</tr>\n</tfoot>\n</table>\n");

    if meta.auto_print {
        html.push_str("<script>window.addEventListener('load', function () { window.print(); });</script>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// "sales_by_station_date_2024-05-01.csv"
pub fn report_file_name(group_by: &GroupBy, format: ReportFormat, date: NaiveDate) -> String {
    let dims: Vec<&str> = group_by.dimensions().iter().map(|d| d.as_str()).collect();
    format!(
        "sales_by_{}_{}.{}",
        dims.join("_"),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// "sales_register_2024-05-01.csv"
pub fn records_file_name(date: NaiveDate) -> String {
    format!("sales_register_{}.csv", date.format("%Y-%m-%d"))
}

/// Экранирование текста для вставки в HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PRINT_CSS: &str = r#"<style>
body { font-family: Arial, Helvetica, sans-serif; font-size: 12px; color: #222; margin: 24px; }
header .org { font-size: 13px; color: #555; text-transform: uppercase; letter-spacing: 0.05em; }
h1 { font-size: 20px; margin: 4px 0 6px; }
.meta { color: #555; margin-bottom: 6px; }
.filters { margin: 0 0 12px 18px; padding: 0; color: #444; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #bbb; padding: 4px 6px; }
th { background: #eee; text-align: left; }
.num { text-align: right; white-space: nowrap; }
tfoot td { font-weight: bold; background: #f5f5f5; }
.empty { text-align: center; color: #777; padding: 16px; }
@media print {
  body { margin: 0; }
  thead { display: table-header-group; }
  tr { page-break-inside: avoid; }
}
</style>
"#;

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(Vec::new())
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    let body = String::from_utf8(bytes)?;
    let mut content = String::with_capacity(body.len() + BOM.len_utf8());
    content.push(BOM);
    content.push_str(&body);
    Ok(content)
}

fn totals_cells(totals: &SummaryTotals) -> Vec<String> {
    vec![
        totals.records.to_string(),
        totals.bales.to_string(),
        format!("{:.1}", totals.mass_kg),
        format!("{:.2}", totals.value),
        format!("{:.2}", totals.avg_price),
    ]
}

fn push_totals_cells(html: &mut String, totals: &SummaryTotals) {
    let cells = [
        format_count(totals.records as i64),
        format_count(totals.bales),
        format_mass(totals.mass_kg),
        format_money(totals.value),
        format_money(totals.avg_price),
    ];
    for cell in cells {
        html.push_str(&format!("<td class=\"num\">{}</td>", escape_html(&cell)));
    }
}

fn group_title(summary: &SalesSummary) -> String {
    summary
        .dimensions
        .iter()
        .map(|d| d.title())
        .collect::<Vec<_>>()
        .join(" / ")
}
