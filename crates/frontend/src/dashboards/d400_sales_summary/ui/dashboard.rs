use chrono::{DateTime, Local};
use contracts::dashboards::d400_sales_summary::{
    aggregate, Dimension, GroupBy, ReportSettings, SalesSummary,
};
use contracts::shared::filtering::{filter_records, SalesFilter};
use contracts::shared::format::{format_count, format_date, format_mass, format_money};
use contracts::shared::report::{
    render_summary_csv, render_summary_html, report_file_name, ReportFormat, ReportMeta,
};
use leptos::prelude::*;
use std::str::FromStr;

use crate::layout::global_context::use_global_context;
use crate::shared::date_utils::today;
use crate::shared::export::{download_text, print_html};
use crate::shared::icons::icon;

const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 6px 8px;";
const CELL_RIGHT_STYLE: &str = "border: 1px solid #ddd; padding: 6px 8px; text-align: right;";
const SELECT_STYLE: &str = "padding: 4px 8px; border: 1px solid #ddd; border-radius: 4px; font-size: 14px;";

/// Группировка из двух селекторов; второй уровень совпадающий с первым игнорируется
fn group_by_from(primary: Dimension, secondary: Option<Dimension>) -> GroupBy {
    match secondary {
        Some(second) if second != primary => {
            GroupBy::new(vec![primary, second]).unwrap_or_else(|_| GroupBy::single(primary))
        }
        _ => GroupBy::single(primary),
    }
}

/// Шапка печатного отчёта
fn report_meta(
    group_by: &GroupBy,
    filter: &SalesFilter,
    settings: &ReportSettings,
    now: DateTime<Local>,
) -> ReportMeta {
    ReportMeta {
        title: settings.title_for(group_by),
        organization: settings.organization.clone(),
        generated_at: now.format("%d.%m.%Y %H:%M").to_string(),
        filters: filter.describe(),
        currency: settings.currency.clone(),
        auto_print: true,
    }
}

/// Значение ключа группы для таблицы
fn key_cell(dimension: Dimension, value: &str) -> String {
    if dimension == Dimension::Date {
        format_date(value)
    } else {
        value.to_string()
    }
}

/// Сводка продаж: группировка, таблица с итогом, CSV и печать
#[component]
pub fn SalesSummaryDashboard() -> impl IntoView {
    let ctx = use_global_context();

    let (primary, set_primary) = signal(Dimension::Date);
    let (secondary, set_secondary) = signal(None::<Dimension>);
    let (action_error, set_action_error) = signal(None::<String>);

    let group_by = Memo::new(move |_| group_by_from(primary.get(), secondary.get()));

    let summary = Memo::new(move |_| {
        let filter = ctx.filter.get();
        let group_by = group_by.get();
        ctx.records.with(|records| {
            let filtered = filter_records(records, &filter);
            aggregate(&filtered, &group_by)
        })
    });

    let export_csv = move |_| {
        set_action_error.set(None);
        let result = summary.with(|summary: &SalesSummary| {
            let content = render_summary_csv(summary).map_err(|e| e.to_string())?;
            let file_name = group_by.with(|g| report_file_name(g, ReportFormat::Csv, today()));
            download_text(&content, ReportFormat::Csv.mime_type(), &file_name)
        });
        if let Err(e) = result {
            log::error!("D400 CSV export failed: {}", e);
            set_action_error.set(Some(e));
        }
    };

    let print_report = move |_| {
        set_action_error.set(None);
        let meta = group_by.with(|g| {
            ctx.filter
                .with(|f| ctx.report.with(|settings| report_meta(g, f, settings, Local::now())))
        });
        let html = summary.with(|summary| render_summary_html(summary, &meta));
        if let Err(e) = print_html(&html) {
            log::error!("D400 print failed: {}", e);
            set_action_error.set(Some(e));
        }
    };

    view! {
        <div id="d400_sales_summary--dashboard" class="d400-dashboard">
            <div style="display: flex; flex-wrap: wrap; align-items: center; gap: 8px; margin-bottom: 12px;">
                <label style="font-size: 13px;">"Group by:"</label>
                <select
                    style=SELECT_STYLE
                    prop:value=move || primary.get().as_str()
                    on:change=move |ev| {
                        if let Ok(dim) = Dimension::from_str(&event_target_value(&ev)) {
                            set_primary.set(dim);
                        }
                    }
                >
                    {Dimension::ALL.into_iter().map(|dim| view! {
                        <option value={dim.as_str()} selected=move || primary.get() == dim>{dim.title()}</option>
                    }).collect_view()}
                </select>

                <label style="font-size: 13px;">"then by:"</label>
                <select
                    style=SELECT_STYLE
                    prop:value=move || secondary.get().map(|d| d.as_str()).unwrap_or("")
                    on:change=move |ev| {
                        set_secondary.set(Dimension::from_str(&event_target_value(&ev)).ok());
                    }
                >
                    <option value="">"—"</option>
                    {Dimension::ALL.into_iter().map(|dim| view! {
                        <option
                            value={dim.as_str()}
                            selected=move || secondary.get() == Some(dim)
                            disabled=move || primary.get() == dim
                        >
                            {dim.title()}
                        </option>
                    }).collect_view()}
                </select>

                <button
                    style="display: inline-flex; align-items: center; gap: 6px; padding: 4px 12px; background: #1976d2; color: white; border: none; border-radius: 4px; cursor: pointer;"
                    on:click=export_csv
                >
                    {icon("download")}
                    "Export CSV"
                </button>
                <button
                    style="display: inline-flex; align-items: center; gap: 6px; padding: 4px 12px; background: #455a64; color: white; border: none; border-radius: 4px; cursor: pointer;"
                    on:click=print_report
                    title="Print or save as PDF"
                >
                    {icon("printer")}
                    "Print / PDF"
                </button>

                <span style="font-size: 13px; color: #666;">
                    {move || {
                        let filters = ctx.filter.with(|f| f.describe());
                        if filters.is_empty() {
                            "All records".to_string()
                        } else {
                            filters.join(" · ")
                        }
                    }}
                </span>
            </div>

            {move || action_error.get().map(|err| view! {
                <div class="d400-error" style="color: #c62828; margin-bottom: 8px;">
                    <strong>"⚠ Error: "</strong>
                    {err}
                </div>
            })}

            {move || {
                let summary = summary.get();
                let dims = summary.dimensions.clone();
                let key_columns = dims.len();

                view! {
                    <table class="data-table" style="border-collapse: collapse; font-size: 14px; min-width: 600px;">
                        <thead style="background: #f5f5f5;">
                            <tr>
                                {dims.iter().map(|dim| view! {
                                    <th style=CELL_STYLE>{dim.title()}</th>
                                }).collect_view()}
                                <th style=CELL_RIGHT_STYLE>"Records"</th>
                                <th style=CELL_RIGHT_STYLE>"Bales"</th>
                                <th style=CELL_RIGHT_STYLE>"Mass (kg)"</th>
                                <th style=CELL_RIGHT_STYLE>"Value"</th>
                                <th style=CELL_RIGHT_STYLE>"Avg price"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {if summary.rows.is_empty() {
                                view! {
                                    <tr>
                                        <td colspan={(key_columns + 5).to_string()} style="padding: 16px; text-align: center; color: #888;">
                                            "No records match the selected filters"
                                        </td>
                                    </tr>
                                }.into_any()
                            } else {
                                summary.rows.iter().map(|row| {
                                    let totals = row.totals.clone();
                                    view! {
                                        <tr>
                                            {dims.iter().zip(&row.key).map(|(dim, value)| view! {
                                                <td style=CELL_STYLE>{key_cell(*dim, value)}</td>
                                            }).collect_view()}
                                            <td style=CELL_RIGHT_STYLE>{format_count(totals.records as i64)}</td>
                                            <td style=CELL_RIGHT_STYLE>{format_count(totals.bales)}</td>
                                            <td style=CELL_RIGHT_STYLE>{format_mass(totals.mass_kg)}</td>
                                            <td style=CELL_RIGHT_STYLE>{format_money(totals.value)}</td>
                                            <td style=CELL_RIGHT_STYLE>{format_money(totals.avg_price)}</td>
                                        </tr>
                                    }
                                }).collect_view().into_any()
                            }}
                        </tbody>
                        <tfoot>
                            <tr class="table__totals-row" style="background: #fffde7; font-weight: 600;">
                                <td style=CELL_STYLE colspan={key_columns.max(1).to_string()}>"Total"</td>
                                <td style=CELL_RIGHT_STYLE>{format_count(summary.totals.records as i64)}</td>
                                <td style=CELL_RIGHT_STYLE>{format_count(summary.totals.bales)}</td>
                                <td style=CELL_RIGHT_STYLE>{format_mass(summary.totals.mass_kg)}</td>
                                <td style=CELL_RIGHT_STYLE>{format_money(summary.totals.value)}</td>
                                <td style=CELL_RIGHT_STYLE>{format_money(summary.totals.avg_price)}</td>
                            </tr>
                        </tfoot>
                    </table>
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_group_by_from_selectors() {
        assert_eq!(
            group_by_from(Dimension::Station, None).dimensions(),
            &[Dimension::Station]
        );
        assert_eq!(
            group_by_from(Dimension::Station, Some(Dimension::Date)).to_query_value(),
            "station,date"
        );
        // Повтор измерения схлопывается в одно
        assert_eq!(
            group_by_from(Dimension::Buyer, Some(Dimension::Buyer)).dimensions(),
            &[Dimension::Buyer]
        );
    }

    #[test]
    fn test_report_meta() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let filter = SalesFilter {
            station: Some("Karoi".to_string()),
            ..Default::default()
        };
        let meta = report_meta(
            &GroupBy::single(Dimension::Month),
            &filter,
            &ReportSettings::default(),
            now,
        );
        assert_eq!(meta.title, "Tobacco Sales Report by Month");
        assert_eq!(meta.generated_at, "01.05.2024 09:30");
        assert_eq!(meta.filters, vec!["Station: Karoi".to_string()]);
        assert!(meta.auto_print);
    }

    #[test]
    fn test_report_meta_uses_server_settings() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let settings = ReportSettings {
            title: "Karoi Floor Sales".to_string(),
            organization: "Karoi Growers Union".to_string(),
            currency: "ZWG".to_string(),
        };
        let meta = report_meta(
            &GroupBy::single(Dimension::Buyer),
            &SalesFilter::default(),
            &settings,
            now,
        );
        assert_eq!(meta.title, "Karoi Floor Sales by Buyer");
        assert_eq!(meta.organization, "Karoi Growers Union");
        assert_eq!(meta.currency, "ZWG");
    }

    #[test]
    fn test_key_cell() {
        assert_eq!(key_cell(Dimension::Date, "2024-03-15"), "15.03.2024");
        assert_eq!(key_cell(Dimension::Month, "2024-03"), "2024-03");
    }
}
