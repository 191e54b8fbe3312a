pub mod state;

use contracts::projections::p900_tobacco_sales::TobaccoSaleDto;
use contracts::shared::filtering::SalesFilter;
use contracts::shared::format::{format_count, format_date, format_mass, format_money};
use contracts::shared::report::{records_file_name, render_records_csv, ReportFormat};
use contracts::shared::sorting::SortColumn;
use leptos::prelude::*;

use self::state::{create_state, page_with_totals, visible_rows};
use crate::layout::global_context::use_global_context;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::date_utils::today;
use crate::shared::export::download_text;
use crate::shared::icons::icon;
use crate::shared::list_utils::{distinct_values, SearchInput, SortableHeader};

const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 6px 8px;";
const CELL_RIGHT_STYLE: &str = "border: 1px solid #ddd; padding: 6px 8px; text-align: right;";
const INPUT_STYLE: &str = "padding: 4px 8px; border: 1px solid #ddd; border-radius: 4px; font-size: 14px;";

/// Текст ячейки таблицы для колонки
fn cell_text(column: SortColumn, sale: &TobaccoSaleDto) -> String {
    match column {
        SortColumn::Date => format_date(&sale.sale_date),
        SortColumn::Ticket => sale.ticket_no.clone(),
        SortColumn::Station => sale.station.clone(),
        SortColumn::Buyer => sale.buyer.clone(),
        SortColumn::Grower => sale.grower_label(),
        SortColumn::Grade => sale.grade.clone(),
        SortColumn::Bales => format_count(sale.bales),
        SortColumn::Mass => format_mass(sale.mass_kg),
        SortColumn::Price => format_money(sale.price_per_kg),
        SortColumn::Value => format_money(sale.value),
        SortColumn::Status => sale.status_label().to_string(),
    }
}

/// Реестр продаж: фильтры, сортировка, страницы, итоги и выгрузка в CSV
#[component]
pub fn TobaccoSalesList() -> impl IntoView {
    let ctx = use_global_context();
    let state = create_state();
    let (export_error, set_export_error) = signal(None::<String>);

    // Отфильтрованные и отсортированные записи
    let rows = Memo::new(move |_| {
        let filter = ctx.filter.get();
        let sort = state.with(|s| s.sort);
        ctx.records.with(|records| visible_rows(records, &filter, sort))
    });

    let page_and_totals =
        Memo::new(move |_| rows.with(|rows| page_with_totals(rows, state.with(|s| s.page_request()))));

    // Варианты для выпадающих фильтров из всех загруженных записей
    let stations = Memo::new(move |_| ctx.records.with(|r| distinct_values(r, |s| s.station.as_str())));
    let buyers = Memo::new(move |_| ctx.records.with(|r| distinct_values(r, |s| s.buyer.as_str())));
    let grades = Memo::new(move |_| ctx.records.with(|r| distinct_values(r, |s| s.grade.as_str())));
    let statuses = Memo::new(move |_| ctx.records.with(|r| distinct_values(r, |s| s.status_label())));

    // Любое изменение фильтра возвращает на первую страницу
    let update_filter = move |apply: fn(&mut SalesFilter, String), value: String| {
        ctx.filter.update(|f| apply(f, value));
        state.update(|s| s.page = 0);
    };

    let on_sort = Callback::new(move |column: SortColumn| {
        state.update(|s| s.toggle_sort(column));
    });

    let export_csv = move |_| {
        set_export_error.set(None);
        let result = rows.with(|rows| {
            if rows.is_empty() {
                return Err("No data to export".to_string());
            }
            let content = render_records_csv(rows).map_err(|e| e.to_string())?;
            download_text(&content, ReportFormat::Csv.mime_type(), &records_file_name(today()))
        });
        if let Err(e) = result {
            log::error!("CSV export failed: {}", e);
            set_export_error.set(Some(e));
        }
    };

    let select_filter = move |label: &'static str,
                              options: Memo<Vec<String>>,
                              current: fn(&SalesFilter) -> Option<String>,
                              apply: fn(&mut SalesFilter, String)| {
        view! {
            <label style="font-size: 13px; white-space: nowrap;">{label}</label>
            <select
                style=INPUT_STYLE
                prop:value=move || ctx.filter.with(|f| current(f).unwrap_or_default())
                on:change=move |ev| update_filter(apply, event_target_value(&ev))
            >
                <option value="">"All"</option>
                {move || options.get().into_iter().map(|value| {
                    view! { <option value=value.clone()>{value.clone()}</option> }
                }).collect_view()}
            </select>
        }
    };

    view! {
        <div class="tobacco-sales-list">
            <div class="filter-panel" style="display: flex; flex-wrap: wrap; align-items: center; gap: 8px; margin-bottom: 12px;">
                <SearchInput
                    value=Signal::derive(move || ctx.filter.with(|f| f.search.clone().unwrap_or_default()))
                    on_change=Callback::new(move |value: String| update_filter(|f, v| f.search = Some(v), value))
                    placeholder="Ticket, grower, station..."
                />

                <label style="font-size: 13px; white-space: nowrap;">"From:"</label>
                <input
                    type="date"
                    style=INPUT_STYLE
                    prop:value=move || ctx.filter.with(|f| f.date_from.clone().unwrap_or_default())
                    on:change=move |ev| update_filter(|f, v| f.date_from = Some(v), event_target_value(&ev))
                />
                <label style="font-size: 13px; white-space: nowrap;">"To:"</label>
                <input
                    type="date"
                    style=INPUT_STYLE
                    prop:value=move || ctx.filter.with(|f| f.date_to.clone().unwrap_or_default())
                    on:change=move |ev| update_filter(|f, v| f.date_to = Some(v), event_target_value(&ev))
                />

                {select_filter("Station:", stations, |f| f.station.clone(), |f, v| f.station = Some(v))}
                {select_filter("Buyer:", buyers, |f| f.buyer.clone(), |f, v| f.buyer = Some(v))}
                {select_filter("Grade:", grades, |f| f.grade.clone(), |f, v| f.grade = Some(v))}
                {select_filter("Status:", statuses, |f| f.status.clone(), |f, v| f.status = Some(v))}

                <label style="font-size: 13px; white-space: nowrap;">"Grower:"</label>
                <input
                    type="text"
                    style=INPUT_STYLE
                    placeholder="No. or name"
                    prop:value=move || ctx.filter.with(|f| f.grower.clone().unwrap_or_default())
                    on:change=move |ev| update_filter(|f, v| f.grower = Some(v), event_target_value(&ev))
                />

                <button
                    style="padding: 4px 12px; border: 1px solid #ddd; border-radius: 4px; background: white; cursor: pointer;"
                    on:click=move |_| {
                        ctx.reset_filter();
                        state.update(|s| s.page = 0);
                    }
                >
                    "Reset"
                </button>

                <button
                    style="display: inline-flex; align-items: center; gap: 6px; padding: 4px 12px; background: #1976d2; color: white; border: none; border-radius: 4px; cursor: pointer;"
                    on:click=export_csv
                    title="Download filtered rows as CSV"
                >
                    {icon("download")}
                    "Export CSV"
                </button>
            </div>

            {move || export_error.get().map(|err| view! {
                <div style="color: #c62828; margin-bottom: 8px;">{err}</div>
            })}

            <div style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px;">
                <span style="font-size: 13px; color: #666;">
                    {move || {
                        let filters = ctx.filter.with(|f| f.describe());
                        if filters.is_empty() {
                            "No filters".to_string()
                        } else {
                            filters.join(" · ")
                        }
                    }}
                </span>
                <PaginationControls
                    current_page=Signal::derive(move || page_and_totals.with(|(p, _)| p.page))
                    total_pages=Signal::derive(move || page_and_totals.with(|(p, _)| p.total_pages))
                    total_count=Signal::derive(move || page_and_totals.with(|(p, _)| p.total_count))
                    page_size=Signal::derive(move || state.with(|s| s.page_size))
                    on_page_change=Callback::new(move |page: usize| state.update(|s| s.page = page))
                    on_page_size_change=Callback::new(move |size: usize| state.update(|s| s.set_page_size(size)))
                />
            </div>

            <div style="overflow-y: auto; max-height: calc(100vh - 220px); border: 1px solid #ddd;">
                <table class="data-table" style="width: 100%; border-collapse: collapse; margin: 0; font-size: 14px;">
                    <thead style="position: sticky; top: 0; z-index: 10; background: #f5f5f5;">
                        <tr>
                            {SortColumn::ALL.into_iter().map(|column| view! {
                                <SortableHeader
                                    column=column
                                    sort=Signal::derive(move || state.with(|s| s.sort))
                                    on_sort=on_sort
                                />
                            }).collect_view()}
                        </tr>
                        // Итоги по всему отфильтрованному набору, не только по странице
                        <tr class="table__totals-row" style="background: #fffde7; font-weight: 600;">
                            {move || page_and_totals.with(|(_, totals)| {
                                let totals = totals.clone();
                                view! {
                                    <td style=CELL_STYLE colspan="6">
                                        {format!("Records: {}", format_count(totals.records as i64))}
                                    </td>
                                    <td style=CELL_RIGHT_STYLE>{format_count(totals.bales)}</td>
                                    <td style=CELL_RIGHT_STYLE>{format_mass(totals.mass_kg)}</td>
                                    <td style=CELL_RIGHT_STYLE>{format_money(totals.avg_price)}</td>
                                    <td style=CELL_RIGHT_STYLE>{format_money(totals.value)}</td>
                                    <td style=CELL_STYLE></td>
                                }
                            })}
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let items = page_and_totals.with(|(p, _)| p.items.clone());
                            if items.is_empty() {
                                return view! {
                                    <tr>
                                        <td colspan="11" style="padding: 16px; text-align: center; color: #888;">
                                            {move || if ctx.loading.get() { "Loading..." } else { "No records" }}
                                        </td>
                                    </tr>
                                }.into_any();
                            }
                            items.into_iter().map(|sale| {
                                view! {
                                    <tr>
                                        {SortColumn::ALL.into_iter().map(|column| {
                                            let style = if column.is_numeric() { CELL_RIGHT_STYLE } else { CELL_STYLE };
                                            view! { <td style=style>{cell_text(column, &sale)}</td> }
                                        }).collect_view()}
                                    </tr>
                                }
                            }).collect_view().into_any()
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
