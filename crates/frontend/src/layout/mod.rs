pub mod global_context;

use leptos::prelude::*;

use crate::dashboards::d400_sales_summary::ui::SalesSummaryDashboard;
use crate::layout::global_context::{use_global_context, Tab};
use crate::projections::p900_tobacco_sales::ui::list::TobaccoSalesList;
use crate::shared::icons::icon;

/// Оболочка приложения: верхняя панель с загрузкой данных и две вкладки
#[component]
pub fn Shell() -> impl IntoView {
    let ctx = use_global_context();

    view! {
        <div class="app-shell" style="font-family: sans-serif; padding: 12px;">
            <div style="display: flex; align-items: center; gap: 12px; margin-bottom: 12px; border-bottom: 1px solid #ddd; padding-bottom: 8px;">
                <h1 style="margin: 0; font-size: 20px;">"Tobacco Sales"</h1>

                {Tab::ALL.into_iter().map(|tab| {
                    view! {
                        <button
                            style=move || format!(
                                "display: inline-flex; align-items: center; gap: 6px; padding: 6px 12px; border: 1px solid #ddd; border-radius: 4px; cursor: pointer; background: {};",
                                if ctx.active.get() == tab { "#e3f2fd" } else { "white" }
                            )
                            on:click=move |_| ctx.active.set(tab)
                        >
                            {icon(tab.icon())}
                            {tab.title()}
                        </button>
                    }
                }).collect_view()}

                <button
                    style="display: inline-flex; align-items: center; gap: 6px; padding: 6px 12px; background: #4CAF50; color: white; border: none; border-radius: 4px; cursor: pointer;"
                    disabled=move || ctx.loading.get()
                    on:click=move |_| ctx.reload()
                    title="Reload records from the server"
                >
                    {icon("refresh")}
                    "Refresh"
                </button>

                <span style="font-size: 13px; color: #666;">
                    {move || if ctx.loading.get() {
                        "Loading...".to_string()
                    } else {
                        format!("Loaded: {} records", ctx.records.with(Vec::len))
                    }}
                </span>
            </div>

            {move || ctx.error.get().map(|err| view! {
                <div class="error-banner" style="padding: 8px 12px; margin-bottom: 12px; background: #ffebee; border: 1px solid #ef5350; border-radius: 4px; color: #c62828;">
                    <strong>"⚠ Error: "</strong>
                    {err}
                </div>
            })}

            {move || match ctx.active.get() {
                Tab::Sales => view! { <TobaccoSalesList /> }.into_any(),
                Tab::Summary => view! { <SalesSummaryDashboard /> }.into_any(),
            }}
        </div>
    }
}
