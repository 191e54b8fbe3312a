use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Общее состояние приложения доступно всем вкладкам через context
    let ctx = AppGlobalContext::new();
    provide_context(ctx);

    // Первая загрузка записей и шапки отчёта
    ctx.reload();
    ctx.load_report_settings();

    view! {
        <Shell />
    }
}
