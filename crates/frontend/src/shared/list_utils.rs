/// Утилиты для списков: поиск с debounce и сортируемые заголовки
use contracts::shared::sorting::{SortColumn, SortState};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Задержка перед применением поиска, мс
const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Компонент поиска с debounce и кнопкой очистки
#[component]
pub fn SearchInput(
    /// Текущее значение фильтра (для подсветки активного поиска)
    #[prop(into)]
    value: Signal<String>,
    /// Callback для обновления значения фильтра
    #[prop(into)]
    on_change: Callback<String>,
    /// Placeholder текст
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    // Локальное состояние для input (до debounce)
    let (input_value, set_input_value) = signal(value.get_untracked());

    // Timeout не Send, поэтому храним локально. Drop отменяет таймер.
    let pending = StoredValue::new_local(None::<Timeout>);
    // Пока debounce не сработал, внешнее значение отстаёт от поля
    let typing = StoredValue::new(false);

    // Внешний сброс фильтра (кнопка Reset) должен очищать и поле
    Effect::new(move |_| {
        let external = value.get();
        let local = input_value.get_untracked();
        if let Some(synced) = external_sync(&external, &local, typing.get_value()) {
            set_input_value.set(synced);
        }
    });

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());
        typing.set_value(true);
        let timeout = Timeout::new(SEARCH_DEBOUNCE_MS, move || {
            typing.set_value(false);
            on_change.run(new_value);
        });
        pending.set_value(Some(timeout));
    };

    let is_filter_active = move || !value.get().trim().is_empty();

    let clear_filter = move |_| {
        pending.set_value(None);
        typing.set_value(false);
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div style="position: relative; display: inline-flex; align-items: center;">
            <input
                type="text"
                placeholder={placeholder}
                style=move || format!(
                    "width: 250px; padding: 6px 32px 6px 10px; border: 1px solid #ddd; border-radius: 4px; font-size: 15px; background: {};",
                    if is_filter_active() { "#fffbea" } else { "white" }
                )
                prop:value=move || input_value.get()
                on:input=move |ev| {
                    handle_input_change(event_target_value(&ev));
                }
            />
            {move || if !input_value.get().is_empty() {
                view! {
                    <button
                        style="position: absolute; right: 6px; background: none; border: none; cursor: pointer; padding: 4px; display: inline-flex; align-items: center; color: #666; line-height: 1;"
                        on:click=clear_filter
                        title="Clear"
                    >
                        {crate::shared::icons::icon("x")}
                    </button>
                }.into_any()
            } else {
                view! { <></> }.into_any()
            }}
        </div>
    }
}

/// Новое значение поля, если фильтр поменяли снаружи; `None`, если трогать не надо
fn external_sync(external: &str, local: &str, typing: bool) -> Option<String> {
    if typing || external == local {
        None
    } else {
        Some(external.to_string())
    }
}

/// Заголовок колонки с индикатором сортировки
#[component]
pub fn SortableHeader(
    column: SortColumn,
    #[prop(into)] sort: Signal<SortState>,
    on_sort: Callback<SortColumn>,
) -> impl IntoView {
    let align = if column.is_numeric() { "right" } else { "left" };

    view! {
        <th
            style=format!(
                "border: 1px solid #ddd; padding: 8px; cursor: pointer; user-select: none; white-space: nowrap; text-align: {};",
                align
            )
            on:click=move |_| on_sort.run(column)
        >
            {column.title()}
            <span style="color: #888;">{move || sort.get().indicator_for(column)}</span>
        </th>
    }
}

/// Отсортированный список уникальных непустых значений (для выпадающих фильтров)
pub fn distinct_values<T, F>(items: &[T], field: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    let mut values: Vec<String> = items
        .iter()
        .map(|item| field(item).trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    values.sort_by_key(|v| v.to_lowercase());
    values.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_values() {
        let items = vec!["Karoi", "harare", "", "Harare", " Karoi "];
        let values = distinct_values(&items, |s: &&str| *s);
        assert_eq!(values, vec!["harare", "Karoi"]);
    }

    #[test]
    fn test_external_reset_clears_search_box() {
        // Reset очистил фильтр, поле всё ещё показывает старый текст
        assert_eq!(external_sync("", "moyo", false), Some(String::new()));
        assert_eq!(external_sync("moyo", "moyo", false), None);
        // Пользователь печатает: фильтр ещё не догнал поле
        assert_eq!(external_sync("mo", "moyo", true), None);
    }
}
