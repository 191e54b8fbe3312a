//! Общие типы и чистая логика конвейера (фильтр → сортировка → пагинация →
//! агрегация → отчёт), используемые и backend, и frontend (wasm).

pub mod dashboards;
pub mod projections;
pub mod shared;
