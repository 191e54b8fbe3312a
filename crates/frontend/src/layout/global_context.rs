use contracts::dashboards::d400_sales_summary::ReportSettings;
use contracts::projections::p900_tobacco_sales::TobaccoSaleDto;
use contracts::shared::filtering::{filter_records, SalesFilter};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::dashboards::d400_sales_summary::api as report_api;
use crate::projections::p900_tobacco_sales::api;
use crate::shared::date_utils::current_month_bounds;

/// Вкладки приложения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Sales,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Sales, Tab::Summary];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Sales => "Sales Register",
            Tab::Summary => "Sales Summary",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tab::Sales => "list",
            Tab::Summary => "summary",
        }
    }
}

/// Общее состояние: записи загружаются один раз и используются обеими вкладками
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub records: RwSignal<Vec<TobaccoSaleDto>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    /// Фильтр общий для реестра и сводки
    pub filter: RwSignal<SalesFilter>,
    pub active: RwSignal<Tab>,
    /// Шапка отчёта с сервера; до ответа действуют значения по умолчанию
    pub report: RwSignal<ReportSettings>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            records: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            filter: RwSignal::new(default_filter()),
            active: RwSignal::new(Tab::default()),
            report: RwSignal::new(ReportSettings::default()),
        }
    }

    /// Перезагрузка всех записей с сервера
    pub fn reload(&self) {
        if self.loading.get_untracked() {
            return;
        }
        self.loading.set(true);
        self.error.set(None);

        let this = *self;
        spawn_local(async move {
            match api::fetch_all_sales().await {
                Ok(records) => {
                    log::info!("Loaded {} sales records", records.len());
                    this.records.set(records);
                }
                Err(e) => {
                    log::error!("Failed to fetch sales: {}", e);
                    this.error.set(Some(e));
                }
            }
            this.loading.set(false);
        });
    }

    /// Загружает секцию `[report]` конфигурации сервера
    pub fn load_report_settings(&self) {
        let this = *self;
        spawn_local(async move {
            match report_api::fetch_report_settings().await {
                Ok(settings) => this.report.set(settings),
                Err(e) => log::warn!("Report settings unavailable, using defaults: {}", e),
            }
        });
    }

    /// Записи, прошедшие текущий фильтр (в исходном порядке)
    pub fn filtered(&self) -> Vec<TobaccoSaleDto> {
        let filter = self.filter.get();
        self.records.with(|records| filter_records(records, &filter))
    }

    pub fn reset_filter(&self) {
        self.filter.set(default_filter());
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Фильтр по умолчанию: текущий месяц
pub fn default_filter() -> SalesFilter {
    let (date_from, date_to) = current_month_bounds();
    SalesFilter {
        date_from: Some(date_from),
        date_to: Some(date_to),
        ..Default::default()
    }
}

pub fn use_global_context() -> AppGlobalContext {
    expect_context::<AppGlobalContext>()
}
