use contracts::dashboards::d400_sales_summary::SummaryTotals;
use contracts::projections::p900_tobacco_sales::TobaccoSaleDto;
use contracts::shared::filtering::{filter_records, SalesFilter};
use contracts::shared::paging::{paginate, Page, PageRequest, DEFAULT_PAGE_SIZE};
use contracts::shared::sorting::{sort_records, SortColumn, SortState};
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct TobaccoSalesListState {
    pub sort: SortState,
    // Pagination
    pub page: usize,
    pub page_size: usize,
}

impl Default for TobaccoSalesListState {
    fn default() -> Self {
        Self {
            sort: SortState::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TobaccoSalesListState {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Клик по заголовку колонки; возвращает на первую страницу
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = self.sort.toggle(column);
        self.page = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 0;
    }
}

pub fn create_state() -> RwSignal<TobaccoSalesListState> {
    RwSignal::new(TobaccoSalesListState::default())
}

/// Отфильтрованные и отсортированные записи (то, что видно и выгружается)
pub fn visible_rows(
    records: &[TobaccoSaleDto],
    filter: &SalesFilter,
    sort: SortState,
) -> Vec<TobaccoSaleDto> {
    let mut rows = filter_records(records, filter);
    sort_records(&mut rows, sort);
    rows
}

/// Страница для таблицы и итоги по всему отфильтрованному набору
pub fn page_with_totals(
    rows: &[TobaccoSaleDto],
    request: PageRequest,
) -> (Page<TobaccoSaleDto>, SummaryTotals) {
    let mut totals = SummaryTotals::default();
    for row in rows {
        totals.add(row);
    }
    (paginate(rows, request), totals)
}
