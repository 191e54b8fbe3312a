use contracts::projections::p900_tobacco_sales::{
    TobaccoSaleDto, TobaccoSalesListParams, TobaccoSalesListResponse,
};
use contracts::shared::filtering::{filter_records, SalesFilter};
use contracts::shared::paging::{paginate, PageRequest};
use contracts::shared::sorting::{sort_records, SortState};

/// Фильтр → сортировка → страница над уже полученными записями
pub fn list_sales(
    records: &[TobaccoSaleDto],
    filter: &SalesFilter,
    params: &TobaccoSalesListParams,
) -> TobaccoSalesListResponse {
    let invalid = filter.invalid_bounds();
    if !invalid.is_empty() {
        tracing::warn!("Ignoring unparsable date bounds: {:?}", invalid);
    }

    let mut filtered = filter_records(records, filter);

    let default_sort = SortState::default();
    let sort = SortState::new(
        params.sort.unwrap_or(default_sort.column),
        params.direction.unwrap_or(default_sort.direction),
    );
    sort_records(&mut filtered, sort);

    paginate(&filtered, PageRequest::new(params.page, params.page_size))
}
