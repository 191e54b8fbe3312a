use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::handlers;
use crate::shared::upstream::SalesSource;
use crate::system::middleware::request_logger::request_logger;

/// Общее состояние обработчиков
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SalesSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn SalesSource>) -> Self {
        Self { source }
    }
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState, dist_dir: &str) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // P900 Tobacco Sales Register
        // ========================================
        .route(
            "/api/p900/tobacco-sales",
            get(handlers::p900_tobacco_sales::list_sales),
        )
        .route(
            "/api/p900/tobacco-sales/all",
            get(handlers::p900_tobacco_sales::list_all),
        )
        // ========================================
        // D400 Sales Summary (reports)
        // ========================================
        .route(
            "/api/d400/sales-summary",
            get(handlers::d400_sales_summary::get_summary),
        )
        .route(
            "/api/d400/sales-summary/export",
            get(handlers::d400_sales_summary::export_summary),
        )
        .route(
            "/api/d400/report-meta",
            get(handlers::d400_sales_summary::get_report_settings),
        )
        .fallback_service(ServeDir::new(dist_dir))
        .layer(middleware::from_fn(request_logger))
        .with_state(state)
}
