pub mod dashboards;
pub mod handlers;
pub mod projections;
pub mod routes;
pub mod shared;
pub mod system;

use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::AppState;
use crate::shared::upstream::TobaccoApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::init()?;
    if config.upstream.url.trim().is_empty() {
        tracing::warn!("[upstream] url is empty: record requests will fail until it is configured");
    }

    let client = TobaccoApiClient::new(&config.upstream)?;
    tracing::info!("Upstream API: {}", client.url());
    let state = AppState::new(Arc::new(client));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let dist_dir = shared::config::resolve_path(&config.frontend.dist_dir);
    tracing::info!("Serving frontend from {}", dist_dir.display());

    let app = routes::configure_routes(state, &dist_dir.to_string_lossy()).layer(cors);

    let addr = config.socket_addr()?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
