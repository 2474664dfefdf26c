//! HTTP surface: the rendered catalog at `/` and the scanned files under `/files`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use catalog::{render_catalog, Catalog, CatalogTemplate};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// URL prefix under which the catalog root directory is served
pub const FILES_PREFIX: &str = "/files";

/// Server state shared across handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub template: Arc<CatalogTemplate>,
}

impl AppState {
    pub fn new(catalog: Catalog, template: CatalogTemplate) -> Self {
        Self {
            catalog: Arc::new(catalog),
            template: Arc::new(template),
        }
    }
}

/// Build the router for a scanned catalog
pub fn build_router(state: AppState) -> Router {
    let files = ServeDir::new(state.catalog.root());

    Router::new()
        .route("/", get(index))
        .nest_service(FILES_PREFIX, files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start serving on `addr` until Ctrl-C
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving {} books on {}", state.catalog.len(), listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, (StatusCode, String)> {
    match render_catalog(&state.catalog, &state.template, FILES_PREFIX) {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render catalog: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
