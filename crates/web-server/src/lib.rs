use axum::{Router, routing::get};
use configuration::{Breakdowns, Config};
use dataset::{DatasetError, LoadedDataset};
use metrics::MetricsEngine;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
// Note: Tracing is handled by the main application configuration

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// The order table is loaded once at startup and injected here; handlers
/// pass it into the stateless metrics engine on every request. `None` means
/// no dataset was available, which every endpoint degrades to zeroed or
/// empty results rather than an error.
pub struct AppState {
    pub engine: MetricsEngine,
    pub dataset: Option<LoadedDataset>,
    pub breakdowns: Breakdowns,
    pub reports_dir: PathBuf,
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Note: Tracing is already initialized in main.rs, so we don't need to
    // initialize it again here.

    let dataset = match dataset::load_latest_dataset(&config.reports.dir) {
        Ok(loaded) => Some(loaded),
        Err(DatasetError::NotFound(dir)) => {
            tracing::warn!(
                dir = %dir.display(),
                "No analysis dataset found; the dashboard will serve empty results"
            );
            None
        }
        // A present-but-broken dataset is not recoverable here; surface it.
        Err(other) => return Err(other.into()),
    };

    let app_state = Arc::new(AppState {
        engine: MetricsEngine::new(),
        dataset,
        breakdowns: config.breakdowns.clone(),
        reports_dir: config.reports.dir.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/payments", get(handlers::get_payments))
        .route("/api/states", get(handlers::get_states))
        .route("/api/overview", get(handlers::get_overview))
        .route(
            "/api/charts/abandonment_pie",
            get(handlers::abandonment_pie_chart),
        )
        .route("/api/charts/category_bar", get(handlers::category_bar_chart))
        .route("/api/charts/payment_bar", get(handlers::payment_bar_chart))
        .route("/reports/:filename", get(handlers::serve_report))
        .with_state(app_state)
        .layer(cors)
        // This middleware will automatically log information about every
        // incoming request.
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Dashboard API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
