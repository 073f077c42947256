//! masw-sv (Survey Server) - backend for the MASW surface-wave survey tool
//!
//! Ingests receiver-geometry files (spreadsheet station tables, SEG-Y
//! trace headers), keeps per-project workspace state, and serves
//! frequency-slowness processing results to the picking UI.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod dispersion;
pub mod error;
pub mod extract;
pub mod session;

use dispersion::DispersionEngine;
use session::SessionRepository;

/// Largest accepted upload. Field SEG-Y records run to tens of megabytes
/// per shot, and /process/grids takes several files per request.
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Application state shared across HTTP handlers
///
/// Both collaborators are injected: the session repository so the store
/// can be swapped without touching handlers, and the dispersion engine
/// because spectral processing is a pluggable strategy.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionRepository>,
    pub engine: Arc<dyn DispersionEngine>,
}

impl AppState {
    /// Create new application state
    pub fn new(sessions: Arc<dyn SessionRepository>, engine: Arc<dyn DispersionEngine>) -> Self {
        Self { sessions, engine }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        // Health endpoint
        .route("/health", get(api::health::health_check))
        // Geometry extraction from uploaded survey files
        .route("/extract/excel", post(api::extract::extract_excel))
        .route("/extract/excel/sheets", post(api::extract::extract_excel_sheets))
        .route("/extract/sgy", post(api::extract::extract_sgy))
        // Per-project workspace
        .route("/project/:project_id/model", get(api::project::get_model))
        .route("/project/:project_id/model", post(api::project::save_model))
        .route("/project/:project_id/options", get(api::project::get_options))
        .route("/project/:project_id/options", post(api::project::save_options))
        .route("/project/:project_id/picks", get(api::project::get_picks))
        .route("/project/:project_id/picks", post(api::project::save_picks))
        .route("/project/:project_id/grids", get(api::project::get_grids))
        .route("/project/:project_id/grids", post(api::project::save_grids))
        // Dispersion processing
        .route("/process/grids", post(api::process::process_grids))
        .route("/process/grid", post(api::process::process_grid))
        .route("/process/frequency_with_sgy", post(api::process::frequency_with_sgy))
        .route("/process/frequency_with_params", post(api::process::frequency_with_params))
        .route("/process/slowness_with_params", post(api::process::slowness_with_params))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
