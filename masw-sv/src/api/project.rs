//! Per-project workspace endpoints
//!
//! GET/save pairs mapped 1:1 onto the session repository. Every route
//! get-or-creates the project, so a fresh id answers with defaults
//! instead of a 404.

use axum::extract::{Path, Query, State};
use axum::Json;
use masw_common::models::{PickData, VelocityModel};
use serde::{Deserialize, Serialize};

use crate::session::{GridsPayload, SessionOptions};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

impl StatusResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// GET /project/:project_id/model
pub async fn get_model(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Json<VelocityModel> {
    Json(state.sessions.get_model(&project_id))
}

/// POST /project/:project_id/model
///
/// Full replace of the layered velocity model.
pub async fn save_model(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(model): Json<VelocityModel>,
) -> Json<StatusResponse> {
    state.sessions.save_model(&project_id, model);
    Json(StatusResponse::ok())
}

/// GET /project/:project_id/options
pub async fn get_options(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Json<SessionOptions> {
    Json(state.sessions.get_options(&project_id))
}

/// POST /project/:project_id/options
///
/// Replaces geometry, records, and plot limits as one transaction.
pub async fn save_options(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(options): Json<SessionOptions>,
) -> Json<StatusResponse> {
    state.sessions.save_options(&project_id, options);
    Json(StatusResponse::ok())
}

/// GET /project/:project_id/picks
pub async fn get_picks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Json<Vec<PickData>> {
    Json(state.sessions.get_picks(&project_id))
}

#[derive(Debug, Serialize)]
pub struct SavePicksResponse {
    status: String,
    count: usize,
}

/// POST /project/:project_id/picks
///
/// Full replace; responds with the number of picks saved.
pub async fn save_picks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(picks): Json<Vec<PickData>>,
) -> Json<SavePicksResponse> {
    let count = state.sessions.save_picks(&project_id, picks);
    Json(SavePicksResponse {
        status: "ok".to_string(),
        count,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridsQuery {
    #[serde(default = "default_include_freq_slow")]
    pub include_freq_slow: bool,
}

fn default_include_freq_slow() -> bool {
    true
}

/// GET /project/:project_id/grids?includeFreqSlow=
pub async fn get_grids(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<GridsQuery>,
) -> Json<GridsPayload> {
    Json(state.sessions.get_grids(&project_id, query.include_freq_slow))
}

/// POST /project/:project_id/grids
///
/// Replaces the stored grids, and the freq/slow axes when the payload
/// carries them. Echoes the stored payload back.
pub async fn save_grids(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(payload): Json<GridsPayload>,
) -> Json<GridsPayload> {
    let saved = state
        .sessions
        .save_grids(&project_id, payload.grids, payload.freq, payload.slow);
    Json(saved)
}
