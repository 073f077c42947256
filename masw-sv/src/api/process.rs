//! Dispersion processing endpoints
//!
//! These mirror the form layout the survey frontend posts: SEG-Y
//! uploads plus the sampling window as text fields. Grid and axis
//! computation is delegated to the injected [`DispersionEngine`];
//! handlers only parse the form and shape the response envelope.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use axum::extract::{Multipart, State};
use axum::Json;
use masw_common::models::{GeometryPoint, Grid, PlotLimits};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::segy;
use crate::AppState;

/// Response envelope; the frontend reads `data` from the body.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub status: String,
    pub data: serde_json::Value,
}

impl ProcessResponse {
    fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}

/// POST /process/grids
///
/// Fields: `sgy_files` (repeated), `geometry_data` (JSON array of
/// points), `max_slowness`, `max_frequency`, `num_slow_points`,
/// `num_freq_points`, `return_freq_and_slow`. One grid per file, plus
/// the axes unless `return_freq_and_slow` is false.
pub async fn process_grids(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProcessResponse>> {
    let form = ProcessForm::read(&mut multipart).await?;
    let files = form.require_files("sgy_files")?;
    let geometry = form.geometry()?;
    let limits = form.plot_limits()?;
    let include_axes = form.optional("return_freq_and_slow")?.unwrap_or(true);

    let grids: Vec<Grid> = files
        .iter()
        .map(|f| state.engine.grid(&f.name, &geometry, &limits))
        .collect();
    info!("Processed {} record grids", grids.len());

    let mut data = json!({ "grids": grids });
    if include_axes {
        let (n_samples, sample_rate) = segy::sampling(Cursor::new(&files[0].data))?;
        let freq = state
            .engine
            .frequency_axis(n_samples, sample_rate, limits.max_freq, limits.num_freq);
        let slow = state.engine.slowness_axis(limits.max_slow, limits.num_slow);
        data["freq"] = json!(axis_grid("freq", freq));
        data["slow"] = json!(axis_grid("slow", slow));
    }

    Ok(Json(ProcessResponse::ok(data)))
}

/// POST /process/grid
///
/// Single-file variant of /process/grids; never returns axes.
pub async fn process_grid(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProcessResponse>> {
    let form = ProcessForm::read(&mut multipart).await?;
    let files = form.require_files("sgy_file")?;
    let geometry = form.geometry()?;
    let limits = form.plot_limits()?;

    let grid = state.engine.grid(&files[0].name, &geometry, &limits);

    Ok(Json(ProcessResponse::ok(json!({ "grid": grid }))))
}

/// POST /process/frequency_with_sgy
///
/// Frequency axis with the sampling parameters read from the uploaded
/// record's binary header.
pub async fn frequency_with_sgy(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProcessResponse>> {
    let form = ProcessForm::read(&mut multipart).await?;
    let files = form.require_files("sgy_file")?;
    let max_frequency: f64 = form.require("max_frequency")?;
    let num_freq_points: u32 = form.require("num_freq_points")?;

    let (n_samples, sample_rate) = segy::sampling(Cursor::new(&files[0].data))?;
    let freq = state
        .engine
        .frequency_axis(n_samples, sample_rate, max_frequency, num_freq_points);

    Ok(Json(ProcessResponse::ok(
        json!({ "freq": axis_grid("freq", freq) }),
    )))
}

/// POST /process/frequency_with_params
///
/// Frequency axis from explicit sampling parameters, no upload.
pub async fn frequency_with_params(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProcessResponse>> {
    let form = ProcessForm::read(&mut multipart).await?;
    let n_samples: usize = form.require("n_samples")?;
    let sample_rate: f64 = form.require("sample_rate")?;
    let max_frequency: f64 = form.require("max_frequency")?;
    let num_freq_points: u32 = form.require("num_freq_points")?;

    let freq = state
        .engine
        .frequency_axis(n_samples, sample_rate, max_frequency, num_freq_points);

    Ok(Json(ProcessResponse::ok(
        json!({ "freq": axis_grid("freq", freq) }),
    )))
}

/// POST /process/slowness_with_params
pub async fn slowness_with_params(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProcessResponse>> {
    let form = ProcessForm::read(&mut multipart).await?;
    let max_slow: f64 = form.require("max_slow")?;
    let num_slow_points: u32 = form.require("num_slow_points")?;

    let slow = state.engine.slowness_axis(max_slow, num_slow_points);

    Ok(Json(ProcessResponse::ok(
        json!({ "slow": axis_grid("slow", slow) }),
    )))
}

/// Axes travel in the same named-grid envelope the record grids use.
fn axis_grid(name: &str, axis: Vec<f64>) -> Grid {
    let shape = vec![axis.len()];
    Grid {
        name: name.to_string(),
        data: json!(axis),
        shape,
    }
}

struct NamedUpload {
    name: String,
    data: Vec<u8>,
}

/// A fully-read processing form: uploaded files keyed by field name,
/// text fields as raw strings parsed on demand.
#[derive(Default)]
struct ProcessForm {
    files: HashMap<String, Vec<NamedUpload>>,
    values: HashMap<String, String>,
}

impl ProcessForm {
    async fn read(multipart: &mut Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let record = record_name(field.file_name());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?
                    .to_vec();
                form.files.entry(name).or_default().push(NamedUpload {
                    name: record,
                    data,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read field: {e}")))?;
                form.values.insert(name, value);
            }
        }

        Ok(form)
    }

    fn require_files(&self, name: &str) -> ApiResult<&[NamedUpload]> {
        match self.files.get(name) {
            Some(files) if !files.is_empty() => Ok(files),
            _ => Err(ApiError::BadRequest(format!(
                "missing file field {name:?}"
            ))),
        }
    }

    fn require<T: FromStr>(&self, name: &str) -> ApiResult<T> {
        let raw = self
            .values
            .get(name)
            .ok_or_else(|| ApiError::BadRequest(format!("missing form field {name:?}")))?;
        raw.parse()
            .map_err(|_| ApiError::BadRequest(format!("invalid value for {name:?}: {raw}")))
    }

    fn optional<T: FromStr>(&self, name: &str) -> ApiResult<Option<T>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("invalid value for {name:?}: {raw}"))),
        }
    }

    fn geometry(&self) -> ApiResult<Vec<GeometryPoint>> {
        let raw = self
            .values
            .get("geometry_data")
            .ok_or_else(|| ApiError::BadRequest("missing form field \"geometry_data\"".into()))?;
        serde_json::from_str(raw)
            .map_err(|e| ApiError::BadRequest(format!("invalid geometry_data: {e}")))
    }

    fn plot_limits(&self) -> ApiResult<PlotLimits> {
        Ok(PlotLimits {
            num_freq: self.require("num_freq_points")?,
            max_freq: self.require("max_frequency")?,
            num_slow: self.require("num_slow_points")?,
            max_slow: self.require("max_slowness")?,
        })
    }
}

/// Record label for a grid: the uploaded file name without extension.
fn record_name(file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| Path::new(n).file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("record")
        .to_string()
}
