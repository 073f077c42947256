//! Survey data model shared between the server and its clients.
//!
//! Field names follow the wire format consumed by the frontend, so most
//! structs serialize camelCase.

use serde::{Deserialize, Serialize};

/// Station or trace identifier.
///
/// Geometry extracted from files is numbered by row/trace position, but
/// saved project geometry may carry free-form station labels, so the wire
/// format accepts either an integer or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StationId {
    Number(i64),
    Label(String),
}

impl From<usize> for StationId {
    fn from(position: usize) -> Self {
        StationId::Number(position as i64)
    }
}

/// A single receiver position.
///
/// `index` preserves the originating row/trace position. Values are not
/// required to be contiguous or to start at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPoint {
    pub index: StationId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A selectable input trace file for processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOption {
    pub id: String,
    pub enabled: bool,
    pub weight: f64,
    pub file_name: String,
}

/// Sampling window for the dispersion grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotLimits {
    pub num_freq: u32,
    pub max_freq: f64,
    pub num_slow: u32,
    pub max_slow: f64,
}

impl Default for PlotLimits {
    fn default() -> Self {
        Self {
            num_freq: 50,
            max_freq: 50.0,
            num_slow: 50,
            max_slow: 0.015,
        }
    }
}

/// One layer of the layered velocity model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityLayer {
    pub start_depth: f64,
    pub end_depth: f64,
    pub velocity: f64,
    pub density: f64,
    pub ignore: i32,
}

/// Ordered sequence of layers, shallow to deep.
///
/// No contiguity or monotonicity is enforced; the model is stored as the
/// client submits it.
pub type VelocityModel = Vec<VelocityLayer>;

/// The three-layer model every new project starts with.
pub fn default_velocity_model() -> VelocityModel {
    vec![
        VelocityLayer {
            start_depth: 0.0,
            end_depth: 30.0,
            velocity: 760.0,
            density: 2.0,
            ignore: 0,
        },
        VelocityLayer {
            start_depth: 30.0,
            end_depth: 44.0,
            velocity: 1061.0,
            density: 2.0,
            ignore: 0,
        },
        VelocityLayer {
            start_depth: 44.0,
            end_depth: 144.0,
            velocity: 1270.657,
            density: 2.0,
            ignore: 0,
        },
    ]
}

/// A single dispersion-curve pick.
///
/// Opaque to the backend beyond its frequency/slowness coordinates; the
/// remaining fields are round-tripped verbatim for the pick editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickData {
    pub d1: f64,
    pub d2: f64,
    pub frequency: f64,
    pub d3: f64,
    pub slowness: f64,
    pub d4: f64,
    pub d5: f64,
}

/// A named 2D analysis result: nested rows in `data`, dimensions in `shape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub name: String,
    pub data: serde_json::Value,
    pub shape: Vec<usize>,
}

/// Complete in-memory state of one analysis workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSession {
    pub geometry: Vec<GeometryPoint>,
    pub records: Vec<RecordOption>,
    pub plot_limits: PlotLimits,
    pub freq: Vec<f64>,
    pub slow: Vec<f64>,
    pub grids: Vec<Grid>,
    pub picks: Vec<PickData>,
    pub model: VelocityModel,
}

impl Default for ProjectSession {
    fn default() -> Self {
        Self {
            geometry: Vec::new(),
            records: Vec::new(),
            plot_limits: PlotLimits::default(),
            freq: Vec::new(),
            slow: Vec::new(),
            grids: Vec::new(),
            picks: Vec::new(),
            model: default_velocity_model(),
        }
    }
}
