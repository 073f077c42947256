//! Frequency-slowness dispersion processing
//!
//! The spectral transform is a pluggable strategy behind
//! [`DispersionEngine`]. [`FixtureEngine`] is the shipped conformance
//! implementation: deterministic axes and a zero-filled grid of the
//! right shape, enough to drive the picking UI end to end while the
//! phase-shift transform is developed elsewhere.

use masw_common::models::{GeometryPoint, Grid, PlotLimits};
use serde_json::json;

/// Computes dispersion grids and their axes.
pub trait DispersionEngine: Send + Sync {
    /// Frequency-slowness power grid for one record, shaped
    /// `[num_slow, num_freq]`.
    fn grid(&self, name: &str, geometry: &[GeometryPoint], limits: &PlotLimits) -> Grid;

    /// Frequency axis for a record of `n_samples` at `sample_rate` Hz,
    /// clipped to `max_freq` over `num_freq` points.
    fn frequency_axis(
        &self,
        n_samples: usize,
        sample_rate: f64,
        max_freq: f64,
        num_freq: u32,
    ) -> Vec<f64>;

    /// Slowness axis from 0 to `max_slow` over `num_slow` points.
    fn slowness_axis(&self, max_slow: f64, num_slow: u32) -> Vec<f64>;
}

/// Deterministic stand-in engine.
#[derive(Debug, Default)]
pub struct FixtureEngine;

impl FixtureEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DispersionEngine for FixtureEngine {
    fn grid(&self, name: &str, _geometry: &[GeometryPoint], limits: &PlotLimits) -> Grid {
        let row = vec![0.0f64; limits.num_freq as usize];
        let rows = vec![row; limits.num_slow as usize];
        Grid {
            name: name.to_string(),
            data: json!(rows),
            shape: vec![limits.num_slow as usize, limits.num_freq as usize],
        }
    }

    fn frequency_axis(
        &self,
        _n_samples: usize,
        _sample_rate: f64,
        max_freq: f64,
        num_freq: u32,
    ) -> Vec<f64> {
        linspace(max_freq, num_freq)
    }

    fn slowness_axis(&self, max_slow: f64, num_slow: u32) -> Vec<f64> {
        linspace(max_slow, num_slow)
    }
}

/// `n` evenly spaced values from 0 to `max` inclusive.
fn linspace(max: f64, n: u32) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = max / f64::from(n - 1);
            (0..n).map(|i| f64::from(i) * step).collect()
        }
    }
}
