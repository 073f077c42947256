//! Per-project workspace state
//!
//! Every accessor creates the project with its defaults the first time
//! the id is referenced; a project id is never "not found". Each save
//! fully replaces its sub-resource, no partial merges. Sessions live for
//! the life of the process and are never evicted.

use std::collections::HashMap;
use std::sync::RwLock;

use masw_common::models::{
    GeometryPoint, Grid, PickData, PlotLimits, ProjectSession, RecordOption, VelocityModel,
};
use serde::{Deserialize, Serialize};

/// Geometry, record list, and plot limits, saved and loaded as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    pub geometry: Vec<GeometryPoint>,
    pub records: Vec<RecordOption>,
    pub plot_limits: PlotLimits,
}

/// Grids plus optional frequency/slowness axes, as stored and as
/// returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridsPayload {
    pub grids: Vec<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow: Option<Vec<f64>>,
}

/// Keyed access to per-project session state.
///
/// Injected into the HTTP layer rather than referenced as process-wide
/// state. Implementations must make get-or-create atomic with respect to
/// concurrent saves on the same project id.
pub trait SessionRepository: Send + Sync {
    fn get_model(&self, project_id: &str) -> VelocityModel;
    fn save_model(&self, project_id: &str, model: VelocityModel);

    fn get_options(&self, project_id: &str) -> SessionOptions;
    fn save_options(&self, project_id: &str, options: SessionOptions);

    fn get_picks(&self, project_id: &str) -> Vec<PickData>;
    /// Returns the number of picks saved.
    fn save_picks(&self, project_id: &str, picks: Vec<PickData>) -> usize;

    fn get_grids(&self, project_id: &str, include_freq_slow: bool) -> GridsPayload;
    /// Replaces `grids`, and the axes when provided; returns the stored
    /// payload.
    fn save_grids(
        &self,
        project_id: &str,
        grids: Vec<Grid>,
        freq: Option<Vec<f64>>,
        slow: Option<Vec<f64>>,
    ) -> GridsPayload;
}

/// Process-lifetime in-memory store.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, ProjectSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the project's session, creating it with defaults
    /// first if this is the first time the id is referenced. One write
    /// lock acquisition covers both steps, so create and mutate cannot
    /// interleave with a concurrent request for the same id.
    fn with_session<T>(&self, project_id: &str, f: impl FnOnce(&mut ProjectSession) -> T) -> T {
        let mut sessions = self.sessions.write().expect("session store lock poisoned");
        let session = sessions.entry(project_id.to_string()).or_default();
        f(session)
    }
}

impl SessionRepository for MemorySessionStore {
    fn get_model(&self, project_id: &str) -> VelocityModel {
        self.with_session(project_id, |s| s.model.clone())
    }

    fn save_model(&self, project_id: &str, model: VelocityModel) {
        self.with_session(project_id, |s| s.model = model);
    }

    fn get_options(&self, project_id: &str) -> SessionOptions {
        self.with_session(project_id, |s| SessionOptions {
            geometry: s.geometry.clone(),
            records: s.records.clone(),
            plot_limits: s.plot_limits,
        })
    }

    fn save_options(&self, project_id: &str, options: SessionOptions) {
        self.with_session(project_id, |s| {
            s.geometry = options.geometry;
            s.records = options.records;
            s.plot_limits = options.plot_limits;
        });
    }

    fn get_picks(&self, project_id: &str) -> Vec<PickData> {
        self.with_session(project_id, |s| s.picks.clone())
    }

    fn save_picks(&self, project_id: &str, picks: Vec<PickData>) -> usize {
        self.with_session(project_id, |s| {
            s.picks = picks;
            s.picks.len()
        })
    }

    fn get_grids(&self, project_id: &str, include_freq_slow: bool) -> GridsPayload {
        self.with_session(project_id, |s| GridsPayload {
            grids: s.grids.clone(),
            freq: include_freq_slow.then(|| s.freq.clone()),
            slow: include_freq_slow.then(|| s.slow.clone()),
        })
    }

    fn save_grids(
        &self,
        project_id: &str,
        grids: Vec<Grid>,
        freq: Option<Vec<f64>>,
        slow: Option<Vec<f64>>,
    ) -> GridsPayload {
        self.with_session(project_id, |s| {
            s.grids = grids;
            if let Some(freq) = &freq {
                s.freq = freq.clone();
            }
            if let Some(slow) = &slow {
                s.slow = slow.clone();
            }
            GridsPayload {
                grids: s.grids.clone(),
                freq,
                slow,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masw_common::models::{default_velocity_model, StationId, VelocityLayer};
    use serde_json::json;

    fn pick(frequency: f64, slowness: f64) -> PickData {
        PickData {
            d1: 0.0,
            d2: 1.0,
            frequency,
            d3: 2.0,
            slowness,
            d4: 3.0,
            d5: 4.0,
        }
    }

    #[test]
    fn first_model_read_returns_defaults() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get_model("new-project"), default_velocity_model());
    }

    #[test]
    fn save_model_fully_replaces() {
        let store = MemorySessionStore::new();
        let model = vec![VelocityLayer {
            start_depth: 0.0,
            end_depth: 10.0,
            velocity: 400.0,
            density: 1.8,
            ignore: 1,
        }];

        store.save_model("p1", model.clone());
        assert_eq!(store.get_model("p1"), model);
    }

    #[test]
    fn picks_round_trip_with_count() {
        let store = MemorySessionStore::new();
        let picks = vec![pick(12.5, 0.004), pick(18.0, 0.0035)];

        assert_eq!(store.save_picks("p1", picks.clone()), 2);
        assert_eq!(store.get_picks("p1"), picks);

        // Each save replaces, never appends.
        assert_eq!(store.save_picks("p1", vec![pick(9.0, 0.006)]), 1);
        assert_eq!(store.get_picks("p1").len(), 1);
    }

    #[test]
    fn options_save_is_one_transaction() {
        let store = MemorySessionStore::new();
        let options = SessionOptions {
            geometry: vec![GeometryPoint {
                index: StationId::Number(0),
                x: 0.0,
                y: 0.0,
                z: 100.0,
            }],
            records: vec![RecordOption {
                id: "r1".into(),
                enabled: true,
                weight: 1.0,
                file_name: "shot_001.sgy".into(),
            }],
            plot_limits: PlotLimits {
                num_freq: 64,
                max_freq: 80.0,
                num_slow: 32,
                max_slow: 0.01,
            },
        };

        store.save_options("p1", options.clone());
        assert_eq!(store.get_options("p1"), options);
    }

    #[test]
    fn projects_are_isolated() {
        let store = MemorySessionStore::new();

        store.save_picks("p1", vec![pick(10.0, 0.005)]);
        store.save_model("p1", Vec::new());

        // p2 still sees pristine defaults.
        assert!(store.get_picks("p2").is_empty());
        assert_eq!(store.get_model("p2"), default_velocity_model());
        assert!(store.get_model("p1").is_empty());
    }

    #[test]
    fn grids_replace_and_echo_axes() {
        let store = MemorySessionStore::new();
        let grid = Grid {
            name: "shot_001".into(),
            data: json!([[0.0, 0.0], [0.0, 0.0]]),
            shape: vec![2, 2],
        };

        let saved = store.save_grids(
            "p1",
            vec![grid.clone()],
            Some(vec![0.0, 25.0, 50.0]),
            Some(vec![0.0, 0.0075, 0.015]),
        );
        assert_eq!(saved.grids, vec![grid.clone()]);
        assert_eq!(saved.freq.as_deref(), Some(&[0.0, 25.0, 50.0][..]));

        let with_axes = store.get_grids("p1", true);
        assert_eq!(with_axes.freq.as_deref(), Some(&[0.0, 25.0, 50.0][..]));
        assert_eq!(with_axes.slow.as_deref(), Some(&[0.0, 0.0075, 0.015][..]));

        let without_axes = store.get_grids("p1", false);
        assert_eq!(without_axes.grids, vec![grid]);
        assert!(without_axes.freq.is_none());
        assert!(without_axes.slow.is_none());

        // Saving without axes keeps the stored ones.
        let saved = store.save_grids("p1", Vec::new(), None, None);
        assert!(saved.grids.is_empty());
        assert_eq!(
            store.get_grids("p1", true).freq.as_deref(),
            Some(&[0.0, 25.0, 50.0][..])
        );
    }
}
