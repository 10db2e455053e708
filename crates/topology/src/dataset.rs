use std::collections::BTreeMap;

use crate::decode::decode_topology;
use crate::geometry::{DatasetLevel, FeatureSet};

/// Which drill-down hierarchy the loader serves.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hierarchy {
    /// province → city → conditional sub-district → neighborhood
    Administrative,
    /// province → electoral constituency
    Constituency,
}

impl Hierarchy {
    pub fn levels(self) -> &'static [DatasetLevel] {
        match self {
            Hierarchy::Administrative => &[
                DatasetLevel::Province,
                DatasetLevel::City,
                DatasetLevel::SubDistrict,
                DatasetLevel::Neighborhood,
            ],
            Hierarchy::Constituency => &[DatasetLevel::Province, DatasetLevel::Constituency],
        }
    }
}

/// Per-level load status. "Not yet loaded" and "loaded but empty" are
/// distinct states; filtering and search code must not conflate them.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loaded(FeatureSet),
    Failed(String),
}

impl LoadState {
    pub fn feature_set(&self) -> Option<&FeatureSet> {
        match self {
            LoadState::Loaded(set) => Some(set),
            _ => None,
        }
    }
}

/// Monotonic batch token. Completions carrying a stale epoch are discarded,
/// so a cancelled load can never apply its result.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Epoch(u64);

/// One outstanding dataset fetch the embedding shell must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRequest {
    pub epoch: Epoch,
    pub level: DatasetLevel,
    pub object_key: &'static str,
}

/// Loads the topology datasets for the active hierarchy.
///
/// All levels are requested in one batch and the loader stays in its loading
/// phase until every request resolved. Any failure marks the whole batch
/// failed and leaves all per-level data absent; callers render an error state
/// and never partially render.
#[derive(Debug)]
pub struct TopologyLoader {
    hierarchy: Hierarchy,
    epoch: Epoch,
    states: BTreeMap<DatasetLevel, LoadState>,
    outstanding: usize,
    error: Option<String>,
}

impl TopologyLoader {
    pub fn new(hierarchy: Hierarchy) -> Self {
        let mut states = BTreeMap::new();
        for &level in hierarchy.levels() {
            states.insert(level, LoadState::NotLoaded);
        }
        Self {
            hierarchy,
            epoch: Epoch(0),
            states,
            outstanding: 0,
            error: None,
        }
    }

    pub fn hierarchy(&self) -> Hierarchy {
        self.hierarchy
    }

    /// Starts a fresh batch, invalidating any in-flight completions.
    pub fn begin(&mut self) -> Vec<DatasetRequest> {
        self.epoch = Epoch(self.epoch.0 + 1);
        self.error = None;
        for state in self.states.values_mut() {
            *state = LoadState::NotLoaded;
        }
        let levels = self.hierarchy.levels();
        self.outstanding = levels.len();
        levels
            .iter()
            .map(|&level| DatasetRequest {
                epoch: self.epoch,
                level,
                object_key: level.object_key(),
            })
            .collect()
    }

    /// Cancels the current batch; in-flight completions become inert.
    pub fn cancel(&mut self) {
        self.epoch = Epoch(self.epoch.0 + 1);
        self.outstanding = 0;
    }

    /// Applies one fetched payload. Returns `false` when the completion was
    /// stale (superseded batch) and was discarded.
    pub fn complete(&mut self, epoch: Epoch, level: DatasetLevel, payload: &str) -> bool {
        if epoch != self.epoch || self.error.is_some() {
            return false;
        }
        match decode_topology(level, payload) {
            Ok(set) => {
                self.states.insert(level, LoadState::Loaded(set));
                self.outstanding = self.outstanding.saturating_sub(1);
            }
            Err(err) => self.fail_all(err),
        }
        true
    }

    /// Records a fetch failure. Stale epochs are discarded as in `complete`.
    pub fn fail(&mut self, epoch: Epoch, level: DatasetLevel, message: impl Into<String>) -> bool {
        if epoch != self.epoch || self.error.is_some() {
            return false;
        }
        self.fail_all(FetchFailure {
            level,
            message: message.into(),
        });
        true
    }

    fn fail_all(&mut self, err: impl std::fmt::Display) {
        let message = err.to_string();
        for state in self.states.values_mut() {
            *state = LoadState::Failed(message.clone());
        }
        self.error = Some(message);
        self.outstanding = 0;
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self, level: DatasetLevel) -> &LoadState {
        self.states.get(&level).unwrap_or(&LoadState::NotLoaded)
    }

    pub fn feature_set(&self, level: DatasetLevel) -> Option<&FeatureSet> {
        self.states.get(&level).and_then(|s| s.feature_set())
    }
}

#[derive(Debug)]
struct FetchFailure {
    level: DatasetLevel,
    message: String,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to load {:?} dataset: {}", self.level, self.message)
    }
}

/// Convenience for tests and embedding shells that already hold the decoded
/// payloads: runs one batch to completion synchronously.
pub fn load_all(loader: &mut TopologyLoader, payloads: &BTreeMap<DatasetLevel, String>) {
    let requests = loader.begin();
    for req in requests {
        match payloads.get(&req.level) {
            Some(payload) => {
                loader.complete(req.epoch, req.level, payload);
            }
            None => {
                loader.fail(req.epoch, req.level, "dataset unavailable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Hierarchy, LoadState, TopologyLoader};
    use crate::geometry::DatasetLevel;

    fn province_payload() -> String {
        r#"{
            "type": "Topology",
            "objects": {
                "2024_22_Elec_simplify": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "Polygon", "arcs": [[0]], "properties": {"SIDO": "세종"}}
                    ]
                }
            },
            "arcs": [[[127.0, 36.4], [127.4, 36.4], [127.4, 36.7], [127.0, 36.4]]]
        }"#
        .to_string()
    }

    #[test]
    fn batch_completes_when_all_levels_resolve() {
        let mut loader = TopologyLoader::new(Hierarchy::Constituency);
        let requests = loader.begin();
        assert_eq!(requests.len(), 2);
        assert!(loader.is_loading());

        for req in requests {
            loader.complete(req.epoch, req.level, &province_payload());
        }
        assert!(!loader.is_loading());
        assert!(loader.feature_set(DatasetLevel::Province).is_some());
        assert!(loader.error().is_none());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut loader = TopologyLoader::new(Hierarchy::Constituency);
        let old = loader.begin();
        loader.cancel();

        let applied = loader.complete(old[0].epoch, old[0].level, &province_payload());
        assert!(!applied);
        assert_eq!(loader.state(DatasetLevel::Province), &LoadState::NotLoaded);
    }

    #[test]
    fn one_failure_poisons_the_whole_batch() {
        let mut loader = TopologyLoader::new(Hierarchy::Administrative);
        let requests = loader.begin();

        loader.complete(requests[0].epoch, DatasetLevel::Province, &province_payload());
        loader.fail(requests[0].epoch, DatasetLevel::Neighborhood, "HTTP 500");

        assert!(!loader.is_loading());
        assert!(loader.error().is_some());
        // Even the level that decoded successfully is unavailable.
        assert!(loader.feature_set(DatasetLevel::Province).is_none());
        assert!(matches!(
            loader.state(DatasetLevel::Province),
            LoadState::Failed(_)
        ));
    }

    #[test]
    fn decode_failure_surfaces_a_message() {
        let mut loader = TopologyLoader::new(Hierarchy::Constituency);
        let requests = loader.begin();
        loader.complete(requests[0].epoch, DatasetLevel::Province, "not json");
        let err = loader.error().expect("error message");
        assert!(err.contains("JSON parse error"));
    }
}
