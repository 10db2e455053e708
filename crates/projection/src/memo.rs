use topology::geometry::{FeatureSet, FeatureSetId};

use crate::mercator::Viewport;
use crate::shape::{ProjectedFeature, project_set};

const MEMO_CAPACITY: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct MemoKey {
    set: FeatureSetId,
    width: u64,
    height: u64,
    padding: u64,
}

impl MemoKey {
    fn new(set: &FeatureSet, viewport: Viewport) -> Self {
        Self {
            set: set.id(),
            width: viewport.width.to_bits(),
            height: viewport.height.to_bits(),
            padding: viewport.padding.to_bits(),
        }
    }
}

/// Memoizes projection output per (feature-set identity, viewport).
///
/// Drill-down alternates between a handful of sets (parent and child views,
/// plus search jumps), so a small recency list is enough. Identity is
/// content-derived, so a reloaded but identical dataset still hits.
#[derive(Debug, Default)]
pub struct ProjectionMemo {
    entries: Vec<(MemoKey, Vec<ProjectedFeature>)>,
}

impl ProjectionMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&mut self, set: &FeatureSet, viewport: Viewport) -> &[ProjectedFeature] {
        let key = MemoKey::new(set, viewport);
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            // Move to the front so eviction drops the oldest view.
            let entry = self.entries.remove(pos);
            self.entries.insert(0, entry);
        } else {
            let projected = project_set(set, viewport);
            self.entries.insert(0, (key, projected));
            self.entries.truncate(MEMO_CAPACITY);
        }
        &self.entries[0].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{MEMO_CAPACITY, ProjectionMemo};
    use crate::mercator::Viewport;
    use serde_json::{Map, Value};
    use topology::geometry::{DatasetLevel, FeatureSet, GeoPoint, RegionFeature, RegionGeometry};

    fn set(code: &str, lon: f64) -> FeatureSet {
        let mut props = Map::new();
        props.insert("SIDO".into(), Value::String(code.into()));
        FeatureSet::new(
            DatasetLevel::Province,
            vec![RegionFeature {
                properties: props,
                geometry: Some(RegionGeometry::Polygon(vec![vec![
                    GeoPoint::new(lon, 36.0),
                    GeoPoint::new(lon + 1.0, 36.0),
                    GeoPoint::new(lon + 1.0, 37.0),
                    GeoPoint::new(lon, 36.0),
                ]])),
            }],
        )
    }

    #[test]
    fn identical_inputs_hit_the_memo() {
        let mut memo = ProjectionMemo::new();
        let viewport = Viewport::new(600.0, 800.0, 20.0);
        let a = set("서울", 126.0);
        let first = memo.project(&a, viewport).to_vec();
        let again = memo.project(&a, viewport);
        assert_eq!(first, again);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn viewport_change_is_a_distinct_entry() {
        let mut memo = ProjectionMemo::new();
        let a = set("서울", 126.0);
        memo.project(&a, Viewport::new(600.0, 800.0, 20.0));
        memo.project(&a, Viewport::new(300.0, 400.0, 20.0));
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn memo_is_bounded() {
        let mut memo = ProjectionMemo::new();
        let viewport = Viewport::new(600.0, 800.0, 20.0);
        for i in 0..(MEMO_CAPACITY + 3) {
            memo.project(&set("서울", 120.0 + i as f64), viewport);
        }
        assert_eq!(memo.len(), MEMO_CAPACITY);
    }
}
