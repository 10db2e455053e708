use topology::dataset::TopologyLoader;
use topology::geometry::{DatasetLevel, FeatureSet};

use crate::state::DrillDownState;

/// Filters a visible-level dataset down to the features inside the current
/// selection. `set` must be the dataset for `state.visible_level()`.
///
/// Provinces filter children by short province code; deeper levels filter by
/// code prefix, so a sub-district selection narrows neighborhoods further
/// than its parent city would.
pub fn filter_for(state: &DrillDownState, set: &FeatureSet) -> FeatureSet {
    match state {
        DrillDownState::Nation => set.clone(),
        DrillDownState::Province { province } => {
            set.filtered(|f| f.prop_str("SIDO") == Some(province))
        }
        DrillDownState::City { city, .. } => {
            let key = set.level.code_key();
            set.filtered(|f| {
                f.prop_str(key)
                    .is_some_and(|code| code.starts_with(&city.code))
            })
        }
        DrillDownState::SubDistrict { sub_district, .. } => set.filtered(|f| {
            f.prop_str("EMD_CD")
                .is_some_and(|code| code.starts_with(&sub_district.code))
        }),
    }
}

/// The features to draw for the current position. An unloaded or failed
/// visible-level dataset yields an empty set; callers decide whether that
/// renders as loading or error chrome.
pub fn visible_features(state: &DrillDownState, loader: &TopologyLoader) -> FeatureSet {
    let level = state.visible_level();
    match loader.feature_set(level) {
        Some(set) => filter_for(state, set),
        None => FeatureSet::empty(level),
    }
}
