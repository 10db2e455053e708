use topology::dataset::TopologyLoader;
use topology::geometry::{DatasetLevel, FeatureSet};

/// The two-level electoral variant: nation → constituencies of one province.
///
/// Constituencies are leaves; selecting one never descends, it only fires the
/// caller's selection callback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstituencyDrillDown {
    province: Option<String>,
}

impl ConstituencyDrillDown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    pub fn visible_level(&self) -> DatasetLevel {
        match self.province {
            None => DatasetLevel::Province,
            Some(_) => DatasetLevel::Constituency,
        }
    }

    pub fn select_province(&mut self, code: &str) -> bool {
        if self.province.is_some() {
            return false;
        }
        self.province = Some(code.to_string());
        true
    }

    pub fn back_to_nation(&mut self) {
        self.province = None;
    }

    /// Repositions at a province from a search selection, from any state.
    pub fn jump_to_province(&mut self, code: &str) {
        self.province = Some(code.to_string());
    }

    pub fn visible_features(&self, loader: &TopologyLoader) -> FeatureSet {
        let level = self.visible_level();
        let Some(set) = loader.feature_set(level) else {
            return FeatureSet::empty(level);
        };
        match &self.province {
            None => set.clone(),
            Some(province) => set.filtered(|f| f.prop_str("SIDO") == Some(province)),
        }
    }
}
