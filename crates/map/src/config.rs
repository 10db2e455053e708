/// Map sizing and behavior knobs, all optional for embedders.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub show_labels: bool,
    /// Overrides the per-level label area cutoff when set.
    pub label_area_threshold: Option<f64>,
    /// With drill-down off the map shows the flat sub-district level and
    /// clicks only fire the selection callback.
    pub enable_drill_down: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
            padding: 20.0,
            show_labels: true,
            label_area_threshold: None,
            enable_drill_down: true,
        }
    }
}
