use layers::choropleth::LegendItem;
use layers::polygon::RegionRenderState;

/// Where a breadcrumb entry navigates back to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BreadcrumbTarget {
    Nation,
    Province,
    City,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbEntry {
    pub label: String,
    /// `None` marks the current position; it is not clickable.
    pub target: Option<BreadcrumbTarget>,
}

/// One frame's complete render description. Pure data: the embedding shell
/// turns this into DOM or SVG without touching map state.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub polygons: Vec<RegionRenderState>,
    pub breadcrumb: Vec<BreadcrumbEntry>,
    pub legend: Vec<LegendItem>,
    /// SVG group `transform` attribute for the zoom/pan state.
    pub transform_attr: String,
    /// Group opacity while a level transition runs.
    pub opacity: f64,
    pub aria_label: String,
    pub zoom: f64,
    pub is_loading: bool,
    pub error: Option<String>,
}
