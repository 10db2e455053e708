/// Polygon fill and stroke palette. Values are CSS custom-property
/// references so the host page's light and dark themes both apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTheme {
    pub fill: String,
    pub fill_hover: String,
    pub fill_selected: String,
    pub fill_search_highlight: String,
    pub stroke: String,
    pub label: String,
}

impl Default for MapTheme {
    fn default() -> Self {
        Self {
            fill: "oklch(var(--map-fill))".to_string(),
            fill_hover: "oklch(var(--map-fill-hover))".to_string(),
            fill_selected: "oklch(var(--map-fill-selected))".to_string(),
            fill_search_highlight: "oklch(var(--map-fill-search-highlight))".to_string(),
            stroke: "oklch(var(--map-stroke))".to_string(),
            label: "oklch(var(--map-label))".to_string(),
        }
    }
}
