use drilldown::constituency::ConstituencyDrillDown;
use drilldown::region::region_info;
use foundation::math::Vec2;
use interaction::long_press::PointerKind;
use layers::labels::{label_area_threshold, show_label};
use layers::polygon::RegionRenderState;
use layers::theme::MapTheme;
use projection::memo::ProjectionMemo;
use projection::mercator::Viewport;
use topology::dataset::{DatasetRequest, Epoch, Hierarchy, TopologyLoader};
use topology::geometry::DatasetLevel;
use topology::naming::province_full_name;

use crate::component::{ClickOutcome, Tooltip};
use crate::config::MapConfig;
use crate::events::{EventLog, MapEventKind};
use crate::scene::{BreadcrumbEntry, BreadcrumbTarget, MapScene};

/// The electoral constituency map.
///
/// Two views only: the nation's provinces and one province's constituencies.
/// Constituencies are leaves, so clicks at the deeper view select rather than
/// drill, and there is no zoom or fade; view changes apply immediately.
#[derive(Debug)]
pub struct ConstituencyMap {
    config: MapConfig,
    theme: MapTheme,
    loader: TopologyLoader,
    drill: ConstituencyDrillDown,
    memo: ProjectionMemo,
    hovered: Option<String>,
    tooltip: Option<Tooltip>,
    selected_code: Option<String>,
    external_loading: bool,
    events: EventLog,
    frame: u64,
}

impl ConstituencyMap {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            theme: MapTheme::default(),
            loader: TopologyLoader::new(Hierarchy::Constituency),
            drill: ConstituencyDrillDown::new(),
            memo: ProjectionMemo::new(),
            hovered: None,
            tooltip: None,
            selected_code: None,
            external_loading: false,
            events: EventLog::new(),
            frame: 0,
        }
    }

    pub fn theme(&self) -> &MapTheme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: MapTheme) {
        self.theme = theme;
    }

    pub fn events(&mut self) -> &mut EventLog {
        &mut self.events
    }

    pub fn begin_loading(&mut self) -> Vec<DatasetRequest> {
        self.loader.begin()
    }

    pub fn complete_dataset(&mut self, epoch: Epoch, level: DatasetLevel, payload: &str) -> bool {
        let applied = self.loader.complete(epoch, level, payload);
        if applied {
            self.report_loader_state();
        }
        applied
    }

    pub fn fail_dataset(
        &mut self,
        epoch: Epoch,
        level: DatasetLevel,
        message: impl Into<String>,
    ) -> bool {
        let applied = self.loader.fail(epoch, level, message);
        if applied {
            self.report_loader_state();
        }
        applied
    }

    fn report_loader_state(&mut self) {
        if let Some(err) = self.loader.error() {
            let message = err.to_string();
            self.events
                .emit(self.frame, MapEventKind::DatasetFailed, message);
        } else if !self.loader.is_loading() {
            self.events
                .emit(self.frame, MapEventKind::DatasetsLoaded, "batch complete");
        }
    }

    pub fn set_external_loading(&mut self, loading: bool) {
        self.external_loading = loading;
    }

    /// Highlight driven by the embedding application, usually the
    /// constituency whose results are on screen.
    pub fn set_selected_code(&mut self, code: Option<String>) {
        self.selected_code = code;
    }

    pub fn advance(&mut self, _dt_s: f64) {
        self.frame += 1;
    }

    pub fn click(&mut self, code: &str) -> ClickOutcome {
        match self.drill.visible_level() {
            DatasetLevel::Province => {
                if !self.drill.select_province(code) {
                    return ClickOutcome::Ignored;
                }
                self.hovered = None;
                self.tooltip = None;
                self.events
                    .emit(self.frame, MapEventKind::LevelChanged, code.to_string());
                ClickOutcome::Drilled
            }
            _ => {
                let set = self.drill.visible_features(&self.loader);
                let Some(region) = set
                    .find_by_code(code)
                    .and_then(|f| region_info(DatasetLevel::Constituency, f))
                else {
                    return ClickOutcome::Ignored;
                };
                self.events.emit(
                    self.frame,
                    MapEventKind::RegionSelected,
                    region.full_name.clone(),
                );
                ClickOutcome::Selected(region)
            }
        }
    }

    pub fn back_to_nation(&mut self) {
        if self.drill.province().is_some() {
            self.drill.back_to_nation();
            self.hovered = None;
            self.tooltip = None;
            self.events
                .emit(self.frame, MapEventKind::LevelChanged, "nation");
        }
    }

    pub fn jump_to_province(&mut self, code: &str) {
        self.drill.jump_to_province(code);
        self.hovered = None;
        self.tooltip = None;
        self.events
            .emit(self.frame, MapEventKind::SearchJump, code.to_string());
    }

    pub fn hover(&mut self, kind: PointerKind, code: Option<&str>, position: Vec2) {
        if kind == PointerKind::Touch {
            return;
        }
        match code {
            None => {
                self.hovered = None;
                self.tooltip = None;
            }
            Some(code) => {
                self.hovered = Some(code.to_string());
                let level = self.drill.visible_level();
                self.tooltip = self
                    .drill
                    .visible_features(&self.loader)
                    .find_by_code(code)
                    .and_then(|f| region_info(level, f))
                    .map(|region| Tooltip { region, position });
            }
        }
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn scene(&mut self) -> MapScene {
        let is_loading = self.external_loading || self.loader.is_loading();
        let error = self.loader.error().map(str::to_string);
        let empty = MapScene {
            polygons: Vec::new(),
            breadcrumb: self.breadcrumb(),
            legend: Vec::new(),
            transform_attr: "translate(0,0) scale(1)".to_string(),
            opacity: 1.0,
            aria_label: self.aria_label(),
            zoom: 1.0,
            is_loading,
            error,
        };
        if empty.is_loading || empty.error.is_some() {
            return empty;
        }

        let level = self.drill.visible_level();
        let set = self.drill.visible_features(&self.loader);
        let viewport = Viewport::new(self.config.width, self.config.height, self.config.padding);
        let projected = self.memo.project(&set, viewport);
        let threshold = self
            .config
            .label_area_threshold
            .or_else(|| label_area_threshold(level));

        let mut polygons = Vec::with_capacity(set.len());
        for (feature, shape) in set.features.iter().zip(projected) {
            let Some(region) = region_info(level, feature) else {
                continue;
            };
            polygons.push(RegionRenderState {
                hovered: self.hovered.as_deref() == Some(region.code.as_str()),
                selected: self.selected_code.as_deref() == Some(region.code.as_str()),
                show_label: show_label(self.config.show_labels, shape.area_sr, threshold),
                fill_override: None,
                path: shape.path.clone(),
                centroid: shape.centroid,
                code: region.code,
                name: region.name,
            });
        }

        MapScene { polygons, ..empty }
    }

    fn breadcrumb(&self) -> Vec<BreadcrumbEntry> {
        match self.drill.province() {
            None => vec![BreadcrumbEntry {
                label: "전국".to_string(),
                target: None,
            }],
            Some(province) => vec![
                BreadcrumbEntry {
                    label: "전국".to_string(),
                    target: Some(BreadcrumbTarget::Nation),
                },
                BreadcrumbEntry {
                    label: province_full_name(province).to_string(),
                    target: None,
                },
            ],
        }
    }

    fn aria_label(&self) -> String {
        match self.drill.visible_level() {
            DatasetLevel::Province => "시도별 대한민국 지도".to_string(),
            _ => "22대 국회의원 선거구 지도".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConstituencyMap;
    use crate::component::ClickOutcome;
    use crate::config::MapConfig;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use topology::geometry::DatasetLevel;

    fn payload(geometries: Vec<Value>) -> String {
        json!({
            "type": "Topology",
            "objects": {
                "2024_22_Elec_simplify": {
                    "type": "GeometryCollection",
                    "geometries": geometries
                }
            },
            "arcs": [[[126.0, 36.0], [126.5, 36.0], [126.5, 36.5], [126.0, 36.0]]]
        })
        .to_string()
    }

    fn geometry(props: Value) -> Value {
        json!({ "type": "Polygon", "arcs": [[0]], "properties": props })
    }

    fn loaded_map() -> ConstituencyMap {
        let mut map = ConstituencyMap::new(MapConfig::default());
        for req in map.begin_loading() {
            let geometries = match req.level {
                DatasetLevel::Province => vec![
                    geometry(json!({ "SIDO": "서울" })),
                    geometry(json!({ "SIDO": "부산" })),
                ],
                _ => vec![
                    geometry(json!({
                        "SIDO": "서울", "SGG_Code": "2411",
                        "SGG": "종로구", "SIDO_SGG": "서울 종로구"
                    })),
                    geometry(json!({
                        "SIDO": "서울", "SGG_Code": "2412",
                        "SGG": "중구성동구갑", "SIDO_SGG": "서울 중구성동구갑"
                    })),
                    geometry(json!({
                        "SIDO": "부산", "SGG_Code": "2501",
                        "SGG": "중구영도구", "SIDO_SGG": "부산 중구영도구"
                    })),
                ],
            };
            assert!(map.complete_dataset(req.epoch, req.level, &payload(geometries)));
        }
        map
    }

    #[test]
    fn province_click_shows_only_its_constituencies() {
        let mut map = loaded_map();
        assert_eq!(map.scene().polygons.len(), 2);
        assert_eq!(map.scene().aria_label, "시도별 대한민국 지도");

        assert_eq!(map.click("서울"), ClickOutcome::Drilled);
        let scene = map.scene();
        assert_eq!(scene.polygons.len(), 2);
        assert!(scene.polygons.iter().all(|p| p.code.starts_with("24")));
        assert_eq!(scene.aria_label, "22대 국회의원 선거구 지도");
    }

    #[test]
    fn constituencies_are_leaves() {
        let mut map = loaded_map();
        map.click("서울");
        let ClickOutcome::Selected(region) = map.click("2412") else {
            panic!("expected a selection");
        };
        assert_eq!(region.name, "중구성동구갑");
        assert_eq!(region.full_name, "서울 중구성동구갑");
        // Still at the constituency view.
        assert_eq!(map.scene().polygons.len(), 2);
    }

    #[test]
    fn all_constituencies_are_labeled_by_default() {
        let mut map = loaded_map();
        map.click("서울");
        let scene = map.scene();
        assert!(scene.polygons.iter().all(|p| p.show_label));
    }

    #[test]
    fn back_restores_the_nation_view() {
        let mut map = loaded_map();
        map.click("서울");
        map.back_to_nation();
        let scene = map.scene();
        assert_eq!(scene.polygons.len(), 2);
        let labels: Vec<&str> = scene.breadcrumb.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["전국"]);
    }
}
