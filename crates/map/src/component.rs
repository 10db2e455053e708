use drilldown::filter::visible_features;
use drilldown::region::{RegionInfo, region_info};
use drilldown::state::{DrillDown, DrillDownState, SearchTarget};
use foundation::math::Vec2;
use interaction::long_press::{LongPress, PointerKind, TooltipTimer};
use interaction::transition::{LevelTransition, TransitionEvent};
use interaction::viewport::ViewportController;
use layers::choropleth::{ChoroplethConfig, ChoroplethData, build_legend, choropleth_color};
use layers::labels::{label_area_threshold, show_label, zoom_adjusted_show_label};
use layers::polygon::RegionRenderState;
use layers::theme::MapTheme;
use projection::memo::ProjectionMemo;
use projection::mercator::Viewport;
use search::index::{SearchCandidate, SearchIndex};
use topology::dataset::{DatasetRequest, Epoch, Hierarchy, TopologyLoader};
use topology::geometry::{DatasetLevel, FeatureSet};
use topology::naming::province_full_name;

use crate::config::MapConfig;
use crate::events::{EventLog, MapEventKind};
use crate::scene::{BreadcrumbEntry, BreadcrumbTarget, MapScene};

/// What a region click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click navigated a level deeper (after the transition finishes).
    Drilled,
    /// A leaf region; hand it to the embedding application.
    Selected(RegionInfo),
    /// Stale click or unknown code; nothing happened.
    Ignored,
}

/// Hover or long-press tooltip contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub region: RegionInfo,
    pub position: Vec2,
}

/// A navigation committed at the fade midpoint.
#[derive(Debug, Clone, PartialEq)]
enum PendingChange {
    SelectProvince(String),
    SelectCity {
        code: String,
        name: String,
        has_sub_districts: bool,
    },
    SelectSubDistrict {
        code: String,
        name: String,
    },
    Back(BreadcrumbTarget),
}

/// The administrative drill-down map.
///
/// Owns the dataset loader, drill-down position, zoom viewport, transition
/// animator and derived caches, and exposes one [`MapScene`] snapshot per
/// frame. All navigation that changes the displayed level goes through the
/// fade transition; the new level is applied while the map is invisible.
#[derive(Debug)]
pub struct AdminMap {
    config: MapConfig,
    theme: MapTheme,
    loader: TopologyLoader,
    drill: DrillDown,
    transition: LevelTransition,
    pending: Option<PendingChange>,
    viewport: ViewportController,
    memo: ProjectionMemo,
    search_index: SearchIndex,
    search_target: Option<SearchTarget>,
    hovered: Option<String>,
    tooltip: Option<Tooltip>,
    tooltip_timer: TooltipTimer,
    long_press: LongPress,
    selected_code: Option<String>,
    choropleth: Option<(ChoroplethData, ChoroplethConfig)>,
    external_loading: bool,
    events: EventLog,
    frame: u64,
}

impl AdminMap {
    pub fn new(config: MapConfig) -> Self {
        let viewport = ViewportController::new(config.width, config.height);
        Self {
            config,
            theme: MapTheme::default(),
            loader: TopologyLoader::new(Hierarchy::Administrative),
            drill: DrillDown::new(),
            transition: LevelTransition::new(),
            pending: None,
            viewport,
            memo: ProjectionMemo::new(),
            search_index: SearchIndex::build(None, None, None),
            search_target: None,
            hovered: None,
            tooltip: None,
            tooltip_timer: TooltipTimer::new(),
            long_press: LongPress::new(),
            selected_code: None,
            choropleth: None,
            external_loading: false,
            events: EventLog::new(),
            frame: 0,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn set_theme(&mut self, theme: MapTheme) {
        self.theme = theme;
    }

    /// The palette the embedding shell passes to [`RegionRenderState::fill`]
    /// when rendering the scene's polygons.
    pub fn theme(&self) -> &MapTheme {
        &self.theme
    }

    pub fn state(&self) -> &DrillDownState {
        self.drill.state()
    }

    pub fn events(&mut self) -> &mut EventLog {
        &mut self.events
    }

    // --- dataset loading ---

    /// Starts (or restarts) the dataset batch. The embedding shell fetches
    /// each request and feeds the payloads back.
    pub fn begin_loading(&mut self) -> Vec<DatasetRequest> {
        self.loader.begin()
    }

    pub fn complete_dataset(&mut self, epoch: Epoch, level: DatasetLevel, payload: &str) -> bool {
        let applied = self.loader.complete(epoch, level, payload);
        if applied {
            self.after_loader_change();
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
            self.after_loader_change();
        }
        applied
    }

    fn after_loader_change(&mut self) {
        if let Some(err) = self.loader.error() {
            let message = err.to_string();
            self.events
                .emit(self.frame, MapEventKind::DatasetFailed, message);
            return;
        }
        if !self.loader.is_loading() {
            self.search_index = SearchIndex::build(
                self.loader.feature_set(DatasetLevel::City),
                self.loader.feature_set(DatasetLevel::SubDistrict),
                self.loader.feature_set(DatasetLevel::Neighborhood),
            );
            self.events
                .emit(self.frame, MapEventKind::DatasetsLoaded, "batch complete");
        }
    }

    /// Loading state driven by the embedding application, ORed with the
    /// dataset batch.
    pub fn set_external_loading(&mut self, loading: bool) {
        self.external_loading = loading;
    }

    pub fn set_choropleth(&mut self, overlay: Option<(ChoroplethData, ChoroplethConfig)>) {
        self.choropleth = overlay;
    }

    pub fn set_selected_code(&mut self, code: Option<String>) {
        self.selected_code = code;
    }

    // --- navigation ---

    /// Handles a click on the region with this code.
    pub fn click(&mut self, code: &str) -> ClickOutcome {
        if self.transition.is_transitioning() {
            return ClickOutcome::Ignored;
        }
        if !self.config.enable_drill_down {
            return self.select_leaf(code);
        }
        match self.drill.visible_level() {
            DatasetLevel::Province => {
                self.begin_change(PendingChange::SelectProvince(code.to_string()))
            }
            DatasetLevel::City => {
                let Some(city) = self
                    .loader
                    .feature_set(DatasetLevel::City)
                    .and_then(|set| set.find_by_code(code))
                else {
                    return ClickOutcome::Ignored;
                };
                let change = PendingChange::SelectCity {
                    code: code.to_string(),
                    name: city.prop_str("CITY_NM").unwrap_or("").to_string(),
                    has_sub_districts: city.prop_bool("HAS_GU"),
                };
                self.begin_change(change)
            }
            DatasetLevel::SubDistrict => {
                let Some(gu) = self
                    .loader
                    .feature_set(DatasetLevel::SubDistrict)
                    .and_then(|set| set.find_by_code(code))
                else {
                    return ClickOutcome::Ignored;
                };
                let change = PendingChange::SelectSubDistrict {
                    code: code.to_string(),
                    name: gu.prop_str("SGU_NM").unwrap_or("").to_string(),
                };
                self.begin_change(change)
            }
            DatasetLevel::Neighborhood => self.select_leaf(code),
            DatasetLevel::Constituency => ClickOutcome::Ignored,
        }
    }

    /// Breadcrumb navigation. Ignored while a transition runs or when the
    /// target is not an ancestor of the current position.
    pub fn back_to(&mut self, target: BreadcrumbTarget) -> bool {
        if self.transition.is_transitioning() {
            return false;
        }
        let valid = match target {
            BreadcrumbTarget::Nation => self.drill.state() != &DrillDownState::Nation,
            BreadcrumbTarget::Province => self.drill.state().city().is_some(),
            BreadcrumbTarget::City => self.drill.state().sub_district().is_some(),
        };
        if !valid {
            return false;
        }
        self.begin_change(PendingChange::Back(target));
        true
    }

    // --- search ---

    pub fn search(&self, query: &str) -> Vec<&SearchCandidate> {
        self.search_index.query(query)
    }

    /// Jumps to a resolved search selection. Unlike clicks this applies
    /// immediately; the dropdown is already covering the map.
    pub fn select_search_result(&mut self, target: &SearchTarget) {
        if !self.config.enable_drill_down {
            return;
        }
        self.drill.jump_to_search_result(
            target,
            self.loader.feature_set(DatasetLevel::City),
            self.loader.feature_set(DatasetLevel::SubDistrict),
        );
        self.search_target = Some(target.clone());
        self.clear_transient();
        self.viewport.smooth_reset();
        self.events.emit(
            self.frame,
            MapEventKind::SearchJump,
            format!("jump to {}", target.province),
        );
    }

    /// The region to paint as highlighted after a search jump: the deepest
    /// code of the target, but only while its level is the one displayed.
    pub fn search_highlight_code(&self) -> Option<&str> {
        let target = self.search_target.as_ref()?;
        match self.current_level() {
            DatasetLevel::Neighborhood => target.neighborhood_code.as_deref(),
            DatasetLevel::SubDistrict => target.sub_district_code.as_deref(),
            DatasetLevel::City => target.city_code.as_deref(),
            _ => None,
        }
    }

    // --- pointer input ---

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
                self.tooltip = self.region_at(code).map(|region| Tooltip { region, position });
                self.tooltip_timer.cancel();
            }
        }
    }

    pub fn pointer_down(&mut self, kind: PointerKind, position: Vec2) {
        self.long_press.pointer_down(kind, position);
    }

    pub fn pointer_move(&mut self, kind: PointerKind, position: Vec2) {
        self.long_press.pointer_move(kind, position);
    }

    pub fn pointer_up(&mut self) {
        self.long_press.pointer_up();
    }

    /// Shows the touch tooltip for a long-pressed region. The embedding
    /// shell resolves the pressed position to a region code (it owns the hit
    /// testing) and passes it here.
    pub fn show_touch_tooltip(&mut self, code: &str, position: Vec2) {
        if let Some(region) = self.region_at(code) {
            self.tooltip = Some(Tooltip { region, position });
            self.tooltip_timer.show();
        }
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    // --- zoom ---

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.scale()
    }

    // --- frame loop ---

    /// Advances animations by `dt_s` seconds. Returns the screen position of
    /// a long press when one fired this frame; the caller hit-tests it and
    /// calls [`AdminMap::show_touch_tooltip`].
    pub fn advance(&mut self, dt_s: f64) -> Option<Vec2> {
        self.frame += 1;
        let was_zooming = self.viewport.is_animating();
        self.viewport.advance(dt_s);
        if was_zooming && !self.viewport.is_animating() {
            self.events.emit(
                self.frame,
                MapEventKind::ZoomCommitted,
                format!("scale {}", self.viewport.scale()),
            );
        }
        if self.transition.advance(dt_s) == TransitionEvent::Midpoint {
            self.apply_pending();
        }
        if self.tooltip_timer.advance(dt_s) {
            self.tooltip = None;
        }
        self.long_press.advance(dt_s)
    }

    // --- scene ---

    pub fn scene(&mut self) -> MapScene {
        let is_loading = self.external_loading || self.loader.is_loading();
        let error = self.loader.error().map(str::to_string);
        if is_loading || error.is_some() {
            return MapScene {
                polygons: Vec::new(),
                breadcrumb: self.breadcrumb(),
                legend: Vec::new(),
                transform_attr: self.viewport.transform().svg_attr(),
                opacity: self.transition.opacity(),
                aria_label: self.aria_label(),
                zoom: self.viewport.scale(),
                is_loading,
                error,
            };
        }
        let level = self.current_level();
        let set = self.visible_set();
        let viewport = Viewport::new(self.config.width, self.config.height, self.config.padding);
        let highlight = self.search_highlight_code().map(str::to_string);
        let projected = self.memo.project(&set, viewport);

        let zoom = self.viewport.scale();
        let threshold = self
            .config
            .label_area_threshold
            .or_else(|| label_area_threshold(level));

        let mut polygons = Vec::with_capacity(set.len());
        for (feature, shape) in set.features.iter().zip(projected) {
            let Some(region) = region_info(level, feature) else {
                continue;
            };
            let base = show_label(self.config.show_labels, shape.area_sr, threshold);
            let show = zoom_adjusted_show_label(
                base,
                self.config.show_labels,
                zoom,
                shape.area_sr,
                threshold,
            );
            let selected = self.selected_code.as_deref() == Some(region.code.as_str())
                || highlight.as_deref() == Some(region.code.as_str());
            let fill_override = self
                .choropleth
                .as_ref()
                .and_then(|(data, config)| choropleth_color(&region.code, data, config));
            polygons.push(RegionRenderState {
                hovered: self.hovered.as_deref() == Some(region.code.as_str()),
                selected,
                show_label: show,
                fill_override,
                path: shape.path.clone(),
                centroid: shape.centroid,
                code: region.code,
                name: region.name,
            });
        }

        let legend = self
            .choropleth
            .as_ref()
            .map(|(data, config)| build_legend(data, config))
            .unwrap_or_default();

        MapScene {
            polygons,
            breadcrumb: self.breadcrumb(),
            legend,
            transform_attr: self.viewport.transform().svg_attr(),
            opacity: self.transition.opacity(),
            aria_label: self.aria_label(),
            zoom,
            is_loading,
            error,
        }
    }

    // --- internals ---

    fn current_level(&self) -> DatasetLevel {
        if self.config.enable_drill_down {
            self.drill.visible_level()
        } else {
            DatasetLevel::SubDistrict
        }
    }

    fn visible_set(&self) -> FeatureSet {
        if self.config.enable_drill_down {
            visible_features(self.drill.state(), &self.loader)
        } else {
            self.loader
                .feature_set(DatasetLevel::SubDistrict)
                .cloned()
                .unwrap_or_else(|| FeatureSet::empty(DatasetLevel::SubDistrict))
        }
    }

    fn region_at(&self, code: &str) -> Option<RegionInfo> {
        let level = self.current_level();
        let set = self.visible_set();
        set.find_by_code(code)
            .and_then(|feature| region_info(level, feature))
    }

    fn select_leaf(&mut self, code: &str) -> ClickOutcome {
        match self.region_at(code) {
            Some(region) => {
                self.events.emit(
                    self.frame,
                    MapEventKind::RegionSelected,
                    region.full_name.clone(),
                );
                ClickOutcome::Selected(region)
            }
            None => ClickOutcome::Ignored,
        }
    }

    fn begin_change(&mut self, change: PendingChange) -> ClickOutcome {
        if !self.transition.try_begin() {
            return ClickOutcome::Ignored;
        }
        self.pending = Some(change);
        ClickOutcome::Drilled
    }

    /// Runs at the fade midpoint, while the map is invisible.
    fn apply_pending(&mut self) {
        let Some(change) = self.pending.take() else {
            return;
        };
        match change {
            PendingChange::SelectProvince(code) => {
                self.drill
                    .select_province(&code, self.loader.feature_set(DatasetLevel::City));
            }
            PendingChange::SelectCity {
                code,
                name,
                has_sub_districts,
            } => {
                self.drill.select_city(&code, &name, has_sub_districts);
            }
            PendingChange::SelectSubDistrict { code, name } => {
                self.drill.select_sub_district(&code, &name);
            }
            PendingChange::Back(BreadcrumbTarget::Nation) => self.drill.back_to_nation(),
            PendingChange::Back(BreadcrumbTarget::Province) => {
                self.drill.back_to_province();
            }
            PendingChange::Back(BreadcrumbTarget::City) => {
                self.drill.back_to_city();
            }
        }
        self.clear_transient();
        self.viewport.smooth_reset();
        self.events.emit(
            self.frame,
            MapEventKind::LevelChanged,
            describe_state(self.drill.state()),
        );
    }

    /// Hover and tooltip never survive a level change.
    fn clear_transient(&mut self) {
        self.hovered = None;
        self.tooltip = None;
        self.tooltip_timer.cancel();
        self.long_press.pointer_up();
    }

    fn breadcrumb(&self) -> Vec<BreadcrumbEntry> {
        if !self.config.enable_drill_down {
            return Vec::new();
        }
        let state = self.drill.state();
        let mut entries = vec![BreadcrumbEntry {
            label: "전국".to_string(),
            target: Some(BreadcrumbTarget::Nation),
        }];
        if let Some(province) = state.province() {
            entries.push(BreadcrumbEntry {
                label: province_full_name(province).to_string(),
                target: Some(BreadcrumbTarget::Province),
            });
        }
        if let Some(city) = state.city() {
            entries.push(BreadcrumbEntry {
                label: city.name.clone(),
                target: Some(BreadcrumbTarget::City),
            });
        }
        if let Some(gu) = state.sub_district() {
            entries.push(BreadcrumbEntry {
                label: gu.name.clone(),
                target: None,
            });
        }
        // The deepest entry is the current position.
        if let Some(last) = entries.last_mut() {
            last.target = None;
        }
        entries
    }

    fn aria_label(&self) -> String {
        if !self.config.enable_drill_down {
            return "시군구별 대한민국 지도".to_string();
        }
        let state = self.drill.state();
        match self.drill.visible_level() {
            DatasetLevel::Province => "시도별 대한민국 지도".to_string(),
            DatasetLevel::City => {
                format!("{} 시군 지도", state.province().unwrap_or(""))
            }
            DatasetLevel::SubDistrict => {
                let city = state.city().map(|c| c.name.as_str()).unwrap_or("");
                format!("{city} 구 지도")
            }
            _ => {
                let name = state
                    .sub_district()
                    .map(|g| g.name.as_str())
                    .or(state.city().map(|c| c.name.as_str()))
                    .unwrap_or("");
                format!("{name} 읍면동 지도")
            }
        }
    }
}

fn describe_state(state: &DrillDownState) -> String {
    match state {
        DrillDownState::Nation => "nation".to_string(),
        DrillDownState::Province { province } => province.clone(),
        DrillDownState::City { province, city } => format!("{province}/{}", city.code),
        DrillDownState::SubDistrict {
            province,
            city,
            sub_district,
        } => format!("{province}/{}/{}", city.code, sub_district.code),
    }
}

#[cfg(test)]
mod tests {
    use super::{AdminMap, ClickOutcome};
    use crate::config::MapConfig;
    use crate::events::MapEventKind;
    use crate::scene::BreadcrumbTarget;
    use drilldown::state::SearchTarget;
    use interaction::transition::FADE_DURATION_S;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use topology::geometry::DatasetLevel;

    fn geometry(props: Value) -> Value {
        json!({ "type": "Polygon", "arcs": [[0]], "properties": props })
    }

    fn payload(object_key: &str, geometries: Vec<Value>) -> String {
        json!({
            "type": "Topology",
            "objects": {
                object_key: { "type": "GeometryCollection", "geometries": geometries }
            },
            "arcs": [[[126.0, 36.0], [126.5, 36.0], [126.5, 36.5], [126.0, 36.0]]]
        })
        .to_string()
    }

    fn payload_for(level: DatasetLevel) -> String {
        let geometries = match level {
            DatasetLevel::Province => vec![
                geometry(json!({ "SIDO": "경기" })),
                geometry(json!({ "SIDO": "서울" })),
            ],
            DatasetLevel::City => vec![
                geometry(json!({
                    "SIDO": "경기", "CITY_CD": "4111", "CITY_NM": "수원시", "HAS_GU": true
                })),
                geometry(json!({
                    "SIDO": "경기", "CITY_CD": "4182", "CITY_NM": "가평군", "HAS_GU": false
                })),
                geometry(json!({
                    "SIDO": "서울", "CITY_CD": "1101", "CITY_NM": "종로구", "HAS_GU": false
                })),
            ],
            DatasetLevel::SubDistrict => vec![
                geometry(json!({
                    "SIDO": "경기", "SGU_CD": "41111", "SGU_NM": "수원시장안구"
                })),
                geometry(json!({
                    "SIDO": "경기", "SGU_CD": "41113", "SGU_NM": "수원시팔달구"
                })),
            ],
            DatasetLevel::Neighborhood => vec![
                geometry(json!({
                    "SIDO": "경기", "EMD_CD": "4111151",
                    "EMD_KOR_NM": "경기 수원시 장안구 파장동"
                })),
                geometry(json!({
                    "SIDO": "경기", "EMD_CD": "4111152",
                    "EMD_KOR_NM": "경기 수원시 장안구 정자동"
                })),
                geometry(json!({
                    "SIDO": "경기", "EMD_CD": "4111351",
                    "EMD_KOR_NM": "경기 수원시 팔달구 매산동"
                })),
                geometry(json!({
                    "SIDO": "경기", "EMD_CD": "4182031",
                    "EMD_KOR_NM": "경기 가평군 가평읍"
                })),
            ],
            DatasetLevel::Constituency => vec![],
        };
        payload(level.object_key(), geometries)
    }

    fn loaded_map(config: MapConfig) -> AdminMap {
        let mut map = AdminMap::new(config);
        for req in map.begin_loading() {
            assert!(map.complete_dataset(req.epoch, req.level, &payload_for(req.level)));
        }
        map
    }

    /// Runs the fade transition to completion.
    fn settle(map: &mut AdminMap) {
        map.advance(FADE_DURATION_S);
        map.advance(FADE_DURATION_S);
    }

    #[test]
    fn clicks_drill_through_the_hierarchy() {
        let mut map = loaded_map(MapConfig::default());
        assert_eq!(map.scene().polygons.len(), 2);

        assert_eq!(map.click("경기"), ClickOutcome::Drilled);
        settle(&mut map);
        let scene = map.scene();
        assert_eq!(scene.polygons.len(), 2); // 수원시, 가평군
        assert_eq!(scene.aria_label, "경기 시군 지도");

        assert_eq!(map.click("4111"), ClickOutcome::Drilled);
        settle(&mut map);
        assert_eq!(map.scene().polygons.len(), 2); // 장안구, 팔달구

        assert_eq!(map.click("41111"), ClickOutcome::Drilled);
        settle(&mut map);
        let scene = map.scene();
        assert_eq!(scene.polygons.len(), 2); // 파장동, 정자동

        // Neighborhoods are leaves.
        let ClickOutcome::Selected(region) = map.click("4111151") else {
            panic!("expected a selection");
        };
        assert_eq!(region.full_name, "경기 수원시 장안구 파장동");
    }

    #[test]
    fn reselecting_after_a_round_trip_yields_identical_metadata() {
        let mut map = loaded_map(MapConfig::default());
        let drill = |map: &mut AdminMap| {
            for code in ["경기", "4111", "41111"] {
                assert_eq!(map.click(code), ClickOutcome::Drilled);
                settle(map);
            }
        };

        drill(&mut map);
        let ClickOutcome::Selected(first) = map.click("4111151") else {
            panic!("expected a selection");
        };

        assert!(map.back_to(BreadcrumbTarget::Nation));
        settle(&mut map);
        drill(&mut map);
        let ClickOutcome::Selected(second) = map.click("4111151") else {
            panic!("expected a selection");
        };
        assert_eq!(first, second);
    }

    #[test]
    fn clicks_during_a_transition_are_dropped() {
        let mut map = loaded_map(MapConfig::default());
        assert_eq!(map.click("경기"), ClickOutcome::Drilled);
        assert_eq!(map.click("서울"), ClickOutcome::Ignored);
        settle(&mut map);
        assert_eq!(map.state().province(), Some("경기"));
    }

    #[test]
    fn breadcrumb_navigates_back_with_ancestors_intact() {
        let mut map = loaded_map(MapConfig::default());
        map.click("경기");
        settle(&mut map);
        map.click("4111");
        settle(&mut map);
        map.click("41111");
        settle(&mut map);

        let scene = map.scene();
        let labels: Vec<&str> = scene
            .breadcrumb
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, vec!["전국", "경기도", "수원시", "장안구"]);

        assert!(map.back_to(BreadcrumbTarget::Province));
        settle(&mut map);
        assert_eq!(map.state().province(), Some("경기"));
        assert_eq!(map.scene().aria_label, "경기 시군 지도");
    }

    #[test]
    fn city_without_sub_districts_drops_to_neighborhoods() {
        let mut map = loaded_map(MapConfig::default());
        map.click("경기");
        settle(&mut map);
        map.click("4182");
        settle(&mut map);
        let scene = map.scene();
        assert_eq!(scene.polygons.len(), 1);
        assert_eq!(scene.polygons[0].code, "4182031");
    }

    #[test]
    fn search_jump_applies_immediately_and_highlights() {
        let mut map = loaded_map(MapConfig::default());
        let target = SearchTarget {
            province: "경기".into(),
            city_code: Some("4111".into()),
            sub_district_code: Some("41111".into()),
            neighborhood_code: None,
        };
        map.select_search_result(&target);
        // No fade: the level changed in place.
        let scene = map.scene();
        assert_eq!(scene.polygons.len(), 2);
        let highlighted: Vec<&str> = scene
            .polygons
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.code.as_str())
            .collect();
        assert_eq!(highlighted, vec!["41111"]);
    }

    #[test]
    fn search_index_resolves_initials_after_loading() {
        let map = loaded_map(MapConfig::default());
        let results = map.search("ㅍㅈㄷ");
        assert!(results.iter().any(|c| c.display_name.contains("파장동")));
    }

    #[test]
    fn flat_mode_shows_sub_districts_and_only_selects() {
        let mut map = loaded_map(MapConfig {
            enable_drill_down: false,
            ..MapConfig::default()
        });
        let scene = map.scene();
        assert_eq!(scene.polygons.len(), 2);
        assert!(scene.breadcrumb.is_empty());

        let ClickOutcome::Selected(region) = map.click("41111") else {
            panic!("expected a selection");
        };
        assert_eq!(region.name, "장안구");
    }

    #[test]
    fn one_failed_dataset_poisons_the_scene() {
        let mut map = AdminMap::new(MapConfig::default());
        let requests = map.begin_loading();
        for req in &requests {
            if req.level == DatasetLevel::Neighborhood {
                map.fail_dataset(req.epoch, req.level, "HTTP 500");
            } else {
                map.complete_dataset(req.epoch, req.level, &payload_for(req.level));
            }
        }
        let scene = map.scene();
        assert!(scene.error.is_some());
        assert!(scene.polygons.is_empty());
    }

    #[test]
    fn level_changes_reset_hover_and_zoom() {
        use foundation::math::Vec2;
        use interaction::long_press::PointerKind;
        use interaction::viewport::SMOOTH_ZOOM_DURATION_S;

        let mut map = loaded_map(MapConfig::default());
        map.zoom_in();
        map.advance(SMOOTH_ZOOM_DURATION_S);
        assert!(map.zoom() > 1.0);
        assert!(
            map.events()
                .events()
                .iter()
                .any(|e| e.kind == MapEventKind::ZoomCommitted)
        );
        map.hover(PointerKind::Mouse, Some("경기"), Vec2::new(10.0, 10.0));
        assert!(map.tooltip().is_some());

        map.click("경기");
        settle(&mut map);
        assert!(map.tooltip().is_none());
        // The smooth reset kicked off at the midpoint.
        map.advance(SMOOTH_ZOOM_DURATION_S);
        assert_eq!(map.zoom(), 1.0);
    }
}
