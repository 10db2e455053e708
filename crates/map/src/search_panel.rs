use drilldown::state::SearchTarget;
use search::dropdown::{Dropdown, DropdownAction, DropdownKey};
use search::index::SearchIndex;
use search::recent::{RecentSearch, RecentStore};

/// One rendered dropdown row, either a live result or a remembered search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRow {
    pub display_name: String,
    /// Korean level label for result rows; recent rows carry none.
    pub tag_label: Option<&'static str>,
    pub is_recent: bool,
}

/// The region search box: query text, dropdown keyboard state and the
/// recent-search history behind it.
///
/// A blank query with the dropdown open shows the history instead of results;
/// both lists commit through the same [`SearchPanel::select`] path, which
/// records the selection before handing back the jump target.
#[derive(Debug)]
pub struct SearchPanel<S: RecentStore> {
    query: String,
    dropdown: Dropdown,
    store: S,
}

impl<S: RecentStore> SearchPanel<S> {
    pub fn new(store: S) -> Self {
        Self {
            query: String::new(),
            dropdown: Dropdown::new(),
            store,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Every input edit reopens the dropdown and resets the active row.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.dropdown.open();
    }

    pub fn focus(&mut self) {
        self.dropdown.open();
    }

    pub fn blur(&mut self) {
        self.dropdown.close();
    }

    pub fn is_open(&self) -> bool {
        self.dropdown.is_open()
    }

    pub fn active_row(&self) -> Option<usize> {
        self.dropdown.active()
    }

    pub fn hover_row(&mut self, index: usize) {
        self.dropdown.hover(index);
    }

    /// The rows the dropdown currently shows.
    pub fn rows(&self, index: &SearchIndex) -> Vec<SearchRow> {
        if !self.dropdown.is_open() {
            return Vec::new();
        }
        if self.showing_recent() {
            self.recent()
                .into_iter()
                .map(|item| SearchRow {
                    display_name: item.display_name,
                    tag_label: None,
                    is_recent: true,
                })
                .collect()
        } else {
            index
                .query(&self.query)
                .into_iter()
                .map(|c| SearchRow {
                    display_name: c.display_name.clone(),
                    tag_label: Some(c.tag.label()),
                    is_recent: false,
                })
                .collect()
        }
    }

    /// Routes a key through the dropdown. Returns the jump target when the
    /// key committed a row.
    pub fn on_key(&mut self, key: DropdownKey, index: &SearchIndex) -> Option<SearchTarget> {
        let count = self.row_count(index);
        match self.dropdown.on_key(key, count) {
            DropdownAction::Select(i) => self.select(i, index),
            DropdownAction::Closed => {
                self.query.clear();
                None
            }
            DropdownAction::None => None,
        }
    }

    /// Commits the row at `i`, by pointer or keyboard. Records the selection
    /// in the history, clears the box and reports the jump target.
    pub fn select(&mut self, i: usize, index: &SearchIndex) -> Option<SearchTarget> {
        let entry = if self.showing_recent() {
            self.recent().into_iter().nth(i)?
        } else {
            let candidate = index.query(&self.query).into_iter().nth(i)?;
            RecentSearch {
                display_name: candidate.display_name.clone(),
                province: candidate.province.clone(),
                city_code: candidate.city_code.clone(),
                sub_district_code: candidate.sub_district_code.clone(),
                neighborhood_code: candidate.neighborhood_code.clone(),
            }
        };
        let target = SearchTarget {
            province: entry.province.clone(),
            city_code: entry.city_code.clone(),
            sub_district_code: entry.sub_district_code.clone(),
            neighborhood_code: entry.neighborhood_code.clone(),
        };
        // Losing history is harmless; a full or absent store never blocks
        // the jump itself.
        let _ = self.store.add(entry);
        self.query.clear();
        self.dropdown.close();
        Some(target)
    }

    pub fn recent(&self) -> Vec<RecentSearch> {
        self.store.list().unwrap_or_default()
    }

    pub fn clear_recent(&mut self) {
        let _ = self.store.clear();
    }

    fn showing_recent(&self) -> bool {
        self.query.trim().is_empty()
    }

    fn row_count(&self, index: &SearchIndex) -> usize {
        if self.showing_recent() {
            self.recent().len()
        } else {
            index.query(&self.query).len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SearchPanel;
    use pretty_assertions::assert_eq;
    use search::dropdown::DropdownKey;
    use search::index::SearchIndex;
    use search::recent::{InMemoryRecentStore, RecentStore};
    use serde_json::{Map, Value};
    use topology::geometry::{DatasetLevel, FeatureSet, RegionFeature};

    fn city(sido: &str, code: &str, name: &str) -> RegionFeature {
        let mut props = Map::new();
        props.insert("SIDO".into(), Value::String(sido.into()));
        props.insert("CITY_CD".into(), Value::String(code.into()));
        props.insert("CITY_NM".into(), Value::String(name.into()));
        props.insert("HAS_GU".into(), Value::Bool(false));
        RegionFeature {
            properties: props,
            geometry: None,
        }
    }

    fn index() -> SearchIndex {
        let cities = FeatureSet::new(
            DatasetLevel::City,
            vec![
                city("경기", "4111", "수원시"),
                city("경기", "4182", "가평군"),
            ],
        );
        SearchIndex::build(Some(&cities), None, None)
    }

    #[test]
    fn typing_shows_results_with_level_labels() {
        let mut panel = SearchPanel::new(InMemoryRecentStore::new());
        panel.set_query("수원");
        let rows = panel.rows(&index());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_name, "경기도 수원시");
        assert_eq!(rows[0].tag_label, Some("시군"));
    }

    #[test]
    fn keyboard_commit_jumps_and_records_the_search() {
        let index = index();
        let mut panel = SearchPanel::new(InMemoryRecentStore::new());
        panel.set_query("수원");
        panel.on_key(DropdownKey::Down, &index);
        let target = panel.on_key(DropdownKey::Enter, &index).expect("a target");

        assert_eq!(target.province, "경기");
        assert_eq!(target.city_code.as_deref(), Some("4111"));
        assert_eq!(panel.query(), "");
        assert!(!panel.is_open());
        assert_eq!(panel.recent()[0].display_name, "경기도 수원시");
    }

    #[test]
    fn blank_query_shows_the_history() {
        let index = index();
        let mut store = InMemoryRecentStore::new();
        store
            .add(search::recent::RecentSearch {
                display_name: "경기도 가평군".into(),
                province: "경기".into(),
                city_code: Some("4182".into()),
                sub_district_code: None,
                neighborhood_code: None,
            })
            .unwrap();
        let mut panel = SearchPanel::new(store);
        panel.focus();
        let rows = panel.rows(&index);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_recent);

        // Replaying a remembered search resolves the same target.
        let target = panel.select(0, &index).expect("a target");
        assert_eq!(target.city_code.as_deref(), Some("4182"));
    }

    #[test]
    fn escape_closes_and_clears_the_box() {
        let index = index();
        let mut panel = SearchPanel::new(InMemoryRecentStore::new());
        panel.set_query("수원");
        assert!(panel.on_key(DropdownKey::Escape, &index).is_none());
        assert_eq!(panel.query(), "");
        assert!(!panel.is_open());
    }

    #[test]
    fn clearing_history_empties_the_blank_dropdown() {
        let index = index();
        let mut panel = SearchPanel::new(InMemoryRecentStore::new());
        panel.set_query("가평");
        panel.select(0, &index);
        assert_eq!(panel.recent().len(), 1);

        panel.clear_recent();
        panel.focus();
        assert!(panel.rows(&index).is_empty());
    }
}
