use topology::geometry::{DatasetLevel, FeatureSet};
use topology::naming::sub_district_short_name;

/// A committed city selection. `has_sub_districts` decides whether the next
/// view shows sub-districts or jumps straight to neighborhoods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCity {
    pub code: String,
    pub name: String,
    pub has_sub_districts: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSubDistrict {
    pub code: String,
    pub name: String,
}

/// The drill-down position, as the deepest committed selection.
///
/// Every variant carries its full ancestor chain, so an inconsistent position
/// (a selected city without its province) is unrepresentable. The displayed
/// granularity is always one step below the deepest selection; see
/// [`DrillDownState::visible_level`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillDownState {
    Nation,
    Province {
        province: String,
    },
    City {
        province: String,
        city: SelectedCity,
    },
    SubDistrict {
        province: String,
        city: SelectedCity,
        sub_district: SelectedSubDistrict,
    },
}

impl DrillDownState {
    /// The dataset granularity currently displayed.
    pub fn visible_level(&self) -> DatasetLevel {
        match self {
            DrillDownState::Nation => DatasetLevel::Province,
            DrillDownState::Province { .. } => DatasetLevel::City,
            DrillDownState::City { city, .. } => {
                if city.has_sub_districts {
                    DatasetLevel::SubDistrict
                } else {
                    DatasetLevel::Neighborhood
                }
            }
            DrillDownState::SubDistrict { .. } => DatasetLevel::Neighborhood,
        }
    }

    pub fn province(&self) -> Option<&str> {
        match self {
            DrillDownState::Nation => None,
            DrillDownState::Province { province }
            | DrillDownState::City { province, .. }
            | DrillDownState::SubDistrict { province, .. } => Some(province),
        }
    }

    pub fn city(&self) -> Option<&SelectedCity> {
        match self {
            DrillDownState::City { city, .. } | DrillDownState::SubDistrict { city, .. } => {
                Some(city)
            }
            _ => None,
        }
    }

    pub fn sub_district(&self) -> Option<&SelectedSubDistrict> {
        match self {
            DrillDownState::SubDistrict { sub_district, .. } => Some(sub_district),
            _ => None,
        }
    }
}

/// A resolved search selection, possibly partial. Deeper fields imply the
/// shallower ones; `city_code` may still be absent when the candidate was
/// built from a sub-district or neighborhood row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTarget {
    pub province: String,
    pub city_code: Option<String>,
    pub sub_district_code: Option<String>,
    pub neighborhood_code: Option<String>,
}

/// The drill-down state machine.
///
/// Selection methods that only make sense at a particular position return
/// `false` and leave the state untouched when called elsewhere; stale clicks
/// arriving during a transition are dropped rather than applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillDown {
    state: DrillDownState,
}

impl DrillDown {
    pub fn new() -> Self {
        Self {
            state: DrillDownState::Nation,
        }
    }

    pub fn state(&self) -> &DrillDownState {
        &self.state
    }

    pub fn visible_level(&self) -> DatasetLevel {
        self.state.visible_level()
    }

    /// Selects a province from the nation view.
    ///
    /// When the province has exactly one child city (세종), the intermediate
    /// single-polygon view is skipped and the selection lands directly on
    /// that city.
    pub fn select_province(&mut self, code: &str, cities: Option<&FeatureSet>) -> bool {
        if self.state != DrillDownState::Nation {
            return false;
        }
        if let Some(cities) = cities {
            let mut children = cities
                .features
                .iter()
                .filter(|f| f.prop_str("SIDO") == Some(code));
            if let (Some(only), None) = (children.next(), children.next())
                && let Some(city_code) = only.prop_str("CITY_CD")
            {
                self.state = DrillDownState::City {
                    province: code.to_string(),
                    city: SelectedCity {
                        code: city_code.to_string(),
                        name: only.prop_str("CITY_NM").unwrap_or("").to_string(),
                        // The skip always lands on the neighborhoods view,
                        // even when the city subdivides.
                        has_sub_districts: false,
                    },
                };
                return true;
            }
        }
        self.state = DrillDownState::Province {
            province: code.to_string(),
        };
        true
    }

    /// Selects a city from the city view.
    pub fn select_city(&mut self, code: &str, name: &str, has_sub_districts: bool) -> bool {
        let DrillDownState::Province { province } = &self.state else {
            return false;
        };
        self.state = DrillDownState::City {
            province: province.clone(),
            city: SelectedCity {
                code: code.to_string(),
                name: name.to_string(),
                has_sub_districts,
            },
        };
        true
    }

    /// Selects a sub-district from the sub-district view.
    pub fn select_sub_district(&mut self, code: &str, name: &str) -> bool {
        let DrillDownState::City { province, city } = &self.state else {
            return false;
        };
        if !city.has_sub_districts {
            return false;
        }
        self.state = DrillDownState::SubDistrict {
            province: province.clone(),
            city: city.clone(),
            sub_district: SelectedSubDistrict {
                code: code.to_string(),
                name: sub_district_short_name(name).to_string(),
            },
        };
        true
    }

    pub fn back_to_nation(&mut self) {
        self.state = DrillDownState::Nation;
    }

    /// Returns to the city view of the current province. No-op at nation.
    pub fn back_to_province(&mut self) -> bool {
        match self.state.province() {
            Some(province) => {
                self.state = DrillDownState::Province {
                    province: province.to_string(),
                };
                true
            }
            None => false,
        }
    }

    /// Returns to the sub-district view of the current city. No-op unless a
    /// sub-district is selected.
    pub fn back_to_city(&mut self) -> bool {
        let DrillDownState::SubDistrict { province, city, .. } = &self.state else {
            return false;
        };
        self.state = DrillDownState::City {
            province: province.clone(),
            city: city.clone(),
        };
        true
    }

    /// Repositions the machine at a search selection, from any state.
    ///
    /// Partial targets land on the deepest view the target describes; a
    /// missing city code is recovered from the sub-district or neighborhood
    /// code prefix. A city code that cannot be resolved against the loaded
    /// city set stops the jump at the province view.
    pub fn jump_to_search_result(
        &mut self,
        target: &SearchTarget,
        cities: Option<&FeatureSet>,
        sub_districts: Option<&FeatureSet>,
    ) {
        let province = target.province.clone();

        if let Some(emd_code) = &target.neighborhood_code {
            if let Some(gu_code) = &target.sub_district_code {
                let city = self.resolve_city(target.city_code.as_deref(), gu_code, true, cities);
                let gu_name = sub_districts
                    .and_then(|set| set.find_by_code(gu_code))
                    .and_then(|f| f.prop_str("SGU_NM"))
                    .unwrap_or("");
                self.state = DrillDownState::SubDistrict {
                    province,
                    city,
                    sub_district: SelectedSubDistrict {
                        code: gu_code.clone(),
                        name: sub_district_short_name(gu_name).to_string(),
                    },
                };
            } else {
                let city = self.resolve_city(target.city_code.as_deref(), emd_code, false, cities);
                self.state = DrillDownState::City { province, city };
            }
        } else if let Some(gu_code) = &target.sub_district_code {
            let city = self.resolve_city(target.city_code.as_deref(), gu_code, true, cities);
            self.state = DrillDownState::City { province, city };
        } else if let Some(city_code) = &target.city_code {
            match cities.and_then(|set| set.find_by_code(city_code)) {
                Some(f) => {
                    self.state = DrillDownState::City {
                        province,
                        city: SelectedCity {
                            code: city_code.clone(),
                            name: f.prop_str("CITY_NM").unwrap_or("").to_string(),
                            has_sub_districts: f.prop_bool("HAS_GU"),
                        },
                    };
                }
                // Unknown city: stop at the deepest position we can verify.
                None => {
                    self.state = DrillDownState::Province { province };
                }
            }
        } else {
            self.state = DrillDownState::Province { province };
        }
    }

    fn resolve_city(
        &self,
        city_code: Option<&str>,
        deeper_code: &str,
        has_sub_districts: bool,
        cities: Option<&FeatureSet>,
    ) -> SelectedCity {
        let code = match city_code {
            Some(code) => code.to_string(),
            None => deeper_code.chars().take(4).collect(),
        };
        let name = cities
            .and_then(|set| set.find_by_code(&code))
            .and_then(|f| f.prop_str("CITY_NM"))
            .unwrap_or("")
            .to_string();
        SelectedCity {
            code,
            name,
            has_sub_districts,
        }
    }
}

impl Default for DrillDown {
    fn default() -> Self {
        Self::new()
    }
}
