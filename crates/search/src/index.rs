use topology::geometry::FeatureSet;
use topology::naming::{PROVINCE_NAMES, province_full_name};

use crate::hangul::{is_initials_query, matches_initials};

/// Dropdown results are capped; deeper refinement beats scrolling.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CandidateTag {
    Province,
    City,
    SubDistrict,
    Neighborhood,
}

impl CandidateTag {
    /// Korean row label shown next to each result.
    pub fn label(self) -> &'static str {
        match self {
            CandidateTag::Province => "시도",
            CandidateTag::City => "시군",
            CandidateTag::SubDistrict => "구",
            CandidateTag::Neighborhood => "읍면동",
        }
    }
}

/// One searchable region row. Code fields describe how deep the row drills;
/// `search_text` is the concatenation of every alias the row answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub province: String,
    pub city_code: Option<String>,
    pub sub_district_code: Option<String>,
    pub neighborhood_code: Option<String>,
    pub display_name: String,
    pub tag: CandidateTag,
    search_text: String,
}

/// A flat query index over every searchable region.
///
/// Built once per dataset batch. Levels that are not loaded simply contribute
/// no rows; provinces always come from the static name table, so search works
/// before any dataset arrives.
#[derive(Debug, Default)]
pub struct SearchIndex {
    candidates: Vec<SearchCandidate>,
}

impl SearchIndex {
    pub fn build(
        cities: Option<&FeatureSet>,
        sub_districts: Option<&FeatureSet>,
        neighborhoods: Option<&FeatureSet>,
    ) -> Self {
        let mut candidates = Vec::new();

        for (&short, &full) in PROVINCE_NAMES.iter() {
            candidates.push(SearchCandidate {
                province: short.to_string(),
                city_code: None,
                sub_district_code: None,
                neighborhood_code: None,
                display_name: full.to_string(),
                tag: CandidateTag::Province,
                search_text: format!("{short} {full}"),
            });
        }

        // Cities that subdivide; their sub-districts get their own rows.
        let mut subdivided: Vec<(String, String)> = Vec::new();

        if let Some(cities) = cities {
            for f in &cities.features {
                let (Some(sido), Some(code), Some(name)) = (
                    f.prop_str("SIDO"),
                    f.prop_str("CITY_CD"),
                    f.prop_str("CITY_NM"),
                ) else {
                    continue;
                };
                let sido_full = province_full_name(sido);
                let full_name = format!("{sido_full} {name}");
                candidates.push(SearchCandidate {
                    province: sido.to_string(),
                    city_code: Some(code.to_string()),
                    sub_district_code: None,
                    neighborhood_code: None,
                    display_name: full_name.clone(),
                    tag: CandidateTag::City,
                    search_text: format!("{sido} {sido_full} {name} {full_name}"),
                });
                if f.prop_bool("HAS_GU") {
                    subdivided.push((code.to_string(), name.to_string()));
                }
            }
        }

        if let Some(sub_districts) = sub_districts {
            for f in &sub_districts.features {
                let (Some(sido), Some(code), Some(name)) = (
                    f.prop_str("SIDO"),
                    f.prop_str("SGU_CD"),
                    f.prop_str("SGU_NM"),
                ) else {
                    continue;
                };
                let prefix4 = code_prefix(code, 4);
                let Some((city_code, city_name)) =
                    subdivided.iter().find(|(c, _)| *c == prefix4)
                else {
                    // Standalone cities are already searchable as city rows.
                    continue;
                };
                let sido_full = province_full_name(sido);
                let full_name = format!("{sido_full} {city_name} {name}");
                candidates.push(SearchCandidate {
                    province: sido.to_string(),
                    city_code: Some(city_code.clone()),
                    sub_district_code: Some(code.to_string()),
                    neighborhood_code: None,
                    display_name: full_name.clone(),
                    tag: CandidateTag::SubDistrict,
                    search_text: format!("{sido} {sido_full} {city_name} {name} {full_name}"),
                });
            }
        }

        if let Some(neighborhoods) = neighborhoods {
            for f in &neighborhoods.features {
                let (Some(sido), Some(code), Some(full_name)) = (
                    f.prop_str("SIDO"),
                    f.prop_str("EMD_CD"),
                    f.prop_str("EMD_KOR_NM"),
                ) else {
                    continue;
                };
                let short_name = full_name.rsplit(' ').next().unwrap_or(full_name);
                let sgu_code = code_prefix(code, 5);
                let prefix4 = code_prefix(code, 4);
                let (city_code, sub_district_code) =
                    if subdivided.iter().any(|(c, _)| *c == prefix4) {
                        (prefix4, Some(sgu_code))
                    } else {
                        (sgu_code, None)
                    };
                candidates.push(SearchCandidate {
                    province: sido.to_string(),
                    city_code: Some(city_code),
                    sub_district_code,
                    neighborhood_code: Some(code.to_string()),
                    display_name: full_name.to_string(),
                    tag: CandidateTag::Neighborhood,
                    search_text: format!("{sido} {full_name} {short_name}"),
                });
            }
        }

        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Runs a query: initial-jamo queries match on the chosung projection,
    /// anything else on plain substrings. Blank queries yield nothing.
    pub fn query(&self, raw: &str) -> Vec<&SearchCandidate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        let by_initials = is_initials_query(trimmed);
        self.candidates
            .iter()
            .filter(|c| {
                if by_initials {
                    matches_initials(&c.search_text, trimmed)
                } else {
                    c.search_text.contains(trimmed)
                }
            })
            .take(MAX_RESULTS)
            .collect()
    }
}

fn code_prefix(code: &str, n: usize) -> String {
    code.chars().take(n).collect()
}
