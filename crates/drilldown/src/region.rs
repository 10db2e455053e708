use topology::geometry::{DatasetLevel, RegionFeature};
use topology::naming::{neighborhood_short_name, province_full_name, sub_district_short_name};

/// The metadata handed to click callbacks and tooltips.
///
/// `code` is unique within its level; `full_name` is the hierarchy-aware
/// display name ("경기도 용인시수지구").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    pub code: String,
    pub province: String,
    pub name: String,
    pub full_name: String,
}

/// Derives display metadata from a feature's raw properties. Returns `None`
/// when the level's code property is missing.
pub fn region_info(level: DatasetLevel, feature: &RegionFeature) -> Option<RegionInfo> {
    match level {
        DatasetLevel::Province => {
            let short = feature.prop_str("SIDO")?;
            let full = province_full_name(short);
            Some(RegionInfo {
                code: short.to_string(),
                province: short.to_string(),
                name: full.to_string(),
                full_name: full.to_string(),
            })
        }
        DatasetLevel::City => {
            let code = feature.prop_str("CITY_CD")?;
            let name = feature.prop_str("CITY_NM").unwrap_or("");
            let province = feature.prop_str("SIDO").unwrap_or("");
            Some(RegionInfo {
                code: code.to_string(),
                province: province.to_string(),
                name: name.to_string(),
                full_name: format!("{} {}", province_full_name(province), name),
            })
        }
        DatasetLevel::SubDistrict => {
            let code = feature.prop_str("SGU_CD")?;
            let name = feature.prop_str("SGU_NM").unwrap_or("");
            let province = feature.prop_str("SIDO").unwrap_or("");
            Some(RegionInfo {
                code: code.to_string(),
                province: province.to_string(),
                name: sub_district_short_name(name).to_string(),
                full_name: format!("{} {}", province_full_name(province), name),
            })
        }
        DatasetLevel::Neighborhood => {
            let code = feature.prop_str("EMD_CD")?;
            let full = feature.prop_str("EMD_KOR_NM").unwrap_or("");
            let province = feature.prop_str("SIDO").unwrap_or("");
            Some(RegionInfo {
                code: code.to_string(),
                province: province.to_string(),
                name: neighborhood_short_name(full).to_string(),
                full_name: full.to_string(),
            })
        }
        DatasetLevel::Constituency => {
            let code = feature.prop_str("SGG_Code")?;
            Some(RegionInfo {
                code: code.to_string(),
                province: feature.prop_str("SIDO").unwrap_or("").to_string(),
                name: feature.prop_str("SGG").unwrap_or("").to_string(),
                full_name: feature.prop_str("SIDO_SGG").unwrap_or("").to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::region_info;
    use serde_json::{Map, Value};
    use topology::geometry::{DatasetLevel, RegionFeature};

    fn feature(pairs: &[(&str, &str)]) -> RegionFeature {
        let mut props = Map::new();
        for (k, v) in pairs {
            props.insert(k.to_string(), Value::String(v.to_string()));
        }
        RegionFeature {
            properties: props,
            geometry: None,
        }
    }

    #[test]
    fn province_uses_full_name_for_both_names() {
        let info = region_info(DatasetLevel::Province, &feature(&[("SIDO", "서울")])).unwrap();
        assert_eq!(info.code, "서울");
        assert_eq!(info.name, "서울특별시");
        assert_eq!(info.full_name, "서울특별시");
    }

    #[test]
    fn sub_district_strips_city_prefix_from_short_name() {
        let info = region_info(
            DatasetLevel::SubDistrict,
            &feature(&[("SGU_CD", "41465"), ("SGU_NM", "용인시수지구"), ("SIDO", "경기")]),
        )
        .unwrap();
        assert_eq!(info.name, "수지구");
        assert_eq!(info.full_name, "경기도 용인시수지구");
    }

    #[test]
    fn neighborhood_short_name_is_last_token() {
        let info = region_info(
            DatasetLevel::Neighborhood,
            &feature(&[
                ("EMD_CD", "4111151"),
                ("EMD_KOR_NM", "경기 수원시 장안구 파장동"),
                ("SIDO", "경기"),
            ]),
        )
        .unwrap();
        assert_eq!(info.name, "파장동");
        assert_eq!(info.full_name, "경기 수원시 장안구 파장동");
    }

    #[test]
    fn missing_code_yields_none() {
        assert!(region_info(DatasetLevel::City, &feature(&[("SIDO", "경기")])).is_none());
    }
}
