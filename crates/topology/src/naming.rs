//! Region display-name tables and derivations.
//!
//! Provinces are keyed by their two-syllable short code everywhere in the
//! datasets; the full official name is presentation-only.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

/// Short province code → full official name (17 entries).
pub static PROVINCE_NAMES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("서울", "서울특별시"),
        ("부산", "부산광역시"),
        ("대구", "대구광역시"),
        ("인천", "인천광역시"),
        ("광주", "광주광역시"),
        ("대전", "대전광역시"),
        ("울산", "울산광역시"),
        ("세종", "세종특별자치시"),
        ("경기", "경기도"),
        ("강원", "강원특별자치도"),
        ("충북", "충청북도"),
        ("충남", "충청남도"),
        ("전북", "전북특별자치도"),
        ("전남", "전라남도"),
        ("경북", "경상북도"),
        ("경남", "경상남도"),
        ("제주", "제주특별자치도"),
    ])
});

/// Full display name for a short province code; unknown codes pass through.
pub fn province_full_name(short: &str) -> &str {
    PROVINCE_NAMES.get(short).copied().unwrap_or(short)
}

/// Extracts the city part of a compound city+sub-district token:
/// `수원시장안구` → `수원시`; tokens without a trailing sub-district
/// (`의정부시`, `종로구`) pass through unchanged.
pub fn extract_city_name(token: &str) -> &str {
    let si = token.find('시');
    let gu = token.rfind('구');
    if let (Some(si), Some(gu)) = (si, gu)
        && gu > si
    {
        return &token[..si + '시'.len_utf8()];
    }
    token
}

/// Short sub-district name, with the city prefix removed:
/// `용인시수지구` → `수지구`.
pub fn sub_district_short_name(name: &str) -> &str {
    if let Some(si) = name.find('시') {
        let rest = &name[si + '시'.len_utf8()..];
        if !rest.is_empty() {
            return rest;
        }
    }
    name
}

/// Short neighborhood name: the last space-separated token of the full name.
pub fn neighborhood_short_name(full_name: &str) -> &str {
    full_name.rsplit(' ').next().unwrap_or(full_name)
}
