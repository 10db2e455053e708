use serde_json::{Map, Value};

/// A geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// A closed ring of positions. The first ring of a polygon is the outer
/// boundary; subsequent rings are holes.
pub type Ring = Vec<GeoPoint>;

#[derive(Debug, Clone, PartialEq)]
pub enum RegionGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl RegionGeometry {
    /// Iterates every polygon as its ring list, flattening multipolygons.
    pub fn polygons(&self) -> impl Iterator<Item = &[Ring]> {
        match self {
            RegionGeometry::Polygon(rings) => std::slice::from_ref(rings)
                .iter()
                .map(|r| r.as_slice())
                .collect::<Vec<_>>()
                .into_iter(),
            RegionGeometry::MultiPolygon(polys) => polys
                .iter()
                .map(|r| r.as_slice())
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

/// One administrative region: decoded geometry plus its raw property bag.
///
/// Geometry may be absent in degraded datasets; such a feature renders with
/// zero visible area rather than erroring.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    pub properties: Map<String, Value>,
    pub geometry: Option<RegionGeometry>,
}

impl RegionFeature {
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    pub fn prop_bool(&self, key: &str) -> bool {
        self.properties
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// The administrative granularity of one topology dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetLevel {
    Province,
    City,
    SubDistrict,
    Neighborhood,
    Constituency,
}

impl DatasetLevel {
    /// The named geometry collection inside each topology document. The
    /// loader matches these exactly; they come from the dataset build
    /// pipeline and are part of the data contract.
    pub fn object_key(self) -> &'static str {
        match self {
            DatasetLevel::Province => "2024_22_Elec_simplify",
            DatasetLevel::City => "sigun",
            DatasetLevel::SubDistrict => "sigungu",
            DatasetLevel::Neighborhood => "emd",
            DatasetLevel::Constituency => "2024_22_Elec_simplify",
        }
    }

    /// The property holding each feature's unique code at this level.
    pub fn code_key(self) -> &'static str {
        match self {
            DatasetLevel::Province => "SIDO",
            DatasetLevel::City => "CITY_CD",
            DatasetLevel::SubDistrict => "SGU_CD",
            DatasetLevel::Neighborhood => "EMD_CD",
            DatasetLevel::Constituency => "SGG_Code",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            DatasetLevel::Province => "province",
            DatasetLevel::City => "city",
            DatasetLevel::SubDistrict => "sub-district",
            DatasetLevel::Neighborhood => "neighborhood",
            DatasetLevel::Constituency => "constituency",
        }
    }
}

/// Content-derived identity for a feature set.
///
/// Two sets with the same level and the same codes in the same order share an
/// id, so derived caches (the projection memo) key on this instead of
/// comparing geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureSetId([u8; 32]);

impl FeatureSetId {
    pub fn to_hex(self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// One decoded, immutable feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub level: DatasetLevel,
    pub features: Vec<RegionFeature>,
    id: FeatureSetId,
}

impl FeatureSet {
    pub fn new(level: DatasetLevel, features: Vec<RegionFeature>) -> Self {
        let id = id_for_features(level, &features);
        Self {
            level,
            features,
            id,
        }
    }

    pub fn empty(level: DatasetLevel) -> Self {
        Self::new(level, Vec::new())
    }

    pub fn id(&self) -> FeatureSetId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Finds a feature by its level code.
    pub fn find_by_code(&self, code: &str) -> Option<&RegionFeature> {
        let key = self.level.code_key();
        self.features.iter().find(|f| f.prop_str(key) == Some(code))
    }

    /// Derives a new set from a filtered subset of features. The subset gets
    /// its own identity.
    pub fn filtered<F>(&self, keep: F) -> FeatureSet
    where
        F: Fn(&RegionFeature) -> bool,
    {
        let features: Vec<RegionFeature> = self
            .features
            .iter()
            .filter(|f| keep(f))
            .cloned()
            .collect();
        FeatureSet::new(self.level, features)
    }
}

fn id_for_features(level: DatasetLevel, features: &[RegionFeature]) -> FeatureSetId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(level.tag().as_bytes());
    let key = level.code_key();
    for f in features {
        hasher.update(b"\0");
        if let Some(code) = f.prop_str(key) {
            hasher.update(code.as_bytes());
        }
    }
    FeatureSetId(*hasher.finalize().as_bytes())
}
