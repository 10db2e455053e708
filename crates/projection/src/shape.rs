use foundation::math::Vec2;
use topology::geometry::{FeatureSet, RegionFeature, Ring};

use crate::mercator::{Projection, Viewport};

/// One feature's screen-space rendering data.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFeature {
    /// SVG path data. Empty when the feature has no geometry.
    pub path: String,
    /// Planar area-weighted centroid of the projected outline, for label
    /// anchoring.
    pub centroid: Vec2,
    /// Spherical area in steradians, independent of the viewport. Drives
    /// label visibility thresholds.
    pub area_sr: f64,
}

/// Projects every feature of a set into one viewport.
pub fn project_set(set: &FeatureSet, viewport: Viewport) -> Vec<ProjectedFeature> {
    let projection = Projection::fit_extent(set, viewport);
    set.features
        .iter()
        .map(|f| project_feature(f, &projection))
        .collect()
}

fn project_feature(feature: &RegionFeature, projection: &Projection) -> ProjectedFeature {
    let Some(geometry) = &feature.geometry else {
        return ProjectedFeature {
            path: String::new(),
            centroid: Vec2::ZERO,
            area_sr: 0.0,
        };
    };

    let mut path = String::new();
    let mut centroid = CentroidAccumulator::new();
    let mut area_sr = 0.0;
    for rings in geometry.polygons() {
        for (i, ring) in rings.iter().enumerate() {
            let projected: Vec<Vec2> = ring.iter().map(|&p| projection.project(p)).collect();
            append_ring_path(&mut path, &projected);
            centroid.add_ring(&projected);
            // Holes subtract from the outer boundary's area.
            let ring_sr = spherical_ring_area(ring);
            if i == 0 {
                area_sr += ring_sr;
            } else {
                area_sr -= ring_sr;
            }
        }
    }
    ProjectedFeature {
        path,
        centroid: centroid.finish(),
        area_sr: area_sr.max(0.0),
    }
}

fn append_ring_path(path: &mut String, ring: &[Vec2]) {
    use std::fmt::Write as _;

    // Rings are closed; the trailing repeat of the first point becomes Z.
    let open = match ring.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest,
        _ => ring,
    };
    for (i, p) in open.iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(path, "{command}{},{}", round2(p.x), round2(p.y));
    }
    if !open.is_empty() {
        path.push('Z');
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Shoelace centroid over all rings; hole rings carry opposite winding and
/// cancel naturally. Degenerate outlines fall back to the vertex average.
struct CentroidAccumulator {
    weighted: Vec2,
    area2: f64,
    point_sum: Vec2,
    points: usize,
}

impl CentroidAccumulator {
    fn new() -> Self {
        Self {
            weighted: Vec2::ZERO,
            area2: 0.0,
            point_sum: Vec2::ZERO,
            points: 0,
        }
    }

    fn add_ring(&mut self, ring: &[Vec2]) {
        for window in ring.windows(2) {
            let (a, b) = (window[0], window[1]);
            let cross = a.x * b.y - b.x * a.y;
            self.area2 += cross;
            self.weighted = self.weighted + Vec2::new((a.x + b.x) * cross, (a.y + b.y) * cross);
        }
        for &p in ring {
            self.point_sum = self.point_sum + p;
            self.points += 1;
        }
    }

    fn finish(self) -> Vec2 {
        if self.area2.abs() > f64::EPSILON {
            self.weighted * (1.0 / (3.0 * self.area2))
        } else if self.points > 0 {
            self.point_sum * (1.0 / self.points as f64)
        } else {
            Vec2::ZERO
        }
    }
}

/// Unsigned spherical area of one ring on the unit sphere.
fn spherical_ring_area(ring: &Ring) -> f64 {
    let mut sum = 0.0;
    for window in ring.windows(2) {
        let (a, b) = (window[0], window[1]);
        let d_lambda = (b.lon_deg - a.lon_deg).to_radians();
        sum += d_lambda * (2.0 + a.lat_deg.to_radians().sin() + b.lat_deg.to_radians().sin());
    }
    (sum / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::{ProjectedFeature, project_set};
    use crate::mercator::Viewport;
    use serde_json::Map;
    use topology::geometry::{DatasetLevel, FeatureSet, GeoPoint, RegionFeature, RegionGeometry};

    fn square_ring(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(lon0, lat0),
            GeoPoint::new(lon1, lat0),
            GeoPoint::new(lon1, lat1),
            GeoPoint::new(lon0, lat1),
            GeoPoint::new(lon0, lat0),
        ]
    }

    fn feature(geometry: Option<RegionGeometry>) -> RegionFeature {
        RegionFeature {
            properties: Map::new(),
            geometry,
        }
    }

    #[test]
    fn path_uses_move_line_close_per_ring() {
        let set = FeatureSet::new(
            DatasetLevel::Province,
            vec![feature(Some(RegionGeometry::Polygon(vec![square_ring(
                126.0, 34.0, 129.0, 38.0,
            )])))],
        );
        let projected = project_set(&set, Viewport::new(600.0, 800.0, 20.0));
        let path = &projected[0].path;
        assert!(path.starts_with('M'));
        assert!(path.ends_with('Z'));
        assert_eq!(path.matches('M').count(), 1);
        assert_eq!(path.matches('L').count(), 3);
    }

    #[test]
    fn missing_geometry_projects_to_an_empty_path() {
        let set = FeatureSet::new(
            DatasetLevel::Province,
            vec![
                feature(Some(RegionGeometry::Polygon(vec![square_ring(
                    126.0, 34.0, 129.0, 38.0,
                )]))),
                feature(None),
            ],
        );
        let projected = project_set(&set, Viewport::new(600.0, 800.0, 20.0));
        assert_eq!(
            projected[1],
            ProjectedFeature {
                path: String::new(),
                centroid: foundation::math::Vec2::ZERO,
                area_sr: 0.0,
            }
        );
    }

    #[test]
    fn centroid_of_a_square_is_its_middle() {
        let set = FeatureSet::new(
            DatasetLevel::Province,
            vec![feature(Some(RegionGeometry::Polygon(vec![square_ring(
                126.0, 35.9, 128.0, 36.1,
            )])))],
        );
        let viewport = Viewport::new(600.0, 800.0, 20.0);
        let projected = project_set(&set, viewport);
        let c = projected[0].centroid;
        // Fitted symmetrically, the centroid sits at the viewport center.
        assert!((c.x - 300.0).abs() < 1.0, "x = {}", c.x);
        assert!((c.y - 400.0).abs() < 1.0, "y = {}", c.y);
    }

    #[test]
    fn larger_regions_have_larger_spherical_area() {
        let small = FeatureSet::new(
            DatasetLevel::Province,
            vec![feature(Some(RegionGeometry::Polygon(vec![square_ring(
                127.0, 36.0, 127.1, 36.1,
            )])))],
        );
        let large = FeatureSet::new(
            DatasetLevel::Province,
            vec![feature(Some(RegionGeometry::Polygon(vec![square_ring(
                126.0, 34.0, 129.0, 38.0,
            )])))],
        );
        let viewport = Viewport::new(600.0, 800.0, 20.0);
        let a = project_set(&small, viewport)[0].area_sr;
        let b = project_set(&large, viewport)[0].area_sr;
        assert!(a > 0.0);
        assert!(b > a * 100.0);
    }
}
