use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use topology::geometry::{FeatureSet, GeoPoint};

/// The pixel box a feature set is fitted into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.padding).max(0.0)
    }
}

/// A fitted Mercator projection: uniform scale plus translate applied to the
/// raw Mercator plane. Screen y grows downward.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    scale: f64,
    translate: Vec2,
}

impl Projection {
    /// The identity mapping; used when there is nothing to fit.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }

    /// Fits the set's full geographic extent inside the viewport minus its
    /// padding, preserving aspect ratio and centering the slack axis.
    pub fn fit_extent(set: &FeatureSet, viewport: Viewport) -> Self {
        let mut bounds = Aabb2::empty();
        for feature in &set.features {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            for rings in geometry.polygons() {
                for ring in rings {
                    for &point in ring {
                        bounds.extend(raw_mercator(point));
                    }
                }
            }
        }
        if bounds.is_empty() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Self::identity();
        }

        let sx = viewport.inner_width() / bounds.width();
        let sy = viewport.inner_height() / bounds.height();
        let scale = sx.min(sy);
        let fitted = Vec2::new(bounds.width() * scale, bounds.height() * scale);
        let translate = Vec2::new(
            viewport.padding + (viewport.inner_width() - fitted.x) / 2.0 - bounds.min.x * scale,
            viewport.padding + (viewport.inner_height() - fitted.y) / 2.0 - bounds.min.y * scale,
        );
        Self { scale, translate }
    }

    pub fn project(&self, point: GeoPoint) -> Vec2 {
        let raw = raw_mercator(point);
        Vec2::new(
            raw.x * self.scale + self.translate.x,
            raw.y * self.scale + self.translate.y,
        )
    }
}

/// Spherical Mercator in radians, y flipped so north is up on screen.
fn raw_mercator(point: GeoPoint) -> Vec2 {
    let lambda = point.lon_deg.to_radians();
    let phi = point.lat_deg.to_radians();
    Vec2::new(
        lambda,
        -((std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln()),
    )
}

#[cfg(test)]
mod tests {
    use super::{Projection, Viewport};
    use serde_json::Map;
    use topology::geometry::{DatasetLevel, FeatureSet, GeoPoint, RegionFeature, RegionGeometry};

    fn square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> RegionFeature {
        RegionFeature {
            properties: Map::new(),
            geometry: Some(RegionGeometry::Polygon(vec![vec![
                GeoPoint::new(lon0, lat0),
                GeoPoint::new(lon1, lat0),
                GeoPoint::new(lon1, lat1),
                GeoPoint::new(lon0, lat1),
                GeoPoint::new(lon0, lat0),
            ]])),
        }
    }

    #[test]
    fn fitted_extent_respects_padding() {
        let set = FeatureSet::new(
            DatasetLevel::Province,
            vec![square(126.0, 34.0, 129.0, 38.0)],
        );
        let viewport = Viewport::new(600.0, 800.0, 20.0);
        let projection = Projection::fit_extent(&set, viewport);

        for point in [
            GeoPoint::new(126.0, 34.0),
            GeoPoint::new(129.0, 38.0),
            GeoPoint::new(127.5, 36.0),
        ] {
            let p = projection.project(point);
            assert!(p.x >= 20.0 - 1e-9 && p.x <= 580.0 + 1e-9, "x = {}", p.x);
            assert!(p.y >= 20.0 - 1e-9 && p.y <= 780.0 + 1e-9, "y = {}", p.y);
        }
    }

    #[test]
    fn north_is_up() {
        let set = FeatureSet::new(
            DatasetLevel::Province,
            vec![square(126.0, 34.0, 129.0, 38.0)],
        );
        let projection = Projection::fit_extent(&set, Viewport::new(600.0, 800.0, 20.0));
        let north = projection.project(GeoPoint::new(127.0, 38.0));
        let south = projection.project(GeoPoint::new(127.0, 34.0));
        assert!(north.y < south.y);
    }

    #[test]
    fn empty_set_fits_to_identity() {
        let set = FeatureSet::empty(DatasetLevel::Province);
        let projection = Projection::fit_extent(&set, Viewport::new(600.0, 800.0, 20.0));
        assert_eq!(projection, Projection::identity());
    }
}
