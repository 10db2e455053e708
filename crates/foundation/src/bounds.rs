use crate::math::Vec2;

/// Axis-aligned bounding box, grown point by point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    /// An inverted box; extending it with any finite point makes it valid.
    pub fn empty() -> Self {
        Aabb2 {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn extend(&mut self, p: Vec2) {
        if !p.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn extend_grows_box() {
        let mut b = Aabb2::empty();
        assert!(b.is_empty());
        b.extend(Vec2::new(1.0, 5.0));
        b.extend(Vec2::new(-2.0, 3.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, Vec2::new(-2.0, 3.0));
        assert_eq!(b.max, Vec2::new(1.0, 5.0));
        assert_eq!(b.width(), 3.0);
        assert_eq!(b.height(), 2.0);
        assert_eq!(b.center(), Vec2::new(-0.5, 4.0));
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let mut b = Aabb2::empty();
        b.extend(Vec2::new(f64::NAN, 0.0));
        assert!(b.is_empty());
    }
}
