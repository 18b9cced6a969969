use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box.
///
/// An empty box has `mins` at `+MAX` and `maxs` at `-MAX`, so growing it by
/// any point yields that point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    pub fn empty() -> Self {
        Self {
            mins: Point3::new(Real::MAX, Real::MAX, Real::MAX),
            maxs: Point3::new(-Real::MAX, -Real::MAX, -Real::MAX),
        }
    }

    /// Smallest box holding every point; empty for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<Real>>) -> Self {
        points.into_iter().fold(Self::empty(), |mut aabb, p| {
            aabb.grow(p);
            aabb
        })
    }

    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x || self.mins.y > self.maxs.y || self.mins.z > self.maxs.z
    }

    pub fn grow(&mut self, p: &Point3<Real>) {
        self.mins = self.mins.inf(p);
        self.maxs = self.maxs.sup(p);
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.maxs.x >= other.mins.x
            && self.mins.x <= other.maxs.x
            && self.maxs.y >= other.mins.y
            && self.mins.y <= other.maxs.y
            && self.maxs.z >= other.mins.z
            && self.mins.z <= other.maxs.z
    }

    pub fn contains(&self, p: &Point3<Real>) -> bool {
        (0..3).all(|i| self.mins[i] <= p[i] && p[i] <= self.maxs[i])
    }

    #[inline]
    pub fn center(&self) -> Point3<Real> {
        nalgebra::center(&self.mins, &self.maxs)
    }

    pub fn extents(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_points_and_center() {
        let pts = [Point3::new(0.0, -1.0, 2.0), Point3::new(2.0, 1.0, 4.0)];
        let aabb = Aabb::from_points(&pts);
        assert_eq!(aabb.center(), Point3::new(1.0, 0.0, 3.0));
        assert_eq!(aabb.extents(), Vector3::new(2.0, 2.0, 2.0));
        assert!(aabb.contains(&Point3::new(1.0, 0.5, 2.5)));
        assert!(aabb.intersects(&Aabb::new(Point3::new(1.5, 0.0, 3.5), Point3::new(5.0, 5.0, 5.0))));
    }

    #[test]
    fn empty_box() {
        assert!(Aabb::from_points(std::iter::empty()).is_empty());
    }
}
