//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Point3, Vector2, Vector3};

mod color;
pub use color::Color32;

mod interpolation_methods;

/// A vertex of a polygon: position, normal, color and texture coordinate.
///
/// Vertices are plain values. A polygon owns its vertex list outright and
/// vertices are copied, never shared, between polygons and solids.
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
    pub color: Color32,
    pub uv: Vector2<Real>,
}

impl Vertex {
    /// Create a new opaque white [`Vertex`] with zero texture coordinates.
    ///
    /// * `pos`    – the position in model space
    /// * `normal` – (optionally non‑unit) normal; it will be **copied verbatim**
    #[inline]
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex {
            pos,
            normal,
            color: Color32::WHITE,
            uv: Vector2::new(0.0, 0.0),
        }
    }

    /// Returns this vertex with its color replaced.
    #[inline]
    pub const fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    /// Returns this vertex with its texture coordinate replaced.
    #[inline]
    pub const fn with_uv(mut self, uv: Vector2<Real>) -> Self {
        self.uv = uv;
        self
    }

    /// Flip vertex normal in place.
    ///
    /// # Example
    /// ```rust
    /// # use nalgebra::{Point3, Vector3};
    /// # use meshcsg::mesh::vertex::Vertex;
    /// let mut v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::x());
    /// v.flip();
    /// assert_eq!(v.pos, Point3::new(1.0, 2.0, 3.0), "position remains the same");
    /// assert_eq!(v.normal, -Vector3::x(), "the normal is negated");
    /// ```
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Copy of this vertex with the normal negated.
    #[inline]
    pub fn flipped(&self) -> Vertex {
        let mut v = *self;
        v.flip();
        v
    }

    /// Squared Euclidean distance between the two positions.
    pub fn distance_squared_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm_squared()
    }

    /// Whether the two positions lie within `tolerance` of each other.
    #[inline]
    pub fn coincides_with(&self, other: &Vertex, tolerance: Real) -> bool {
        self.distance_squared_to(other) < tolerance * tolerance
    }

    /// `true` when every position and normal component is finite.
    pub fn is_finite(&self) -> bool {
        self.pos.iter().all(|c| c.is_finite())
            && self.normal.iter().all(|c| c.is_finite())
            && self.uv.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_vertex_new() {
        let pos = Point3::new(1.0, 2.0, 3.0);
        let normal = Vector3::new(0.0, 1.0, 0.0);
        let v = Vertex::new(pos, normal);
        assert_eq!(v.pos, pos);
        assert_eq!(v.normal, normal);
        assert_eq!(v.color, Color32::WHITE);
        assert_eq!(v.uv, Vector2::zeros());
    }

    #[test]
    fn flipped_keeps_attributes() {
        let v = Vertex::new(Point3::origin(), Vector3::z())
            .with_color(Color32::new(10, 20, 30, 40))
            .with_uv(Vector2::new(0.25, 0.75));
        let f = v.flipped();
        assert_eq!(f.normal, -Vector3::z());
        assert_eq!(f.color, v.color);
        assert_eq!(f.uv, v.uv);
        assert_eq!(f.flipped(), v);
    }

    #[test]
    fn coincidence_is_a_distance_test() {
        let a = Vertex::new(Point3::origin(), Vector3::z());
        let b = Vertex::new(Point3::new(0.001, 0.001, 0.0), Vector3::z());
        let c = Vertex::new(Point3::new(0.01, 0.0, 0.0), Vector3::z());
        assert!(a.coincides_with(&b, 0.0025));
        assert!(!a.coincides_with(&c, 0.0025));
    }
}
