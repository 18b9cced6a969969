//! Planes in 3-space and the polygon splitting algorithm.
//!
//! A plane is stored in point-normal form as a unit normal `n` plus the
//! signed distance `w` from the origin, so that points `p` on the plane
//! satisfy `n · p = w`.
//!
//! ### **Polygon Splitting**
//!
//! `split_polygon` is a 3D Sutherland-Hodgman pass:
//!
//! 1. **Classification**: each vertex is FRONT, BACK or COPLANAR with respect
//!    to a slab of half-thickness `epsilon` around the plane; the polygon's
//!    type is the bitwise OR of its vertex types.
//! 2. **Edge Processing**: for each edge (vᵢ, vⱼ), vᵢ goes to the front
//!    fragment unless it is BACK and to the back fragment unless it is FRONT.
//! 3. **Intersection**: an edge whose end types OR to SPANNING crosses the
//!    plane at
//!    ```text
//!    t = (w - n·vᵢ) / (n·(vⱼ - vᵢ))
//!    ```
//!    and the interpolated vertex is appended to both fragments.
//!
//! A SPANNING edge has one endpoint beyond `+epsilon` and the other beyond
//! `-epsilon`, so its denominator is always larger than `2·epsilon` in
//! magnitude.

use crate::errors::ValidationError;
use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

/// Classification of a polygon or point that lies exactly in the plane
/// (i.e. within `±epsilon` of the plane).
pub const COPLANAR: i8 = 0;

/// Classification of a polygon or point that lies strictly on the
/// *front* side of the plane (the side the normal points toward).
pub const FRONT: i8 = 1;

/// Classification of a polygon or point that lies strictly on the
/// *back* side of the plane (opposite the normal direction).
pub const BACK: i8 = 2;

/// A polygon or edge that straddles the plane, producing pieces
/// on both the front **and** the back.
pub const SPANNING: i8 = 3;

/// The four buckets filled by [`Plane::split_polygon`].
#[derive(Debug, Clone)]
pub struct SplitPolygons<S: Clone> {
    pub coplanar_front: Vec<Polygon<S>>,
    pub coplanar_back: Vec<Polygon<S>>,
    pub front: Vec<Polygon<S>>,
    pub back: Vec<Polygon<S>>,
}

impl<S: Clone> Default for SplitPolygons<S> {
    fn default() -> Self {
        Self {
            coplanar_front: Vec::new(),
            coplanar_back: Vec::new(),
            front: Vec::new(),
            back: Vec::new(),
        }
    }
}

/// A plane in 3D space: unit normal plus signed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and offset
    /// `w` such that `normal · p == w` for points on the plane.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Result<Self, ValidationError> {
        let len = normal.norm();
        if len < EPSILON {
            return Err(ValidationError::DegeneratePolygon(Point3::from(normal)));
        }
        Ok(Plane {
            normal: normal / len,
            w: w / len,
        })
    }

    /// Create a plane from three points.
    /// The normal direction follows the right-hand rule: (b-a) × (c-a).
    ///
    /// Fails with [`ValidationError::DegeneratePolygon`] when the points are
    /// colinear or coincident.
    pub fn from_points(
        a: &Point3<Real>,
        b: &Point3<Real>,
        c: &Point3<Real>,
    ) -> Result<Self, ValidationError> {
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if !len.is_finite() || len < EPSILON {
            return Err(ValidationError::DegeneratePolygon(*a));
        }
        let normal = n / len;
        Ok(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// The plane through the first three vertices.
    pub fn from_vertices(vertices: &[Vertex]) -> Result<Self, ValidationError> {
        match vertices {
            [a, b, c, ..] => Self::from_points(&a.pos, &b.pos, &c.pos),
            _ => Err(ValidationError::TooFewPoints(vertices.len())),
        }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance of `point` from the plane, positive on the front side.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point against a slab of half-thickness `epsilon`.
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>, epsilon: Real) -> i8 {
        let t = self.signed_distance(point);
        if t < -epsilon {
            BACK
        } else if t > epsilon {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to the plane.
    /// Returns a bitmask of `COPLANAR`, `FRONT`, and `BACK`.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>, epsilon: Real) -> i8 {
        polygon
            .vertices()
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos, epsilon))
    }

    /// Approximate equality: offsets within `epsilon` and normals agreeing
    /// to within `epsilon` of a unit dot product.
    pub fn approx_eq(&self, other: &Plane, epsilon: Real) -> bool {
        (self.w - other.w).abs() < epsilon && (self.normal.dot(&other.normal) - 1.0).abs() < epsilon
    }

    /// Splits a polygon by this plane into the four buckets of [`SplitPolygons`].
    pub fn split_polygon<S: Clone>(&self, polygon: &Polygon<S>, epsilon: Real) -> SplitPolygons<S> {
        let mut out = SplitPolygons::default();
        self.split_polygon_into(polygon, epsilon, &mut out);
        out
    }

    /// Same as [`split_polygon`](Self::split_polygon) but appends to
    /// caller-owned buckets, which is what the BSP code does on every level.
    pub fn split_polygon_into<S: Clone>(
        &self,
        polygon: &Polygon<S>,
        epsilon: Real,
        out: &mut SplitPolygons<S>,
    ) {
        let vertices = polygon.vertices();
        let types: Vec<i8> = vertices
            .iter()
            .map(|v| self.orient_point(&v.pos, epsilon))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane().normal) > 0.0 {
                    out.coplanar_front.push(polygon.clone());
                } else {
                    out.coplanar_back.push(polygon.clone());
                }
            },
            FRONT => out.front.push(polygon.clone()),
            BACK => out.back.push(polygon.clone()),
            _ => {
                let n = vertices.len();
                let mut split_front = Vec::<Vertex>::with_capacity(n + 1);
                let mut split_back = Vec::<Vertex>::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (type_i, type_j) = (types[i], types[j]);
                    let (vertex_i, vertex_j) = (&vertices[i], &vertices[j]);

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        let t = ((self.w - self.normal.dot(&vertex_i.pos.coords)) / denom)
                            .clamp(0.0, 1.0);
                        let vertex_new = vertex_i.interpolate(vertex_j, t);
                        split_front.push(vertex_new);
                        split_back.push(vertex_new);
                    }
                }

                if split_front.len() >= 3 {
                    out.front.push(polygon.fragment(split_front));
                }
                if split_back.len() >= 3 {
                    out.back.push(polygon.fragment(split_back));
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_points_follows_right_hand_rule() {
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(plane.normal, Vector3::z());
        assert_relative_eq!(plane.w, 1.0);
        assert_relative_eq!(plane.signed_distance(&Point3::new(5.0, 5.0, 3.0)), 2.0);
    }

    #[test]
    fn colinear_points_are_rejected() {
        let err = Plane::from_points(
            &Point3::origin(),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 2.0, 2.0),
        );
        assert!(matches!(err, Err(ValidationError::DegeneratePolygon(_))));
    }

    #[test]
    fn orient_point_uses_the_slab() {
        let plane = Plane::from_normal(Vector3::new(0.0, 0.0, 2.0), 0.0).unwrap();
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 0.0005), 1e-3), COPLANAR);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, 0.01), 1e-3), FRONT);
        assert_eq!(plane.orient_point(&Point3::new(0.0, 0.0, -0.01), 1e-3), BACK);
    }

    #[test]
    fn flip_is_an_involution() {
        let plane = Plane::from_normal(Vector3::new(1.0, 2.0, 3.0), 4.0).unwrap();
        let mut p = plane;
        p.flip();
        assert_relative_eq!(p.normal, -plane.normal);
        assert_eq!(p.flipped(), plane);
        assert!(plane.approx_eq(&p.flipped(), 1e-3));
        assert!(!plane.approx_eq(&p, 1e-3));
    }
}
