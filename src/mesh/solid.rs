//! `Solid`, a polygon boundary representation, and its boolean operations.

use crate::aabb::Aabb;
use crate::float_types::Real;
use crate::mesh::bsp::{BspOps, DefaultBspOps, Node};
use crate::mesh::polygon::Polygon;
use crate::mesh::simplify::simplify_polygons;
use crate::traits::{CSGOps, is_mirroring, normal_matrix};
use nalgebra::{Matrix4, Point3};
use std::fmt::Debug;

/// A closed (or open) volume boundary made of convex planar polygons.
///
/// Operations never mutate their inputs; each returns a fresh `Solid`.
#[derive(Debug, Clone)]
pub struct Solid<S: Clone> {
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone> Default for Solid<S> {
    fn default() -> Self {
        Self {
            polygons: Vec::new(),
        }
    }
}

impl<S: Clone + PartialEq + Send + Sync + Debug> Solid<S> {
    /// Build a Solid from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        Solid {
            polygons: polygons.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Coalesce adjacent coplanar polygons, see [`simplify_polygons`].
    pub fn simplified(&self) -> Self {
        Solid {
            polygons: simplify_polygons(self.polygons.clone()),
        }
    }

    /// Union using the given BSP implementation.
    ///
    /// ```text
    ///     A.union(B)
    ///
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   A   |            |       |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   B   |            |       |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    pub fn union_with<O: BspOps<S>>(&self, other: &Solid<S>, ops: &O) -> Solid<S> {
        let (mut a, mut b) = self.build_trees(other, ops);

        ops.clip_to(&mut a, &b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.build(&mut a, &ops.all_polygons(&b));

        self.finish("union", other, ops.all_polygons(&a))
    }

    /// Subtraction using the given BSP implementation.
    ///
    /// ```text
    ///     A.subtract(B)
    ///
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   A   |            |       |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   B   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn subtract_with<O: BspOps<S>>(&self, other: &Solid<S>, ops: &O) -> Solid<S> {
        let (mut a, mut b) = self.build_trees(other, ops);

        ops.invert(&mut a);
        ops.clip_to(&mut a, &b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.build(&mut a, &ops.all_polygons(&b));
        ops.invert(&mut a);

        self.finish("subtract", other, ops.all_polygons(&a))
    }

    /// Intersection using the given BSP implementation.
    ///
    /// ```text
    ///     A.intersect(B)
    ///
    ///     +-------+
    ///     |       |
    ///     |   A   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   B   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn intersect_with<O: BspOps<S>>(&self, other: &Solid<S>, ops: &O) -> Solid<S> {
        let (mut a, mut b) = self.build_trees(other, ops);

        ops.invert(&mut a);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.clip_to(&mut a, &b);
        ops.clip_to(&mut b, &a);
        ops.build(&mut a, &ops.all_polygons(&b));
        ops.invert(&mut a);

        self.finish("intersect", other, ops.all_polygons(&a))
    }

    fn build_trees<O: BspOps<S>>(&self, other: &Solid<S>, ops: &O) -> (Node<S>, Node<S>) {
        let mut a = Node::new();
        let mut b = Node::new();
        ops.build(&mut a, &self.polygons);
        ops.build(&mut b, &other.polygons);
        (a, b)
    }

    fn finish(&self, op: &str, other: &Solid<S>, polygons: Vec<Polygon<S>>) -> Solid<S> {
        let result = Solid {
            polygons: simplify_polygons(polygons),
        };
        log::debug!(
            "{op}: {} and {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            result.polygons.len()
        );
        result
    }

    /// Signed enclosed volume (divergence theorem over fan triangles).
    /// Positive for a closed solid with outward-facing polygons.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|p| p.triangulate())
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Whether `point` lies inside the solid, by descending a BSP tree built
    /// from its polygons.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        Node::from_polygons(&self.polygons).contains_point(point)
    }

    /// Replace every polygon's tag.
    pub fn with_shared(mut self, shared: Option<S>) -> Self {
        for p in &mut self.polygons {
            p.set_shared(shared.clone());
        }
        self
    }
}

impl<S: Clone + PartialEq + Send + Sync + Debug> CSGOps for Solid<S> {
    /// Returns a new empty Solid
    fn new() -> Self {
        Solid::default()
    }

    fn union(&self, other: &Solid<S>) -> Solid<S> {
        self.union_with(other, &DefaultBspOps::new())
    }

    fn subtract(&self, other: &Solid<S>) -> Solid<S> {
        self.subtract_with(other, &DefaultBspOps::new())
    }

    fn intersect(&self, other: &Solid<S>) -> Solid<S> {
        self.intersect_with(other, &DefaultBspOps::new())
    }

    /// Flip every polygon; no tree involved.
    fn inverse(&self) -> Solid<S> {
        Solid {
            polygons: self.polygons.iter().map(Polygon::flipped).collect(),
        }
    }

    /// Apply an affine transform to every vertex.
    ///
    /// Positions go through `matrix`, normals and planes through the inverse
    /// transpose of its linear part. A mirroring matrix (negative
    /// determinant) also reverses winding so the solid stays outward facing.
    fn transform(&self, matrix: &Matrix4<Real>) -> Solid<S> {
        let normal_matrix = normal_matrix(matrix);
        let mirror = is_mirroring(matrix);

        Solid {
            polygons: self
                .polygons
                .iter()
                .map(|p| p.transformed(matrix, &normal_matrix, mirror))
                .collect(),
        }
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(
            self.polygons
                .iter()
                .flat_map(|p| p.vertices().iter().map(|v| &v.pos)),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::bsp::{RandomPolygon, SerialBspOps};
    use approx::assert_relative_eq;

    #[test]
    fn cube_volume_and_box() {
        let cube = Solid::<()>::cube(2.0, None);
        assert_relative_eq!(cube.volume(), 8.0, epsilon = 1e-9);
        let bb = cube.bounding_box();
        assert_eq!(bb.mins, Point3::origin());
        assert_eq!(bb.maxs, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn inverse_negates_volume() {
        let cube = Solid::<()>::cube(1.0, None);
        assert_relative_eq!(cube.inverse().volume(), -1.0, epsilon = 1e-9);
        assert_eq!(cube.inverse().inverse().polygons, cube.polygons);
    }

    #[test]
    fn mirroring_keeps_the_solid_outward() {
        let cube = Solid::<()>::cube(1.0, None).scale(-1.0, 1.0, 1.0);
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1e-9);
        assert!(cube.contains_point(&Point3::new(-0.5, 0.5, 0.5)));
        for p in &cube.polygons {
            let centroid = p.vertices()[0].pos;
            assert!(p.plane().signed_distance(&centroid).abs() < 1e-9);
        }
    }

    #[test]
    fn seeded_random_strategy_gives_the_same_volume() {
        let a = Solid::<()>::cube(1.0, None);
        let b = a.translate(0.5, 0.25, 0.0);
        let ops = SerialBspOps::with_strategy(RandomPolygon::seeded(42));
        assert_relative_eq!(a.union_with(&b, &ops).volume(), 1.625, epsilon = 1e-6);
        assert_relative_eq!(a.intersect_with(&b, &ops).volume(), 0.375, epsilon = 1e-6);
        assert_relative_eq!(a.subtract_with(&b, &ops).volume(), 0.625, epsilon = 1e-6);
    }

    #[test]
    fn contains_point() {
        let cube = Solid::<()>::cube(1.0, None);
        assert!(cube.contains_point(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!cube.contains_point(&Point3::new(1.5, 0.5, 0.5)));
        assert!(!Solid::<()>::new().contains_point(&Point3::origin()));
    }
}
