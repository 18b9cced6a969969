//! Binary Space Partitioning (BSP) tree implementation
//!
//! The algorithms live behind the [`BspOps`] trait so that a serial or a
//! rayon-backed implementation can be swapped in, and the choice of splitting
//! plane is a separate [`SplittingPlaneStrategy`].

pub mod node;
pub mod traits;

pub mod serial;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use node::Node;
pub use traits::{BalancedSplittingStrategy, BspOps, FirstPolygon, RandomPolygon, SplittingPlaneStrategy};

pub use serial::SerialBspOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelBspOps;

/// The operations used by the convenience methods on [`Node`] and by
/// [`Solid`](crate::mesh::solid::Solid)'s boolean operators.
#[cfg(not(feature = "parallel"))]
pub type DefaultBspOps<S> = SerialBspOps<FirstPolygon, S>;

/// The operations used by the convenience methods on [`Node`] and by
/// [`Solid`](crate::mesh::solid::Solid)'s boolean operators.
#[cfg(feature = "parallel")]
pub type DefaultBspOps<S> = ParallelBspOps<FirstPolygon, S>;

use crate::float_types::{Real, tolerances};
use crate::mesh::plane::BACK;
use crate::mesh::polygon::Polygon;
use nalgebra::Point3;

impl<S: Clone + Send + Sync> Node<S> {
    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        node.build(polygons);
        node
    }

    /// Invert all polygons in the BSP tree
    pub fn invert(&mut self) {
        DefaultBspOps::new().invert(self);
    }

    /// Recursively remove all polygons that are inside this BSP tree
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        DefaultBspOps::new().clip_polygons(self, polygons)
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node<S>) {
        DefaultBspOps::new().clip_to(self, bsp);
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        DefaultBspOps::new().all_polygons(self)
    }

    /// Build a BSP tree from the given polygons
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        DefaultBspOps::new().build(self, polygons);
    }

    /// Classify a point against the solid this tree bounds.
    ///
    /// Walks down from the root: a point in front of a plane with no front
    /// subtree is outside, a point behind a plane with no back subtree is
    /// inside. Points on a plane are treated as in front. An empty tree
    /// contains nothing.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        let epsilon = tolerances().split;
        let mut node = self;
        loop {
            let Some(plane) = node.plane.as_ref() else {
                return false;
            };
            let child = if plane.orient_point(point, epsilon) == BACK {
                match node.back.as_deref() {
                    Some(back) => back,
                    None => return true,
                }
            } else {
                match node.front.as_deref() {
                    Some(front) => front,
                    None => return false,
                }
            };
            node = child;
        }
    }
}
