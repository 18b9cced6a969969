//! Traits defining BSP tree operations for dependency inversion

use crate::float_types::{Real, tolerances};
use crate::mesh::bsp::node::Node;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Core BSP operations trait - implements algorithms on BSP nodes
pub trait BspOps<S: Clone + Send + Sync> {
    /// Invert all polygons in the BSP tree, swapping solid and empty space
    fn invert(&self, node: &mut Node<S>);

    /// Recursively remove all polygons that are inside this BSP tree
    fn clip_polygons(&self, node: &Node<S>, polygons: &[Polygon<S>]) -> Vec<Polygon<S>>;

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    fn clip_to(&self, node: &mut Node<S>, other: &Node<S>);

    /// Build a BSP tree from the given polygons
    fn build(&self, node: &mut Node<S>, polygons: &[Polygon<S>]);

    /// Return all polygons in this BSP tree, pre-order (node, front, back)
    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>>;
}

/// Policy for choosing the plane of a freshly created node.
///
/// The choice never affects which space a tree encloses, only how balanced
/// the tree is. `polygons` is never empty.
pub trait SplittingPlaneStrategy<S: Clone> {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane;
}

/// Split on the plane of the first polygon. Deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygon;

impl<S: Clone> SplittingPlaneStrategy<S> for FirstPolygon {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        *polygons[0].plane()
    }
}

/// Split on the plane of a randomly chosen polygon.
///
/// Seed it for reproducible trees.
#[derive(Debug)]
pub struct RandomPolygon {
    rng: Mutex<SmallRng>,
}

impl RandomPolygon {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPolygon {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for RandomPolygon {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *polygons[rng.gen_range(0..polygons.len())].plane()
    }
}

/// Splitting plane strategy using a balanced heuristic.
///
/// Scores the planes of the first `sample_size` polygons by
/// `span_weight * spanning + balance_weight * |front - back|` and keeps the
/// lowest.
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for BalancedSplittingStrategy {
    fn pick_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        let epsilon = tolerances().split;
        let mut best_plane = *polygons[0].plane();
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(self.sample_size.max(1)) {
            let plane = candidate.plane();
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon(poly, epsilon) {
                    COPLANAR => (0i64, 0i64, 0i64),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0, 0, 0), |acc, x| (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2));

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best_plane = *plane;
            }
        }

        best_plane
    }
}
