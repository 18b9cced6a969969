//! Parallel implementation of BSP operations

use rayon::prelude::*;

use crate::float_types::tolerances;
use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BspOps, FirstPolygon, SplittingPlaneStrategy};
use crate::mesh::plane::{Plane, SplitPolygons};
use crate::mesh::polygon::Polygon;

/// Parallel implementation of BSP operations.
///
/// Splits at a node run over a parallel iterator and the two subtrees of a
/// node are built and clipped with `rayon::join`. Results are identical to
/// [`SerialBspOps`](super::SerialBspOps) for the same strategy.
pub struct ParallelBspOps<SP: SplittingPlaneStrategy<S> = FirstPolygon, S: Clone = ()> {
    splitting_strategy: SP,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: Clone> ParallelBspOps<FirstPolygon, S> {
    pub const fn new() -> Self {
        Self {
            splitting_strategy: FirstPolygon,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S: Clone> Default for ParallelBspOps<FirstPolygon, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone> ParallelBspOps<SP, S> {
    pub const fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
            _phantom: std::marker::PhantomData,
        }
    }

    fn split_all(&self, plane: &Plane, polygons: &[Polygon<S>]) -> SplitPolygons<S>
    where
        S: Send + Sync,
    {
        let epsilon = tolerances().split;
        polygons
            .par_iter()
            .fold(SplitPolygons::default, |mut acc, poly| {
                plane.split_polygon_into(poly, epsilon, &mut acc);
                acc
            })
            .reduce(SplitPolygons::default, |mut acc, mut x| {
                acc.coplanar_front.append(&mut x.coplanar_front);
                acc.coplanar_back.append(&mut x.coplanar_back);
                acc.front.append(&mut x.front);
                acc.back.append(&mut x.back);
                acc
            })
    }
}

impl<SP: SplittingPlaneStrategy<S> + Sync, S: Clone + Send + Sync> BspOps<S> for ParallelBspOps<SP, S> {
    fn invert(&self, node: &mut Node<S>) {
        // Use iterative approach with a stack to avoid stack overflow
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.par_iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

            std::mem::swap(&mut current.front, &mut current.back);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn clip_polygons(&self, node: &Node<S>, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        let Some(plane) = node.plane.as_ref() else {
            return polygons.to_vec();
        };

        let SplitPolygons {
            coplanar_front,
            coplanar_back,
            mut front,
            mut back,
        } = self.split_all(plane, polygons);
        front.extend(coplanar_front);
        back.extend(coplanar_back);

        let (mut result, kept_back) = rayon::join(
            move || match node.front.as_deref() {
                Some(f) => self.clip_polygons(f, &front),
                None => front,
            },
            move || match node.back.as_deref() {
                Some(b) => self.clip_polygons(b, &back),
                // no back subtree: these pieces are inside, drop them
                None => Vec::new(),
            },
        );
        result.extend(kept_back);
        result
    }

    fn clip_to(&self, node: &mut Node<S>, bsp: &Node<S>) {
        // Use iterative approach with a stack to avoid recursive stack overflow
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons = self.clip_polygons(bsp, &current.polygons);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);
            stack.extend(
                [&current.back, &current.front]
                    .into_iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }

    fn build(&self, node: &mut Node<S>, polygons: &[Polygon<S>]) {
        if polygons.is_empty() {
            return;
        }

        let plane = *node.plane.get_or_insert_with(|| {
            let picked = self.splitting_strategy.pick_splitting_plane(polygons);
            log::trace!("bsp node on {picked:?} for {} polygons", polygons.len());
            picked
        });

        let mut split = self.split_all(&plane, polygons);
        node.polygons.append(&mut split.coplanar_front);
        node.polygons.append(&mut split.coplanar_back);

        if !split.front.is_empty() {
            node.front.get_or_insert_with(|| Box::new(Node::new()));
        }
        if !split.back.is_empty() {
            node.back.get_or_insert_with(|| Box::new(Node::new()));
        }

        let (front_node, back_node) = (&mut node.front, &mut node.back);
        rayon::join(
            || {
                if let Some(f) = front_node {
                    self.build(f, &split.front);
                }
            },
            || {
                if let Some(b) = back_node {
                    self.build(b, &split.back);
                }
            },
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::bsp::SerialBspOps;
    use crate::mesh::solid::Solid;
    use crate::traits::CSGOps;

    #[test]
    fn matches_serial_ops() {
        let a = Solid::<()>::cube(1.0, None).polygons;
        let b = Solid::<()>::cube(1.0, None).translate(0.5, 0.5, 0.5).polygons;

        let serial = SerialBspOps::new();
        let parallel = ParallelBspOps::new();

        let (mut sa, mut sb) = (Node::new(), Node::new());
        serial.build(&mut sa, &a);
        serial.build(&mut sb, &b);
        serial.clip_to(&mut sa, &sb);

        let (mut pa, mut pb) = (Node::new(), Node::new());
        parallel.build(&mut pa, &a);
        parallel.build(&mut pb, &b);
        parallel.clip_to(&mut pa, &pb);

        assert_eq!(serial.all_polygons(&sa).len(), parallel.all_polygons(&pa).len());
    }
}
