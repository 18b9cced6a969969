//! Serial implementation of BSP operations

use crate::float_types::tolerances;
use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BspOps, FirstPolygon, SplittingPlaneStrategy};
use crate::mesh::plane::SplitPolygons;
use crate::mesh::polygon::Polygon;

/// Serial implementation of BSP operations
pub struct SerialBspOps<SP: SplittingPlaneStrategy<S> = FirstPolygon, S: Clone = ()> {
    splitting_strategy: SP,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: Clone> SerialBspOps<FirstPolygon, S> {
    pub const fn new() -> Self {
        Self {
            splitting_strategy: FirstPolygon,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S: Clone> Default for SerialBspOps<FirstPolygon, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone> SerialBspOps<SP, S> {
    pub const fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone + Send + Sync> BspOps<S> for SerialBspOps<SP, S> {
    fn invert(&self, node: &mut Node<S>) {
        // Use iterative approach with a stack
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(|p| p.flip());
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
        let epsilon = tolerances().split;

        let mut split = SplitPolygons::default();
        for polygon in polygons {
            plane.split_polygon_into(polygon, epsilon, &mut split);
        }
        let SplitPolygons {
            coplanar_front,
            coplanar_back,
            mut front,
            mut back,
        } = split;
        front.extend(coplanar_front);
        back.extend(coplanar_back);

        let mut result = match &node.front {
            Some(front_node) => self.clip_polygons(front_node, &front),
            None => front,
        };

        // no back subtree: these pieces are inside, drop them
        if let Some(back_node) = &node.back {
            result.extend(self.clip_polygons(back_node, &back));
        }

        result
    }

    fn clip_to(&self, node: &mut Node<S>, bsp: &Node<S>) {
        node.polygons = self.clip_polygons(bsp, &node.polygons);

        if let Some(ref mut front) = node.front {
            self.clip_to(front, bsp);
        }
        if let Some(ref mut back) = node.back {
            self.clip_to(back, bsp);
        }
    }

    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);

            // back first so the front subtree is visited next
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
        let epsilon = tolerances().split;

        let mut split = SplitPolygons::default();
        for polygon in polygons {
            plane.split_polygon_into(polygon, epsilon, &mut split);
        }
        node.polygons.append(&mut split.coplanar_front);
        node.polygons.append(&mut split.coplanar_back);

        if !split.front.is_empty() {
            let front = node.front.get_or_insert_with(|| Box::new(Node::new()));
            self.build(front, &split.front);
        }
        if !split.back.is_empty() {
            let back = node.back.get_or_insert_with(|| Box::new(Node::new()));
            self.build(back, &split.back);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::float_types::Real;
    use crate::mesh::vertex::Vertex;
    use nalgebra::{Point3, Vector3};

    fn quad_at_z(z: Real, up: bool) -> Polygon<()> {
        let mut corners = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        if !up {
            corners.reverse();
        }
        Polygon::new(
            corners
                .iter()
                .map(|p| Vertex::new(Point3::new(p[0], p[1], z), Vector3::z()))
                .collect(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn build_keeps_coplanar_polygons_on_the_node() {
        let ops = SerialBspOps::new();
        let mut node = Node::new();
        ops.build(&mut node, &[quad_at_z(0.0, true), quad_at_z(0.0, false), quad_at_z(1.0, true)]);
        assert_eq!(node.polygons.len(), 2);
        assert!(node.front.is_some());
        assert!(node.back.is_none());
        assert_eq!(ops.all_polygons(&node).len(), 3);
    }

    #[test]
    fn all_polygons_is_pre_order() {
        let ops = SerialBspOps::new();
        let mut node = Node::new();
        ops.build(&mut node, &[quad_at_z(0.0, true), quad_at_z(1.0, true), quad_at_z(-1.0, true)]);
        let zs: Vec<Real> = ops
            .all_polygons(&node)
            .iter()
            .map(|p| p.vertices()[0].pos.z)
            .collect();
        assert_eq!(zs, vec![0.0, 1.0, -1.0]);
    }

    #[test]
    fn clip_without_plane_returns_a_copy() {
        let ops = SerialBspOps::new();
        let node = Node::new();
        let polys = vec![quad_at_z(0.0, true)];
        assert_eq!(ops.clip_polygons(&node, &polys), polys);
    }

    #[test]
    fn invert_twice_restores_the_tree() {
        let ops = SerialBspOps::new();
        let mut node = Node::new();
        ops.build(&mut node, &[quad_at_z(0.0, true), quad_at_z(1.0, true)]);
        let before = ops.all_polygons(&node);
        ops.invert(&mut node);
        assert!(node.front.is_none() && node.back.is_some());
        ops.invert(&mut node);
        assert_eq!(ops.all_polygons(&node), before);
    }
}
