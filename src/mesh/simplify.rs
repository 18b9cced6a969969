//! Coplanar polygon coalescing, run on the output of every boolean operation.
//!
//! Repeated BSP splitting leaves a solid's flat faces cut into many convex
//! pieces. This pass glues them back together:
//!
//! 1. drop degenerate polygons and remove straight corners from the rest
//! 2. bucket the polygons by (approximate) plane
//! 3. inside each bucket, join any pair sharing an edge as long as the
//!    result stays convex, restarting the scan after every join
//!
//! ```text
//!  +-----+-----+         +-----------+
//!  |     |    /|         |           |
//!  |  a  | b /c|   ==>   |           |
//!  |     |  /  |         |           |
//!  +-----+-----+         +-----------+
//! ```

use crate::float_types::tolerances;
use crate::mesh::polygon::Polygon;

/// Merge adjacent coplanar polygons that carry the same tag.
///
/// Idempotent: feeding the output back in yields the same polygon count.
pub fn simplify_polygons<S: Clone + PartialEq>(polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
    let input_count = polygons.len();
    let plane_eps = tolerances().plane;

    let mut inbox: Vec<Polygon<S>> = polygons
        .into_iter()
        .filter(|p| !p.is_degenerate())
        .map(|p| p.simplified())
        .collect();
    let mut result = Vec::with_capacity(inbox.len());

    while let Some(seed) = inbox.pop() {
        let plane = *seed.plane();
        let (mut coplanars, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut inbox)
            .into_iter()
            .partition(|p| p.plane().approx_eq(&plane, plane_eps));
        inbox = rest;
        coplanars.insert(0, seed);

        join_coplanars(&mut coplanars);
        result.append(&mut coplanars);
    }

    log::debug!("simplify: {input_count} polygons -> {}", result.len());
    result
}

/// Join pairs until no pair joins.
fn join_coplanars<S: Clone + PartialEq>(coplanars: &mut Vec<Polygon<S>>) {
    'scan: loop {
        for i in 1..coplanars.len() {
            for j in 0..i {
                if let Some(joined) = coplanars[i].try_join(&coplanars[j]) {
                    coplanars[j] = joined;
                    coplanars.remove(i);
                    continue 'scan;
                }
            }
        }
        break;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::float_types::Real;
    use crate::mesh::vertex::Vertex;
    use nalgebra::{Point3, Vector3};

    fn tri(points: [[Real; 2]; 3], tag: u8) -> Polygon<u8> {
        Polygon::new(
            points
                .iter()
                .map(|p| Vertex::new(Point3::new(p[0], p[1], 0.0), Vector3::z()))
                .collect(),
            Some(tag),
        )
        .unwrap()
    }

    #[test]
    fn fan_of_triangles_becomes_one_polygon() {
        let polys = vec![
            tri([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], 0),
            tri([[0.0, 0.0], [1.0, 1.0], [0.0, 1.0]], 0),
            tri([[1.0, 0.0], [2.0, 0.0], [1.0, 1.0]], 0),
        ];
        let out = simplify_polygons(polys);
        assert_eq!(out.len(), 1);
        assert_eq!(simplify_polygons(out.clone()).len(), 1);
        assert!(out[0].is_convex());
    }

    #[test]
    fn different_tags_stay_apart() {
        let polys = vec![
            tri([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], 0),
            tri([[0.0, 0.0], [1.0, 1.0], [0.0, 1.0]], 1),
        ];
        assert_eq!(simplify_polygons(polys).len(), 2);
    }

    #[test]
    fn degenerate_polygons_are_dropped() {
        let sliver = tri([[0.0, 0.0], [1.0, 0.0], [1.0, 0.001]], 0);
        assert!(sliver.is_degenerate());
        assert!(simplify_polygons(vec![sliver]).is_empty());
    }
}
