mod support;

use meshcsg::{
    CSGOps, Solid,
    float_types::EPSILON,
    mesh::{bsp::Node, polygon::Polygon},
};
use nalgebra::{Point3, Vector3};

use crate::support::{approx_eq, make_polygon_3d};

fn triangle() -> Polygon<()> {
    make_polygon_3d(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
}

#[test]
fn new_and_build() {
    let node: Node<()> = Node::from_polygons(&[triangle()]);
    assert!(node.plane.is_some());
    assert_eq!(node.polygons.len(), 1);
    assert!(node.front.is_none());
    assert!(node.back.is_none());
    assert!(node.is_leaf());
}

#[test]
fn empty_build_leaves_an_empty_node() {
    let node: Node<()> = Node::from_polygons(&[]);
    assert!(node.is_empty());
    assert!(node.plane.is_none());
    assert!(node.all_polygons().is_empty());
}

#[test]
fn invert() {
    let mut node: Node<()> = Node::from_polygons(&[triangle()]);
    let original_normal = node.plane.unwrap().normal();
    node.invert();

    let flipped = node.plane.unwrap().normal();
    assert!(approx_eq(flipped.z, -original_normal.z, EPSILON));
    assert_eq!(node.polygons.len(), 1);
    assert_eq!(node.polygons[0].plane().normal(), -Vector3::z());

    node.invert();
    assert_eq!(node.all_polygons(), vec![triangle()]);
}

#[test]
fn clip_polygons_against_a_cube() {
    let cube: Solid<()> = Solid::cube(2.0, None);
    let tree = Node::from_polygons(&cube.polygons);

    // straddles the x=2 face: only the outside part survives
    let probe = make_polygon_3d(&[[1.0, 1.0, 1.0], [3.0, 1.0, 1.0], [3.0, 1.5, 1.0], [1.0, 1.5, 1.0]]);
    let kept = tree.clip_polygons(&[probe]);
    assert!(!kept.is_empty());
    for p in &kept {
        for v in p.vertices() {
            assert!(v.pos.x >= 2.0 - 1e-9);
        }
    }

    let inside = make_polygon_3d(&[[0.5, 0.5, 1.0], [1.5, 0.5, 1.0], [1.0, 1.5, 1.0]]);
    assert!(tree.clip_polygons(&[inside]).is_empty());
}

#[test]
fn clip_to_removes_covered_polygons() {
    let big: Solid<()> = Solid::cube(4.0, None).translate(-1.5, -1.5, -1.5);
    let mut small = Node::from_polygons(&Solid::<()>::cube(1.0, None).polygons);
    small.clip_to(&Node::from_polygons(&big.polygons));
    assert!(small.all_polygons().is_empty());
}

#[test]
fn contains_point() {
    let tree: Node<()> = Node::from_polygons(&Solid::cube(1.0, None).polygons);
    assert!(tree.contains_point(&Point3::new(0.5, 0.5, 0.5)));
    assert!(!tree.contains_point(&Point3::new(1.5, 0.5, 0.5)));
    assert!(!tree.contains_point(&Point3::new(-0.5, 0.5, 0.5)));
    assert!(!Node::<()>::new().contains_point(&Point3::origin()));
}

#[test]
fn all_polygons_returns_everything_once() {
    let cube: Solid<()> = Solid::cube(1.0, None);
    let tree = Node::from_polygons(&cube.polygons);
    let all = tree.all_polygons();
    assert_eq!(all.len(), 6);
    for p in &cube.polygons {
        assert!(all.contains(p));
    }
    assert_eq!(tree.depth(), 6);
}
