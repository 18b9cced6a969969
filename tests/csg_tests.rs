mod support;

use approx::assert_relative_eq;
use meshcsg::{
    CSGOps, Solid,
    mesh::bsp::{BalancedSplittingStrategy, RandomPolygon, SerialBspOps},
};
use nalgebra::Point3;

use crate::support::{approx_eq, block, sample_points};

fn unit_pair() -> (Solid<()>, Solid<()>) {
    let a = Solid::cube(1.0, None);
    let b = a.translate(0.5, 0.0, 0.0);
    (a, b)
}

#[test]
fn union() {
    let (a, b) = unit_pair();
    let u = a.union(&b);
    assert_relative_eq!(u.volume(), 1.5, epsilon = 1e-9);

    let bb = u.bounding_box();
    assert_relative_eq!(bb.mins, Point3::new(0.0, 0.0, 0.0));
    assert_relative_eq!(bb.maxs, Point3::new(1.5, 1.0, 1.0));
}

#[test]
fn subtract() {
    let (a, b) = unit_pair();
    let d = a.subtract(&b);
    assert_relative_eq!(d.volume(), 0.5, epsilon = 1e-9);
    assert_relative_eq!(d.bounding_box().maxs.x, 0.5, epsilon = 1e-9);
}

#[test]
fn intersect() {
    let (a, b) = unit_pair();
    let i = a.intersect(&b);
    assert_relative_eq!(i.volume(), 0.5, epsilon = 1e-9);
    let bb = i.bounding_box();
    assert_relative_eq!(bb.mins.x, 0.5, epsilon = 1e-9);
    assert_relative_eq!(bb.maxs.x, 1.0, epsilon = 1e-9);
}

#[test]
fn nested_difference_leaves_a_shell() {
    let big = block([-2.0; 3], [2.0; 3]);
    let small = block([-1.0; 3], [1.0; 3]);
    let shell = big.subtract(&small);
    assert_relative_eq!(shell.volume(), 64.0 - 8.0, epsilon = 1e-9);
    assert!(!shell.contains_point(&Point3::origin()));
    assert!(shell.contains_point(&Point3::new(1.5, 0.0, 0.0)));
}

#[test]
fn difference_is_disjoint_from_the_subtrahend() {
    let a = block([0.0; 3], [2.0; 3]);
    let b = block([1.0, -0.5, 0.5], [3.0, 1.5, 1.5]);
    let d = a.subtract(&b);
    for p in sample_points([-0.5; 3], [3.5; 3], 10) {
        if d.contains_point(&p) {
            assert!(!b.contains_point(&p), "{p} is in both");
            assert!(a.contains_point(&p), "{p} is outside the minuend");
        }
    }
}

#[test]
fn booleans_match_point_membership() {
    let a = block([0.0; 3], [2.0; 3]);
    let b = block([1.0, 0.5, -0.5], [3.0, 1.5, 1.5]);
    let (u, i) = (a.union(&b), a.intersect(&b));
    let (u_rev, i_rev) = (b.union(&a), b.intersect(&a));
    for p in sample_points([-0.5; 3], [3.5; 3], 10) {
        let (in_a, in_b) = (a.contains_point(&p), b.contains_point(&p));
        assert_eq!(u.contains_point(&p), in_a || in_b, "union at {p}");
        assert_eq!(i.contains_point(&p), in_a && in_b, "intersection at {p}");
        assert_eq!(u_rev.contains_point(&p), u.contains_point(&p));
        assert_eq!(i_rev.contains_point(&p), i.contains_point(&p));
    }
    assert_relative_eq!(u.volume(), u_rev.volume(), epsilon = 1e-9);
    assert_relative_eq!(i.volume(), i_rev.volume(), epsilon = 1e-9);
}

#[test]
fn self_operations() {
    let a = block([0.0; 3], [1.0; 3]);
    assert_relative_eq!(a.intersect(&a).volume(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(a.union(&a).volume(), 1.0, epsilon = 1e-9);

    let nothing = a.subtract(&a);
    assert!(approx_eq(nothing.volume(), 0.0, 1e-9));
    assert_relative_eq!(a.union(&nothing).volume(), 1.0, epsilon = 1e-9);
}

#[test]
fn inverse_is_an_involution() {
    let (a, b) = unit_pair();
    let u = a.union(&b);
    assert_eq!(u.inverse().inverse().polygons, u.polygons);
    assert_relative_eq!(u.inverse().volume(), -1.5, epsilon = 1e-9);
}

#[test]
fn results_are_already_simplified() {
    let (a, b) = unit_pair();
    let u = a.union(&b);
    let again = u.simplified();
    assert_eq!(again.polygons.len(), u.polygons.len());
    assert_relative_eq!(again.volume(), u.volume(), epsilon = 1e-12);
}

#[test]
fn shared_tags_survive() {
    let a = Solid::cube(1.0, Some("red"));
    let b = Solid::cube(1.0, Some("blue")).translate(0.5, 0.5, 0.0);
    let u = a.union(&b);
    assert!(u.polygons.iter().any(|p| p.shared() == Some(&"red")));
    assert!(u.polygons.iter().any(|p| p.shared() == Some(&"blue")));
    assert!(u.polygons.iter().all(|p| p.shared().is_some()));
}

#[test]
fn pivot_strategies_agree_on_volume() {
    let a = block([0.0; 3], [1.0; 3]);
    let b = block([0.5, 0.25, 0.0], [1.5, 1.25, 1.0]);
    let random = SerialBspOps::with_strategy(RandomPolygon::seeded(7));
    let balanced = SerialBspOps::with_strategy(BalancedSplittingStrategy::default());

    for (u, d, i) in [
        (a.union_with(&b, &random), a.subtract_with(&b, &random), a.intersect_with(&b, &random)),
        (a.union_with(&b, &balanced), a.subtract_with(&b, &balanced), a.intersect_with(&b, &balanced)),
    ] {
        assert_relative_eq!(u.volume(), 1.625, epsilon = 1e-9);
        assert_relative_eq!(d.volume(), 0.625, epsilon = 1e-9);
        assert_relative_eq!(i.volume(), 0.375, epsilon = 1e-9);
    }
}

#[test]
fn transforms() {
    let a: Solid<()> = Solid::cube(2.0, None);
    assert_relative_eq!(a.scale(1.0, 2.0, 0.5).volume(), 8.0, epsilon = 1e-9);
    assert_relative_eq!(a.scale(-1.0, 1.0, 1.0).volume(), 8.0, epsilon = 1e-9);

    let centered = a.center();
    assert_relative_eq!(centered.bounding_box().center(), Point3::origin(), epsilon = 1e-12);

    let turned = a.rotate(0.0, 0.0, 90.0);
    let bb = turned.bounding_box();
    assert_relative_eq!(bb.mins, Point3::new(-2.0, 0.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(bb.maxs, Point3::new(0.0, 2.0, 2.0), epsilon = 1e-9);
}
