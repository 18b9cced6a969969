//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use meshcsg::{
    Solid,
    float_types::Real,
    mesh::{polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let verts: Vec<Vertex> = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts, None).expect("test polygon should be valid")
}

/// Axis-aligned box from `min` to `max`.
pub fn block(min: [Real; 3], max: [Real; 3]) -> Solid<()> {
    use meshcsg::CSGOps;
    Solid::cuboid(max[0] - min[0], max[1] - min[1], max[2] - min[2], None).translate(min[0], min[1], min[2])
}

/// A regular grid of sample points over `[min, max]`, offset from the cell
/// corners so that no sample lands on an axis-aligned face at a round
/// coordinate.
pub fn sample_points(min: [Real; 3], max: [Real; 3], per_axis: usize) -> Vec<Point3<Real>> {
    let step = |axis: usize| (max[axis] - min[axis]) / per_axis as Real;
    let at = |axis: usize, i: usize| min[axis] + (i as Real + 0.37) * step(axis);
    let mut points = Vec::with_capacity(per_axis.pow(3));
    for i in 0..per_axis {
        for j in 0..per_axis {
            for k in 0..per_axis {
                points.push(Point3::new(at(0, i), at(1, j), at(2, k)));
            }
        }
    }
    points
}
