//! Primitive solids

use crate::errors::MeshError;
use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::mesh::solid::Solid;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

impl<S: Clone + PartialEq + Send + Sync + Debug> Solid<S> {
    /// Axis-aligned box spanning `(0,0,0)` to `(width, length, height)`,
    /// six quads wound counter-clockwise seen from outside.
    ///
    /// ```
    /// # use meshcsg::Solid;
    /// let slab: Solid<()> = Solid::cuboid(2.0, 1.0, 0.5, None);
    /// assert_eq!(slab.polygons.len(), 6);
    /// assert!((slab.volume() - 1.0).abs() < 1e-12);
    /// ```
    pub fn cuboid(width: Real, length: Real, height: Real, shared: Option<S>) -> Solid<S> {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),       // 0: origin
            Point3::new(width, 0.0, 0.0),     // 1: +X
            Point3::new(width, length, 0.0),  // 2: +X+Y
            Point3::new(0.0, length, 0.0),    // 3: +Y
            Point3::new(0.0, 0.0, height),    // 4: +Z
            Point3::new(width, 0.0, height),  // 5: +X+Z
            Point3::new(width, length, height), // 6: +X+Y+Z
            Point3::new(0.0, length, height), // 7: +Y+Z
        ];

        let faces = [
            ([0, 3, 2, 1], -Vector3::z()), // bottom
            ([4, 5, 6, 7], Vector3::z()),  // top
            ([0, 1, 5, 4], -Vector3::y()), // front
            ([3, 7, 6, 2], Vector3::y()),  // back
            ([0, 4, 7, 3], -Vector3::x()), // left
            ([1, 2, 6, 5], Vector3::x()),  // right
        ];

        let polygons = faces
            .iter()
            .map(|(indices, normal)| {
                let plane = Plane {
                    normal: *normal,
                    w: normal.dot(&corners[indices[0]].coords),
                };
                let vertices = indices.iter().map(|&i| Vertex::new(corners[i], *normal)).collect();
                Polygon::from_parts(vertices, plane, shared.clone())
            })
            .collect();

        Solid { polygons }
    }

    /// Cube of side `size` with one corner at the origin.
    pub fn cube(size: Real, shared: Option<S>) -> Solid<S> {
        Self::cuboid(size, size, size, shared)
    }

    /// Build a solid from a point list and faces given as point indices.
    ///
    /// Each face is a convex polygon wound counter-clockwise seen from
    /// outside, and gets a flat normal. Faces with fewer than three indices
    /// are skipped.
    pub fn polyhedron(
        points: &[[Real; 3]],
        faces: &[&[usize]],
        shared: Option<S>,
    ) -> Result<Solid<S>, MeshError> {
        let mut polygons = Vec::with_capacity(faces.len());

        for face in faces {
            if face.len() < 3 {
                continue;
            }
            if let Some(&index) = face.iter().find(|&&i| i >= points.len()) {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    len: points.len(),
                });
            }

            let positions: Vec<Point3<Real>> =
                face.iter().map(|&i| Point3::from(points[i])).collect();
            let plane = Plane::from_points(&positions[0], &positions[1], &positions[2])?;
            let vertices = positions
                .into_iter()
                .map(|pos| Vertex::new(pos, plane.normal))
                .collect();
            polygons.push(Polygon::new(vertices, shared.clone())?);
        }

        Ok(Solid { polygons })
    }

    /// Regular octahedron with its vertices at distance `radius` on the axes.
    pub fn octahedron(radius: Real, shared: Option<S>) -> Result<Solid<S>, MeshError> {
        let points = [
            [radius, 0.0, 0.0],
            [-radius, 0.0, 0.0],
            [0.0, radius, 0.0],
            [0.0, -radius, 0.0],
            [0.0, 0.0, radius],
            [0.0, 0.0, -radius],
        ];
        let faces: [&[usize]; 8] = [
            &[0, 2, 4],
            &[2, 1, 4],
            &[1, 3, 4],
            &[3, 0, 4],
            &[5, 2, 0],
            &[5, 1, 2],
            &[5, 3, 1],
            &[5, 0, 3],
        ];
        Self::polyhedron(&points, &faces, shared)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ValidationError;
    use approx::assert_relative_eq;

    #[test]
    fn cuboid_faces_point_outward() {
        let solid = Solid::<()>::cuboid(2.0, 3.0, 4.0, None);
        let center = Point3::new(1.0, 1.5, 2.0);
        for p in &solid.polygons {
            assert!(p.plane().signed_distance(&center) < 0.0);
            assert_relative_eq!(p.plane().normal, p.vertices()[0].normal);
        }
        assert_relative_eq!(solid.volume(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_face_is_rejected() {
        let err = Solid::<()>::polyhedron(&[[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]], &[&[0, 1, 2]], None);
        assert!(matches!(
            err,
            Err(MeshError::Validation(ValidationError::DegeneratePolygon(_)))
        ));
    }

    #[test]
    fn octahedron_volume() {
        let oct = Solid::<()>::octahedron(1.0, None).unwrap();
        assert_eq!(oct.polygons.len(), 8);
        assert_relative_eq!(oct.volume(), 4.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn polyhedron_checks_indices() {
        let err = Solid::<()>::polyhedron(&[[0.0; 3]; 3], &[&[0, 1, 5]], None);
        assert_eq!(err.unwrap_err(), MeshError::IndexOutOfRange { index: 5, len: 3 });
    }
}
