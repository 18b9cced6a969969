//! Flat triangle-mesh buffers, the format solids are imported from and
//! exported to.
//!
//! A [`TriangleMesh`] is the usual renderable layout: parallel per-vertex
//! attribute arrays plus an index buffer in which every three indices form one
//! counter-clockwise triangle.

mod solid;

pub use solid::ExportedMesh;

use crate::errors::{MeshError, ValidationError};
use crate::float_types::{EPSILON, Real};
use crate::mesh::vertex::Color32;
use crate::traits::{is_mirroring, normal_matrix};
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<Point3<Real>>,
    pub normals: Vec<Vector3<Real>>,
    pub uvs: Vec<Vector2<Real>>,
    /// Per-vertex colors; empty means opaque white everywhere.
    pub colors: Vec<Color32>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that the buffers agree with each other and that every index is
    /// in range.
    pub fn validate(&self) -> Result<(), MeshError> {
        let len = self.positions.len();
        let check = |name: &'static str, found: usize| {
            if found == len {
                Ok(())
            } else {
                Err(MeshError::MismatchedBuffer {
                    name,
                    expected: len,
                    found,
                })
            }
        };
        check("normal", self.normals.len())?;
        check("uv", self.uvs.len())?;
        if !self.colors.is_empty() {
            check("color", self.colors.len())?;
        }

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(self.indices.len()));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= len) {
            return Err(MeshError::IndexOutOfRange {
                index: index as usize,
                len,
            });
        }
        Ok(())
    }

    /// Color of vertex `i`, white when the mesh has no colors.
    pub fn color(&self, i: usize) -> Color32 {
        self.colors.get(i).copied().unwrap_or(Color32::WHITE)
    }

    /// Iterate over the index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Build a mesh from logical positions and convex faces given as position
    /// indices (wound counter-clockwise seen from the front).
    ///
    /// Every face gets its own vertices with a flat normal and zero uv, and
    /// is fanned out from its first vertex.
    ///
    /// ```
    /// # use meshcsg::io::TriangleMesh;
    /// # use nalgebra::Point3;
    /// let square = [
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = TriangleMesh::from_faces(&square, &[&[0, 1, 2, 3]])?;
    /// assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    /// # Ok::<(), meshcsg::errors::MeshError>(())
    /// ```
    pub fn from_faces(positions: &[Point3<Real>], faces: &[&[usize]]) -> Result<Self, MeshError> {
        let mut total_vertices = 0;
        for face in faces {
            if face.len() < 3 {
                return Err(ValidationError::TooFewPoints(face.len()).into());
            }
            if let Some(&index) = face.iter().find(|&&i| i >= positions.len()) {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    len: positions.len(),
                });
            }
            total_vertices += face.len();
        }

        let mut mesh = TriangleMesh {
            positions: Vec::with_capacity(total_vertices),
            normals: Vec::with_capacity(total_vertices),
            uvs: Vec::with_capacity(total_vertices),
            colors: Vec::new(),
            indices: Vec::with_capacity(3 * (total_vertices - 2 * faces.len())),
        };

        for face in faces {
            let base = mesh.positions.len() as u32;
            for k in 0..face.len() as u32 - 2 {
                mesh.indices.extend([base, base + k + 1, base + k + 2]);
            }

            let (p0, p1, p2) = (positions[face[0]], positions[face[1]], positions[face[2]]);
            let normal = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(EPSILON)
                .unwrap_or_else(Vector3::zeros);
            for &i in face.iter() {
                mesh.positions.push(positions[i]);
                mesh.normals.push(normal);
                mesh.uvs.push(Vector2::zeros());
            }
        }

        Ok(mesh)
    }

    /// Paint every vertex with `color`.
    pub fn set_color(&mut self, color: Color32) {
        self.colors = vec![color; self.positions.len()];
    }

    /// Copy with positions mapped through `matrix` and normals through its
    /// inverse transpose. Mirroring matrices also reverse the triangle winding.
    pub fn transformed(&self, matrix: &Matrix4<Real>) -> TriangleMesh {
        let normal_matrix = normal_matrix(matrix);
        let indices = if is_mirroring(matrix) {
            self.indices
                .chunks_exact(3)
                .flat_map(|t| [t[0], t[2], t[1]])
                .collect()
        } else {
            self.indices.clone()
        };
        TriangleMesh {
            indices,
            positions: self.positions.iter().map(|p| matrix.transform_point(p)).collect(),
            normals: self
                .normals
                .iter()
                .map(|n| {
                    let mapped = normal_matrix * n;
                    mapped.try_normalize(EPSILON).unwrap_or(mapped)
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Copy with every position passed through `f` and the normals
    /// recalculated from the new geometry.
    pub fn map_positions(&self, f: impl Fn(Point3<Real>) -> Point3<Real>) -> TriangleMesh {
        let mut mesh = TriangleMesh {
            positions: self.positions.iter().map(|&p| f(p)).collect(),
            ..self.clone()
        };
        mesh.recalculate_normals();
        mesh
    }

    /// Area-weighted vertex normals from the triangles that use each vertex.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for [a, b, c] in self.triangles() {
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pb - pa).cross(&(pc - pa));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for n in &mut normals {
            *n = n.try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);
        }
        self.normals = normals;
    }

    /// Append `other`'s vertices and triangles to this mesh.
    pub fn append(&mut self, other: &TriangleMesh) {
        let base = self.positions.len() as u32;
        if !self.colors.is_empty() || !other.colors.is_empty() {
            self.colors.resize(self.positions.len(), Color32::WHITE);
            self.colors
                .extend((0..other.positions.len()).map(|i| other.color(i)));
        }
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}
