//! Conversion between [`TriangleMesh`] buffers and [`Solid`]s.

use super::TriangleMesh;
use crate::errors::{MeshError, ValidationError};
use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::solid::Solid;
use crate::mesh::vertex::Vertex;
use crate::traits::{is_mirroring, normal_matrix};
use nalgebra::Matrix4;
use std::fmt::Debug;

/// Result of exporting a solid: the triangle buffers plus the single
/// material tag for the whole mesh (taken from the first polygon).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedMesh<S> {
    pub mesh: TriangleMesh,
    pub material: Option<S>,
}

impl<S: Clone + PartialEq + Send + Sync + Debug> Solid<S> {
    /// Import a triangle mesh placed in the world by `transform`.
    ///
    /// Every triangle becomes one polygon tagged with `shared`. Positions go
    /// through `transform`, normals through its inverse transpose, and a
    /// mirroring transform reverses each triangle so it stays front facing.
    /// Triangles whose corners do not span a plane are skipped with a
    /// warning.
    pub fn from_triangle_mesh(
        mesh: &TriangleMesh,
        transform: &Matrix4<Real>,
        shared: Option<S>,
    ) -> Result<Solid<S>, MeshError> {
        mesh.validate()?;

        let normal_matrix = normal_matrix(transform);
        let mirror = is_mirroring(transform);
        let vertex = |i: usize| {
            let normal = normal_matrix * mesh.normals[i];
            Vertex::new(
                transform.transform_point(&mesh.positions[i]),
                normal.try_normalize(EPSILON).unwrap_or(normal),
            )
            .with_color(mesh.color(i))
            .with_uv(mesh.uvs[i])
        };

        let mut polygons = Vec::with_capacity(mesh.triangle_count());
        let mut skipped = 0usize;
        for (face, [a, b, c]) in mesh.triangles().enumerate() {
            let corners = if mirror { [a, c, b] } else { [a, b, c] };
            match Polygon::new(corners.iter().map(|&i| vertex(i)).collect(), shared.clone()) {
                Ok(polygon) => polygons.push(polygon),
                Err(ValidationError::DegeneratePolygon(at)) => {
                    log::warn!("skipping degenerate triangle {face} at {at}");
                    skipped += 1;
                },
                Err(e) => return Err(e.into()),
            }
        }

        log::debug!(
            "imported {} triangles ({skipped} skipped)",
            mesh.triangle_count()
        );
        Ok(Solid { polygons })
    }

    /// Fan-triangulate every polygon into flat buffers.
    ///
    /// Fails with [`MeshError::EmptySolid`] when there is nothing to export.
    pub fn to_triangle_mesh(&self) -> Result<ExportedMesh<S>, MeshError> {
        let Some(first) = self.polygons.first() else {
            log::warn!("export of an empty solid");
            return Err(MeshError::EmptySolid);
        };

        let vertex_count: usize = self.polygons.iter().map(|p| p.vertices().len()).sum();
        let mut mesh = TriangleMesh {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            colors: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(3 * (vertex_count - 2 * self.polygons.len())),
        };

        for polygon in &self.polygons {
            let base = mesh.positions.len() as u32;
            let n = polygon.vertices().len() as u32;
            for i in 0..n - 2 {
                mesh.indices.extend([base, base + 1 + i, base + 2 + i]);
            }
            for v in polygon.vertices() {
                mesh.positions.push(v.pos);
                mesh.normals.push(v.normal);
                mesh.uvs.push(v.uv);
                mesh.colors.push(v.color);
            }
        }

        Ok(ExportedMesh {
            mesh,
            material: first.shared().cloned(),
        })
    }

    /// [`to_triangle_mesh`](Self::to_triangle_mesh) followed by
    /// [`TriangleMesh::remove_garbage_geometry`], which welds the per-polygon
    /// vertices and folds away the slivers left by splitting.
    pub fn to_triangle_mesh_cleaned(&self) -> Result<ExportedMesh<S>, MeshError> {
        let mut exported = self.to_triangle_mesh()?;
        exported.mesh.remove_garbage_geometry();
        Ok(exported)
    }
}
