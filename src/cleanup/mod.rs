//! Post-processing passes over [`TriangleMesh`] buffers.
//!
//! BSP booleans leave behind duplicated vertices, T-junction slivers and,
//! when meshes are merged, coincident faces. None of this affects the shape,
//! but it bloats the output. Every pass returns how much it removed so the
//! passes can be iterated to a fixed point ([`TriangleMesh::remove_garbage_geometry`]).
//!
//! The passes expect a mesh that passes [`TriangleMesh::validate`].

mod graph;

use crate::float_types::{Real, tolerances};
use crate::io::TriangleMesh;
use graph::Graph;
use hashbrown::{HashMap, HashSet};
use nalgebra::{Matrix4, Point3};

/// Spatial hash over cells of one tolerance width. A point within the
/// tolerance of another always lands in one of the 27 cells around it.
struct WeldGrid {
    cell: Real,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
}

impl WeldGrid {
    fn new(cell: Real) -> Self {
        WeldGrid { cell, cells: HashMap::new() }
    }

    fn key(&self, p: &Point3<Real>) -> (i64, i64, i64) {
        let q = |x: Real| (x / self.cell).floor() as i64;
        (q(p.x), q(p.y), q(p.z))
    }

    fn insert(&mut self, p: &Point3<Real>, i: usize) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(i);
    }

    /// Lowest inserted index near `p` that satisfies `accept`.
    fn find(&self, p: &Point3<Real>, mut accept: impl FnMut(usize) -> bool) -> Option<usize> {
        let (x, y, z) = self.key(p);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&(x + dx, y + dy, z + dz)) else {
                        continue;
                    };
                    for &j in bucket {
                        if best.is_none_or(|b| j < b) && accept(j) {
                            best = Some(j);
                        }
                    }
                }
            }
        }
        best
    }
}

impl TriangleMesh {
    /// Merge vertices whose position, color, normal and uv all agree, then
    /// drop the vertices nothing refers to any more.
    ///
    /// Positions and uvs are compared per component, normals by their dot
    /// product. Returns the number of vertices removed.
    pub fn dedup_vertices(&mut self) -> usize {
        let eps = tolerances().cleanup_weld;
        let near = |a: &[Real], b: &[Real]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < eps);

        let n = self.positions.len();
        let mut old_to_new: Vec<usize> = (0..n).collect();
        let mut grid = WeldGrid::new(eps);
        let mut dups = 0;
        for i in 0..n {
            let twin = grid.find(&self.positions[i], |j| {
                near(self.positions[i].coords.as_slice(), self.positions[j].coords.as_slice())
                    && self.color(i) == self.color(j)
                    && (self.normals[i].dot(&self.normals[j]) - 1.0).abs() < eps
                    && near(self.uvs[i].as_slice(), self.uvs[j].as_slice())
            });
            match twin {
                Some(j) => {
                    old_to_new[i] = j;
                    dups += 1;
                },
                None => grid.insert(&self.positions[i], i),
            }
        }

        if dups == 0 {
            return 0;
        }
        for index in &mut self.indices {
            *index = old_to_new[*index as usize] as u32;
        }
        self.remove_unused_vertices()
    }

    /// Compact every attribute buffer down to the vertices the index buffer
    /// uses. Returns the number of vertices removed.
    pub fn remove_unused_vertices(&mut self) -> usize {
        let mut used = vec![false; self.positions.len()];
        for &i in &self.indices {
            used[i as usize] = true;
        }
        let removed = used.iter().filter(|&&u| !u).count();
        if removed == 0 {
            return 0;
        }

        let mut old_to_new = vec![u32::MAX; used.len()];
        let mut next = 0u32;
        for (i, _) in used.iter().enumerate().filter(|&(_, &u)| u) {
            old_to_new[i] = next;
            next += 1;
        }

        fn compact<T>(buffer: &mut Vec<T>, used: &[bool]) {
            let mut keep = used.iter();
            buffer.retain(|_| keep.next().copied().unwrap_or(false));
        }
        compact(&mut self.positions, &used);
        compact(&mut self.normals, &used);
        compact(&mut self.uvs, &used);
        if !self.colors.is_empty() {
            compact(&mut self.colors, &used);
        }
        for index in &mut self.indices {
            *index = old_to_new[*index as usize];
        }

        log::debug!("removed {removed} unused vertices");
        removed
    }

    /// Find pairs of triangles over the same three (welded) positions. A
    /// pair facing the same way collapses to one triangle, a pair facing
    /// opposite ways cancels out entirely.
    ///
    /// Returns the number of triangles removed. Vertices are left in place;
    /// follow up with [`remove_unused_vertices`](Self::remove_unused_vertices).
    pub fn remove_internal_faces(&mut self) -> usize {
        let weld = tolerances().internal_face_weld;
        let weld_sq = weld * weld;

        let mut old_to_new: Vec<usize> = (0..self.positions.len()).collect();
        let mut grid = WeldGrid::new(weld);
        for (i, p) in self.positions.iter().enumerate() {
            if let Some(j) = grid.find(p, |j| (p - self.positions[j]).norm_squared() < weld_sq) {
                old_to_new[i] = old_to_new[j];
            }
            grid.insert(p, i);
        }

        let welded: Vec<[usize; 3]> = self.triangles().map(|t| t.map(|v| old_to_new[v])).collect();
        let facing = |[a, b, c]: [usize; 3]| {
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            (pb - pa).cross(&(pc - pa))
        };

        // Triangles keyed by their sorted welded corners. Each one is matched
        // against the first earlier copy that is still live.
        let mut seen: HashMap<[usize; 3], Vec<usize>> = HashMap::new();
        let mut doomed: HashSet<usize> = HashSet::new();
        for (i, tri) in welded.iter().enumerate() {
            let mut key = *tri;
            key.sort_unstable();
            let earlier = seen.entry(key).or_default();
            if let Some(&j) = earlier.iter().find(|j| !doomed.contains(*j)) {
                doomed.insert(i);
                if facing(*tri).dot(&facing(welded[j])) < 0.0 {
                    doomed.insert(j);
                }
            }
            earlier.push(i);
        }

        if doomed.is_empty() {
            return 0;
        }
        let indices = self
            .indices
            .chunks_exact(3)
            .enumerate()
            .filter(|(i, _)| !doomed.contains(i))
            .flat_map(|(_, t)| t.iter().copied())
            .collect();
        self.indices = indices;

        log::debug!("removed {} internal faces", doomed.len());
        doomed.len()
    }

    /// Merge coplanar triangles that only exist because of a vertex sitting
    /// in the middle of a straight edge. Returns the number of reductions.
    pub fn remove_internal_vertices(&mut self) -> usize {
        let mut graph = Graph::new(&self.positions, self.triangles());
        let count = graph.remove_internal_vertices();
        if count > 0 {
            log::debug!(
                "{count} graph reductions, {} -> {} triangles",
                self.triangle_count(),
                graph.face_count()
            );
            self.indices = graph.indices();
        }
        count
    }

    /// Run vertex dedup, internal-vertex removal and unused-vertex removal
    /// until none of them finds anything left to do.
    pub fn remove_garbage_geometry(&mut self) {
        let (vertices, triangles) = (self.vertex_count(), self.triangle_count());
        let mut passes = 0;
        loop {
            passes += 1;
            let mut accum = self.dedup_vertices();
            let reduced = self.remove_internal_vertices();
            accum += reduced;
            if reduced > 0 {
                accum += self.remove_unused_vertices();
            }
            if accum == 0 {
                break;
            }
        }
        log::debug!(
            "cleanup: {vertices} -> {} vertices, {triangles} -> {} triangles in {passes} passes",
            self.vertex_count(),
            self.triangle_count()
        );
    }

    /// Combine several meshes, each placed by its own transform, into one
    /// and drop the faces where they touch.
    pub fn flatten<'a>(parts: impl IntoIterator<Item = (&'a TriangleMesh, &'a Matrix4<Real>)>) -> TriangleMesh {
        let mut combined = TriangleMesh::new();
        for (mesh, transform) in parts {
            combined.append(&mesh.transformed(transform));
        }
        combined.remove_internal_faces();
        combined.remove_unused_vertices();
        combined
    }

    /// `true` if every edge, compared by quantized position, is used by
    /// exactly two triangles.
    pub fn is_closed(&self) -> bool {
        const QUANTIZATION_FACTOR: Real = 1e6;

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        struct QuantizedPoint(i64, i64, i64);

        fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
            QuantizedPoint(
                (p.x * QUANTIZATION_FACTOR).round() as i64,
                (p.y * QUANTIZATION_FACTOR).round() as i64,
                (p.z * QUANTIZATION_FACTOR).round() as i64,
            )
        }

        let mut edge_counts: HashMap<(QuantizedPoint, QuantizedPoint), u32> = HashMap::new();
        for tri in self.triangles() {
            for (i0, i1) in [(0, 1), (1, 2), (2, 0)] {
                let p0 = quantize_point(&self.positions[tri[i0]]);
                let p1 = quantize_point(&self.positions[tri[i1]]);
                let key = if p0 < p1 { (p0, p1) } else { (p1, p0) };
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }
        !edge_counts.is_empty() && edge_counts.values().all(|&count| count == 2)
    }
}
