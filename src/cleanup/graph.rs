//! Triangle adjacency graph used to undo the sliver triangles left behind by
//! repeated BSP splitting.
//!
//! Two triangles are *adjacent* along an edge when they lie on approximately
//! the same plane and traverse that edge's two vertex indices in opposite
//! order. Reductions only ever merge adjacent triangles:
//!
//! ```text
//!   triangle pair                     quad triple
//!
//!   o0 ------ v ------ o1             ua ------ v ------ ub
//!     \      |      /                 |  \     |     /  |
//!       \    |    /          ==>      |    \ t0|   /    |
//!         \  |  /                     | t1   \ | /   t2 |
//!           v1                        va ---------------vb
//! ```
//!
//! In both cases `v` sits on the straight line between two opposing vertices,
//! so it can be dropped from the surface.

use crate::float_types::{Real, tolerances};
use crate::mesh::plane::Plane;
use nalgebra::{Point3, Vector3};

/// `(face, edge)` address of a half-edge. Edge `k` of a face runs from
/// `verts[k]` to `verts[(k + 1) % 3]`.
type EdgeRef = (usize, usize);

#[derive(Debug, Clone)]
struct Triangle {
    verts: [usize; 3],
    /// `None` for triangles too thin to span a plane; those never pair.
    plane: Option<Plane>,
    adj: [Option<EdgeRef>; 3],
}

impl Triangle {
    const fn edge(&self, k: usize) -> (usize, usize) {
        (self.verts[k], self.verts[(k + 1) % 3])
    }

    const fn opposing(&self, k: usize) -> usize {
        self.verts[(k + 2) % 3]
    }
}

/// Half-edge adjacency over the triangles of an index buffer.
///
/// Faces live in slots that are emptied on removal, so an [`EdgeRef`] stays
/// valid for as long as its face does.
pub(crate) struct Graph<'a> {
    positions: &'a [Point3<Real>],
    faces: Vec<Option<Triangle>>,
    /// Paired half-edges in the order they were discovered.
    adj_edges: Vec<EdgeRef>,
}

impl<'a> Graph<'a> {
    pub(crate) fn new(positions: &'a [Point3<Real>], triangles: impl Iterator<Item = [usize; 3]>) -> Self {
        let mut graph = Graph {
            positions,
            faces: Vec::new(),
            adj_edges: Vec::new(),
        };
        for verts in triangles {
            graph.add(verts);
        }
        graph
    }

    /// Number of live faces.
    pub(crate) fn face_count(&self) -> usize {
        self.faces.iter().flatten().count()
    }

    /// Index buffer of the live faces, in slot order.
    pub(crate) fn indices(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flatten()
            .flat_map(|t| t.verts.map(|v| v as u32))
            .collect()
    }

    /// Keep merging triangle pairs and quad triples until neither applies.
    /// Returns the number of reductions made.
    pub(crate) fn remove_internal_vertices(&mut self) -> usize {
        let mut count = 0;
        while self.reduce_triangle() || self.reduce_quad() {
            count += 1;
        }
        count
    }

    fn face(&self, f: usize) -> Option<&Triangle> {
        self.faces.get(f)?.as_ref()
    }

    fn add(&mut self, verts: [usize; 3]) {
        let [a, b, c] = verts.map(|v| self.positions[v]);
        let plane = Plane::from_points(&a, &b, &c).ok();
        let new = self.faces.len();
        self.faces.push(Some(Triangle {
            verts,
            plane,
            adj: [None; 3],
        }));

        let Some(plane) = plane else {
            return;
        };
        let eps = tolerances().plane;
        for other in 0..new {
            let Some(tri) = &self.faces[other] else {
                continue;
            };
            if !tri.plane.is_some_and(|p| p.approx_eq(&plane, eps)) {
                continue;
            }
            for ei in 0..3 {
                for ej in 0..3 {
                    self.try_pair((other, ei), (new, ej));
                }
            }
        }
    }

    /// Pair two unpaired half-edges that run over the same vertices in
    /// opposite directions.
    fn try_pair(&mut self, (fa, ka): EdgeRef, (fb, kb): EdgeRef) {
        let (Some(a), Some(b)) = (self.face(fa), self.face(fb)) else {
            return;
        };
        if a.adj[ka].is_some() || b.adj[kb].is_some() {
            return;
        }
        let (a0, a1) = a.edge(ka);
        let (b0, b1) = b.edge(kb);
        if a0 != b1 || a1 != b0 {
            return;
        }
        if let Some(t) = self.faces[fa].as_mut() {
            t.adj[ka] = Some((fb, kb));
        }
        if let Some(t) = self.faces[fb].as_mut() {
            t.adj[kb] = Some((fa, ka));
        }
        self.adj_edges.push((fa, ka));
        self.adj_edges.push((fb, kb));
    }

    fn remove(&mut self, f: usize) {
        let Some(tri) = self.faces[f].take() else {
            return;
        };
        for (k, adj) in tri.adj.iter().enumerate() {
            if let Some((g, kg)) = *adj {
                if let Some(other) = self.faces[g].as_mut() {
                    other.adj[kg] = None;
                }
                self.adj_edges.retain(|&e| e != (f, k) && e != (g, kg));
            }
        }
    }

    /// Is `p` on the straight segment between `p0` and `p1`?
    fn is_between(&self, p: usize, p0: usize, p1: usize) -> bool {
        let eps = tolerances().cleanup_colinear;
        let p = self.positions[p];
        let (Some(u), Some(v)) = (
            (self.positions[p0] - p).try_normalize(Real::EPSILON),
            (self.positions[p1] - p).try_normalize(Real::EPSILON),
        ) else {
            return false;
        };
        u.cross(&v).norm_squared() < eps * eps && u.dot(&v) < 0.0
    }

    /// Merge two adjacent triangles whose shared edge starts at a vertex
    /// lying between their opposing vertices.
    fn reduce_triangle(&mut self) -> bool {
        let found = self.adj_edges.iter().find_map(|&(f, k)| {
            let tri = self.face(f)?;
            let (g, kg) = tri.adj[k]?;
            let (v, v1) = tri.edge(k);
            let o0 = tri.opposing(k);
            let o1 = self.face(g)?.opposing(kg);
            self.is_between(v, o0, o1).then_some((f, g, [o1, v1, o0]))
        });

        match found {
            Some((f, g, merged)) => {
                self.remove(f);
                self.remove(g);
                self.add(merged);
                true
            },
            None => false,
        }
    }

    /// Find a triangle with neighbors on both edges meeting at one of its
    /// corners, where that corner lies between the neighbors' opposing
    /// vertices, and replace the three triangles with a quad.
    fn reduce_quad(&mut self) -> bool {
        let found = self.faces.iter().enumerate().find_map(|(t0, tri)| {
            let tri = tri.as_ref()?;
            (0..3).find_map(|i| {
                let (ea, eb) = ((i + 2) % 3, i);
                let (t1, ka) = tri.adj[ea]?;
                let (t2, kb) = tri.adj[eb]?;
                if t1 == t2 || t1 == t0 || t2 == t0 {
                    return None;
                }
                let ua = self.face(t1)?.opposing(ka);
                let ub = self.face(t2)?.opposing(kb);
                self.is_between(tri.verts[i], ua, ub).then(|| {
                    let va = tri.verts[(i + 2) % 3];
                    let vb = tri.verts[(i + 1) % 3];
                    (t0, t1, t2, [ua, va, ub, vb])
                })
            })
        });

        let Some((t0, t1, t2, [ua, va, ub, vb])) = found else {
            return false;
        };
        self.remove(t0);
        self.remove(t1);
        self.remove(t2);

        // Draw the diagonal through the concave corner, if there is one.
        let positions = self.positions;
        let p = |v: usize| positions[v];
        let c1: Vector3<Real> = (p(va) - p(ua)).cross(&(p(ub) - p(ua)));
        let c2 = (p(ub) - p(vb)).cross(&(p(va) - p(vb)));
        if c1.dot(&c2) < 0.0 {
            self.add([va, ua, vb]);
            self.add([ub, vb, ua]);
        } else {
            self.add([va, ua, ub]);
            self.add([va, ub, vb]);
        }
        true
    }
}
