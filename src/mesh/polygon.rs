//! Struct and functions for working with planar, convex `Polygon`s

use crate::errors::ValidationError;
use crate::float_types::{EPSILON, Real, tolerances};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// A polygon, defined by an ordered list of coplanar vertices.
///
/// - The winding (right-hand rule over the first three vertices) gives the
///   front side.
/// - `S` is the type of the opaque `shared` tag (typically a material
///   handle). The tag is only ever compared for equality.
///
/// The plane is derived once, when the polygon is built from raw vertices.
/// Polygons produced from an existing one (split fragments, joins,
/// simplification, flips) carry the parent's plane along instead of
/// re-deriving it from vertices that may have become nearly colinear.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    vertices: Vec<Vertex>,
    plane: Plane,
    shared: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.shared == other.shared
    }
}

impl<S: Clone> Polygon<S> {
    /// Create a polygon from vertices.
    ///
    /// ```
    /// # use meshcsg::mesh::{polygon::Polygon, vertex::Vertex};
    /// # use nalgebra::{Point3, Vector3};
    /// let tri: Polygon<()> = Polygon::new(
    ///     vec![
    ///         Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
    ///         Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
    ///         Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
    ///     ],
    ///     None,
    /// )?;
    /// assert_eq!(tri.plane().normal, Vector3::z());
    /// # Ok::<(), meshcsg::errors::ValidationError>(())
    /// ```
    pub fn new(vertices: Vec<Vertex>, shared: Option<S>) -> Result<Self, ValidationError> {
        if vertices.len() < 3 {
            return Err(ValidationError::TooFewPoints(vertices.len()));
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidCoordinate(bad.pos));
        }
        let plane = Plane::from_vertices(&vertices)?;
        Ok(Polygon {
            vertices,
            plane,
            shared,
        })
    }

    /// Assemble a polygon whose plane is already known.
    pub(crate) const fn from_parts(vertices: Vec<Vertex>, plane: Plane, shared: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            shared,
        }
    }

    /// A new polygon on this polygon's plane, with this polygon's tag.
    pub(crate) fn fragment(&self, vertices: Vec<Vertex>) -> Polygon<S> {
        Polygon {
            vertices,
            plane: self.plane,
            shared: self.shared.clone(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The plane through the first three vertices, as derived on construction.
    pub const fn plane(&self) -> &Plane {
        &self.plane
    }

    pub const fn shared(&self) -> Option<&S> {
        self.shared.as_ref()
    }

    pub fn set_shared(&mut self, shared: Option<S>) {
        self.shared = shared;
    }

    /// Return an iterator over paired vertices each forming an edge of the polygon
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices.iter().zip(self.vertices.iter().cycle().skip(1))
    }

    /// Reverses winding order, flips vertices normals, and flips the plane normal
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Flipped copy; `p.flipped().flipped() == p`.
    pub fn flipped(&self) -> Polygon<S> {
        Polygon {
            vertices: self.vertices.iter().rev().map(Vertex::flipped).collect(),
            plane: self.plane.flipped(),
            shared: self.shared.clone(),
        }
    }

    /// `true` if two cyclically-adjacent vertices coincide.
    pub fn is_degenerate(&self) -> bool {
        let weld = tolerances().weld;
        self.edges().any(|(a, b)| a.coincides_with(b, weld))
    }

    /// `true` if every corner turns the same way as the first one.
    pub fn is_convex(&self) -> bool {
        let v = &self.vertices;
        let n = v.len();
        let c0 = (v[1].pos - v[0].pos).cross(&(v[2].pos - v[0].pos));
        (1..n).all(|i| {
            let p0 = v[i].pos;
            let p1 = v[(i + 1) % n].pos;
            let p2 = v[(i + 2) % n].pos;
            (p1 - p0).cross(&(p2 - p0)).dot(&c0) >= 0.0
        })
    }

    /// Remove vertices whose two incident edges are parallel, comparing all
    /// attributes only through position. Never goes below three vertices.
    pub fn simplified(&self) -> Polygon<S> {
        let eps = tolerances().colinear;
        let eps_sq = eps * eps;
        let mut verts = self.vertices.clone();

        loop {
            let before = verts.len();
            let mut i = 0;
            while verts.len() > 3 && i < verts.len() {
                let n = verts.len();
                let v = verts[i].pos;
                let d0 = (verts[(i + n - 1) % n].pos - v)
                    .try_normalize(Real::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                let d1 = (verts[(i + 1) % n].pos - v)
                    .try_normalize(Real::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                if d0.cross(&d1).norm_squared() < eps_sq {
                    verts.remove(i);
                } else {
                    i += 1;
                }
            }
            if verts.len() == before || verts.len() <= 3 {
                break;
            }
        }

        self.fragment(verts)
    }

    /// Fan triangulation `(0, i+1, i+2)`; exact for convex polygons.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let v = &self.vertices;
        (1..v.len() - 1).map(|i| [v[0], v[i], v[i + 1]]).collect()
    }

    /// Map every vertex through `matrix`, normals through `normal_matrix`
    /// (the inverse transpose of its linear part). A `mirror`ing transform
    /// reverses the winding so that it keeps agreeing with the mapped plane.
    pub(crate) fn transformed(
        &self,
        matrix: &Matrix4<Real>,
        normal_matrix: &Matrix3<Real>,
        mirror: bool,
    ) -> Polygon<S> {
        let map_normal = |n: &Vector3<Real>| {
            let mapped = normal_matrix * n;
            mapped.try_normalize(EPSILON).unwrap_or(mapped)
        };

        let mut vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| Vertex {
                pos: matrix.transform_point(&v.pos),
                normal: map_normal(&v.normal),
                ..*v
            })
            .collect();
        if mirror {
            vertices.reverse();
        }

        let on_plane = matrix.transform_point(&Point3::from(self.plane.normal * self.plane.w));
        let normal = map_normal(&self.plane.normal);
        Polygon {
            vertices,
            plane: Plane {
                normal,
                w: normal.dot(&on_plane.coords),
            },
            shared: self.shared.clone(),
        }
    }

    /// Area via Newell's method, signed positive when the winding agrees
    /// with the plane normal.
    pub fn area(&self) -> Real {
        let sum = self
            .edges()
            .fold(Vector3::zeros(), |acc, (a, b)| acc + a.pos.coords.cross(&b.pos.coords));
        0.5 * sum.dot(&self.plane.normal)
    }
}

impl<S: Clone + PartialEq> Polygon<S> {
    /// Attempt to merge this polygon with `other` along a common edge.
    ///
    /// The two polygons must carry the same tag, lie on approximately the
    /// same plane, and share an edge traversed in opposite directions
    /// (`self[i] ≈ other[j+1]`, `self[i+1] ≈ other[j]`). The splice walks
    /// `self` from `i+1` around to `i`, then `other` from `j+2` to `j-1`,
    /// and is accepted only if the simplified result is convex.
    pub fn try_join(&self, other: &Polygon<S>) -> Option<Polygon<S>> {
        if std::ptr::eq(self, other) || self.shared != other.shared {
            return None;
        }
        let tol = tolerances();
        if !self.plane.approx_eq(&other.plane, tol.plane) {
            return None;
        }

        let (a, b) = (&self.vertices, &other.vertices);
        let (n, m) = (a.len(), b.len());
        for i in 0..n {
            let i1 = (i + 1) % n;
            for j in 0..m {
                let j1 = (j + 1) % m;
                if !(a[i].coincides_with(&b[j1], tol.weld) && a[i1].coincides_with(&b[j], tol.weld)) {
                    continue;
                }

                let mut spliced = Vec::with_capacity(n + m - 2);
                spliced.extend((0..n).map(|k| a[(i1 + k) % n]));
                spliced.extend((1..m - 1).map(|k| b[(j1 + k) % m]));

                let joined = self.fragment(spliced).simplified();
                if joined.is_convex() {
                    return Some(joined);
                }
            }
        }
        None
    }
}
