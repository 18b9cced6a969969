//! Validation and mesh-boundary errors

use crate::float_types::Real;
use nalgebra::Point3;

/// Issues found while constructing polygons.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A polygon needs at least three vertices
    #[error("(TooFewPoints) a polygon needs at least 3 vertices, got {0}")]
    TooFewPoints(usize),
    /// The first three vertices are colinear or coincident, so no plane can be derived
    #[error("(DegeneratePolygon) vertices do not define a plane at: {0}")]
    DegeneratePolygon(Point3<Real>),
    /// The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) the coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
}

/// Errors raised at the triangle-mesh import/export boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A triangle refers to a vertex that does not exist
    #[error("index {index} is out of range (vertex count = {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// The index buffer does not describe whole triangles
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotMultipleOfThree(usize),
    /// An attribute buffer does not match the position buffer
    #[error("{name} buffer has {found} entries, expected {expected}")]
    MismatchedBuffer {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    /// There is nothing to export
    #[error("solid has no polygons")]
    EmptySolid,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
