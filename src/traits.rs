use crate::aabb::Aabb;
use crate::float_types::Real;
use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// Boolean operations + transformations
pub trait CSGOps: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn subtract(&self, other: &Self) -> Self;
    fn intersect(&self, other: &Self) -> Self;
    /// Swap solid and empty space.
    fn inverse(&self) -> Self;
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Returns a new Self translated so that its bounding-box center is at the origin.
    fn center(&self) -> Self {
        let center = self.bounding_box().center();
        self.translate(-center.x, -center.y, -center.z)
    }

    /// Rotates by x_deg, y_deg, z_deg, applied in that order about the fixed axes.
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Scales by sx, sy, sz. Negative factors mirror.
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }
}

/// Inverse transpose of the linear part of `matrix`, which maps normals.
/// Falls back to identity (with a warning) for a singular matrix.
pub(crate) fn normal_matrix(matrix: &Matrix4<Real>) -> Matrix3<Real> {
    let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    match linear.try_inverse() {
        Some(inv) => inv.transpose(),
        None => {
            log::warn!("transform matrix is singular, normals are left unchanged");
            Matrix3::identity()
        },
    }
}

/// Whether `matrix` turns right-handed frames into left-handed ones.
pub(crate) fn is_mirroring(matrix: &Matrix4<Real>) -> bool {
    matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
}
