use nalgebra::Vector3;

use crate::{float_types::Real, mesh::vertex::Vertex};

impl Vertex {
    /// Interpolate every attribute between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// - **Position**, **uv**: linear, `p(t) = p₀ + t·(p₁ - p₀)`
    /// - **Normal**: spherical, see [`slerp_normal`]
    /// - **Color**: channel-wise linear, rounded back to 8 bits
    ///
    /// This is what `split_polygon` uses to build the vertex where a spanning
    /// edge crosses the splitting plane.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        Vertex {
            pos: self.pos + (other.pos - self.pos) * t,
            normal: slerp_normal(&self.normal, &other.normal, t),
            color: self.color.lerp(&other.color, t),
            uv: self.uv + (other.uv - self.uv) * t,
        }
    }
}

/// **Mathematical Foundation: Spherical Linear Interpolation (SLERP) for Normals**
///
/// For directions n̂₀, n̂₁ and parameter t ∈ [0,1]:
/// ```text
/// slerp(n̂₀, n̂₁, t) = (sin((1-t)·Ω) · n̂₀ + sin(t·Ω) · n̂₁) / sin(Ω),   Ω = arccos(n̂₀ · n̂₁)
/// ```
/// The direction follows the great circle while the length is blended
/// linearly, so unit normals stay unit and scaled normals keep their scale.
///
/// Falls back to a plain lerp when either input has no direction or the two
/// directions are (anti)parallel, where Ω gives no usable arc.
pub fn slerp_normal(n0: &Vector3<Real>, n1: &Vector3<Real>, t: Real) -> Vector3<Real> {
    let lerp = || n0 + (n1 - n0) * t;

    let (len0, len1) = (n0.norm(), n1.norm());
    if len0 < Real::EPSILON || len1 < Real::EPSILON {
        return lerp();
    }
    let (u0, u1) = (n0 / len0, n1 / len1);

    let dot = u0.dot(&u1).clamp(-1.0, 1.0);
    let omega = dot.acos();
    let sin_omega = omega.sin();
    if sin_omega.abs() < Real::EPSILON.sqrt() {
        return lerp();
    }

    let a = ((1.0 - t) * omega).sin() / sin_omega;
    let b = (t * omega).sin() / sin_omega;
    let len = len0 + (len1 - len0) * t;
    (a * u0 + b * u1).normalize() * len
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::vertex::Color32;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector2};

    #[test]
    fn test_vertex_interpolate() {
        let v1 = Vertex::new(Point3::origin(), Vector3::x())
            .with_color(Color32::new(0, 0, 0, 255))
            .with_uv(Vector2::new(0.0, 0.0));
        let v2 = Vertex::new(Point3::new(2.0, 2.0, 2.0), Vector3::y())
            .with_color(Color32::new(100, 200, 50, 255))
            .with_uv(Vector2::new(1.0, 0.5));
        let v_mid = v1.interpolate(&v2, 0.5);

        assert_relative_eq!(v_mid.pos, Point3::new(1.0, 1.0, 1.0));
        let s = (0.5 as Real).sqrt();
        assert_relative_eq!(v_mid.normal, Vector3::new(s, s, 0.0), epsilon = 1e-6);
        assert_eq!(v_mid.color, Color32::new(50, 100, 25, 255));
        assert_relative_eq!(v_mid.uv, Vector2::new(0.5, 0.25));
    }

    #[test]
    fn interpolate_endpoints() {
        let v1 = Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        let v2 = Vertex::new(Point3::new(3.0, 0.0, 0.0), Vector3::x());
        assert_relative_eq!(v1.interpolate(&v2, 0.0).pos, v1.pos);
        assert_relative_eq!(v1.interpolate(&v2, 1.0).normal, v2.normal, epsilon = 1e-9);
    }

    #[test]
    fn slerp_handles_parallel_and_zero_normals() {
        let n = Vector3::z();
        assert_relative_eq!(slerp_normal(&n, &n, 0.3), n);
        let zero = Vector3::zeros();
        assert_relative_eq!(slerp_normal(&zero, &n, 0.5), n * 0.5);
    }
}
