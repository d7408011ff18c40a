//! Vector helpers shared by the primitives and the shading code.
//!
//! Every helper that builds a direction from a cross product has a fixed
//! fallback: when the first candidate collapses to zero the second one is
//! used, so callers never receive a zero or NaN direction for a non-zero
//! input.

use crate::Vec3;

/// Tolerance used for parallelism, degeneracy and "on the surface" checks.
pub const EPSILON: f64 = 1e-9;

/// Projection of `v` onto the direction `onto`. Zero when `onto` is zero.
pub fn project(v: Vec3, onto: Vec3) -> Vec3 {
    let len_sq = onto.length_squared();
    if len_sq < EPSILON {
        return Vec3::ZERO;
    }
    onto * (v.dot(onto) / len_sq)
}

/// Component of `v` lying in the plane orthogonal to `normal`.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - project(v, normal)
}

/// Unit vector orthogonal to both `a` and `b`, the direction of `a × b`.
///
/// Falls back to [`any_orthogonal`] of `a` when the two are parallel, or of
/// `b` when `a` is zero.
pub fn third_orthogonal(a: Vec3, b: Vec3) -> Vec3 {
    let cross = a.cross(b);
    if cross.length_squared() > EPSILON {
        return cross.normalize();
    }
    if a.length_squared() > EPSILON {
        any_orthogonal(a)
    } else {
        any_orthogonal(b)
    }
}

/// Some unit vector orthogonal to `v`.
///
/// Tries `v × X` first and falls back to `v × Y` when `v` is parallel to X.
pub fn any_orthogonal(v: Vec3) -> Vec3 {
    let candidate = v.cross(Vec3::X);
    if candidate.length_squared() > EPSILON {
        return candidate.normalize();
    }
    let fallback = v.cross(Vec3::Y);
    if fallback.length_squared() > EPSILON {
        return fallback.normalize();
    }
    // only reachable for a zero input
    Vec3::Y
}

/// Two unit vectors spanning the plane orthogonal to `normal`.
///
/// `(e1, e2, normal)` form a right handed frame: `e2 = normal × e1`.
pub fn orthonormal_basis(normal: Vec3) -> (Vec3, Vec3) {
    let n = normal.normalize_or_zero();
    let e1 = any_orthogonal(n);
    let e2 = n.cross(e1);
    (e1, e2)
}

/// `up` made orthogonal to `normal` and normalized.
///
/// Falls back to [`any_orthogonal`] when `up` is parallel to `normal`.
pub fn tangent_reference(up: Vec3, normal: Vec3) -> Vec3 {
    let tangent = project_on_plane(up, normal);
    if tangent.length_squared() > EPSILON {
        tangent.normalize()
    } else {
        any_orthogonal(normal)
    }
}

/// Mirror `direction` about `normal`: `d - 2 (d·n) n`.
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - normal * (2.0 * direction.dot(normal))
}

/// Refract a unit `direction` through a surface with unit `normal`.
///
/// The normal may face either side; when the ray leaves the medium
/// (`direction · normal > 0`) the normal is flipped and the index ratio
/// inverted. Returns `None` on total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, index: f64) -> Option<Vec3> {
    let mut cos_i = direction.dot(normal).clamp(-1.0, 1.0);
    let mut n = normal;
    let (eta_i, eta_t) = if cos_i < 0.0 {
        cos_i = -cos_i;
        (1.0, index)
    } else {
        n = -normal;
        (index, 1.0)
    };

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some((direction * eta + n * (eta * cos_i - k.sqrt())).normalize_or_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_project() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(project(v, Vec3::new(2.0, 0.0, 0.0)), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(project_on_plane(v, Vec3::X), Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(project(v, Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_any_orthogonal_falls_back() {
        for v in [Vec3::X, -Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, 3.0)] {
            let o = any_orthogonal(v);
            assert!((o.length() - 1.0).abs() < 1e-12);
            assert!(o.dot(v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_third_orthogonal_falls_back_for_parallel_inputs() {
        assert_eq!(third_orthogonal(Vec3::X, Vec3::Y * 3.0), Vec3::Z);

        let t = third_orthogonal(Vec3::Y, Vec3::Y * -2.0);
        assert!((t.length() - 1.0).abs() < 1e-12);
        assert!(t.dot(Vec3::Y).abs() < 1e-12);

        let t = third_orthogonal(Vec3::ZERO, Vec3::Z);
        assert!((t.length() - 1.0).abs() < 1e-12);
        assert!(t.dot(Vec3::Z).abs() < 1e-12);
    }

    #[test]
    fn test_orthonormal_basis() {
        let n = Vec3::new(0.0, 0.0, 2.0);
        let (e1, e2) = orthonormal_basis(n);
        assert!(e1.dot(e2).abs() < 1e-12);
        assert!(e1.dot(n).abs() < 1e-12);
        assert!(approx(e1.cross(e2), Vec3::Z));
    }

    #[test]
    fn test_tangent_reference() {
        let t = tangent_reference(Vec3::new(0.0, 1.0, 1.0), Vec3::Z);
        assert!(approx(t, Vec3::Y));

        // parallel inputs fall back to an arbitrary orthogonal direction
        let t = tangent_reference(Vec3::Z, Vec3::Z);
        assert!(t.dot(Vec3::Z).abs() < 1e-12);
        assert!((t.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, Vec3::Y);
        assert!(approx(r, Vec3::new(1.0, 1.0, 0.0).normalize()));
    }

    #[test]
    fn test_refract_normal_incidence_is_undeviated() {
        let d = Vec3::new(0.0, 0.0, -1.0);
        let t = refract(d, Vec3::Z, 1.5).unwrap();
        assert!(approx(t, d));

        // leaving the medium
        let t = refract(d, -Vec3::Z, 1.5).unwrap();
        assert!(approx(t, d));
    }

    #[test]
    fn test_refract_bends_towards_normal() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let t = refract(d, Vec3::Y, 1.5).unwrap();
        // sin(theta_t) = sin(45deg) / 1.5
        let expected_sin = (0.5f64).sqrt() / 1.5;
        assert!((t.x - expected_sin).abs() < 1e-9);
        assert!(t.y < 0.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        // leaving glass at 60 degrees, beyond the ~41.8 degree critical angle
        let angle = 60f64.to_radians();
        let d = Vec3::new(angle.sin(), angle.cos(), 0.0);
        assert!(refract(d, Vec3::Y, 1.5).is_none());
    }
}
