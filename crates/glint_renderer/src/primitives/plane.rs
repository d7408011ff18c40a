//! Infinite plane primitive.

use super::Primitive;
use crate::Hit;
use glint_math::{geometry, Point, Ray, Vec3, EPSILON};

/// An infinite plane through `origin`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point,
    normal: Vec3,
    uv_scale: f64,
    // in-plane basis used for UV mapping
    e1: Vec3,
    e2: Vec3,
}

impl Plane {
    pub fn new(origin: Point, normal: Vec3) -> Self {
        Self::with_uv_scale(origin, normal, 1.0)
    }

    /// Plane whose UV coordinates advance by one every `uv_scale` units.
    pub fn with_uv_scale(origin: Point, normal: Vec3, uv_scale: f64) -> Self {
        let normal = normal.normalize_or_zero();
        let (e1, e2) = geometry::orthonormal_basis(normal);
        let uv_scale = if uv_scale.abs() > EPSILON { uv_scale } else { 1.0 };
        Self {
            origin,
            normal,
            uv_scale,
            e1,
            e2,
        }
    }
}

impl Primitive for Plane {
    fn intersect(&self, ray: &Ray) -> Hit {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < EPSILON {
            return Hit::NONE;
        }

        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        if t <= EPSILON {
            return Hit::NONE;
        }

        // the normal always faces the side the ray comes from
        let normal = if denom > 0.0 { -self.normal } else { self.normal };
        Hit::new(t, ray.at(t), normal, *ray)
    }

    fn texture_coordinates_for(&self, point: Point, _part: Option<usize>) -> [f64; 2] {
        let local = point - self.origin;
        [
            local.dot(self.e1) / self.uv_scale,
            local.dot(self.e2) / self.uv_scale,
        ]
    }

    fn tangent_at(&self, _point: Point, _normal: Vec3, _part: Option<usize>) -> Vec3 {
        self.e2
    }

    fn centroid(&self) -> Point {
        self.origin
    }

    fn name(&self) -> &'static str {
        "plane"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit_faces_ray() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y);

        let from_above = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        let hit = plane.intersect(&from_above);
        assert!((hit.distance - 5.0).abs() < 1e-12);
        assert_eq!(hit.normal, Vec3::Y);

        let from_below = Ray::new(Vec3::new(1.0, -2.0, 0.0), Vec3::Y);
        let hit = plane.intersect(&from_below);
        assert!((hit.distance - 2.0).abs() < 1e-12);
        assert_eq!(hit.normal, -Vec3::Y);
        assert_eq!(hit.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parallel_ray_never_hits() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert_eq!(plane.intersect(&ray), Hit::NONE);

        let in_plane = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(plane.intersect(&in_plane), Hit::NONE);
    }

    #[test]
    fn test_plane_behind_ray_is_missed() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert_eq!(plane.intersect(&ray), Hit::NONE);
    }

    #[test]
    fn test_uv_follows_scale() {
        let plane = Plane::with_uv_scale(Vec3::ZERO, Vec3::Y, 10.0);
        assert_eq!(plane.texture_coordinates_for(Vec3::ZERO, None), [0.0, 0.0]);

        let p = Vec3::new(3.0, 0.0, 4.0);
        let [u, v] = plane.texture_coordinates_for(p, None);
        // five units from the origin is half a UV unit at scale 10
        assert!(((u * u + v * v).sqrt() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tangent_lies_in_plane() {
        let plane = Plane::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let t = plane.tangent_at(Vec3::ZERO, normal, None);
        assert!(t.dot(normal).abs() < 1e-12);
        assert!((t.length() - 1.0).abs() < 1e-12);
    }
}
