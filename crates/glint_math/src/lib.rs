//! Glint math - double precision value types for the ray tracer.
//!
//! Vectors and quaternions come from glam; everything else here is built
//! on top of them.

pub use glam::{DQuat, DVec3};

/// 3-component double precision vector, used for directions.
pub type Vec3 = DVec3;

/// Positions share the vector representation.
pub type Point = Vec3;

/// Unit quaternion used for primitive-local rotations.
pub type Quat = DQuat;

mod aabb;
mod color;
pub mod geometry;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use color::Color;
pub use geometry::EPSILON;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_is_vec3() {
        let p: Point = Vec3::new(1.0, 2.0, 3.0);
        let v: Vec3 = p;
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }
}
