//! Sphere primitive for ray tracing.

use std::f64::consts::TAU;

use super::Primitive;
use crate::Hit;
use glint_math::{geometry, Point, Quat, Ray, Vec3, EPSILON};

/// A sphere primitive.
///
/// `rotation` turns the surface before UV mapping, which moves the texture
/// poles without moving the geometry.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point,
    radius: f64,
    rotation: Quat,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotate the texture mapping by `angle_degrees` around `axis`.
    ///
    /// A zero axis leaves the mapping unrotated.
    pub fn with_rotation(mut self, axis: Vec3, angle_degrees: f64) -> Self {
        self.rotation = match axis.try_normalize() {
            Some(axis) => Quat::from_axis_angle(axis, angle_degrees.to_radians()),
            None => Quat::IDENTITY,
        };
        self
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// UV for a direction on the unit sphere, after rotation.
    fn unit_sphere_uv(local: Vec3) -> [f64; 2] {
        let v = (1.0 - local.y.clamp(-1.0, 1.0)) / 2.0;

        let on_xz = Vec3::new(local.x, 0.0, local.z);
        let Some(on_xz) = on_xz.try_normalize() else {
            // the poles have no longitude
            return [0.0, v];
        };

        let theta = on_xz.x.clamp(-1.0, 1.0).acos();
        let theta = if on_xz.z > 0.0 { TAU - theta } else { theta };
        [theta / TAU, v]
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Hit {
        let oc = ray.origin - self.center;
        let p = ray.direction.dot(oc);
        let q = oc.length_squared() - self.radius * self.radius;

        let discriminant = p * p - q;
        if discriminant < 0.0 {
            return Hit::NONE;
        }

        let root = discriminant.sqrt();
        let (near, far) = (-p - root, -p + root);
        let distance = if near > EPSILON {
            near
        } else if far > EPSILON {
            far
        } else {
            return Hit::NONE;
        };

        let position = ray.at(distance);
        let normal = (position - self.center) / self.radius;
        Hit::new(distance, position, normal, *ray)
    }

    fn texture_coordinates_for(&self, point: Point, _part: Option<usize>) -> [f64; 2] {
        let local = self.rotation * ((point - self.center) / self.radius);
        Self::unit_sphere_uv(local)
    }

    fn tangent_at(&self, _point: Point, normal: Vec3, _part: Option<usize>) -> Vec3 {
        geometry::tangent_reference(Vec3::Y, normal)
    }

    fn centroid(&self) -> Point {
        self.center
    }

    fn name(&self) -> &'static str {
        "sphere"
    }
}
