use crate::{Point, Vec3};

/// A ray in 3D space with an origin and a unit direction.
///
/// The direction is normalized on construction, so `t` in [`Ray::at`] is a
/// true distance along the ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vec3,
}

impl Ray {
    /// Placeholder ray carried by the "no hit" sentinel.
    pub const ZERO: Ray = Ray {
        origin: Vec3::ZERO,
        direction: Vec3::ZERO,
    };

    /// Create a new ray. `direction` is normalized; a zero direction stays zero.
    pub fn new(origin: Point, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray starting at `from` and heading towards `to`.
    pub fn between(from: Point, to: Point) -> Self {
        Self::new(from, to - from)
    }

    /// Get the point along the ray at distance t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }
}
