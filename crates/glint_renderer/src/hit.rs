//! Ray/primitive intersection results.

use glint_math::{Point, Ray, Vec3};

/// Result of testing a ray against one primitive.
///
/// A hit with an infinite distance is the "no hit" sentinel, see
/// [`Hit::NONE`]. `part` identifies the sub-primitive that produced the
/// hit (triangle of a mesh, face of a box, disk or slope of a cone) so UV
/// lookups can be routed without any shared state.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// Distance along the ray to the intersection point
    pub distance: f64,
    pub position: Point,
    /// Unit surface normal
    pub normal: Vec3,
    /// Ray that produced this hit
    pub ray: Ray,
    /// Index of the sub-primitive that was hit, if the shape has several
    pub part: Option<usize>,
}

impl Hit {
    /// The "no hit" sentinel.
    pub const NONE: Hit = Hit {
        distance: f64::INFINITY,
        position: Vec3::ZERO,
        normal: Vec3::ZERO,
        ray: Ray::ZERO,
        part: None,
    };

    /// Create a hit. The normal is normalized.
    pub fn new(distance: f64, position: Point, normal: Vec3, ray: Ray) -> Self {
        Self {
            distance,
            position,
            normal: normal.normalize_or_zero(),
            ray,
            part: None,
        }
    }

    /// Same hit, tagged with the sub-primitive that produced it.
    pub fn with_part(mut self, part: usize) -> Self {
        self.part = Some(part);
        self
    }

    /// True unless this is the sentinel.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.distance.is_finite()
    }

    /// The nearer of two hits. Ties keep `self`.
    #[inline]
    pub fn nearest(self, other: Hit) -> Hit {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

impl Default for Hit {
    fn default() -> Self {
        Hit::NONE
    }
}

impl PartialEq for Hit {
    /// Two infinite-distance hits are equal whatever their other fields.
    fn eq(&self, other: &Self) -> bool {
        if !self.is_hit() && !other.is_hit() {
            return true;
        }
        self.distance == other.distance
            && self.position == other.position
            && self.normal == other.normal
            && self.ray == other.ray
            && self.part == other.part
    }
}
