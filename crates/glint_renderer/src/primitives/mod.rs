//! Analytic ray/primitive intersection and surface parameterization.

mod aggregate;
mod cone;
mod plane;
mod quad;
mod sphere;
mod triangle;

pub use aggregate::TriangleAggregate;
pub use cone::Cone;
pub use plane::Plane;
pub use quad::{BoxShape, Quadrilateral};
pub use sphere::Sphere;
pub use triangle::{Triangle, Vertex};

use crate::Hit;
use glint_math::{Point, Ray, Vec3};

/// Shape geometry shared by every object in a scene.
pub trait Primitive: Send + Sync {
    /// Nearest intersection with a positive distance, or [`Hit::NONE`].
    ///
    /// The returned normal is the geometric one; normal maps are applied by
    /// the owning object.
    fn intersect(&self, ray: &Ray) -> Hit;

    /// UV coordinates of a point known to lie on the surface.
    ///
    /// `part` is the sub-primitive recorded in the [`Hit`] that produced the
    /// point, when there is one.
    fn texture_coordinates_for(&self, point: Point, part: Option<usize>) -> [f64; 2];

    /// Unit tangent used as the "up" axis of the normal-map frame at `point`.
    fn tangent_at(&self, point: Point, normal: Vec3, part: Option<usize>) -> Vec3;

    /// A representative interior point, used to aim rays at the shape.
    fn centroid(&self) -> Point;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}
