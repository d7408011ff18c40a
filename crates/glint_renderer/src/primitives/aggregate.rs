//! Triangle mesh with a bounding-sphere early out.

use super::{Primitive, Sphere, Triangle};
use crate::Hit;
use glint_math::{geometry, Aabb, Point, Ray, Vec3};

/// A collection of triangles intersected as one shape.
///
/// Hits carry the index of the triangle that produced them in
/// [`Hit::part`], which is how UV lookups find their triangle.
#[derive(Debug, Clone)]
pub struct TriangleAggregate {
    triangles: Vec<Triangle>,
    bounds: Sphere,
}

impl TriangleAggregate {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let bbox = Aabb::from_points(
            triangles
                .iter()
                .flat_map(|t| t.vertices().iter().map(|v| v.position)),
        );
        let bounds = if bbox.is_empty() {
            Sphere::new(Vec3::ZERO, 0.0)
        } else {
            // padded so that vertices on the sphere are never missed
            Sphere::new(bbox.center(), bbox.diagonal().length() / 2.0 + 1e-6)
        };
        Self { triangles, bounds }
    }

    /// Conservative test against the bounding sphere, including rays that
    /// start inside it.
    fn may_hit(&self, ray: &Ray) -> bool {
        let center = self.bounds.center();
        let radius = self.bounds.radius();
        if (ray.origin - center).length_squared() <= radius * radius {
            return true;
        }
        self.bounds.intersect(ray).is_hit()
    }

    /// Triangle best matching a surface point when the hit is unknown.
    fn owner_of(&self, point: Point) -> Option<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_degenerate())
            .map(|(i, t)| (i, (t.barycentric(point).iter().sum::<f64>() - 1.0).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

impl Primitive for TriangleAggregate {
    fn intersect(&self, ray: &Ray) -> Hit {
        if !self.may_hit(ray) {
            return Hit::NONE;
        }

        self.triangles
            .iter()
            .enumerate()
            .map(|(i, triangle)| {
                let hit = triangle.intersect(ray);
                if hit.is_hit() {
                    hit.with_part(i)
                } else {
                    hit
                }
            })
            .fold(Hit::NONE, Hit::nearest)
    }

    fn texture_coordinates_for(&self, point: Point, part: Option<usize>) -> [f64; 2] {
        let index = part
            .filter(|i| *i < self.triangles.len())
            .or_else(|| self.owner_of(point));
        match index {
            Some(i) => self.triangles[i].texture_coordinates_for(point, None),
            None => [0.0, 0.0],
        }
    }

    fn tangent_at(&self, point: Point, normal: Vec3, part: Option<usize>) -> Vec3 {
        let index = part
            .filter(|i| *i < self.triangles.len())
            .or_else(|| self.owner_of(point));
        match index {
            Some(i) => self.triangles[i].tangent_at(point, normal, None),
            None => geometry::any_orthogonal(normal),
        }
    }

    fn centroid(&self) -> Point {
        if self.triangles.is_empty() {
            return self.bounds.center();
        }
        let sum: Vec3 = self.triangles.iter().map(|t| t.centroid()).sum();
        sum / self.triangles.len() as f64
    }

    fn name(&self) -> &'static str {
        "mesh"
    }
}
