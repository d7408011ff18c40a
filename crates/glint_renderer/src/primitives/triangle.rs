//! Triangle primitive with per-vertex normals and UVs.

use super::Primitive;
use crate::Hit;
use glint_math::{geometry, Interval, Point, Ray, Vec3, EPSILON};

/// Slack allowed on barycentric bounds.
const BARYCENTRIC_TOLERANCE: f64 = 1e-9;

/// A triangle corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point,
    /// Zero means "use the face normal".
    pub normal: Vec3,
    pub uv: [f64; 2],
}

impl Vertex {
    pub fn new(position: Point, normal: Vec3, uv: [f64; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Vertex without a normal and with zero UV.
    pub fn at(position: Point) -> Self {
        Self::new(position, Vec3::ZERO, [0.0, 0.0])
    }
}

/// A triangle.
///
/// The face normal follows the winding `(v1 - v0) × (v2 - v0)` and is
/// never flipped towards the ray, so refraction can tell entering from
/// leaving.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Vertex; 3],
    face_normal: Vec3,
    // twice the area
    area: f64,
    smooth: bool,
    uv_tangent: Vec3,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        let cross = (v1.position - v0.position).cross(v2.position - v0.position);
        let area = cross.length();
        let face_normal = cross.normalize_or_zero();
        let smooth = [v0, v1, v2]
            .iter()
            .all(|v| v.normal.length_squared() > EPSILON);

        let mut triangle = Self {
            vertices: [v0, v1, v2],
            face_normal,
            area,
            smooth,
            uv_tangent: Vec3::ZERO,
        };
        triangle.uv_tangent = triangle.compute_uv_tangent();
        triangle
    }

    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    /// Zero-area triangles never produce hits.
    pub fn is_degenerate(&self) -> bool {
        self.area <= EPSILON
    }

    /// Barycentric coordinates of `p` from unsigned sub-triangle areas.
    ///
    /// Exactly one of the coordinates is 1 at each vertex. They sum to 1
    /// inside the triangle and to more than 1 outside of it.
    pub fn barycentric(&self, p: Point) -> [f64; 3] {
        if self.is_degenerate() {
            return [f64::NAN; 3];
        }
        let [a, b, c] = self.vertices.map(|v| v.position);
        [
            (b - p).cross(c - p).length() / self.area,
            (c - p).cross(a - p).length() / self.area,
            (a - p).cross(b - p).length() / self.area,
        ]
    }

    fn contains(barycentric: &[f64; 3]) -> bool {
        let bounds = Interval::UNIT.expand(BARYCENTRIC_TOLERANCE);
        barycentric.iter().all(|l| bounds.contains(*l))
            && barycentric.iter().sum::<f64>() <= 1.0 + BARYCENTRIC_TOLERANCE * 10.0
    }

    fn interpolate_uv(&self, barycentric: &[f64; 3]) -> [f64; 2] {
        let mut uv = [0.0, 0.0];
        for (l, v) in barycentric.iter().zip(&self.vertices) {
            uv[0] += l * v.uv[0];
            uv[1] += l * v.uv[1];
        }
        uv
    }

    fn interpolate_normal(&self, barycentric: &[f64; 3]) -> Vec3 {
        if !self.smooth {
            return self.face_normal;
        }
        let n = barycentric
            .iter()
            .zip(&self.vertices)
            .fold(Vec3::ZERO, |acc, (l, v)| acc + v.normal * *l);
        n.try_normalize().unwrap_or(self.face_normal)
    }

    /// Direction in which the v texture coordinate grows across the face.
    ///
    /// Zero when the UV mapping is degenerate.
    fn compute_uv_tangent(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        let e1 = v1.position - v0.position;
        let e2 = v2.position - v0.position;
        let du1 = v1.uv[0] - v0.uv[0];
        let dv1 = v1.uv[1] - v0.uv[1];
        let du2 = v2.uv[0] - v0.uv[0];
        let dv2 = v2.uv[1] - v0.uv[1];

        let det = du1 * dv2 - du2 * dv1;
        if det.abs() < EPSILON {
            return Vec3::ZERO;
        }
        ((e2 * du1 - e1 * du2) / det).normalize_or_zero()
    }
}

impl Primitive for Triangle {
    fn intersect(&self, ray: &Ray) -> Hit {
        if self.is_degenerate() {
            return Hit::NONE;
        }

        let denom = ray.direction.dot(self.face_normal);
        if denom.abs() < EPSILON {
            return Hit::NONE;
        }
        let t = (self.vertices[0].position - ray.origin).dot(self.face_normal) / denom;
        if t <= EPSILON {
            return Hit::NONE;
        }

        let position = ray.at(t);
        let barycentric = self.barycentric(position);
        if !Self::contains(&barycentric) {
            return Hit::NONE;
        }

        // winding decides the outside, whichever side the ray comes from
        let normal = self.interpolate_normal(&barycentric);
        Hit::new(t, position, normal, *ray)
    }

    fn texture_coordinates_for(&self, point: Point, _part: Option<usize>) -> [f64; 2] {
        self.interpolate_uv(&self.barycentric(point))
    }

    fn tangent_at(&self, _point: Point, normal: Vec3, _part: Option<usize>) -> Vec3 {
        if self.uv_tangent == Vec3::ZERO {
            geometry::any_orthogonal(normal)
        } else {
            geometry::tangent_reference(self.uv_tangent, normal)
        }
    }

    fn centroid(&self) -> Point {
        self.vertices.iter().map(|v| v.position).sum::<Vec3>() / 3.0
    }

    fn name(&self) -> &'static str {
        "triangle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> Triangle {
        Triangle::new(
            Vertex::new(Vec3::ZERO, Vec3::ZERO, [0.0, 0.0]),
            Vertex::new(Vec3::X, Vec3::ZERO, [1.0, 0.0]),
            Vertex::new(Vec3::Y, Vec3::ZERO, [0.0, 1.0]),
        )
    }

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let tri = flat();
        assert!(close(tri.barycentric(Vec3::ZERO), [1.0, 0.0, 0.0]));
        assert!(close(tri.barycentric(Vec3::X), [0.0, 1.0, 0.0]));
        assert!(close(tri.barycentric(Vec3::Y), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_barycentric_sums() {
        let tri = flat();
        let inside = tri.barycentric(Vec3::new(0.25, 0.25, 0.0));
        assert!((inside.iter().sum::<f64>() - 1.0).abs() < 1e-12);

        let outside = tri.barycentric(Vec3::new(1.0, 1.0, 0.0));
        assert!(outside.iter().sum::<f64>() > 1.0 + 1e-6);
    }

    #[test]
    fn test_hit_inside() {
        let tri = flat();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), -Vec3::Z);
        let hit = tri.intersect(&ray);
        assert!((hit.distance - 5.0).abs() < 1e-12);
        assert_eq!(hit.normal, Vec3::Z);

        let [u, v] = tri.texture_coordinates_for(hit.position, None);
        assert!((u - 0.25).abs() < 1e-12);
        assert!((v - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let tri = flat();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -5.0), Vec3::Z);
        let hit = tri.intersect(&ray);
        assert!((hit.distance - 5.0).abs() < 1e-12);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_miss_outside() {
        let tri = flat();
        let ray = Ray::new(Vec3::new(0.75, 0.75, 5.0), -Vec3::Z);
        assert_eq!(tri.intersect(&ray), Hit::NONE);
    }

    #[test]
    fn test_interpolated_normal() {
        let n0 = Vec3::new(-1.0, 0.0, 1.0).normalize();
        let n1 = Vec3::new(1.0, 0.0, 1.0).normalize();
        let tri = Triangle::new(
            Vertex::new(Vec3::ZERO, n0, [0.0, 0.0]),
            Vertex::new(Vec3::X, n1, [1.0, 0.0]),
            Vertex::new(Vec3::Y, Vec3::Z, [0.0, 1.0]),
        );
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z);
        let hit = tri.intersect(&ray);
        assert!((hit.normal - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_degenerate_never_hits() {
        let tri = Triangle::new(Vertex::at(Vec3::ZERO), Vertex::at(Vec3::X), Vertex::at(Vec3::X * 2.0));
        assert!(tri.is_degenerate());
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z);
        assert_eq!(tri.intersect(&ray), Hit::NONE);
    }

    #[test]
    fn test_uv_tangent() {
        let tri = flat();
        // v grows along +Y
        let t = tri.tangent_at(Vec3::ZERO, Vec3::Z, None);
        assert!((t - Vec3::Y).length() < 1e-12);

        let no_uv = Triangle::new(Vertex::at(Vec3::ZERO), Vertex::at(Vec3::X), Vertex::at(Vec3::Y));
        let t = no_uv.tangent_at(Vec3::ZERO, Vec3::Z, None);
        assert!(t.dot(Vec3::Z).abs() < 1e-12);
        assert!((t.length() - 1.0).abs() < 1e-12);
    }
}
