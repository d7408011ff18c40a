//! Parallelogram and box primitives.

use super::Primitive;
use crate::Hit;
use glint_math::{geometry, Interval, Point, Ray, Vec3, EPSILON};

/// Parallelogram spanned by `side` and `up` from the `origin` corner.
///
/// The normal is `side × up`; UV is (0, 0) at the origin corner and (1, 1)
/// at the opposite one.
#[derive(Debug, Clone)]
pub struct Quadrilateral {
    origin: Point,
    side: Vec3,
    up: Vec3,
    normal: Vec3,
    // |side × up|, zero for a degenerate quad
    area: f64,
}

impl Quadrilateral {
    pub fn new(origin: Point, side: Vec3, up: Vec3) -> Self {
        let cross = side.cross(up);
        Self {
            origin,
            side,
            up,
            normal: cross.normalize_or_zero(),
            area: cross.length(),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn center(&self) -> Point {
        self.origin + (self.side + self.up) / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.area <= EPSILON
    }

    /// Same surface with the normal reversed.
    fn flipped(&self) -> Self {
        Self::new(self.origin + self.side, -self.side, self.up)
    }

    /// Coordinates of an in-plane point in the (side, up) basis.
    fn local_coordinates(&self, point: Point) -> [f64; 2] {
        if self.is_degenerate() {
            return [0.0, 0.0];
        }
        let local = point - self.origin;
        [
            local.cross(self.up).dot(self.normal) / self.area,
            self.side.cross(local).dot(self.normal) / self.area,
        ]
    }
}

impl Primitive for Quadrilateral {
    fn intersect(&self, ray: &Ray) -> Hit {
        if self.is_degenerate() {
            return Hit::NONE;
        }
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < EPSILON {
            return Hit::NONE;
        }
        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        if t <= EPSILON {
            return Hit::NONE;
        }

        let position = ray.at(t);
        let [u, v] = self.local_coordinates(position);
        let bounds = Interval::UNIT.expand(EPSILON);
        if !bounds.contains(u) || !bounds.contains(v) {
            return Hit::NONE;
        }
        Hit::new(t, position, self.normal, *ray)
    }

    fn texture_coordinates_for(&self, point: Point, _part: Option<usize>) -> [f64; 2] {
        self.local_coordinates(point)
    }

    fn tangent_at(&self, _point: Point, normal: Vec3, _part: Option<usize>) -> Vec3 {
        geometry::tangent_reference(self.up, normal)
    }

    fn centroid(&self) -> Point {
        self.center()
    }

    fn name(&self) -> &'static str {
        "quad"
    }
}

/// Parallelepiped made of six outward-facing quadrilaterals.
#[derive(Debug, Clone)]
pub struct BoxShape {
    faces: [Quadrilateral; 6],
    center: Point,
}

impl BoxShape {
    pub fn new(origin: Point, side: Vec3, up: Vec3, depth: Vec3) -> Self {
        let center = origin + (side + up + depth) / 2.0;
        let outward = |face: Quadrilateral| {
            if face.normal().dot(face.center() - center) < 0.0 {
                face.flipped()
            } else {
                face
            }
        };

        let faces = [
            outward(Quadrilateral::new(origin, side, up)),
            outward(Quadrilateral::new(origin + depth, side, up)),
            outward(Quadrilateral::new(origin, side, depth)),
            outward(Quadrilateral::new(origin + up, side, depth)),
            outward(Quadrilateral::new(origin, up, depth)),
            outward(Quadrilateral::new(origin + side, up, depth)),
        ];
        Self { faces, center }
    }

    pub fn faces(&self) -> &[Quadrilateral; 6] {
        &self.faces
    }

    fn face_for(&self, point: Point, part: Option<usize>) -> Option<&Quadrilateral> {
        if let Some(face) = part.and_then(|i| self.faces.get(i)) {
            return Some(face);
        }
        // closest supporting plane
        self.faces
            .iter()
            .filter(|f| !f.is_degenerate())
            .min_by(|a, b| {
                let da = (point - a.origin).dot(a.normal).abs();
                let db = (point - b.origin).dot(b.normal).abs();
                da.total_cmp(&db)
            })
    }
}

impl Primitive for BoxShape {
    fn intersect(&self, ray: &Ray) -> Hit {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, face)| {
                let hit = face.intersect(ray);
                if hit.is_hit() {
                    hit.with_part(i)
                } else {
                    hit
                }
            })
            .fold(Hit::NONE, Hit::nearest)
    }

    fn texture_coordinates_for(&self, point: Point, part: Option<usize>) -> [f64; 2] {
        self.face_for(point, part)
            .map_or([0.0, 0.0], |face| face.texture_coordinates_for(point, None))
    }

    fn tangent_at(&self, point: Point, normal: Vec3, part: Option<usize>) -> Vec3 {
        self.face_for(point, part)
            .map_or_else(|| geometry::any_orthogonal(normal), |face| {
                face.tangent_at(point, normal, None)
            })
    }

    fn centroid(&self) -> Point {
        self.center
    }

    fn name(&self) -> &'static str {
        "box"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_hit_and_uv() {
        let quad = Quadrilateral::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0));
        let hit = quad.intersect(&Ray::new(Vec3::new(1.0, 1.0, 3.0), -Vec3::Z));

        assert!((hit.distance - 3.0).abs() < 1e-12);
        assert_eq!(hit.normal, Vec3::Z);
        let [u, v] = quad.texture_coordinates_for(hit.position, None);
        assert!((u - 0.5).abs() < 1e-12);
        assert!((v - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_quad_miss_outside_uv_range() {
        let quad = Quadrilateral::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(quad.intersect(&Ray::new(Vec3::new(1.5, 0.5, 1.0), -Vec3::Z)), Hit::NONE);
        assert_eq!(quad.intersect(&Ray::new(Vec3::new(0.5, -0.1, 1.0), -Vec3::Z)), Hit::NONE);
    }

    #[test]
    fn test_skewed_quad_uv() {
        let quad = Quadrilateral::new(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0));
        let [u, v] = quad.texture_coordinates_for(Vec3::new(1.5, 0.5, 0.0), None);
        assert!((u - 1.0).abs() < 1e-12);
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_quad_never_hits() {
        let quad = Quadrilateral::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(quad.intersect(&Ray::new(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z)), Hit::NONE);
    }

    #[test]
    fn test_box_faces_point_outward() {
        let b = BoxShape::new(Vec3::ZERO, Vec3::X, Vec3::Y, -Vec3::Z);
        let center = b.centroid();
        assert_eq!(center, Vec3::new(0.5, 0.5, -0.5));
        for face in b.faces() {
            assert!(face.normal().dot(face.center() - center) > 0.0);
        }
    }

    #[test]
    fn test_box_hits_record_face() {
        let b = BoxShape::new(Vec3::ZERO, Vec3::X, Vec3::Y, -Vec3::Z);

        let front = b.intersect(&Ray::new(Vec3::new(0.5, 0.5, 5.0), -Vec3::Z));
        assert!((front.distance - 5.0).abs() < 1e-12);
        assert_eq!(front.normal, Vec3::Z);
        assert_eq!(front.part, Some(0));

        let top = b.intersect(&Ray::new(Vec3::new(0.5, 5.0, -0.5), -Vec3::Y));
        assert!((top.distance - 4.0).abs() < 1e-12);
        assert_eq!(top.normal, Vec3::Y);
        assert_eq!(top.part, Some(3));

        let [u, v] = b.texture_coordinates_for(top.position, top.part);
        assert!((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v));

        assert_eq!(b.intersect(&Ray::new(Vec3::new(3.0, 3.0, 3.0), Vec3::X)), Hit::NONE);
    }
}
