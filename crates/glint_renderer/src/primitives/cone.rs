//! Finite cone primitive: a lateral slope closed by a base disk.

use std::f64::consts::TAU;

use super::Primitive;
use crate::Hit;
use glint_math::{geometry, Point, Ray, Vec3, EPSILON};

/// `Hit::part` of a hit on the base disk.
pub(crate) const DISK: usize = 0;
/// `Hit::part` of a hit on the lateral slope.
pub(crate) const SLOPE: usize = 1;

/// Tolerance on the "wrong side of the base/tip plane" tests.
const SIDE_TOLERANCE: f64 = 1e-7;

/// A cone standing on a disk centred at `position`.
///
/// `up` runs from the base centre to the tip. `side` points from the base
/// centre to the rim and sets both the radius and the UV reference
/// direction.
#[derive(Debug, Clone)]
pub struct Cone {
    position: Point,
    up: Vec3,
    up_dir: Vec3,
    side_dir: Vec3,
    // completes (side_dir, bitangent, up_dir) to a right handed frame
    bitangent: Vec3,
    radius: f64,
    tip: Point,
    // unit axis from the tip towards the base
    axis: Vec3,
    cos_squared_theta: f64,
}

impl Cone {
    pub fn new(position: Point, side: Vec3, up: Vec3) -> Self {
        let up_dir = up.normalize_or_zero();
        let side_on_base = geometry::project_on_plane(side, up_dir);
        let radius = side_on_base.length();
        let side_dir = side_on_base
            .try_normalize()
            .unwrap_or_else(|| geometry::any_orthogonal(up_dir));
        let bitangent = up_dir.cross(side_dir);

        let height = up.length();
        let hyp_squared = height * height + radius * radius;
        let cos_squared_theta = if hyp_squared > EPSILON {
            height * height / hyp_squared
        } else {
            1.0
        };

        Self {
            position,
            up,
            up_dir,
            side_dir,
            bitangent,
            radius,
            tip: position + up,
            axis: -up_dir,
            cos_squared_theta,
        }
    }

    pub fn tip(&self) -> Point {
        self.tip
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Points below the base plane or beyond the tip belong to the mirror
    /// cone or to the infinite extension, never to this surface.
    fn is_outside_slab(&self, p: Point) -> bool {
        let base_to_p = p - self.position;
        let tip_to_p = p - self.tip;
        base_to_p.dot(self.up_dir) < -SIDE_TOLERANCE || tip_to_p.dot(-self.up_dir) < -SIDE_TOLERANCE
    }

    /// Outward normal on the slope. Falls back to the axis at the apex.
    fn slope_normal(&self, p: Point) -> Vec3 {
        let g = p - self.tip;
        let normal = g.cross(self.up.cross(g));
        normal.try_normalize().unwrap_or(self.up_dir)
    }

    fn slope_hit(&self, ray: &Ray) -> Hit {
        let co = ray.origin - self.tip;
        let dv = ray.direction.dot(self.axis);
        let cv = co.dot(self.axis);

        let a = dv * dv - self.cos_squared_theta;
        let b = 2.0 * (dv * cv - ray.direction.dot(co) * self.cos_squared_theta);
        let c = cv * cv - co.length_squared() * self.cos_squared_theta;

        let mut roots = [f64::NAN; 2];
        if a.abs() < EPSILON {
            // ray parallel to a generating line: a single crossing
            if b.abs() > EPSILON {
                roots[0] = -c / b;
            }
        } else {
            let mut delta = b * b - 4.0 * a * c;
            if delta < 0.0 {
                // grazing and apex rays land on a zero discriminant up to rounding
                if delta > -EPSILON * b.abs().max(1.0) * b.abs().max(1.0) {
                    delta = 0.0;
                } else {
                    return Hit::NONE;
                }
            }
            let root = delta.sqrt();
            roots = [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)];
        }

        roots
            .into_iter()
            .filter(|t| t.is_finite() && *t > EPSILON)
            .filter(|t| !self.is_outside_slab(ray.at(*t)))
            .map(|t| {
                let p = ray.at(t);
                Hit::new(t, p, self.slope_normal(p), *ray).with_part(SLOPE)
            })
            .fold(Hit::NONE, Hit::nearest)
    }

    fn disk_hit(&self, ray: &Ray) -> Hit {
        let denom = ray.direction.dot(self.up_dir);
        if denom.abs() < EPSILON {
            return Hit::NONE;
        }
        let t = (self.position - ray.origin).dot(self.up_dir) / denom;
        if t <= EPSILON {
            return Hit::NONE;
        }
        let p = ray.at(t);
        if (p - self.position).length() > self.radius {
            return Hit::NONE;
        }
        Hit::new(t, p, -self.up_dir, *ray).with_part(DISK)
    }

    fn is_on_disk(&self, p: Point) -> bool {
        (p - self.position).dot(self.up_dir).abs() < SIDE_TOLERANCE * self.up.length().max(1.0)
    }
}

impl Primitive for Cone {
    fn intersect(&self, ray: &Ray) -> Hit {
        let slope = self.slope_hit(ray);
        let disk = self.disk_hit(ray);
        if disk.is_hit() && disk.distance < slope.distance {
            disk
        } else {
            slope
        }
    }

    fn texture_coordinates_for(&self, point: Point, part: Option<usize>) -> [f64; 2] {
        let on_disk = match part {
            Some(part) => part == DISK,
            None => self.is_on_disk(point),
        };
        let local = point - self.position;

        if on_disk {
            if self.radius <= EPSILON {
                return [0.5, 0.25];
            }
            // disk occupies the lower half of the texture
            let side = local.dot(self.side_dir) / self.radius;
            let across = local.dot(self.bitangent) / self.radius;
            [(side + 1.0) / 2.0, (across + 1.0) / 4.0]
        } else {
            let angle = local.dot(self.bitangent).atan2(local.dot(self.side_dir));
            let u = (angle / TAU).rem_euclid(1.0);
            let height_sq = self.up.length_squared();
            let h = if height_sq > EPSILON {
                local.dot(self.up) / height_sq
            } else {
                0.0
            };
            [u, 0.5 + h.clamp(0.0, 1.0) / 2.0]
        }
    }

    fn tangent_at(&self, _point: Point, normal: Vec3, part: Option<usize>) -> Vec3 {
        if part == Some(DISK) {
            self.side_dir
        } else {
            geometry::tangent_reference(self.up_dir, normal)
        }
    }

    fn centroid(&self) -> Point {
        // centre of mass of a solid cone sits a quarter of the way up
        self.position + self.up * 0.25
    }

    fn name(&self) -> &'static str {
        "cone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cone() -> Cone {
        // base of radius 1 on the XZ plane, tip at y = 2
        Cone::new(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 2.0, 0.0))
    }

    #[test]
    fn test_ray_along_axis_hits_apex() {
        let cone = unit_cone();
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        let hit = cone.intersect(&ray);

        assert!(hit.is_hit());
        assert!((hit.distance - 3.0).abs() < 1e-6);
        assert!((hit.position - cone.tip()).length() < 1e-6);
        assert_eq!(hit.part, Some(SLOPE));
    }

    #[test]
    fn test_side_hit_normal_points_out() {
        let cone = unit_cone();
        // halfway up the radius is 0.5
        let ray = Ray::new(Vec3::new(5.0, 1.0, 0.0), -Vec3::X);
        let hit = cone.intersect(&ray);

        assert!((hit.distance - 4.5).abs() < 1e-9);
        assert_eq!(hit.part, Some(SLOPE));
        let expected = Vec3::new(2.0, 1.0, 0.0).normalize();
        assert!((hit.normal - expected).length() < 1e-9);
    }

    #[test]
    fn test_bottom_hit_uses_disk() {
        let cone = unit_cone();
        let ray = Ray::new(Vec3::new(0.2, -3.0, 0.1), Vec3::Y);
        let hit = cone.intersect(&ray);

        assert!((hit.distance - 3.0).abs() < 1e-9);
        assert_eq!(hit.part, Some(DISK));
        assert_eq!(hit.normal, -Vec3::Y);
    }

    #[test]
    fn test_shadow_cone_is_rejected() {
        let cone = unit_cone();
        // crosses the mirror cone above the tip only
        let ray = Ray::new(Vec3::new(-5.0, 4.0, 0.0), Vec3::X);
        assert_eq!(cone.intersect(&ray), Hit::NONE);

        // crosses the infinite extension below the base only
        let ray = Ray::new(Vec3::new(-5.0, -1.0, 0.0), Vec3::X);
        assert_eq!(cone.intersect(&ray), Hit::NONE);
    }

    #[test]
    fn test_miss() {
        let cone = unit_cone();
        let ray = Ray::new(Vec3::new(5.0, 1.0, 0.0), Vec3::X);
        assert_eq!(cone.intersect(&ray), Hit::NONE);
    }

    #[test]
    fn test_uv_regions() {
        let cone = unit_cone();

        let [u, v] = cone.texture_coordinates_for(Vec3::ZERO, Some(DISK));
        assert!((u - 0.5).abs() < 1e-12);
        assert!((v - 0.25).abs() < 1e-12);

        let [u, _] = cone.texture_coordinates_for(Vec3::X, None);
        assert!((u - 1.0).abs() < 1e-12);

        let [_, v] = cone.texture_coordinates_for(Vec3::new(0.5, 1.0, 0.0), Some(SLOPE));
        assert!((v - 0.75).abs() < 1e-12);
        let [u, _] = cone.texture_coordinates_for(Vec3::new(0.5, 1.0, 0.0), Some(SLOPE));
        assert!(u.abs() < 1e-12);
    }
}
