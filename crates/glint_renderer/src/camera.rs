//! Pinhole camera for primary ray generation.

use glint_core::CameraDescription;
use glint_math::{geometry, Point, Ray, Vec3};

/// Distance from the eye to the image plane, in world units.
const FOCAL_DISTANCE: f64 = 1000.0;

/// Pinhole camera.
///
/// The image plane sits [`FOCAL_DISTANCE`] in front of the eye. One pixel
/// covers `|up|` world units, so the length of `up` zooms the view.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    eye: Point,
    center: Point,
    up: Vec3,

    // Cached basis, refreshed by every builder call
    forward: Vec3,
    right: Vec3,
}

impl Camera {
    /// Camera with the default scene-file settings.
    pub fn new() -> Self {
        Self::from_description(&CameraDescription::default())
    }

    pub fn from_description(description: &CameraDescription) -> Self {
        let (width, height) = description.view_size;
        let mut camera = Self {
            image_width: width,
            image_height: height,
            eye: description.eye,
            center: description.center,
            up: description.up,
            forward: -Vec3::Z,
            right: Vec3::X,
        };
        camera.update_basis();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, eye: Point, center: Point, up: Vec3) -> Self {
        self.eye = eye;
        self.center = center;
        self.up = up;
        self.update_basis();
        self
    }

    fn update_basis(&mut self) {
        self.forward = (self.center - self.eye)
            .try_normalize()
            .unwrap_or(-Vec3::Z);
        if self.up.length_squared() < glint_math::EPSILON {
            self.up = Vec3::Y;
        }
        self.right = geometry::third_orthogonal(self.forward, self.up);
    }

    /// Direction through pixel `(x, y)` shifted by a sub-pixel offset.
    ///
    /// `y` grows downwards in image space.
    pub fn direction(&self, x: u32, y: u32, dx: f64, dy: f64) -> Vec3 {
        let horizontal = x as f64 - self.image_width as f64 / 2.0 + dx;
        let vertical = self.image_height as f64 / 2.0 - y as f64 + dy;
        let on_plane = self.forward * FOCAL_DISTANCE
            + self.right * (horizontal * self.up.length())
            + self.up * vertical;
        on_plane.normalize_or_zero()
    }

    pub fn get_ray(&self, x: u32, y: u32, dx: f64, dy: f64) -> Ray {
        Ray::new(self.eye, self.direction(x, y, dx, dy))
    }

    /// Sub-pixel offsets of an N×N super-sampling grid, centred on the pixel.
    pub fn sample_offsets(factor: u32) -> Vec<(f64, f64)> {
        let n = factor.max(1);
        let step = |i: u32| (i as f64 + 0.5) / n as f64 - 0.5;
        (0..n)
            .flat_map(|j| (0..n).map(move |i| (step(i), step(j))))
            .collect()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pixel_looks_forward() {
        let camera = Camera::new();
        let d = camera.direction(200, 200, 0.0, 0.0);
        assert!((d - (-Vec3::Z)).length() < 1e-12);
    }

    #[test]
    fn test_pixels_map_onto_focal_plane() {
        // default camera: eye (200, 200, 1000) looking at z = 0,
        // pixel (0, 0) lands on the top-left corner (0, 400, 0)
        let camera = Camera::new();
        let ray = camera.get_ray(0, 0, 0.0, 0.0);
        let t = -ray.origin.z / ray.direction.z;
        let p = ray.at(t);
        assert!((p - Vec3::new(0.0, 400.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_up_length_scales_view() {
        let camera = Camera::new().with_position(
            Vec3::new(0.0, 0.0, 1000.0),
            Vec3::ZERO,
            Vec3::new(0.0, 2.0, 0.0),
        );
        let ray = camera.get_ray(300, 200, 0.0, 0.0);
        let p = ray.at(-ray.origin.z / ray.direction.z);
        assert!((p - Vec3::new(200.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_sample_offsets() {
        assert_eq!(Camera::sample_offsets(1), vec![(0.0, 0.0)]);
        assert_eq!(Camera::sample_offsets(0), vec![(0.0, 0.0)]);

        let offsets = Camera::sample_offsets(2);
        assert_eq!(offsets.len(), 4);
        assert!(offsets.contains(&(-0.25, -0.25)));
        assert!(offsets.contains(&(0.25, 0.25)));
    }

    #[test]
    fn test_degenerate_up_still_produces_rays() {
        let camera = Camera::new().with_position(Vec3::ZERO, -Vec3::Z, -Vec3::Z);
        let d = camera.direction(10, 10, 0.0, 0.0);
        assert!((d.length() - 1.0).abs() < 1e-12);
    }
}
