//! Lights and the local illumination models.

use glint_core::GoochParameters;
use glint_math::{geometry, Color, Point, Vec3};

use crate::{Hit, Material};

/// A point or disk light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Point,
    pub color: Color,
    /// Disk radius, 0 for a point light
    pub size: f64,
}

impl Light {
    pub fn new(position: Point, color: Color) -> Self {
        Self {
            position,
            color,
            size: 0.0,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size.max(0.0);
        self
    }

    pub fn is_point(&self) -> bool {
        self.size <= 0.0
    }

    /// Unit vector from `point` towards the light.
    pub fn incidence(&self, point: Point) -> Vec3 {
        (self.position - point).normalize_or_zero()
    }

    /// Lambertian term: `light · surface · kd · max(0, N·L)`.
    pub fn diffuse_phong(&self, hit: &Hit, material: &Material, surface: Color) -> Color {
        let factor = hit.normal.dot(self.incidence(hit.position));
        if factor <= 0.0 {
            return Color::BLACK;
        }
        self.color * surface * (material.kd * factor)
    }

    /// Warm/cool blend driven by `(N·L + 1) / 2`.
    ///
    /// Surfaces facing away from the light still receive the cool tone.
    pub fn diffuse_gooch(
        &self,
        hit: &Hit,
        material: &Material,
        surface: Color,
        params: &GoochParameters,
    ) -> Color {
        let tinted = Vec3::from(surface) * material.kd;
        let cool = Vec3::new(0.0, 0.0, params.b) + tinted * params.alpha;
        let warm = Vec3::new(params.y, params.y, 0.0) + tinted * params.beta;

        let t = (hit.normal.dot(self.incidence(hit.position)) + 1.0) / 2.0;
        Color::from(cool * (1.0 - t) + warm * t)
    }

    /// Highlight term: `light · specular · max(0, R·L)^n` with `R` the
    /// mirrored view direction.
    pub fn specular(&self, hit: &Hit, material: &Material, specular: f64) -> Color {
        let reflected = geometry::reflect(hit.ray.direction, hit.normal).normalize_or_zero();
        let factor = reflected.dot(self.incidence(hit.position)).max(0.0);
        self.color * (specular * factor.powf(material.n))
    }
}

/// The diffuse model used when shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IlluminationModel {
    Phong,
    Gooch(GoochParameters),
}

impl IlluminationModel {
    pub fn diffuse(&self, light: &Light, hit: &Hit, material: &Material, surface: Color) -> Color {
        match self {
            IlluminationModel::Phong => light.diffuse_phong(hit, material, surface),
            IlluminationModel::Gooch(params) => light.diffuse_gooch(hit, material, surface, params),
        }
    }

    /// Both models share the same highlight.
    pub fn specular(&self, light: &Light, hit: &Hit, material: &Material, specular: f64) -> Color {
        light.specular(hit, material, specular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Ray;

    fn hit_facing_up() -> Hit {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        Hit::new(1.0, Vec3::ZERO, Vec3::Y, ray)
    }

    fn close(a: Color, b: Color) -> bool {
        (Vec3::from(a) - Vec3::from(b)).length() < 1e-9
    }

    #[test]
    fn test_phong_diffuse_head_on() {
        let light = Light::new(Vec3::new(0.0, 10.0, 0.0), Color::WHITE);
        let material = Material::diffuse(Color::new(1.0, 0.5, 0.0));
        let c = light.diffuse_phong(&hit_facing_up(), &material, material.color);
        assert!(close(c, Color::new(0.8, 0.4, 0.0)));
    }

    #[test]
    fn test_phong_diffuse_behind_surface() {
        let light = Light::new(Vec3::new(0.0, -10.0, 0.0), Color::WHITE);
        let material = Material::default();
        assert_eq!(light.diffuse_phong(&hit_facing_up(), &material, Color::WHITE), Color::BLACK);
    }

    #[test]
    fn test_gooch_tones() {
        let params = GoochParameters::default();
        let material = Material::diffuse(Color::BLACK);

        let above = Light::new(Vec3::new(0.0, 10.0, 0.0), Color::WHITE);
        let warm = above.diffuse_gooch(&hit_facing_up(), &material, Color::BLACK, &params);
        assert!(close(warm, Color::new(0.4, 0.4, 0.0)));

        let below = Light::new(Vec3::new(0.0, -10.0, 0.0), Color::WHITE);
        let cool = below.diffuse_gooch(&hit_facing_up(), &material, Color::BLACK, &params);
        assert!(close(cool, Color::new(0.0, 0.0, 0.4)));
    }

    #[test]
    fn test_specular_peak_along_mirror_direction() {
        // viewer straight above, light straight above: R == L
        let light = Light::new(Vec3::new(0.0, 10.0, 0.0), Color::WHITE);
        let material = Material::default().with_coefficients(0.2, 0.8, 0.5, 20.0);
        let c = light.specular(&hit_facing_up(), &material, 0.5);
        assert!(close(c, Color::splat(0.5)));

        let off_axis = Light::new(Vec3::new(10.0, 0.1, 0.0), Color::WHITE);
        let c = off_axis.specular(&hit_facing_up(), &material, 0.5);
        assert!(c.r() < 1e-6);
    }

    #[test]
    fn test_model_dispatch() {
        let light = Light::new(Vec3::new(0.0, 10.0, 0.0), Color::WHITE);
        let material = Material::default();
        let hit = hit_facing_up();

        assert_eq!(
            IlluminationModel::Phong.diffuse(&light, &hit, &material, Color::WHITE),
            light.diffuse_phong(&hit, &material, Color::WHITE)
        );
        let gooch = IlluminationModel::Gooch(GoochParameters::default());
        assert_eq!(
            gooch.specular(&light, &hit, &material, 0.3),
            IlluminationModel::Phong.specular(&light, &hit, &material, 0.3)
        );
    }

    #[test]
    fn test_size_is_never_negative() {
        let light = Light::new(Vec3::ZERO, Color::WHITE).with_size(-3.0);
        assert!(light.is_point());
        assert!(!Light::new(Vec3::ZERO, Color::WHITE).with_size(2.0).is_point());
    }
}
