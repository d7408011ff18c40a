//! Whitted-style recursive ray tracer.
//!
//! Implements:
//! - Phong or Gooch local illumination with ambient, diffuse and specular terms
//! - Mirror reflection and refraction up to a configurable depth
//! - Binary or soft (disk-sampled) shadows
//! - Light maps from the refracted-shadow pre-pass
//! - Z-buffer, normal and UV visualization modes
//! - N×N super-sampling

use std::path::Path;

use glint_core::{
    GoochParameters, MaterialKind, RefractedShadowSettings, RenderMode, SceneDescription,
};
use glint_math::{geometry, Color, Ray, Vec3};
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Hit, IlluminationModel, Light, LightMaps, Scene};

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Reflection/refraction recursion budget
    pub max_iterations: u32,
    /// Distance shown white in Z-buffer mode
    pub near: f64,
    /// Distance shown black in Z-buffer mode
    pub far: f64,
    pub soft_shadows: bool,
    /// Square root of the number of angular shadow samples
    pub shadow_edge_precision: u32,
    /// Radial shadow samples per angle
    pub shadow_shade_precision: u32,
    /// Sub-pixel grid side
    pub super_sampling: u32,
    pub gooch: GoochParameters,
    /// `None` skips the refracted-shadow pre-pass
    pub refracted_shadows: Option<RefractedShadowSettings>,
    /// Offset applied to secondary ray origins
    pub bias: f64,
    /// Color when a ray doesn't hit anything
    pub background: Color,
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Phong,
            max_iterations: 0,
            near: 0.0,
            far: 1000.0,
            soft_shadows: false,
            shadow_edge_precision: 2,
            shadow_shade_precision: 2,
            super_sampling: 1,
            gooch: GoochParameters::default(),
            refracted_shadows: None,
            bias: 0.1,
            background: Color::BLACK,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn from_description(description: &SceneDescription) -> Self {
        Self {
            mode: description.mode,
            max_iterations: description.max_iterations,
            near: description.near,
            far: description.far,
            soft_shadows: description.soft_shadows,
            shadow_edge_precision: description.shadow_edge_precision.max(1),
            shadow_shade_precision: description.shadow_shade_precision.max(1),
            super_sampling: description.super_sampling.max(1),
            gooch: description.gooch,
            refracted_shadows: description.refracted_shadows,
            ..Default::default()
        }
    }

    /// Illumination model for the shaded modes.
    pub fn illumination_model(&self) -> IlluminationModel {
        match self.mode {
            RenderMode::Gooch => IlluminationModel::Gooch(self.gooch),
            _ => IlluminationModel::Phong,
        }
    }
}

/// Which terms of the local illumination to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Terms {
    ambient: bool,
    diffuse: bool,
    specular: bool,
}

impl Terms {
    const ALL: Terms = Terms {
        ambient: true,
        diffuse: true,
        specular: true,
    };
    const SPECULAR: Terms = Terms {
        ambient: false,
        diffuse: false,
        specular: true,
    };
}

/// Colour of the surface a primary ray sees.
pub type ShadeFn<'a> = fn(&Tracer<'a>, &Ray) -> Color;

/// Read-only view of everything the main pass needs.
pub struct Tracer<'a> {
    scene: &'a Scene,
    light_maps: &'a LightMaps,
    model: IlluminationModel,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, light_maps: &'a LightMaps) -> Self {
        Self {
            scene,
            light_maps,
            model: scene.config.illumination_model(),
        }
    }

    fn config(&self) -> &RenderConfig {
        &self.scene.config
    }

    /// Per-pixel strategy for a render mode, picked once per render.
    pub fn strategy_for(mode: RenderMode) -> ShadeFn<'a> {
        match mode {
            RenderMode::Phong | RenderMode::Gooch => Tracer::shade_primary,
            RenderMode::ZBuffer => Tracer::zbuffer,
            RenderMode::Normal => Tracer::normal,
            RenderMode::Texture => Tracer::texture_coordinates,
        }
    }

    fn shade_primary(&self, ray: &Ray) -> Color {
        self.trace(ray, self.config().max_iterations)
    }

    /// Colour seen along `ray` with `depth` reflection/refraction bounces
    /// left.
    pub fn trace(&self, ray: &Ray, depth: u32) -> Color {
        let Some((index, hit)) = self.scene.nearest_hit(ray) else {
            return self.config().background;
        };
        let object = &self.scene.objects[index];
        let material = &object.material;

        if material.kind == MaterialKind::Refraction && depth > 0 {
            let highlight = self.illuminate(index, &hit, Terms::SPECULAR);
            let direction = geometry::refract(ray.direction, hit.normal, material.refractive_index)
                .unwrap_or_else(|| geometry::reflect(ray.direction, hit.normal));
            let through = self.continue_ray(&hit, direction, depth - 1);
            return highlight + through * object.color_on(&hit);
        }

        let mut color = self.illuminate(index, &hit, Terms::ALL);
        if material.kind == MaterialKind::Reflection && depth > 0 {
            let direction = geometry::reflect(ray.direction, hit.normal);
            color += self.continue_ray(&hit, direction, depth - 1) * object.specular_on(&hit);
        }
        color
    }

    fn continue_ray(&self, hit: &Hit, direction: Vec3, depth: u32) -> Color {
        let direction = direction.normalize_or_zero();
        let origin = hit.position + direction * self.config().bias;
        self.trace(&Ray::new(origin, direction), depth)
    }

    /// Local illumination summed over all lights.
    fn illuminate(&self, index: usize, hit: &Hit, terms: Terms) -> Color {
        let object = &self.scene.objects[index];
        let material = &object.material;
        let surface = object.color_on(hit);
        let specular_value = object.specular_on(hit);

        let mut color = Color::BLACK;
        for (light_index, light) in self.scene.lights.iter().enumerate() {
            if terms.ambient {
                color += light.color * surface * material.ka;
            }
            if !terms.diffuse && !terms.specular {
                continue;
            }

            let visibility = self.light_factor(light, hit);
            if terms.diffuse {
                let caustic = object
                    .additional_light_factor(self.light_maps.get(index, light_index), hit);
                let lit = Color::splat(visibility) + caustic;
                color += self.model.diffuse(light, hit, material, surface) * lit;
            }
            if terms.specular {
                color += self.model.specular(light, hit, material, specular_value) * visibility;
            }
        }
        color
    }

    /// Fraction of `light` visible from the hit point, in [0, 1].
    pub fn light_factor(&self, light: &Light, hit: &Hit) -> f64 {
        let origin = hit.position + hit.normal * self.config().bias;
        if light.is_point() || !self.config().soft_shadows {
            return self.visibility(origin, light.position, false);
        }

        let (e1, e2) = geometry::orthonormal_basis(light.position - origin);
        let angles = self.config().shadow_edge_precision.pow(2).max(1);
        let rings = self.config().shadow_shade_precision.max(1);

        let mut total = 0.0;
        for a in 0..angles {
            let theta = std::f64::consts::TAU * a as f64 / angles as f64;
            let spoke = e1 * theta.cos() + e2 * theta.sin();
            for ring in 1..=rings {
                let radius = light.size * ring as f64 / rings as f64;
                total += self.visibility(origin, light.position + spoke * radius, true);
            }
        }
        total / (angles * rings) as f64
    }

    /// Visibility of `target` from `origin`.
    ///
    /// Any blocker gives 0 unless `penumbra` is set. Then a blocker in the
    /// half of the segment nearer `origin` gives 0 and one in the half
    /// nearer `target` fades linearly up to 1.
    fn visibility(&self, origin: Vec3, target: Vec3, penumbra: bool) -> f64 {
        let span = (target - origin).length();
        if span <= glint_math::EPSILON {
            return 1.0;
        }
        let ray = Ray::between(origin, target);
        match self.scene.nearest_hit(&ray) {
            Some((_, hit)) if hit.distance < span => {
                if penumbra {
                    (2.0 * hit.distance / span - 1.0).max(0.0)
                } else {
                    0.0
                }
            }
            _ => 1.0,
        }
    }

    fn zbuffer(&self, ray: &Ray) -> Color {
        let Some((_, hit)) = self.scene.nearest_hit(ray) else {
            return Color::BLACK;
        };
        let config = self.config();
        let range = config.far - config.near;
        let grey = if range.abs() <= glint_math::EPSILON {
            if hit.distance <= config.near {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - (hit.distance - config.near) / range
        };
        Color::splat(grey)
    }

    fn normal(&self, ray: &Ray) -> Color {
        match self.scene.nearest_hit(ray) {
            Some((_, hit)) => Color::from((hit.normal + Vec3::ONE) / 2.0),
            None => Color::BLACK,
        }
    }

    fn texture_coordinates(&self, ray: &Ray) -> Color {
        match self.scene.nearest_hit(ray) {
            Some((index, hit)) => {
                let [u, v] = self.scene.objects[index].texture_coordinates_for(&hit);
                Color::new(u.rem_euclid(1.0), v.rem_euclid(1.0), 0.0)
            }
            None => Color::BLACK,
        }
    }
}

/// Colour of pixel `(x, y)`, averaged over the sub-pixel grid.
///
/// Sums happen in unclamped space so bright samples are not cut off
/// before averaging.
pub fn render_pixel<'a>(
    tracer: &Tracer<'a>,
    shade: ShadeFn<'a>,
    camera: &Camera,
    offsets: &[(f64, f64)],
    x: u32,
    y: u32,
) -> Color {
    if offsets.is_empty() {
        return shade(tracer, &camera.get_ray(x, y, 0.0, 0.0));
    }
    let sum = offsets.iter().fold(Vec3::ZERO, |acc, (dx, dy)| {
        acc + Vec3::from(shade(tracer, &camera.get_ray(x, y, *dx, *dy)))
    });
    Color::from(sum / offsets.len() as f64)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let [r, g, b] = color.to_rgb8();
    [r, g, b, 255]
}

/// Image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width as usize) * (height as usize)],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Encode as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba())
            .ok_or_else(|| {
                image::ImageError::Parameter(image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ))
            })?;
        image.save_with_format(path, image::ImageFormat::Png)
    }
}

/// Render the scene, buckets in parallel.
///
/// `light_maps` must already hold the refracted-shadow pre-pass result, or
/// be empty.
pub fn render(scene: &Scene, light_maps: &LightMaps) -> ImageBuffer {
    let camera = &scene.camera;
    let tracer = Tracer::new(scene, light_maps);
    let shade = Tracer::strategy_for(scene.config.mode);
    let offsets = Camera::sample_offsets(scene.config.super_sampling);

    let buckets = generate_buckets(
        camera.image_width,
        camera.image_height,
        scene.config.bucket_size.max(1),
    );
    log::debug!(
        "Rendering {}x{} in {} buckets, {} samples per pixel",
        camera.image_width,
        camera.image_height,
        buckets.len(),
        offsets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, |x, y| {
                render_pixel(&tracer, shade, camera, &offsets, x, y)
            });
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.write_bucket(result);
    }
    image
}
