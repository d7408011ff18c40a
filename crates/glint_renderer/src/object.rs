//! Scene objects: a shape plus the material covering it.

use glint_core::Texture;
use glint_math::{geometry, Color, Ray, Vec3};

use crate::primitives::Primitive;
use crate::{Hit, Material};

/// A renderable object.
///
/// Wraps the raw shape and answers the material queries the tracer needs
/// at a hit point.
pub struct Object {
    shape: Box<dyn Primitive>,
    pub material: Material,
}

impl Object {
    pub fn new(shape: impl Primitive + 'static, material: Material) -> Self {
        Self::from_boxed(Box::new(shape), material)
    }

    pub fn from_boxed(shape: Box<dyn Primitive>, material: Material) -> Self {
        Self { shape, material }
    }

    pub fn shape(&self) -> &dyn Primitive {
        self.shape.as_ref()
    }

    /// Intersect the shape and perturb the normal with the normal map.
    pub fn intersect(&self, ray: &Ray) -> Hit {
        let mut hit = self.shape.intersect(ray);
        if hit.is_hit() && self.material.normal_map.is_some() {
            hit.normal = self.apply_normal_map(&hit);
        }
        hit
    }

    pub fn texture_coordinates_for(&self, hit: &Hit) -> [f64; 2] {
        self.shape.texture_coordinates_for(hit.position, hit.part)
    }

    /// Texture sample at the hit, or the flat material colour.
    pub fn color_on(&self, hit: &Hit) -> Color {
        match &self.material.texture {
            Some(texture) => {
                let [u, v] = self.texture_coordinates_for(hit);
                texture.color_at(u, v)
            }
            None => self.material.color,
        }
    }

    /// Specular-map sample at the hit (red channel), or `ks`.
    pub fn specular_on(&self, hit: &Hit) -> f64 {
        match &self.material.specular_map {
            Some(map) => {
                let [u, v] = self.texture_coordinates_for(hit);
                map.color_at(u, v).r()
            }
            None => self.material.ks,
        }
    }

    /// Normal at the hit after the normal map, expressed in world space.
    ///
    /// The map stores (left, up, normal) components in [0, 1]. The up axis
    /// comes from the shape's tangent and left completes the frame.
    pub fn apply_normal_map(&self, hit: &Hit) -> Vec3 {
        let Some(map) = &self.material.normal_map else {
            return hit.normal;
        };

        let normal = hit.normal;
        let up = self.shape.tangent_at(hit.position, normal, hit.part);
        let left = geometry::third_orthogonal(up, normal);

        let [u, v] = self.texture_coordinates_for(hit);
        let encoded = Vec3::from(map.color_at(u, v));
        let components = encoded * 2.0 - Vec3::ONE;

        (left * components.x + up * components.y + normal * components.z)
            .try_normalize()
            .unwrap_or(normal)
    }

    /// Refracted light reaching the hit, read from the light map of one light.
    ///
    /// Black when no map was computed for that light.
    pub fn additional_light_factor(&self, light_map: Option<&Texture>, hit: &Hit) -> Color {
        match light_map {
            Some(map) => {
                let [u, v] = self.texture_coordinates_for(hit);
                map.color_at(u, v)
            }
            None => Color::BLACK,
        }
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("shape", &self.shape.name())
            .field("material", &self.material)
            .finish()
    }
}
