//! Surface materials.

use std::sync::Arc;

use glint_core::{MaterialKind, Texture};
use glint_math::Color;

/// Local illumination parameters plus optional texture maps.
#[derive(Debug, Clone)]
pub struct Material {
    /// Flat colour, used when there is no texture
    pub color: Color,
    pub texture: Option<Arc<Texture>>,
    /// Red channel replaces `ks` when present
    pub specular_map: Option<Arc<Texture>>,
    /// Tangent-space normals encoded in [0, 1]
    pub normal_map: Option<Arc<Texture>>,
    pub ka: f64,
    pub kd: f64,
    pub ks: f64,
    /// Specular exponent
    pub n: f64,
    pub refractive_index: f64,
    pub kind: MaterialKind,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            texture: None,
            specular_map: None,
            normal_map: None,
            ka: 0.2,
            kd: 0.8,
            ks: 0.0,
            n: 1.0,
            refractive_index: 1.0,
            kind: MaterialKind::Default,
        }
    }
}

impl Material {
    /// Plain diffuse material of the given colour.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_coefficients(mut self, ka: f64, kd: f64, ks: f64, n: f64) -> Self {
        self.ka = ka;
        self.kd = kd;
        self.ks = ks;
        self.n = n;
        self
    }

    pub fn with_kind(mut self, kind: MaterialKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_refractive_index(mut self, index: f64) -> Self {
        self.refractive_index = index;
        self
    }

    pub fn is_refractive(&self) -> bool {
        self.kind == MaterialKind::Refraction
    }
}
