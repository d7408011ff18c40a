//! Plain data produced by the scene description parser.
//!
//! Nothing here knows about intersection or shading. The renderer turns
//! these into primitives, materials and lights.

use std::str::FromStr;

use glint_math::{Color, Point, Vec3};
use serde::Deserialize;

use super::parser::DescriptionError;

/// Per-pixel visualization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Full shading with the Phong illumination model.
    #[default]
    Phong,
    /// Full shading with the Gooch warm/cool model.
    Gooch,
    /// Grey level from hit distance between near and far.
    ZBuffer,
    /// Hit normal remapped to [0, 1].
    Normal,
    /// Raw UV coordinates as red and green.
    Texture,
}

impl FromStr for RenderMode {
    type Err = DescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phong" => Ok(RenderMode::Phong),
            "gooch" => Ok(RenderMode::Gooch),
            "zbuffer" => Ok(RenderMode::ZBuffer),
            "normal" => Ok(RenderMode::Normal),
            "texture" => Ok(RenderMode::Texture),
            _ => Err(DescriptionError::UnsupportedMode(s.to_string())),
        }
    }
}

/// How the renderer continues a ray after it hits a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    #[default]
    Default,
    Reflection,
    Refraction,
}

/// Warm/cool blend parameters of the Gooch model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoochParameters {
    /// Blue component of the cool tone
    pub b: f64,
    /// Yellow component of the warm tone
    pub y: f64,
    /// Surface colour weight in the cool tone
    pub alpha: f64,
    /// Surface colour weight in the warm tone
    pub beta: f64,
}

impl Default for GoochParameters {
    fn default() -> Self {
        Self {
            b: 0.4,
            y: 0.4,
            alpha: 0.2,
            beta: 0.6,
        }
    }
}

/// Settings of the refracted-shadow pre-pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefractedShadowSettings {
    /// Angular step of the ray grid shot from each light
    pub precision: f64,
    /// Weight of a single deposited ray
    pub intensity: f64,
    /// Side of the square light map kept per (object, light)
    pub map_size: u32,
    /// Spread radius of the smoothing pass, in light-map cells
    pub smoothing_radius: u32,
    /// Largest grid offset explored in either axis
    pub max_extent: u32,
}

impl Default for RefractedShadowSettings {
    fn default() -> Self {
        Self {
            precision: 0.01,
            intensity: 0.5,
            map_size: 256,
            smoothing_radius: 2,
            max_extent: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDescription {
    pub eye: Point,
    pub center: Point,
    /// Screen up direction. Its length scales the image plane.
    pub up: Vec3,
    pub view_size: (u32, u32),
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            eye: Vec3::new(200.0, 200.0, 1000.0),
            center: Vec3::new(200.0, 200.0, 0.0),
            up: Vec3::Y,
            view_size: (400, 400),
        }
    }
}

/// Material parameters with texture paths still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescription {
    pub color: Color,
    pub texture: Option<String>,
    pub specular_map: Option<String>,
    pub normal_map: Option<String>,
    pub ka: f64,
    pub kd: f64,
    pub ks: f64,
    /// Specular exponent
    pub n: f64,
    pub refractive_index: f64,
    pub kind: MaterialKind,
}

impl Default for MaterialDescription {
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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexDescription {
    pub position: Point,
    /// Missing normals fall back to the face normal.
    pub normal: Option<Vec3>,
    pub uv: [f64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDescription {
    Sphere {
        position: Point,
        radius: f64,
        /// Rotation axis and angle in degrees applied before UV mapping
        rotation: Option<(Vec3, f64)>,
    },
    Plane {
        position: Point,
        normal: Vec3,
        uv_scale: f64,
    },
    Cone {
        position: Point,
        side: Vec3,
        up: Vec3,
    },
    Triangle {
        vertices: [VertexDescription; 3],
    },
    Mesh {
        triangles: Vec<[VertexDescription; 3]>,
    },
    Quad {
        origin: Point,
        side: Vec3,
        up: Vec3,
    },
    Box {
        origin: Point,
        side: Vec3,
        up: Vec3,
        depth: Vec3,
    },
}

impl ShapeDescription {
    /// Name used in the scene file and in log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeDescription::Sphere { .. } => "sphere",
            ShapeDescription::Plane { .. } => "plane",
            ShapeDescription::Cone { .. } => "cone",
            ShapeDescription::Triangle { .. } => "triangle",
            ShapeDescription::Mesh { .. } => "mesh",
            ShapeDescription::Quad { .. } => "quad",
            ShapeDescription::Box { .. } => "box",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescription {
    pub shape: ShapeDescription,
    pub material: MaterialDescription,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescription {
    pub position: Point,
    pub color: Color,
    /// 0 is a point light, anything larger enables soft shadows.
    pub size: f64,
}

/// Everything read from a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub mode: RenderMode,
    /// Reflection/refraction recursion budget
    pub max_iterations: u32,
    pub near: f64,
    pub far: f64,
    pub soft_shadows: bool,
    pub shadow_edge_precision: u32,
    pub shadow_shade_precision: u32,
    pub super_sampling: u32,
    pub gooch: GoochParameters,
    /// `None` disables the refracted-shadow pre-pass
    pub refracted_shadows: Option<RefractedShadowSettings>,
    pub camera: CameraDescription,
    pub objects: Vec<ObjectDescription>,
    pub lights: Vec<LightDescription>,
}

impl Default for SceneDescription {
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
            camera: CameraDescription::default(),
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_from_str() {
        assert_eq!("phong".parse::<RenderMode>().unwrap(), RenderMode::Phong);
        assert_eq!("ZBuffer".parse::<RenderMode>().unwrap(), RenderMode::ZBuffer);
        assert!(matches!(
            "wireframe".parse::<RenderMode>(),
            Err(DescriptionError::UnsupportedMode(name)) if name == "wireframe"
        ));
    }
}
