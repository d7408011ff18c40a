//! Glint Core - scene descriptions and texture I/O.
//!
//! This crate provides:
//!
//! - **Scene descriptions**: JSON scene files parsed into plain structs with
//!   per-field defaults (`SceneDescription`, `ObjectDescription`, ...)
//! - **Textures**: decoded images sampled by pixel or by UV, plus a
//!   path-keyed `TextureCache`
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene_description;
//!
//! let description = load_scene_description("scenes/spheres.json")?;
//! println!("{} objects, {} lights",
//!     description.objects.len(),
//!     description.lights.len());
//! ```

pub mod description;
pub mod texture;

pub use description::{
    load_scene_description, parse_scene_description, CameraDescription, DescriptionError,
    DescriptionResult, GoochParameters, LightDescription, MaterialDescription, MaterialKind,
    ObjectDescription, RefractedShadowSettings, RenderMode, SceneDescription, ShapeDescription,
    VertexDescription,
};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
