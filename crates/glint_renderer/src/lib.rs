//! Glint Renderer - CPU Whitted-style ray tracing
//!
//! Analytic primitives, Phong and Gooch shading, mirror reflection,
//! refraction, soft shadows and a refracted-shadow pre-pass. Buckets are
//! rendered in parallel with rayon.
//!
//! # Example
//!
//! ```ignore
//! use glint_renderer::{compute_light_maps, load_scene, render};
//!
//! let scene = load_scene("scenes/glass.json")?;
//! let light_maps = compute_light_maps(&scene);
//! render(&scene, &light_maps).save_png("glass.png")?;
//! ```

mod bucket;
mod camera;
mod caustics;
mod hit;
mod light;
mod material;
mod object;
pub mod primitives;
mod renderer;
mod scene;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use caustics::{compute_light_maps, compute_light_maps_with, LightMaps};
pub use hit::Hit;
pub use light::{IlluminationModel, Light};
pub use material::Material;
pub use object::Object;
pub use primitives::Primitive;
pub use renderer::{
    color_to_rgba, render, render_pixel, ImageBuffer, RenderConfig, ShadeFn, Tracer,
};
pub use scene::{load_scene, LoadError, LoadResult, Scene};

/// Re-export the math types used throughout the public API
pub use glint_math::{Color, Point, Ray, Vec3};
