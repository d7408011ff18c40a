//! Renderable scene and its construction from a scene description.

use std::path::Path;

use glint_core::{
    load_scene_description, DescriptionError, MaterialDescription, SceneDescription,
    ShapeDescription, TextureCache, TextureError, VertexDescription,
};
use glint_math::{Ray, Vec3};
use thiserror::Error;

use crate::primitives::{
    BoxShape, Cone, Plane, Primitive, Quadrilateral, Sphere, Triangle, TriangleAggregate, Vertex,
};
use crate::{Camera, Hit, Light, Material, Object, RenderConfig};

/// Errors that can occur while turning a scene file into a [`Scene`].
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Scene description error: {0}")]
    Description(#[from] DescriptionError),

    /// Missing or unreadable texture maps abort the load.
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

/// Result type for scene loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Objects, lights, camera and render settings.
///
/// Immutable while rendering. Objects and lights are addressed by their
/// index, which is also how light maps are keyed.
#[derive(Debug)]
pub struct Scene {
    pub objects: Vec<Object>,
    pub lights: Vec<Light>,
    pub camera: Camera,
    pub config: RenderConfig,
}

impl Scene {
    pub fn new(camera: Camera, config: RenderConfig) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            camera,
            config,
        }
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Nearest hit over all objects by linear scan.
    ///
    /// Ties go to the object listed first.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<(usize, Hit)> {
        let mut nearest: Option<(usize, Hit)> = None;
        for (index, object) in self.objects.iter().enumerate() {
            let hit = object.intersect(ray);
            if !hit.is_hit() {
                continue;
            }
            match nearest {
                Some((_, best)) if best.distance <= hit.distance => {}
                _ => nearest = Some((index, hit)),
            }
        }
        nearest
    }

    /// Build a scene, loading every referenced texture through `textures`.
    pub fn from_description(
        description: &SceneDescription,
        textures: &mut TextureCache,
    ) -> LoadResult<Self> {
        let camera = Camera::from_description(&description.camera);
        let mut scene = Scene::new(camera, RenderConfig::from_description(description));

        for (index, object) in description.objects.iter().enumerate() {
            let Some(shape) = build_shape(&object.shape) else {
                log::warn!(
                    "Skipping object {}: {} has no usable geometry",
                    index,
                    object.shape.type_name()
                );
                continue;
            };
            let material = build_material(&object.material, textures)?;
            scene.add_object(Object::from_boxed(shape, material));
        }

        for light in &description.lights {
            scene.add_light(Light::new(light.position, light.color).with_size(light.size));
        }

        log::debug!(
            "Built scene with {} objects, {} lights, {} textures",
            scene.object_count(),
            scene.light_count(),
            textures.len()
        );
        Ok(scene)
    }
}

/// Read a scene file. Texture paths resolve relative to the file.
///
/// # Example
///
/// ```ignore
/// use glint_renderer::load_scene;
///
/// let scene = load_scene("scenes/glass.json")?;
/// println!("{} objects", scene.object_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let description = load_scene_description(path)?;

    let mut textures = match path.parent() {
        Some(dir) => TextureCache::with_base_dir(dir),
        None => TextureCache::new(),
    };
    Scene::from_description(&description, &mut textures)
}

fn vertex(description: &VertexDescription) -> Vertex {
    Vertex::new(
        description.position,
        description.normal.unwrap_or(Vec3::ZERO),
        description.uv,
    )
}

fn triangle(vertices: &[VertexDescription; 3]) -> Triangle {
    let [a, b, c] = vertices;
    Triangle::new(vertex(a), vertex(b), vertex(c))
}

/// `None` for shapes that can never be hit.
fn build_shape(shape: &ShapeDescription) -> Option<Box<dyn Primitive>> {
    let primitive: Box<dyn Primitive> = match shape {
        ShapeDescription::Sphere {
            position,
            radius,
            rotation,
        } => {
            let sphere = Sphere::new(*position, *radius);
            match rotation {
                Some((axis, angle)) => Box::new(sphere.with_rotation(*axis, *angle)),
                None => Box::new(sphere),
            }
        }
        ShapeDescription::Plane {
            position,
            normal,
            uv_scale,
        } => Box::new(Plane::with_uv_scale(*position, *normal, *uv_scale)),
        ShapeDescription::Cone { position, side, up } => Box::new(Cone::new(*position, *side, *up)),
        ShapeDescription::Triangle { vertices } => Box::new(triangle(vertices)),
        ShapeDescription::Mesh { triangles } => {
            if triangles.is_empty() {
                return None;
            }
            Box::new(TriangleAggregate::new(triangles.iter().map(triangle).collect()))
        }
        ShapeDescription::Quad { origin, side, up } => {
            Box::new(Quadrilateral::new(*origin, *side, *up))
        }
        ShapeDescription::Box {
            origin,
            side,
            up,
            depth,
        } => Box::new(BoxShape::new(*origin, *side, *up, *depth)),
    };
    Some(primitive)
}

fn build_material(
    description: &MaterialDescription,
    textures: &mut TextureCache,
) -> LoadResult<Material> {
    let mut load = |path: &Option<String>| -> LoadResult<_> {
        path.as_deref()
            .map(|p| textures.load(p))
            .transpose()
            .map_err(LoadError::from)
    };

    Ok(Material {
        color: description.color,
        texture: load(&description.texture)?,
        specular_map: load(&description.specular_map)?,
        normal_map: load(&description.normal_map)?,
        ka: description.ka,
        kd: description.kd,
        ks: description.ks,
        n: description.n,
        refractive_index: description.refractive_index,
        kind: description.kind,
    })
}
