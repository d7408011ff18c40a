//! JSON scene description parser.
//!
//! # Format
//!
//! ```json
//! {
//!   "mode": "phong",
//!   "max_iterations": 2,
//!   "camera": { "eye": [200, 200, 1000], "center": [200, 200, 0],
//!               "up": [0, 1, 0], "view_size": [400, 400] },
//!   "objects": [
//!     { "type": "sphere", "position": [90, 320, 100], "radius": 50,
//!       "material": { "color": [0, 0, 1], "ka": 0.2, "kd": 0.7, "ks": 0.5, "n": 64 } }
//!   ],
//!   "lights": [ { "position": [-200, 600, 1500], "color": [1, 1, 1] } ]
//! }
//! ```
//!
//! Optional fields fall back to their defaults when absent or malformed.
//! A broken required field drops only the object or light that holds it.
//! An unknown mode or a missing `objects`/`lights` array fails the whole file.

use std::path::Path;

use glint_math::{Color, Vec3};
use thiserror::Error;

use super::node::Node;
use super::types::*;

/// Errors that can occur while reading a scene description.
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value at {path}: {reason}")]
    InvalidField { path: String, reason: String },

    #[error("Unsupported render mode: {0}")]
    UnsupportedMode(String),

    #[error("Expected a list at {0}")]
    NotASequence(String),
}

/// Result type for description parsing.
pub type DescriptionResult<T> = Result<T, DescriptionError>;

/// Read and parse a scene description file.
pub fn load_scene_description<P: AsRef<Path>>(path: P) -> DescriptionResult<SceneDescription> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_scene_description(&content)
}

/// Parse a scene description from JSON text.
pub fn parse_scene_description(content: &str) -> DescriptionResult<SceneDescription> {
    let document: serde_json::Value = serde_json::from_str(content)?;
    let root = Node::root(&document);
    let defaults = SceneDescription::default();

    let mode = match root.child("mode") {
        None => defaults.mode,
        Some(node) => {
            let name: String = node
                .parse()
                .map_err(|_| DescriptionError::UnsupportedMode(node.path().to_string()))?;
            name.parse()?
        }
    };

    let shadows = object_or_default(&root, "shadows");
    let sampling = object_or_default(&root, "super_sampling");

    let mut scene = SceneDescription {
        mode,
        max_iterations: root.optional("max_iterations", defaults.max_iterations),
        near: root.optional("near", defaults.near),
        far: root.optional("far", defaults.far),
        soft_shadows: root.optional("soft_shadows", defaults.soft_shadows),
        shadow_edge_precision: shadows
            .as_ref()
            .map_or(defaults.shadow_edge_precision, |s| {
                s.optional("edge_precision", defaults.shadow_edge_precision)
            })
            .max(1),
        shadow_shade_precision: shadows
            .as_ref()
            .map_or(defaults.shadow_shade_precision, |s| {
                s.optional("shade_precision", defaults.shadow_shade_precision)
            })
            .max(1),
        super_sampling: sampling
            .as_ref()
            .map_or(defaults.super_sampling, |s| {
                s.optional("factor", defaults.super_sampling)
            })
            .max(1),
        gooch: object_or_default(&root, "gooch")
            .map_or_else(GoochParameters::default, |g| parse_gooch(&g)),
        refracted_shadows: object_or_default(&root, "refracted_shadows")
            .map(|r| parse_refracted_shadows(&r)),
        camera: parse_camera(&root),
        objects: Vec::new(),
        lights: Vec::new(),
    };

    for node in root.sequence("objects")? {
        match parse_object(&node) {
            Ok(object) => scene.objects.push(object),
            Err(err) => log::warn!("Skipping object {}: {}", node.path(), err),
        }
    }

    for node in root.sequence("lights")? {
        match parse_light(&node) {
            Ok(light) => scene.lights.push(light),
            Err(err) => log::warn!("Skipping light {}: {}", node.path(), err),
        }
    }

    Ok(scene)
}

/// A nested settings block, or `None` when absent or not an object.
fn object_or_default<'a>(parent: &Node<'a>, key: &str) -> Option<Node<'a>> {
    let child = parent.child(key)?;
    if child.is_object() {
        Some(child)
    } else {
        log::warn!("{} is not an object, using defaults", child.path());
        None
    }
}

fn vec3_optional(node: &Node<'_>, key: &str, default: Vec3) -> Vec3 {
    Vec3::from(node.optional(key, default.to_array()))
}

fn vec3_required(node: &Node<'_>, key: &str) -> DescriptionResult<Vec3> {
    Ok(Vec3::from(node.required::<[f64; 3]>(key)?))
}

fn color_optional(node: &Node<'_>, key: &str, default: Color) -> Color {
    let [r, g, b] = node.optional(key, default.to_array());
    Color::new(r, g, b)
}

fn parse_gooch(node: &Node<'_>) -> GoochParameters {
    let d = GoochParameters::default();
    GoochParameters {
        b: node.optional("b", d.b),
        y: node.optional("y", d.y),
        alpha: node.optional("alpha", d.alpha),
        beta: node.optional("beta", d.beta),
    }
}

fn parse_refracted_shadows(node: &Node<'_>) -> RefractedShadowSettings {
    let d = RefractedShadowSettings::default();
    let mut settings = RefractedShadowSettings {
        precision: node.optional("precision", d.precision),
        intensity: node.optional("intensity", d.intensity),
        map_size: node.optional("map_size", d.map_size).max(1),
        smoothing_radius: node.optional("smoothing_radius", d.smoothing_radius),
        max_extent: node.optional("max_extent", d.max_extent),
    };
    if !(settings.precision > 0.0) {
        log::warn!(
            "{}.precision must be positive, using {}",
            node.path(),
            d.precision
        );
        settings.precision = d.precision;
    }
    settings
}

fn parse_camera(root: &Node<'_>) -> CameraDescription {
    let d = CameraDescription::default();

    let Some(camera) = object_or_default(root, "camera") else {
        // older scene files only carry the eye position
        return CameraDescription {
            eye: vec3_optional(root, "eye", d.eye),
            ..d
        };
    };

    let [width, height] = camera.optional("view_size", [d.view_size.0, d.view_size.1]);
    let view_size = if width == 0 || height == 0 {
        log::warn!("{}.view_size must be non-zero, using default", camera.path());
        d.view_size
    } else {
        (width, height)
    };

    CameraDescription {
        eye: vec3_optional(&camera, "eye", d.eye),
        center: vec3_optional(&camera, "center", d.center),
        up: vec3_optional(&camera, "up", d.up),
        view_size,
    }
}

fn parse_material(object: &Node<'_>) -> MaterialDescription {
    let d = MaterialDescription::default();
    let Some(node) = object_or_default(object, "material") else {
        return d;
    };

    MaterialDescription {
        color: color_optional(&node, "color", d.color),
        texture: node.optional("texture", None),
        specular_map: node.optional("specular_map", None),
        normal_map: node.optional("normal_map", None),
        ka: node.optional("ka", d.ka),
        kd: node.optional("kd", d.kd),
        ks: node.optional("ks", d.ks),
        n: node.optional("n", d.n),
        refractive_index: node.optional("index", d.refractive_index),
        kind: node.optional("type", d.kind),
    }
}

fn parse_vertex(node: &Node<'_>) -> DescriptionResult<VertexDescription> {
    Ok(VertexDescription {
        position: vec3_required(node, "position")?,
        normal: node.optional::<Option<[f64; 3]>>("normal", None).map(Vec3::from),
        uv: node.optional("uv", [0.0, 0.0]),
    })
}

fn parse_triangle(node: &Node<'_>) -> DescriptionResult<[VertexDescription; 3]> {
    let vertices = node.elements()?;
    if vertices.len() != 3 {
        return Err(DescriptionError::InvalidField {
            path: node.path().to_string(),
            reason: format!("expected 3 vertices, found {}", vertices.len()),
        });
    }
    Ok([
        parse_vertex(&vertices[0])?,
        parse_vertex(&vertices[1])?,
        parse_vertex(&vertices[2])?,
    ])
}

fn parse_shape(node: &Node<'_>) -> DescriptionResult<ShapeDescription> {
    let kind: String = node.required("type")?;

    let shape = match kind.to_ascii_lowercase().as_str() {
        "sphere" => {
            let rotation = match node.child("rotation") {
                None => None,
                Some(rot) => match (
                    rot.required::<[f64; 3]>("axis"),
                    rot.required::<f64>("angle"),
                ) {
                    (Ok(axis), Ok(angle)) => Some((Vec3::from(axis), angle)),
                    (Err(err), _) | (_, Err(err)) => {
                        log::warn!("{}, ignoring rotation", err);
                        None
                    }
                },
            };
            ShapeDescription::Sphere {
                position: vec3_required(node, "position")?,
                radius: node.required("radius")?,
                rotation,
            }
        }
        "plane" => ShapeDescription::Plane {
            position: vec3_required(node, "position")?,
            normal: vec3_required(node, "normal")?,
            uv_scale: node.optional("uv_scale", 1.0),
        },
        "cone" => ShapeDescription::Cone {
            position: vec3_required(node, "position")?,
            side: vec3_required(node, "side")?,
            up: vec3_required(node, "up")?,
        },
        "triangle" => {
            let vertices = node
                .child("vertices")
                .ok_or_else(|| DescriptionError::MissingField(format!("{}.vertices", node.path())))?;
            ShapeDescription::Triangle {
                vertices: parse_triangle(&vertices)?,
            }
        }
        "mesh" => {
            let triangles = node
                .sequence("triangles")?
                .iter()
                .map(parse_triangle)
                .collect::<DescriptionResult<Vec<_>>>()?;
            ShapeDescription::Mesh { triangles }
        }
        "quad" => ShapeDescription::Quad {
            origin: vec3_required(node, "origin")?,
            side: vec3_required(node, "side")?,
            up: vec3_required(node, "up")?,
        },
        "box" => ShapeDescription::Box {
            origin: vec3_required(node, "origin")?,
            side: vec3_required(node, "side")?,
            up: vec3_required(node, "up")?,
            depth: vec3_required(node, "depth")?,
        },
        other => {
            return Err(DescriptionError::InvalidField {
                path: format!("{}.type", node.path()),
                reason: format!("unknown object type '{}'", other),
            })
        }
    };

    Ok(shape)
}

fn parse_object(node: &Node<'_>) -> DescriptionResult<ObjectDescription> {
    if !node.is_object() {
        return Err(DescriptionError::InvalidField {
            path: node.path().to_string(),
            reason: "expected an object".to_string(),
        });
    }
    Ok(ObjectDescription {
        shape: parse_shape(node)?,
        material: parse_material(node),
    })
}

fn parse_light(node: &Node<'_>) -> DescriptionResult<LightDescription> {
    Ok(LightDescription {
        position: vec3_required(node, "position")?,
        color: color_optional(node, "color", Color::WHITE),
        size: node.optional("size", 0.0_f64).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_minimal_scene() {
        let scene = parse_scene_description(r#"{ "objects": [], "lights": [] }"#).unwrap();
        assert_eq!(scene, SceneDescription::default());
        assert_eq!(scene.camera.eye, Vec3::new(200.0, 200.0, 1000.0));
        assert_eq!(scene.camera.view_size, (400, 400));
    }

    #[test]
    fn test_full_scene() {
        let scene = parse_scene_description(
            r#"{
                "mode": "gooch",
                "max_iterations": 3,
                "soft_shadows": true,
                "shadows": { "edge_precision": 4, "shade_precision": 3 },
                "super_sampling": { "factor": 2 },
                "gooch": { "b": 0.5 },
                "refracted_shadows": { "precision": 0.02 },
                "camera": { "eye": [0, 0, 10], "center": [0, 0, 0], "up": [0, 2, 0], "view_size": [64, 32] },
                "objects": [
                    { "type": "sphere", "position": [1, 2, 3], "radius": 4,
                      "rotation": { "axis": [0, 0, 1], "angle": 90 },
                      "material": { "color": [1, 0, 0], "ks": 0.5, "n": 16, "type": "reflection" } },
                    { "type": "plane", "position": [0, -1, 0], "normal": [0, 1, 0], "uv_scale": 10 },
                    { "type": "box", "origin": [0, 0, 0], "side": [1, 0, 0], "up": [0, 1, 0], "depth": [0, 0, -1] }
                ],
                "lights": [ { "position": [0, 10, 0], "color": [0.5, 0.5, 0.5], "size": 2 } ]
            }"#,
        )
        .unwrap();

        assert_eq!(scene.mode, RenderMode::Gooch);
        assert_eq!(scene.max_iterations, 3);
        assert!(scene.soft_shadows);
        assert_eq!(scene.shadow_edge_precision, 4);
        assert_eq!(scene.shadow_shade_precision, 3);
        assert_eq!(scene.super_sampling, 2);
        assert_eq!(scene.gooch.b, 0.5);
        assert_eq!(scene.gooch.beta, 0.6);
        let refracted = scene.refracted_shadows.unwrap();
        assert_eq!(refracted.precision, 0.02);
        assert_eq!(refracted.map_size, 256);
        assert_eq!(scene.camera.up, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(scene.camera.view_size, (64, 32));

        assert_eq!(scene.objects.len(), 3);
        match &scene.objects[0].shape {
            ShapeDescription::Sphere { position, radius, rotation } => {
                assert_eq!(*position, Vec3::new(1.0, 2.0, 3.0));
                assert_eq!(*radius, 4.0);
                assert_eq!(*rotation, Some((Vec3::Z, 90.0)));
            }
            other => panic!("unexpected shape {:?}", other),
        }
        let material = &scene.objects[0].material;
        assert_eq!(material.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(material.kind, MaterialKind::Reflection);
        assert_eq!(material.ks, 0.5);
        assert_eq!(material.ka, 0.2);
        assert_eq!(scene.objects[1].shape.type_name(), "plane");
        assert_eq!(scene.objects[2].shape.type_name(), "box");

        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.lights[0].size, 2.0);
        assert_eq!(scene.lights[0].color, Color::splat(0.5));
    }

    #[test]
    fn test_broken_objects_and_lights_are_skipped() {
        let scene = parse_scene_description(
            r#"{
                "objects": [
                    { "type": "sphere", "position": [0, 0, 0] },
                    { "type": "teapot" },
                    { "type": "sphere", "position": [0, 0, 0], "radius": 1 },
                    42
                ],
                "lights": [ { "color": [1, 1, 1] }, { "position": [0, 5, 0] } ]
            }"#,
        )
        .unwrap();

        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.lights[0].color, Color::WHITE);
    }

    #[test]
    fn test_malformed_optional_fields_use_defaults() {
        let scene = parse_scene_description(
            r#"{
                "max_iterations": "lots",
                "camera": { "eye": "here", "view_size": [0, 10] },
                "objects": [
                    { "type": "sphere", "position": [0, 0, 0], "radius": 1,
                      "material": { "kd": "high", "color": [2, -1, 0.5] } }
                ],
                "lights": []
            }"#,
        )
        .unwrap();

        assert_eq!(scene.max_iterations, 0);
        assert_eq!(scene.camera.eye, CameraDescription::default().eye);
        assert_eq!(scene.camera.view_size, (400, 400));
        assert_eq!(scene.objects[0].material.kd, 0.8);
        // colours are clamped rather than rejected
        assert_eq!(scene.objects[0].material.color, Color::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_legacy_eye() {
        let scene =
            parse_scene_description(r#"{ "eye": [1, 2, 3], "objects": [], "lights": [] }"#).unwrap();
        assert_eq!(scene.camera.eye, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.camera.center, CameraDescription::default().center);
    }

    #[test]
    fn test_unsupported_mode_is_fatal() {
        let result = parse_scene_description(r#"{ "mode": "wireframe", "objects": [], "lights": [] }"#);
        assert!(matches!(result, Err(DescriptionError::UnsupportedMode(_))));
    }

    #[test]
    fn test_missing_object_list_is_fatal() {
        let result = parse_scene_description(r#"{ "lights": [] }"#);
        assert!(matches!(result, Err(DescriptionError::MissingField(f)) if f == "objects"));

        let result = parse_scene_description(r#"{ "objects": {}, "lights": [] }"#);
        assert!(matches!(result, Err(DescriptionError::NotASequence(_))));
    }

    #[test]
    fn test_mesh_and_triangle() {
        let scene = parse_scene_description(
            r#"{
                "objects": [
                    { "type": "triangle", "vertices": [
                        { "position": [0, 0, 0], "uv": [0, 0] },
                        { "position": [1, 0, 0], "uv": [1, 0], "normal": [0, 0, 1] },
                        { "position": [0, 1, 0], "uv": [0, 1] } ] },
                    { "type": "mesh", "triangles": [
                        [ { "position": [0, 0, 0] }, { "position": [1, 0, 0] }, { "position": [0, 1, 0] } ],
                        [ { "position": [1, 0, 0] }, { "position": [1, 1, 0] }, { "position": [0, 1, 0] } ] ] },
                    { "type": "mesh", "triangles": [ [ { "position": [0, 0, 0] } ] ] }
                ],
                "lights": []
            }"#,
        )
        .unwrap();

        assert_eq!(scene.objects.len(), 2);
        match &scene.objects[0].shape {
            ShapeDescription::Triangle { vertices } => {
                assert_eq!(vertices[1].normal, Some(Vec3::Z));
                assert_eq!(vertices[0].normal, None);
                assert_eq!(vertices[2].uv, [0.0, 1.0]);
            }
            other => panic!("unexpected shape {:?}", other),
        }
        match &scene.objects[1].shape {
            ShapeDescription::Mesh { triangles } => assert_eq!(triangles.len(), 2),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_scene_description("{ not json"),
            Err(DescriptionError::Json(_))
        ));
    }
}
