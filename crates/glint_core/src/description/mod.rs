//! Scene description support for Glint.
//!
//! This module reads JSON scene files into plain description types.
//! Textures are only referenced by path here; they are loaded when the
//! renderer assembles the scene.
//!
//! # Example
//!
//! ```ignore
//! use glint_core::description::parse_scene_description;
//!
//! let description = parse_scene_description(r#"{ "objects": [], "lights": [] }"#)?;
//! assert!(description.objects.is_empty());
//! ```

mod node;
mod parser;
mod types;

pub use parser::*;
pub use types::*;
