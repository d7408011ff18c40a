//! Texture loading and caching for materials.
//!
//! Textures hold clamped colours decoded straight from 8-bit channels, with
//! no colour-space conversion, so a PNG read and written back is unchanged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::Color;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported texture format: {0}")]
    UnsupportedFormat(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A 2D grid of colours, row-major with row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    pub pixels: Vec<Color>,

    /// Original file path (for debugging)
    pub path: String,
}

/// Wrap a coordinate into [0, 1), negative values included.
#[inline]
fn wrap_unit(x: f64) -> f64 {
    let wrapped = x - x.floor();
    if wrapped.is_finite() {
        wrapped
    } else {
        0.0
    }
}

impl Texture {
    /// Create a black texture.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width as usize) * (height as usize)],
            path: "<memory>".to_string(),
        }
    }

    /// Create a texture from pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            path: "<solid>".to_string(),
        }
    }

    /// Integer pixel lookup. Coordinates wrap around at the edges.
    pub fn pixel(&self, x: i64, y: i64) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.pixels
            .get(y * self.width as usize + x)
            .copied()
            .unwrap_or(Color::BLACK)
    }

    /// Overwrite a pixel. Out-of-range coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) as usize;
        if let Some(pixel) = self.pixels.get_mut(idx) {
            *pixel = color;
        }
    }

    /// Nearest-texel lookup at normalized coordinates.
    ///
    /// `u` and `v` wrap into [0, 1) first, then index
    /// `floor(u * (width - 1)), floor(v * (height - 1))`.
    pub fn color_at(&self, u: f64, v: f64) -> Color {
        let (x, y) = self.texel_for(u, v);
        self.pixel(x as i64, y as i64)
    }

    /// Texel addressed by normalized coordinates, after wrapping.
    pub fn texel_for(&self, u: f64, v: f64) -> (u32, u32) {
        let x = (wrap_unit(u) * (self.width.saturating_sub(1)) as f64) as u32;
        let y = (wrap_unit(v) * (self.height.saturating_sub(1)) as f64) as u32;
        (x, y)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Color>()
    }

    /// Encode as 8-bit RGB. The format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> TextureResult<()> {
        let mut img = image::RgbImage::new(self.width, self.height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb(self.pixel(x as i64, y as i64).to_rgb8());
        }
        img.save(path.as_ref())?;
        Ok(())
    }
}

/// Cache for loaded textures.
///
/// Textures are loaded on-demand and cached for reuse.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f64 / 1024.0
        );

        Ok(texture)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::UnsupportedFormat(format!(
            "{} has no pixels",
            path.display()
        )));
    }

    let pixels: Vec<Color> = rgb.pixels().map(|p| Color::from_rgb8(p.0)).collect();

    Ok(Texture::from_pixels(
        width,
        height,
        pixels,
        path.to_string_lossy().to_string(),
    ))
}
