//! Bucket-based tile rendering.
//!
//! The image is split into square buckets rendered independently by
//! rayon workers. Each bucket owns its pixels until the final copy into
//! the image buffer.

use glint_math::Color;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Squared distance between the bucket centre and `(cx, cy)`.
    fn distance_sq_to(&self, cx: f64, cy: f64) -> f64 {
        let bx = self.x as f64 + self.width as f64 / 2.0;
        let by = self.y as f64 + self.height as f64 / 2.0;
        (bx - cx).powi(2) + (by - cy).powi(2)
    }
}

/// Default bucket side in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Buckets covering a `width × height` image, centre first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += size;
        }
        y += size;
    }

    sort_spiral(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }
    buckets
}

/// Sort buckets by distance from the image centre.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    buckets.sort_by(|a, b| a.distance_sq_to(cx, cy).total_cmp(&b.distance_sq_to(cx, cy)));
}

/// Render a bucket pixel by pixel with `shade(x, y)`.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket<F>(bucket: &Bucket, shade: F) -> Vec<Color>
where
    F: Fn(u32, u32) -> Color,
{
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);
    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(shade(bucket.x + local_x, bucket.y + local_y));
        }
    }
    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}
