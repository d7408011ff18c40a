//! RGB colour with channels clamped to [0, 1].

use std::ops::{Add, AddAssign, Div, Mul, Sub};

use crate::{Interval, Vec3};

/// An RGB colour whose channels always lie in [0, 1].
///
/// Every constructor, setter and arithmetic result clamps, so an
/// out-of-range value can never be observed. NaN is stored as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

#[inline]
fn clamp_channel(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        Interval::UNIT.clamp(value)
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Grey colour with all channels set to `value`.
    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn set_r(&mut self, value: f64) {
        self.r = clamp_channel(value);
    }

    pub fn set_g(&mut self, value: f64) {
        self.g = clamp_channel(value);
    }

    pub fn set_b(&mut self, value: f64) {
        self.b = clamp_channel(value);
    }

    /// Channels as a plain array.
    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Per-channel maximum.
    pub fn max(self, other: Color) -> Color {
        Color {
            r: self.r.max(other.r),
            g: self.g.max(other.g),
            b: self.b.max(other.b),
        }
    }

    /// Convert to 8-bit RGB, rounding to the nearest level.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
        ]
    }

    /// Build a colour from 8-bit channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f64 / 255.0,
            rgb[1] as f64 / 255.0,
            rgb[2] as f64 / 255.0,
        )
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Color::new(v.x, v.y, v.z)
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, rhs: f64) -> Color {
        Color::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, rhs: f64) -> Color {
        Color::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}
