/// Closed range `[min, max]` of doubles.
///
/// Colour channels are clamped to [`Interval::UNIT`], surface coordinates
/// are bounds-checked against a padded unit interval and bounding boxes are
/// built from one interval per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Contains nothing. Growing it with [`Interval::include`] yields the
    /// single included value.
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// `[0, 1]`.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.min).min(self.max)
    }

    /// Interval grown so that it contains `x`.
    pub fn include(&self, x: f64) -> Interval {
        Interval::new(self.min.min(x), self.max.max(x))
    }

    /// Interval padded by `delta` on both ends.
    pub fn expand(&self, delta: f64) -> Interval {
        Interval::new(self.min - delta, self.max + delta)
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}
