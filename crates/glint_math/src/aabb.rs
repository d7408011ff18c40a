use crate::{Interval, Point, Vec3};

/// Axis-aligned bounding box.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Aggregates use it to derive a conservative bounding sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// An AABB that contains nothing.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Smallest AABB containing every point of the iterator.
    ///
    /// An empty iterator yields [`Aabb::EMPTY`].
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Aabb::EMPTY, |bbox, p| bbox.include(p))
    }

    /// Grow the box so that it contains `p`.
    pub fn include(&self, p: Point) -> Self {
        Self {
            x: self.x.include(p.x),
            y: self.y.include(p.y),
            z: self.z.include(p.z),
        }
    }

    /// True when no point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }

    pub fn min(&self) -> Point {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Point {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Center of the box.
    pub fn center(&self) -> Point {
        Vec3::new(self.x.center(), self.y.center(), self.z.center())
    }

    /// Vector from the min corner to the max corner.
    pub fn diagonal(&self) -> Vec3 {
        self.max() - self.min()
    }
}
