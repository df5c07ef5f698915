//! Geometry primitives shared by routing and bend editing

use std::ops::{Add, Mul, Sub};

/// A 2D point (or vector) in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin / zero vector
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean length when interpreted as a vector
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (other - *self).length()
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// 2D cross product (z component)
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// True if the vector is shorter than `epsilon`
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.length() < epsilon
    }

    /// Check whether two vectors lie on the same line, in either direction.
    ///
    /// The cross product is compared relative to the vector lengths so the
    /// test does not depend on the scale of the drawing.
    pub fn is_parallel_to(&self, other: Point, epsilon: f64) -> bool {
        let scale = self.length() * other.length();
        if scale < epsilon {
            return false;
        }
        (self.cross(other) / scale).abs() < epsilon
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Orientation of an axis-aligned segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Classify the segment `from -> to`.
    ///
    /// A segment whose vertical extent is within `tolerance` is horizontal;
    /// everything else counts as vertical.
    pub fn of_segment(from: Point, to: Point, tolerance: f64) -> Self {
        if (to.y - from.y).abs() <= tolerance {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// The coordinate that stays constant along a segment of this orientation
    pub fn axis_position(&self, point: Point) -> f64 {
        match self {
            Orientation::Horizontal => point.y,
            Orientation::Vertical => point.x,
        }
    }

    /// Replace the constant coordinate of `point` with `value`
    pub fn with_axis_position(&self, point: Point, value: f64) -> Point {
        match self {
            Orientation::Horizontal => Point::new(point.x, value),
            Orientation::Vertical => Point::new(value, point.y),
        }
    }
}

/// A bounding box representing the spatial extent of a part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this bounding box contains a point
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}
