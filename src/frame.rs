//! Coordinate frame of a connector.
//!
//! Anchor positions are stored in the connector's local coordinate system,
//! while pointer input and part bounds live in scene coordinates. A [`Frame`]
//! maps between the two:
//!
//! ```text
//! scene = origin + R(angle) * local
//! local = R(-angle) * (scene - origin)
//! ```
//!
//! Rotation uses the SVG convention: clockwise positive angles, in degrees,
//! with the Y-axis pointing down.

use crate::geometry::Point;

/// Placement of a connector's local coordinate system inside the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Scene position of the local origin
    pub origin: Point,
    /// Rotation of the local axes in degrees (clockwise positive)
    pub angle_degrees: f64,
}

impl Frame {
    pub fn new(origin: Point, angle_degrees: f64) -> Self {
        Self {
            origin,
            angle_degrees,
        }
    }

    /// A frame whose local coordinates equal scene coordinates
    pub fn identity() -> Self {
        Self::new(Point::zero(), 0.0)
    }

    /// A frame that only translates
    pub fn translated(origin: Point) -> Self {
        Self::new(origin, 0.0)
    }

    fn is_unrotated(&self) -> bool {
        self.angle_degrees.abs() < f64::EPSILON
    }

    fn rotate(point: Point, angle_degrees: f64) -> Point {
        let radians = angle_degrees.to_radians();
        let cos_a = radians.cos();
        let sin_a = radians.sin();
        // [cos  -sin] [x]
        // [sin   cos] [y]
        Point {
            x: point.x * cos_a - point.y * sin_a,
            y: point.x * sin_a + point.y * cos_a,
        }
    }

    /// Convert a local position into scene coordinates
    pub fn local_to_scene(&self, local: Point) -> Point {
        if self.is_unrotated() {
            return self.origin + local;
        }
        self.origin + Self::rotate(local, self.angle_degrees)
    }

    /// Convert a scene position into local coordinates
    pub fn scene_to_local(&self, scene: Point) -> Point {
        let offset = scene - self.origin;
        if self.is_unrotated() {
            return offset;
        }
        Self::rotate(offset, -self.angle_degrees)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}
