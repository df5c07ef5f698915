//! Connection routing
//!
//! A [`Router`] turns the resolved positions of a connection's explicit
//! anchors into the full list of on-screen points. Routers may insert anchors
//! of their own; those are flagged as implicit and are never persisted.

pub mod direct;
pub mod orthogonal;

pub use direct::DirectRouter;
pub use orthogonal::OrthogonalRouter;

use std::fmt;

use serde::Deserialize;

use crate::error::RouteError;
use crate::geometry::{BoundingBox, Point};
use crate::model::RoutedAnchor;

/// Routing mode for connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Straight segments between the explicit anchors
    #[default]
    Direct,
    /// Horizontal/vertical segments only
    Orthogonal,
}

/// Computes on-screen positions for a connection
pub trait Router: fmt::Debug {
    fn mode(&self) -> RoutingMode;

    /// Route through `explicit` (local coordinates, source to target).
    ///
    /// Every input point appears in the output, in order, with
    /// `implicit == false`. Points the router adds are marked implicit.
    fn route(&self, explicit: &[Point]) -> Result<Vec<RoutedAnchor>, RouteError>;
}

/// Edge of a bounding box for connection attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Get the attachment point on a bounding box edge
pub fn attachment_point(bounds: &BoundingBox, edge: Edge) -> Point {
    match edge {
        Edge::Top => Point::new(bounds.x + bounds.width / 2.0, bounds.y),
        Edge::Bottom => Point::new(bounds.x + bounds.width / 2.0, bounds.bottom()),
        Edge::Left => Point::new(bounds.x, bounds.y + bounds.height / 2.0),
        Edge::Right => Point::new(bounds.right(), bounds.y + bounds.height / 2.0),
    }
}

/// Determine the edge of `bounds` that faces `reference`.
///
/// The offset from the center is measured in half-extents so that wide boxes
/// prefer their long edges the same way square boxes prefer the nearest one.
pub fn facing_edge(bounds: &BoundingBox, reference: Point) -> Edge {
    let center = bounds.center();
    let dx = reference.x - center.x;
    let dy = reference.y - center.y;
    let half_w = (bounds.width / 2.0).max(f64::EPSILON);
    let half_h = (bounds.height / 2.0).max(f64::EPSILON);

    if (dx / half_w).abs() >= (dy / half_h).abs() {
        if dx >= 0.0 {
            Edge::Right
        } else {
            Edge::Left
        }
    } else if dy >= 0.0 {
        Edge::Bottom
    } else {
        Edge::Top
    }
}

pub(crate) fn ensure_routable(explicit: &[Point]) -> Result<(), RouteError> {
    if explicit.len() < 2 {
        return Err(RouteError::TooFewAnchors {
            count: explicit.len(),
        });
    }
    Ok(())
}
