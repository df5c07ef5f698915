//! Orthogonal routing with horizontal/vertical segments

use crate::error::RouteError;
use crate::geometry::{Orientation, Point};
use crate::model::RoutedAnchor;

use super::{ensure_routable, Router, RoutingMode};

/// Offsets below this are treated as axis-aligned
pub const ALIGN_EPSILON: f64 = 1e-6;

/// Inserts one implicit corner between consecutive explicit anchors that are
/// not axis-aligned.
///
/// The corner goes horizontal-first, except after a horizontal segment where
/// it goes vertical-first so that the path keeps alternating direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrthogonalRouter;

impl Router for OrthogonalRouter {
    fn mode(&self) -> RoutingMode {
        RoutingMode::Orthogonal
    }

    fn route(&self, explicit: &[Point]) -> Result<Vec<RoutedAnchor>, RouteError> {
        ensure_routable(explicit)?;

        let mut routed = Vec::with_capacity(explicit.len() * 2);
        routed.push(RoutedAnchor::explicit(explicit[0]));
        let mut incoming: Option<Orientation> = None;

        for pair in explicit.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let dx = (to.x - from.x).abs();
            let dy = (to.y - from.y).abs();

            if dx <= ALIGN_EPSILON && dy <= ALIGN_EPSILON {
                // Coincident points keep the previous direction
            } else if dy <= ALIGN_EPSILON {
                incoming = Some(Orientation::Horizontal);
            } else if dx <= ALIGN_EPSILON {
                incoming = Some(Orientation::Vertical);
            } else if incoming == Some(Orientation::Horizontal) {
                routed.push(RoutedAnchor::implicit(Point::new(from.x, to.y)));
                incoming = Some(Orientation::Horizontal);
            } else {
                routed.push(RoutedAnchor::implicit(Point::new(to.x, from.y)));
                incoming = Some(Orientation::Vertical);
            }

            routed.push(RoutedAnchor::explicit(to));
        }

        Ok(routed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_points_get_no_corner() {
        let routed = OrthogonalRouter
            .route(&[Point::new(0.0, 50.0), Point::new(100.0, 50.0)])
            .unwrap();
        assert_eq!(routed.len(), 2);
    }

    #[test]
    fn test_corner_is_horizontal_first() {
        let routed = OrthogonalRouter
            .route(&[Point::new(0.0, 0.0), Point::new(100.0, 50.0)])
            .unwrap();
        assert_eq!(routed.len(), 3);
        assert_eq!(routed[1], RoutedAnchor::implicit(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_corner_after_horizontal_segment_is_vertical_first() {
        let routed = OrthogonalRouter
            .route(&[
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(100.0, 80.0),
            ])
            .unwrap();
        assert_eq!(routed.len(), 4);
        assert_eq!(routed[2], RoutedAnchor::implicit(Point::new(50.0, 80.0)));
        assert!(!routed[3].implicit);
    }

    #[test]
    fn test_every_segment_is_axis_aligned() {
        let routed = OrthogonalRouter
            .route(&[
                Point::new(0.0, 0.0),
                Point::new(30.0, 70.0),
                Point::new(90.0, 10.0),
                Point::new(140.0, 95.0),
            ])
            .unwrap();
        for pair in routed.windows(2) {
            let d = pair[1].position - pair[0].position;
            assert!(d.x.abs() <= ALIGN_EPSILON || d.y.abs() <= ALIGN_EPSILON);
        }
    }
}
