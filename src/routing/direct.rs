//! Straight-line routing

use crate::error::RouteError;
use crate::geometry::Point;
use crate::model::RoutedAnchor;

use super::{ensure_routable, Router, RoutingMode};

/// Connects the explicit anchors with straight segments and never inserts
/// anchors of its own
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRouter;

impl Router for DirectRouter {
    fn mode(&self) -> RoutingMode {
        RoutingMode::Direct
    }

    fn route(&self, explicit: &[Point]) -> Result<Vec<RoutedAnchor>, RouteError> {
        ensure_routable(explicit)?;
        Ok(explicit.iter().copied().map(RoutedAnchor::explicit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_route_keeps_points() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(40.0, 70.0),
            Point::new(100.0, 0.0),
        ];
        let routed = DirectRouter.route(&points).unwrap();
        assert_eq!(routed.len(), 3);
        assert!(routed.iter().all(|a| !a.implicit));
        assert_eq!(routed[1].position, Point::new(40.0, 70.0));
    }

    #[test]
    fn test_direct_route_rejects_single_point() {
        let err = DirectRouter.route(&[Point::zero()]).unwrap_err();
        assert_eq!(err, RouteError::TooFewAnchors { count: 1 });
    }
}
