//! Routing-dependent editing behaviour

use crate::geometry::{Orientation, Point};
use crate::routing::RoutingMode;

/// How bend editing adapts to the connection's router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingStrategy {
    /// Any segment direction is allowed
    #[default]
    FreeForm,
    /// Segments are horizontal or vertical; enables axis-constrained drags,
    /// segment overlay removal, attachment hints and normalization
    Orthogonal,
}

impl From<RoutingMode> for RoutingStrategy {
    fn from(mode: RoutingMode) -> Self {
        match mode {
            RoutingMode::Direct => RoutingStrategy::FreeForm,
            RoutingMode::Orthogonal => RoutingStrategy::Orthogonal,
        }
    }
}

impl RoutingStrategy {
    pub fn is_orthogonal(&self) -> bool {
        matches!(self, RoutingStrategy::Orthogonal)
    }

    /// Whether the anchor at `explicit_index` may attach to a part.
    ///
    /// Only the first and last explicit anchors qualify; interior points
    /// never re-attach.
    pub fn can_connect(&self, explicit_index: usize, explicit_count: usize) -> bool {
        explicit_index == 0 || explicit_index + 1 == explicit_count
    }

    /// Constrain the pointer position of a drag.
    ///
    /// With an orthogonal router and a two-point (segment) selection, the
    /// drag is limited to the axis perpendicular to the segment: a horizontal
    /// segment only slides vertically, a vertical one only horizontally.
    /// `selection` holds the scene positions of the selected points before
    /// the drag.
    pub fn constrain_pointer(
        &self,
        initial: Point,
        current: Point,
        selection: &[Point],
        axis_tolerance: f64,
    ) -> Point {
        match (self, selection) {
            (RoutingStrategy::Orthogonal, [a, b]) => {
                match Orientation::of_segment(*a, *b, axis_tolerance) {
                    Orientation::Horizontal => Point::new(initial.x, current.y),
                    Orientation::Vertical => Point::new(current.x, initial.y),
                }
            }
            _ => current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_mode() {
        assert_eq!(
            RoutingStrategy::from(RoutingMode::Orthogonal),
            RoutingStrategy::Orthogonal
        );
        assert_eq!(
            RoutingStrategy::from(RoutingMode::Direct),
            RoutingStrategy::FreeForm
        );
    }

    #[test]
    fn test_can_connect_only_ends() {
        let strategy = RoutingStrategy::Orthogonal;
        assert!(strategy.can_connect(0, 4));
        assert!(strategy.can_connect(3, 4));
        assert!(!strategy.can_connect(1, 4));
        assert!(!strategy.can_connect(2, 4));
    }

    #[test]
    fn test_horizontal_segment_slides_vertically() {
        let selection = [Point::new(0.0, 50.0), Point::new(100.0, 50.0)];
        let p = RoutingStrategy::Orthogonal.constrain_pointer(
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            &selection,
            1.0,
        );
        assert_eq!(p, Point::new(0.0, 5.0));
    }

    #[test]
    fn test_vertical_segment_slides_horizontally() {
        let selection = [Point::new(50.0, 0.0), Point::new(50.0, 100.0)];
        let p = RoutingStrategy::Orthogonal.constrain_pointer(
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            &selection,
            1.0,
        );
        assert_eq!(p, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_free_form_is_unconstrained() {
        let selection = [Point::new(0.0, 50.0), Point::new(100.0, 50.0)];
        let p = RoutingStrategy::FreeForm.constrain_pointer(
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            &selection,
            1.0,
        );
        assert_eq!(p, Point::new(10.0, 5.0));
    }
}
