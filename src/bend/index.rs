//! Translation between explicit and connection indices.
//!
//! An *explicit index* addresses the connection's [`AnchorSpec`] list. A
//! *connection index* addresses the router output, where implicit anchors
//! are interleaved with the explicit ones:
//!
//! ```text
//! connection index:  0   1   2   3   4
//! router output:     E   i   E   i   E
//! explicit index:    0       1       2
//! ```
//!
//! [`AnchorSpec`]: crate::model::AnchorSpec

use crate::error::BendError;
use crate::model::RoutedAnchor;

/// True if the router did not insert the anchor at `connection_index`
pub fn is_explicit(routed: &[RoutedAnchor], connection_index: usize) -> bool {
    routed
        .get(connection_index)
        .is_some_and(|anchor| !anchor.implicit)
}

/// Number of explicit anchors in the router output
pub fn explicit_count(routed: &[RoutedAnchor]) -> usize {
    routed.iter().filter(|anchor| !anchor.implicit).count()
}

fn check_connection_index(routed: &[RoutedAnchor], connection_index: usize) -> Result<(), BendError> {
    if connection_index >= routed.len() {
        return Err(BendError::ConnectionIndexOutOfRange {
            index: connection_index,
            count: routed.len(),
        });
    }
    Ok(())
}

/// Explicit index of the nearest explicit anchor at or before `connection_index`
pub fn explicit_index_at_or_before(
    routed: &[RoutedAnchor],
    connection_index: usize,
) -> Result<usize, BendError> {
    check_connection_index(routed, connection_index)?;
    let seen = explicit_count(&routed[..=connection_index]);
    seen.checked_sub(1)
        .ok_or(BendError::ImplicitStart { connection_index })
}

/// Explicit index of the nearest explicit anchor at or after `connection_index`
pub fn explicit_index_at_or_after(
    routed: &[RoutedAnchor],
    connection_index: usize,
) -> Result<usize, BendError> {
    check_connection_index(routed, connection_index)?;
    if explicit_count(&routed[connection_index..]) == 0 {
        return Err(BendError::NoExplicitAtOrAfter { connection_index });
    }
    Ok(explicit_count(&routed[..connection_index]))
}

/// Connection index of the explicit anchor at `explicit_index`
pub fn visual_index(routed: &[RoutedAnchor], explicit_index: usize) -> Result<usize, BendError> {
    routed
        .iter()
        .enumerate()
        .filter(|(_, anchor)| !anchor.implicit)
        .nth(explicit_index)
        .map(|(i, _)| i)
        .ok_or_else(|| BendError::VisualIndexOutOfRange {
            explicit_index,
            explicit_count: explicit_count(routed),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    /// Explicit at {0, 2, 4}, implicit at {1, 3}
    fn interleaved() -> Vec<RoutedAnchor> {
        (0..5)
            .map(|i| {
                let p = Point::new(i as f64 * 10.0, 0.0);
                if i % 2 == 0 {
                    RoutedAnchor::explicit(p)
                } else {
                    RoutedAnchor::implicit(p)
                }
            })
            .collect()
    }

    #[test]
    fn test_at_or_after_implicit() {
        assert_eq!(explicit_index_at_or_after(&interleaved(), 1).unwrap(), 1);
        assert_eq!(explicit_index_at_or_after(&interleaved(), 3).unwrap(), 2);
    }

    #[test]
    fn test_at_or_before_implicit() {
        assert_eq!(explicit_index_at_or_before(&interleaved(), 1).unwrap(), 0);
        assert_eq!(explicit_index_at_or_before(&interleaved(), 3).unwrap(), 1);
    }

    #[test]
    fn test_explicit_positions_map_to_themselves() {
        let routed = interleaved();
        for (ci, ei) in [(0, 0), (2, 1), (4, 2)] {
            assert_eq!(explicit_index_at_or_before(&routed, ci).unwrap(), ei);
            assert_eq!(explicit_index_at_or_after(&routed, ci).unwrap(), ei);
        }
    }

    #[test]
    fn test_visual_index() {
        let routed = interleaved();
        assert_eq!(visual_index(&routed, 0).unwrap(), 0);
        assert_eq!(visual_index(&routed, 1).unwrap(), 2);
        assert_eq!(visual_index(&routed, 2).unwrap(), 4);
    }

    #[test]
    fn test_visual_index_out_of_range() {
        let err = visual_index(&interleaved(), 3).unwrap_err();
        assert_eq!(
            err,
            BendError::VisualIndexOutOfRange {
                explicit_index: 3,
                explicit_count: 3
            }
        );
    }

    #[test]
    fn test_implicit_start_is_fatal() {
        let mut routed = interleaved();
        routed[0].implicit = true;
        let err = explicit_index_at_or_before(&routed, 1).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_implicit_end_is_fatal() {
        let mut routed = interleaved();
        routed[4].implicit = true;
        let err = explicit_index_at_or_after(&routed, 3).unwrap_err();
        assert_eq!(err, BendError::NoExplicitAtOrAfter { connection_index: 3 });
    }

    #[test]
    fn test_connection_index_out_of_range() {
        let err = explicit_index_at_or_before(&interleaved(), 9).unwrap_err();
        assert_eq!(err, BendError::ConnectionIndexOutOfRange { index: 9, count: 5 });
    }

    #[test]
    fn test_is_explicit() {
        let routed = interleaved();
        assert!(is_explicit(&routed, 0));
        assert!(!is_explicit(&routed, 1));
        assert!(!is_explicit(&routed, 99));
    }
}
