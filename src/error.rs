//! Error types for routing and bend editing

use thiserror::Error;

use crate::model::PartId;

/// Errors raised by a router or while resolving attached anchors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// A connector needs at least a start and an end
    #[error("cannot route {count} anchor(s): a connection needs at least 2")]
    TooFewAnchors { count: usize },

    /// An attached anchor references a part without an anchor provider
    #[error("no anchor provider registered for part '{part}'")]
    UnknownAnchorage { part: PartId },
}

/// Errors that can occur while editing the bend points of a connection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BendError {
    /// `move` or a segment operation was called without a selection
    #[error("no bend point is selected")]
    NothingSelected,

    /// An explicit index does not address an anchor of the connection
    #[error("explicit index {index} is out of range for {count} explicit anchor(s)")]
    ExplicitIndexOutOfRange { index: usize, count: usize },

    /// A connection index does not address an entry of the router output
    #[error("connection index {index} is out of range for {count} routed anchor(s)")]
    ConnectionIndexOutOfRange { index: usize, count: usize },

    /// The connection would end up with fewer than two explicit anchors
    #[error("a connection needs at least 2 explicit anchors, got {count}")]
    InvalidConnection { count: usize },

    /// The router reported no explicit anchor at or before a connection index,
    /// meaning the start of the connection is implicit
    #[error("no explicit anchor at or before connection index {connection_index}")]
    ImplicitStart { connection_index: usize },

    /// The router reported no explicit anchor at or after a connection index
    #[error("no explicit anchor at or after connection index {connection_index}")]
    NoExplicitAtOrAfter { connection_index: usize },

    /// An explicit index has no counterpart in the router output
    #[error(
        "explicit index {explicit_index} not found in router output ({explicit_count} explicit anchor(s))"
    )]
    VisualIndexOutOfRange {
        explicit_index: usize,
        explicit_count: usize,
    },

    /// Re-applying the bend points to the connection failed
    #[error("local execution failed: {0}")]
    LocalExecution(#[from] RouteError),

    /// A content-bound operation was executed without a content model
    #[error("operation changes content but no content model is available")]
    ContentUnavailable,

    /// The content model rejected a bend
    #[error("content model rejected the bend: {reason}")]
    Content { reason: String },
}

impl BendError {
    /// Create a content error
    pub fn content(reason: impl Into<String>) -> Self {
        Self::Content {
            reason: reason.into(),
        }
    }

    /// True for errors that signal a desync between the anchor model and the
    /// router output rather than a caller mistake
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::ImplicitStart { .. }
                | Self::NoExplicitAtOrAfter { .. }
                | Self::VisualIndexOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_error_display() {
        let err = RouteError::TooFewAnchors { count: 1 };
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_local_execution_wraps_route_error() {
        let err = BendError::from(RouteError::UnknownAnchorage {
            part: PartId::new("server"),
        });
        assert!(err.to_string().contains("local execution failed"));
        assert!(err.to_string().contains("server"));
    }

    #[test]
    fn test_invariant_violation_classification() {
        assert!(BendError::ImplicitStart {
            connection_index: 3
        }
        .is_invariant_violation());
        assert!(!BendError::NothingSelected.is_invariant_violation());
    }
}
