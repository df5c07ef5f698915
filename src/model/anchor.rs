//! Explicit anchor specifications

use std::fmt;

use crate::geometry::Point;

/// Identity of a visual part that a connection can attach to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which end of the connection an attached anchor serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorRole {
    Start,
    End,
}

impl AnchorRole {
    /// Role for an anchor at `explicit_index`: the first anchor is the start,
    /// every other attachable anchor is treated as an end.
    pub fn for_index(explicit_index: usize) -> Self {
        if explicit_index == 0 {
            AnchorRole::Start
        } else {
            AnchorRole::End
        }
    }
}

impl fmt::Display for AnchorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorRole::Start => write!(f, "start"),
            AnchorRole::End => write!(f, "end"),
        }
    }
}

/// One explicit control point of a connection
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorSpec {
    /// Unconnected point, in connection-local coordinates
    Free { position: Point },
    /// Point attached to another part; its position is computed by the
    /// part's anchor provider
    Attached { anchorage: PartId, role: AnchorRole },
}

impl AnchorSpec {
    pub fn free(position: Point) -> Self {
        Self::Free { position }
    }

    pub fn attached(anchorage: impl Into<PartId>, role: AnchorRole) -> Self {
        Self::Attached {
            anchorage: anchorage.into(),
            role,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached { .. })
    }

    /// Local position of a free anchor
    pub fn free_position(&self) -> Option<Point> {
        match self {
            Self::Free { position } => Some(*position),
            Self::Attached { .. } => None,
        }
    }

    /// The part an attached anchor refers to
    pub fn anchorage(&self) -> Option<&PartId> {
        match self {
            Self::Free { .. } => None,
            Self::Attached { anchorage, .. } => Some(anchorage),
        }
    }
}

impl fmt::Display for AnchorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free { position } => write!(f, "free ({}, {})", position.x, position.y),
            Self::Attached { anchorage, role } => write!(f, "attached {} as {}", anchorage, role),
        }
    }
}

/// Content-level view of a bend point, handed to the content model on commit
#[derive(Debug, Clone, PartialEq)]
pub enum BendPoint {
    Free(Point),
    Attached(PartId),
}

impl From<&AnchorSpec> for BendPoint {
    fn from(spec: &AnchorSpec) -> Self {
        match spec {
            AnchorSpec::Free { position } => BendPoint::Free(*position),
            AnchorSpec::Attached { anchorage, .. } => BendPoint::Attached(anchorage.clone()),
        }
    }
}

/// Convert an anchor list into content bend points
pub fn to_bend_points(anchors: &[AnchorSpec]) -> Vec<BendPoint> {
    anchors.iter().map(BendPoint::from).collect()
}
