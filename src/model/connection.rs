//! Live connection visual

use std::fmt;

use crate::error::{BendError, RouteError};
use crate::frame::Frame;
use crate::geometry::Point;
use crate::routing::{Router, RoutingMode};
use crate::scene::Scene;

use super::anchor::{AnchorRole, AnchorSpec};

/// One entry of the router output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedAnchor {
    /// Position in connection-local coordinates
    pub position: Point,
    /// True if the router inserted this anchor itself
    pub implicit: bool,
}

impl RoutedAnchor {
    pub fn explicit(position: Point) -> Self {
        Self {
            position,
            implicit: false,
        }
    }

    pub fn implicit(position: Point) -> Self {
        Self {
            position,
            implicit: true,
        }
    }
}

impl fmt::Display for RoutedAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.position.x, self.position.y)?;
        if self.implicit {
            write!(f, " implicit")?;
        }
        Ok(())
    }
}

/// Reference positions that bias where a dynamic start/end anchor attaches.
///
/// Hints are in connection-local coordinates and are consumed on every route.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttachmentHints {
    pub start: Option<Point>,
    pub end: Option<Point>,
}

impl AttachmentHints {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_role(&self, role: AnchorRole) -> Option<Point> {
        match role {
            AnchorRole::Start => self.start,
            AnchorRole::End => self.end,
        }
    }
}

/// A connector between parts: explicit anchors plus the latest route
#[derive(Debug)]
pub struct Connection {
    anchors: Vec<AnchorSpec>,
    hints: AttachmentHints,
    router: Box<dyn Router>,
    frame: Frame,
    routed: Vec<RoutedAnchor>,
    content_bindable: bool,
}

impl Connection {
    /// Create a connection from its explicit anchors.
    ///
    /// The connection is not routed until [`refresh`](Self::refresh) or
    /// [`apply`](Self::apply) is called.
    pub fn new(anchors: Vec<AnchorSpec>, router: impl Router + 'static) -> Result<Self, BendError> {
        if anchors.len() < 2 {
            return Err(BendError::InvalidConnection {
                count: anchors.len(),
            });
        }
        Ok(Self {
            anchors,
            hints: AttachmentHints::none(),
            router: Box::new(router),
            frame: Frame::identity(),
            routed: vec![],
            content_bindable: false,
        })
    }

    /// Place the connection's local coordinate system in the scene
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Mark the connection as backed by a content model that receives bends
    pub fn with_content_binding(mut self, bindable: bool) -> Self {
        self.content_bindable = bindable;
        self
    }

    pub fn anchors(&self) -> &[AnchorSpec] {
        &self.anchors
    }

    pub fn hints(&self) -> &AttachmentHints {
        &self.hints
    }

    /// Router output of the last successful route
    pub fn routed(&self) -> &[RoutedAnchor] {
        &self.routed
    }

    /// Positions of all routed anchors in local coordinates
    pub fn points(&self) -> Vec<Point> {
        self.routed.iter().map(|a| a.position).collect()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn routing_mode(&self) -> RoutingMode {
        self.router.mode()
    }

    pub fn is_content_bindable(&self) -> bool {
        self.content_bindable
    }

    /// Re-route the current anchors
    pub fn refresh(&mut self, scene: &Scene) -> Result<(), BendError> {
        let routed = self.route_anchors(&self.anchors, &self.hints, scene)?;
        self.routed = routed;
        Ok(())
    }

    /// Replace the anchors and hints, then re-route.
    ///
    /// Either both the anchors and the route are replaced or, if routing
    /// fails, the connection keeps its previous state.
    pub fn apply(
        &mut self,
        anchors: &[AnchorSpec],
        hints: &AttachmentHints,
        scene: &Scene,
    ) -> Result<(), BendError> {
        if anchors.len() < 2 {
            return Err(BendError::InvalidConnection {
                count: anchors.len(),
            });
        }
        let routed = self.route_anchors(anchors, hints, scene)?;
        self.anchors = anchors.to_vec();
        self.hints = *hints;
        self.routed = routed;
        Ok(())
    }

    fn route_anchors(
        &self,
        anchors: &[AnchorSpec],
        hints: &AttachmentHints,
        scene: &Scene,
    ) -> Result<Vec<RoutedAnchor>, RouteError> {
        let positions = self.resolve(anchors, hints, scene)?;
        self.router.route(&positions)
    }

    /// Compute local positions for every explicit anchor
    fn resolve(
        &self,
        anchors: &[AnchorSpec],
        hints: &AttachmentHints,
        scene: &Scene,
    ) -> Result<Vec<Point>, RouteError> {
        let mut positions = Vec::with_capacity(anchors.len());
        for (i, spec) in anchors.iter().enumerate() {
            let position = match spec {
                AnchorSpec::Free { position } => *position,
                AnchorSpec::Attached { anchorage, role } => {
                    let provider = scene.anchor_provider(anchorage).ok_or_else(|| {
                        RouteError::UnknownAnchorage {
                            part: anchorage.clone(),
                        }
                    })?;
                    let reference = match hints.for_role(*role) {
                        Some(hint) => self.frame.local_to_scene(hint),
                        None => {
                            let neighbor = match role {
                                AnchorRole::Start => anchors.get(i + 1),
                                AnchorRole::End => i.checked_sub(1).and_then(|n| anchors.get(n)),
                            };
                            match neighbor {
                                Some(neighbor) => self.reference_of(neighbor, scene)?,
                                None => provider.reference_point(),
                            }
                        }
                    };
                    self.frame
                        .scene_to_local(provider.position(*role, reference))
                }
            };
            positions.push(position);
        }
        Ok(positions)
    }

    /// Scene position that a neighbouring anchor contributes as reference
    fn reference_of(&self, spec: &AnchorSpec, scene: &Scene) -> Result<Point, RouteError> {
        match spec {
            AnchorSpec::Free { position } => Ok(self.frame.local_to_scene(*position)),
            AnchorSpec::Attached { anchorage, .. } => scene
                .anchor_provider(anchorage)
                .map(|provider| provider.reference_point())
                .ok_or_else(|| RouteError::UnknownAnchorage {
                    part: anchorage.clone(),
                }),
        }
    }
}
