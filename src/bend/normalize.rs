//! Orthogonal clean-up: redundant point pruning and attachment hints

use log::{debug, warn};

use crate::error::BendError;
use crate::geometry::Point;
use crate::model::{AnchorRole, AnchorSpec, AttachmentHints};

use super::index;
use super::policy::BendGesture;

impl BendGesture<'_> {
    /// Remove interior explicit anchors whose incoming and outgoing segments
    /// are parallel or zero-length, until none is left.
    ///
    /// Each pass removes exactly one anchor, so the loop ends after at most
    /// `explicit_count - 2` passes; `max_normalization_passes` caps it anyway.
    /// Returns the number of removed anchors.
    pub fn normalize(&mut self) -> Result<usize, BendError> {
        let cap = self.config.max_normalization_passes;
        let mut removed = 0;
        while let Some(redundant) = self.find_redundant()? {
            if removed == cap {
                warn!(
                    "normalization stopped after {} pass(es) with redundant anchors left",
                    cap
                );
                break;
            }
            self.remove_redundant(redundant)?;
            removed += 1;
        }
        self.normalization_needed = false;
        if removed > 0 {
            debug!("normalization removed {} redundant anchor(s)", removed);
        }
        Ok(removed)
    }

    /// First interior explicit anchor that adds no bend
    fn find_redundant(&self) -> Result<Option<usize>, BendError> {
        let epsilon = self.config.parallel_epsilon;
        let routed = self.routed();
        let count = self.explicit_count();
        for explicit_index in 1..count.saturating_sub(1) {
            let ci = index::visual_index(routed, explicit_index)?;
            let prev = ci.checked_sub(1).and_then(|i| routed.get(i));
            let (Some(prev), Some(next)) = (prev, routed.get(ci + 1)) else {
                continue;
            };
            let current = routed[ci].position;
            let incoming = current - prev.position;
            let outgoing = next.position - current;
            if incoming.is_degenerate(epsilon)
                || outgoing.is_degenerate(epsilon)
                || incoming.is_parallel_to(outgoing, epsilon)
            {
                return Ok(Some(explicit_index));
            }
        }
        Ok(None)
    }

    /// Pin the routed neighbours of an anchor as explicit, then drop it
    fn remove_redundant(&mut self, explicit_index: usize) -> Result<(), BendError> {
        let mut target = explicit_index;

        let ci = index::visual_index(self.routed(), target)?;
        if !self.is_explicit(ci + 1) {
            self.make_explicit(ci + 1, ci + 1)?;
        }
        let ci = index::visual_index(self.routed(), target)?;
        if ci > 0 && !self.is_explicit(ci - 1) {
            self.make_explicit(ci - 1, ci - 1)?;
            target += 1;
        }

        self.operation.final_anchors_mut().remove(target);
        self.route()
    }

    /// Hints for both ends of the proposed anchors
    pub(super) fn compute_hints(&self) -> AttachmentHints {
        AttachmentHints {
            start: self.compute_start_hint(),
            end: self.compute_end_hint(),
        }
    }

    pub(super) fn compute_start_hint(&self) -> Option<Point> {
        let anchors = self.operation.final_anchors();
        self.end_hint(anchors.first()?, anchors.get(1)?, AnchorRole::Start)
    }

    pub(super) fn compute_end_hint(&self) -> Option<Point> {
        let anchors = self.operation.final_anchors();
        let last = anchors.len().checked_sub(1)?;
        self.end_hint(&anchors[last], anchors.get(last.checked_sub(1)?)?, AnchorRole::End)
    }

    /// Midpoint between a dynamically attached end and its neighbour, in
    /// local coordinates
    fn end_hint(&self, end: &AnchorSpec, neighbor: &AnchorSpec, role: AnchorRole) -> Option<Point> {
        let provider = self.scene.anchor_provider(end.anchorage()?)?;
        if !provider.is_dynamic() {
            return None;
        }
        let neighbor_scene = self.scene_reference(neighbor)?;
        let end_scene = provider.position(role, neighbor_scene);
        Some(
            self.connection
                .frame()
                .scene_to_local(end_scene.midpoint(neighbor_scene)),
        )
    }

    fn scene_reference(&self, spec: &AnchorSpec) -> Option<Point> {
        match spec {
            AnchorSpec::Free { position } => Some(self.connection.frame().local_to_scene(*position)),
            AnchorSpec::Attached { anchorage, .. } => self
                .scene
                .anchor_provider(anchorage)
                .map(|provider| provider.reference_point()),
        }
    }
}
