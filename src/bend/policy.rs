//! Interactive bend protocol.
//!
//! A gesture is opened with [`BendPolicy::init`], which borrows the
//! connection for as long as the returned [`BendGesture`] lives. Editing
//! calls mutate the gesture's [`BendOperation`] and re-route the connection
//! right away; nothing becomes undoable until [`BendGesture::commit`].
//!
//! ```text
//! init -> (select | select_segment | create_before | create_after | make_explicit)*
//!      -> move_selection* -> commit | cancel
//! ```

use log::{debug, trace};

use crate::config::BendConfig;
use crate::error::BendError;
use crate::geometry::{Orientation, Point};
use crate::model::{AnchorRole, AnchorSpec, AttachmentHints, Connection, RoutedAnchor};
use crate::scene::Scene;

use super::index;
use super::operation::{BendCommit, BendOperation};
use super::strategy::RoutingStrategy;

/// Opens bend gestures with a shared configuration
#[derive(Debug, Clone, Default)]
pub struct BendPolicy {
    config: BendConfig,
}

impl BendPolicy {
    pub fn new(config: BendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BendConfig {
        &self.config
    }

    /// Snapshot the connection and open a gesture on it.
    ///
    /// The connection is re-routed first so that index translation sees the
    /// current router output. With orthogonal routing the attachment hints
    /// are brought up to date before the snapshot, so an untouched gesture
    /// commits nothing.
    pub fn init<'a>(
        &'a self,
        connection: &'a mut Connection,
        scene: &'a Scene,
    ) -> Result<BendGesture<'a>, BendError> {
        connection.refresh(scene)?;
        let strategy = RoutingStrategy::from(connection.routing_mode());
        let operation = BendOperation::new(connection);
        let selection = SelectionState::new(operation.final_anchors(), *operation.final_hints());
        let mut gesture = BendGesture {
            config: &self.config,
            connection,
            scene,
            strategy,
            operation,
            selection,
            normalization_needed: false,
        };
        if strategy.is_orthogonal() {
            gesture.route()?;
            gesture.operation = BendOperation::new(gesture.connection);
            gesture.selection = SelectionState::new(
                gesture.operation.final_anchors(),
                *gesture.operation.final_hints(),
            );
        }
        trace!(
            "bend gesture opened on {} explicit anchor(s), {:?}",
            gesture.explicit_count(),
            strategy
        );
        Ok(gesture)
    }
}

/// A selected explicit anchor and its local position before the drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedAnchor {
    pub index: usize,
    pub initial_position: Point,
}

/// What a drag starts from
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    anchors: Vec<SelectedAnchor>,
    pre_move_anchors: Vec<AnchorSpec>,
    pre_move_hints: AttachmentHints,
}

impl SelectionState {
    fn new(baseline: &[AnchorSpec], hints: AttachmentHints) -> Self {
        Self {
            anchors: vec![],
            pre_move_anchors: baseline.to_vec(),
            pre_move_hints: hints,
        }
    }

    /// Selected anchors in selection order
    pub fn anchors(&self) -> &[SelectedAnchor] {
        &self.anchors
    }

    pub fn indices(&self) -> Vec<usize> {
        self.anchors.iter().map(|a| a.index).collect()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn pre_move_anchors(&self) -> &[AnchorSpec] {
        &self.pre_move_anchors
    }
}

/// An open bend gesture on one connection
#[derive(Debug)]
pub struct BendGesture<'a> {
    pub(super) config: &'a BendConfig,
    pub(super) connection: &'a mut Connection,
    pub(super) scene: &'a Scene,
    pub(super) strategy: RoutingStrategy,
    pub(super) operation: BendOperation,
    pub(super) selection: SelectionState,
    pub(super) normalization_needed: bool,
}

impl<'a> BendGesture<'a> {
    pub fn connection(&self) -> &Connection {
        self.connection
    }

    pub fn strategy(&self) -> RoutingStrategy {
        self.strategy
    }

    pub fn operation(&self) -> &BendOperation {
        &self.operation
    }

    /// The proposed explicit anchors
    pub fn final_anchors(&self) -> &[AnchorSpec] {
        self.operation.final_anchors()
    }

    pub fn explicit_count(&self) -> usize {
        self.operation.final_anchors().len()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.indices()
    }

    /// True if the anchor at `connection_index` was not inserted by the router
    pub fn is_explicit(&self, connection_index: usize) -> bool {
        index::is_explicit(self.connection.routed(), connection_index)
    }

    /// Merge distance for the current selection
    pub fn overlay_threshold(&self) -> f64 {
        if self.selection.len() == 2 {
            self.config.segment_overlay_threshold
        } else {
            self.config.point_overlay_threshold
        }
    }

    /// True if exactly two points are selected and they lie on a horizontal line
    pub fn is_selection_horizontal(&self) -> bool {
        match self.selection.anchors() {
            [a, b] => {
                Orientation::of_segment(
                    a.initial_position,
                    b.initial_position,
                    self.config.axis_tolerance,
                ) == Orientation::Horizontal
            }
            _ => false,
        }
    }

    pub(super) fn routed(&self) -> &[RoutedAnchor] {
        self.connection.routed()
    }

    pub(super) fn check_explicit_index(&self, explicit_index: usize) -> Result<(), BendError> {
        let count = self.explicit_count();
        if explicit_index >= count {
            return Err(BendError::ExplicitIndexOutOfRange {
                index: explicit_index,
                count,
            });
        }
        Ok(())
    }

    /// Current local position of an explicit anchor
    pub fn explicit_position(&self, explicit_index: usize) -> Result<Point, BendError> {
        let ci = index::visual_index(self.routed(), explicit_index)?;
        Ok(self.routed()[ci].position)
    }

    /// Re-route against the proposed anchors without committing
    pub fn locally_execute(&mut self) -> Result<(), BendError> {
        self.operation.locally_execute(self.connection, self.scene)?;
        trace!(
            "locally executed {} explicit / {} routed anchor(s)",
            self.explicit_count(),
            self.routed().len()
        );
        Ok(())
    }

    /// Refresh attachment hints (orthogonal only), then locally execute
    pub(super) fn route(&mut self) -> Result<(), BendError> {
        if self.strategy.is_orthogonal() {
            let hints = self.compute_hints();
            self.operation.set_final_hints(hints);
        }
        self.locally_execute()
    }

    /// Grab the explicit anchor at `explicit_index` for dragging.
    ///
    /// The current proposed anchors become the baseline that every
    /// [`move_selection`](Self::move_selection) starts from. Selecting an
    /// anchor twice has no effect.
    pub fn select(&mut self, explicit_index: usize) -> Result<(), BendError> {
        self.check_explicit_index(explicit_index)?;
        if self.selection.indices().contains(&explicit_index) {
            return Ok(());
        }
        let initial_position = self.explicit_position(explicit_index)?;
        self.selection.anchors.push(SelectedAnchor {
            index: explicit_index,
            initial_position,
        });
        self.selection.pre_move_anchors = self.operation.final_anchors().to_vec();
        self.selection.pre_move_hints = *self.operation.final_hints();
        Ok(())
    }

    /// Grab both ends of a segment between two explicit anchors.
    ///
    /// Attached ends are first duplicated into free anchors at the same
    /// position, so that dragging the segment leaves the attachment in place.
    /// Returns the selected explicit indices.
    pub fn select_segment(&mut self, from: usize, to: usize) -> Result<(usize, usize), BendError> {
        self.check_explicit_index(from)?;
        self.check_explicit_index(to)?;
        let (mut from, mut to) = (from, to);

        if self.operation.final_anchors()[from].is_attached() {
            let scene_position = self.explicit_scene_position(from)?;
            let inserted = self.create_after(from, scene_position)?;
            if to >= inserted {
                to += 1;
            }
            from = inserted;
        }
        if self.operation.final_anchors()[to].is_attached() {
            let scene_position = self.explicit_scene_position(to)?;
            let inserted = self.create_before(to, scene_position)?;
            if from >= inserted {
                from += 1;
            }
            to = inserted;
        }

        self.select(from)?;
        self.select(to)?;
        Ok((from, to))
    }

    /// Make the anchor at `connection_index` explicit and select it
    pub fn select_point(&mut self, connection_index: usize) -> Result<usize, BendError> {
        let explicit = self.make_explicit(connection_index, connection_index)?;
        let explicit_index = explicit[0];
        self.select(explicit_index)?;
        Ok(explicit_index)
    }

    /// Make the routed segment `segment_index .. segment_index + 1` explicit
    /// and select both of its ends
    pub fn select_connection_segment(
        &mut self,
        segment_index: usize,
    ) -> Result<(usize, usize), BendError> {
        let explicit = self.make_explicit(segment_index, segment_index + 1)?;
        self.select_segment(explicit[0], explicit[1])
    }

    fn explicit_scene_position(&self, explicit_index: usize) -> Result<Point, BendError> {
        let local = self.explicit_position(explicit_index)?;
        Ok(self.connection.frame().local_to_scene(local))
    }

    /// Insert a free anchor before `explicit_index`; returns its index
    pub fn create_before(
        &mut self,
        explicit_index: usize,
        scene_position: Point,
    ) -> Result<usize, BendError> {
        self.check_explicit_index(explicit_index)?;
        self.insert_free(explicit_index, scene_position)
    }

    /// Insert a free anchor after `explicit_index`; returns its index
    pub fn create_after(
        &mut self,
        explicit_index: usize,
        scene_position: Point,
    ) -> Result<usize, BendError> {
        self.check_explicit_index(explicit_index)?;
        self.insert_free(explicit_index + 1, scene_position)
    }

    fn insert_free(&mut self, insert_index: usize, scene_position: Point) -> Result<usize, BendError> {
        let local = self.connection.frame().scene_to_local(scene_position);
        self.operation
            .final_anchors_mut()
            .insert(insert_index, AnchorSpec::free(local));
        self.route()?;
        self.normalization_needed = true;
        Ok(insert_index)
    }

    /// Promote the router-inserted anchors between two connection indices
    /// (inclusive) to explicit free anchors.
    ///
    /// Returns the explicit index of every anchor in the range, in order.
    /// Anchors that are already explicit keep their identity, so
    /// `make_explicit(i, i)` on an explicit anchor returns its index.
    pub fn make_explicit(
        &mut self,
        start_index: usize,
        end_index: usize,
    ) -> Result<Vec<usize>, BendError> {
        let (start, end) = (start_index.min(end_index), start_index.max(end_index));
        let routed = self.routed().to_vec();
        if end >= routed.len() {
            return Err(BendError::ConnectionIndexOutOfRange {
                index: end,
                count: routed.len(),
            });
        }

        let frame = *self.connection.frame();
        let mut groups: Vec<ImplicitGroup> = vec![];
        let mut explicit_indices = Vec::with_capacity(end - start + 1);
        let mut implicit_seen = 0;

        for ci in start..=end {
            let preceding = index::explicit_index_at_or_before(&routed, ci)?;
            if index::is_explicit(&routed, ci) {
                explicit_indices.push(preceding + implicit_seen);
                continue;
            }
            let scene_position = frame.local_to_scene(routed[ci].position);
            match groups.last_mut() {
                Some(group) if group.preceding_explicit == preceding => {
                    group.scene_positions.push(scene_position);
                }
                _ => groups.push(ImplicitGroup {
                    preceding_explicit: preceding,
                    scene_positions: vec![scene_position],
                }),
            }
            explicit_indices.push(preceding + implicit_seen + 1);
            implicit_seen += 1;
        }

        let mut inserted = 0;
        for group in &groups {
            for (k, scene_position) in group.scene_positions.iter().enumerate() {
                self.create_after(group.preceding_explicit + inserted + k, *scene_position)?;
            }
            inserted += group.scene_positions.len();
        }

        if inserted > 0 {
            debug!("made {} implicit anchor(s) explicit", inserted);
        }
        Ok(explicit_indices)
    }

    /// Drag the selection by the pointer movement `initial -> current`
    /// (scene coordinates).
    ///
    /// Every call starts again from the pre-move baseline, so a gesture can
    /// call this repeatedly with the same `initial`. Returns the pointer
    /// position actually applied after axis constraints.
    pub fn move_selection(&mut self, initial: Point, current: Point) -> Result<Point, BendError> {
        if self.selection.is_empty() {
            return Err(BendError::NothingSelected);
        }

        let frame = *self.connection.frame();
        let selection_scene: Vec<Point> = self
            .selection
            .anchors()
            .iter()
            .map(|a| frame.local_to_scene(a.initial_position))
            .collect();
        let current = self.strategy.constrain_pointer(
            initial,
            current,
            &selection_scene,
            self.config.axis_tolerance,
        );

        self.restore_pre_move_bendpoints()?;

        let delta = frame.scene_to_local(current) - frame.scene_to_local(initial);
        let count = self.explicit_count();
        let selected = self.selection.anchors().to_vec();
        for selected in selected {
            let candidate = selected.initial_position + delta;
            let mut spec = AnchorSpec::free(candidate);
            if self.strategy.can_connect(selected.index, count) {
                if let Some(part) = self.scene.find_anchorage(frame.local_to_scene(candidate)) {
                    spec = AnchorSpec::attached(part.clone(), AnchorRole::for_index(selected.index));
                }
            }
            self.operation.final_anchors_mut()[selected.index] = spec;
        }

        self.route()?;
        self.remove_overlain()?;
        self.normalization_needed = true;
        Ok(current)
    }

    /// Reapply the pre-move baseline and re-route
    pub fn restore_pre_move_bendpoints(&mut self) -> Result<(), BendError> {
        self.operation.reset_final(
            &self.selection.pre_move_anchors,
            self.selection.pre_move_hints,
        );
        self.locally_execute()
    }

    /// Finish the gesture.
    ///
    /// Normalizes first if an edit asked for it (orthogonal routing only).
    /// Returns `None` when the gesture changed nothing.
    pub fn commit(mut self) -> Result<Option<BendCommit>, BendError> {
        if self.normalization_needed && self.strategy.is_orthogonal() {
            self.normalize()?;
        }
        let content_bindable = self.connection.is_content_bindable();
        let commit = self.operation.into_commit(content_bindable);
        match &commit {
            Some(commit) => debug!(
                "bend committed: {} -> {} explicit anchor(s)",
                commit.initial_anchors().len(),
                commit.final_anchors().len()
            ),
            None => debug!("bend gesture committed without effect"),
        }
        Ok(commit)
    }

    /// Abandon the gesture and put the connection back to its initial state
    pub fn cancel(mut self) -> Result<(), BendError> {
        self.operation.reset_to_initial();
        self.locally_execute()
    }
}

/// A run of consecutive implicit anchors following one explicit anchor
#[derive(Debug, Clone, PartialEq)]
struct ImplicitGroup {
    preceding_explicit: usize,
    scene_positions: Vec<Point>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{DirectRouter, OrthogonalRouter};

    fn free(x: f64, y: f64) -> AnchorSpec {
        AnchorSpec::free(Point::new(x, y))
    }

    fn direct(anchors: Vec<AnchorSpec>) -> Connection {
        Connection::new(anchors, DirectRouter).unwrap()
    }

    #[test]
    fn test_create_after_returns_new_index() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(100.0, 0.0)]);
        let mut gesture = policy.init(&mut conn, &scene).unwrap();

        let idx = gesture.create_after(0, Point::new(50.0, 30.0)).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(gesture.explicit_count(), 3);
        assert_eq!(gesture.connection().points()[1], Point::new(50.0, 30.0));
    }

    #[test]
    fn test_create_before_returns_same_index() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(100.0, 0.0)]);
        let mut gesture = policy.init(&mut conn, &scene).unwrap();

        let idx = gesture.create_before(1, Point::new(50.0, 30.0)).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(gesture.final_anchors()[2], free(100.0, 0.0));
    }

    #[test]
    fn test_create_out_of_range() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(100.0, 0.0)]);
        let mut gesture = policy.init(&mut conn, &scene).unwrap();

        let err = gesture.create_after(5, Point::zero()).unwrap_err();
        assert_eq!(err, BendError::ExplicitIndexOutOfRange { index: 5, count: 2 });
    }

    #[test]
    fn test_move_without_selection_is_rejected() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(100.0, 0.0)]);
        let mut gesture = policy.init(&mut conn, &scene).unwrap();

        let err = gesture
            .move_selection(Point::zero(), Point::new(5.0, 5.0))
            .unwrap_err();
        assert_eq!(err, BendError::NothingSelected);
    }

    #[test]
    fn test_repeated_moves_start_from_baseline() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(50.0, 50.0), free(100.0, 0.0)]);
        let mut gesture = policy.init(&mut conn, &scene).unwrap();

        gesture.select(1).unwrap();
        gesture
            .move_selection(Point::new(50.0, 50.0), Point::new(60.0, 80.0))
            .unwrap();
        gesture
            .move_selection(Point::new(50.0, 50.0), Point::new(40.0, 90.0))
            .unwrap();
        assert_eq!(gesture.final_anchors()[1], free(40.0, 90.0));
    }

    #[test]
    fn test_make_explicit_promotes_corner() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = Connection::new(vec![free(0.0, 0.0), free(100.0, 50.0)], OrthogonalRouter).unwrap();
        let mut gesture = policy.init(&mut conn, &scene).unwrap();

        assert!(!gesture.is_explicit(1));
        let explicit = gesture.make_explicit(0, 2).unwrap();
        assert_eq!(explicit, vec![0, 1, 2]);
        assert_eq!(gesture.final_anchors()[1], free(100.0, 0.0));
        assert!(gesture.is_explicit(1));
    }

    #[test]
    fn test_make_explicit_on_explicit_is_identity() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = Connection::new(vec![free(0.0, 0.0), free(100.0, 50.0)], OrthogonalRouter).unwrap();
        let mut gesture = policy.init(&mut conn, &scene).unwrap();

        assert_eq!(gesture.make_explicit(2, 2).unwrap(), vec![1]);
        assert_eq!(gesture.make_explicit(0, 0).unwrap(), vec![0]);
        assert_eq!(gesture.explicit_count(), 2);
    }

    #[test]
    fn test_cancel_restores_initial_anchors() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(100.0, 0.0)]);
        {
            let mut gesture = policy.init(&mut conn, &scene).unwrap();
            gesture.create_after(0, Point::new(50.0, 40.0)).unwrap();
            gesture.cancel().unwrap();
        }
        assert_eq!(conn.anchors().len(), 2);
        assert_eq!(conn.routed().len(), 2);
    }

    #[test]
    fn test_commit_without_changes_is_none() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(100.0, 0.0)]);
        let gesture = policy.init(&mut conn, &scene).unwrap();
        assert!(gesture.commit().unwrap().is_none());
    }

    #[test]
    fn test_repeated_select_keeps_one_entry() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(50.0, 20.0), free(100.0, 0.0)]);
        let mut gesture = policy.init(&mut conn, &scene).unwrap();
        gesture.select(1).unwrap();
        gesture.select(1).unwrap();
        assert_eq!(gesture.selected_indices(), vec![1]);
        assert_eq!(gesture.overlay_threshold(), 10.0);
    }

    #[test]
    fn test_overlay_threshold_depends_on_selection() {
        let scene = Scene::new();
        let policy = BendPolicy::default();
        let mut conn = direct(vec![free(0.0, 0.0), free(50.0, 0.0), free(100.0, 0.0)]);
        let mut gesture = policy.init(&mut conn, &scene).unwrap();
        gesture.select(1).unwrap();
        assert_eq!(gesture.overlay_threshold(), 10.0);
        gesture.select(2).unwrap();
        assert_eq!(gesture.overlay_threshold(), 6.0);
        assert!(gesture.is_selection_horizontal());
    }
}
