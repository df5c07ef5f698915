//! Bend operations and their undoable commit form

use crate::error::BendError;
use crate::model::anchor::to_bend_points;
use crate::model::{AnchorSpec, AttachmentHints, BendPoint, Connection};
use crate::scene::Scene;

/// Content model that persists a connection's bend points
pub trait BendContent {
    /// Replace the persisted bend points
    fn bend_content(&mut self, bend_points: &[BendPoint]) -> Result<(), BendError>;
}

/// Everything an undoable operation may touch
pub struct EditContext<'a> {
    pub connection: &'a mut Connection,
    pub scene: &'a Scene,
    pub content: Option<&'a mut dyn BendContent>,
}

impl<'a> EditContext<'a> {
    /// Context for a connection without a content model
    pub fn visual(connection: &'a mut Connection, scene: &'a Scene) -> Self {
        Self {
            connection,
            scene,
            content: None,
        }
    }

    /// Context for a content-bound connection
    pub fn with_content(
        connection: &'a mut Connection,
        scene: &'a Scene,
        content: &'a mut dyn BendContent,
    ) -> Self {
        Self {
            connection,
            scene,
            content: Some(content),
        }
    }
}

/// An operation an external command stack can execute, undo and redo
pub trait UndoableOperation {
    fn label(&self) -> &str;

    fn execute(&self, cx: &mut EditContext<'_>) -> Result<(), BendError>;

    fn undo(&self, cx: &mut EditContext<'_>) -> Result<(), BendError>;

    fn redo(&self, cx: &mut EditContext<'_>) -> Result<(), BendError> {
        self.execute(cx)
    }
}

/// The bend being built during an open gesture.
///
/// `final_anchors` is the proposed anchor list every editing call mutates;
/// [`locally_execute`](Self::locally_execute) pushes it to the connection
/// without creating an undo entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BendOperation {
    initial_anchors: Vec<AnchorSpec>,
    initial_hints: AttachmentHints,
    final_anchors: Vec<AnchorSpec>,
    final_hints: AttachmentHints,
}

impl BendOperation {
    /// Snapshot the connection's current state as both initial and final
    pub fn new(connection: &Connection) -> Self {
        Self {
            initial_anchors: connection.anchors().to_vec(),
            initial_hints: *connection.hints(),
            final_anchors: connection.anchors().to_vec(),
            final_hints: *connection.hints(),
        }
    }

    pub fn initial_anchors(&self) -> &[AnchorSpec] {
        &self.initial_anchors
    }

    pub fn final_anchors(&self) -> &[AnchorSpec] {
        &self.final_anchors
    }

    pub fn final_anchors_mut(&mut self) -> &mut Vec<AnchorSpec> {
        &mut self.final_anchors
    }

    pub fn final_hints(&self) -> &AttachmentHints {
        &self.final_hints
    }

    pub fn set_final_hints(&mut self, hints: AttachmentHints) {
        self.final_hints = hints;
    }

    /// Replace the proposed state wholesale
    pub fn reset_final(&mut self, anchors: &[AnchorSpec], hints: AttachmentHints) {
        self.final_anchors = anchors.to_vec();
        self.final_hints = hints;
    }

    /// Discard every proposed change
    pub fn reset_to_initial(&mut self) {
        self.final_anchors = self.initial_anchors.clone();
        self.final_hints = self.initial_hints;
    }

    /// True if committing would change anything
    pub fn has_effect(&self) -> bool {
        self.initial_anchors != self.final_anchors || self.initial_hints != self.final_hints
    }

    /// Apply the proposed anchors to the connection and re-route
    pub fn locally_execute(&self, connection: &mut Connection, scene: &Scene) -> Result<(), BendError> {
        connection.apply(&self.final_anchors, &self.final_hints, scene)
    }

    /// Turn the operation into its undoable form, or `None` if it has no effect
    pub fn into_commit(self, content_bindable: bool) -> Option<BendCommit> {
        if !self.has_effect() {
            return None;
        }
        let content = content_bindable.then(|| BendContentOperation {
            initial_points: to_bend_points(&self.initial_anchors),
            final_points: to_bend_points(&self.final_anchors),
        });
        Some(BendCommit {
            visual: BendVisualOperation {
                initial_anchors: self.initial_anchors,
                initial_hints: self.initial_hints,
                final_anchors: self.final_anchors,
                final_hints: self.final_hints,
            },
            content,
        })
    }
}

/// Visual half of a committed bend: swaps the connection's anchors
#[derive(Debug, Clone, PartialEq)]
pub struct BendVisualOperation {
    pub initial_anchors: Vec<AnchorSpec>,
    pub initial_hints: AttachmentHints,
    pub final_anchors: Vec<AnchorSpec>,
    pub final_hints: AttachmentHints,
}

impl UndoableOperation for BendVisualOperation {
    fn label(&self) -> &str {
        "Bend"
    }

    fn execute(&self, cx: &mut EditContext<'_>) -> Result<(), BendError> {
        cx.connection
            .apply(&self.final_anchors, &self.final_hints, cx.scene)
    }

    fn undo(&self, cx: &mut EditContext<'_>) -> Result<(), BendError> {
        cx.connection
            .apply(&self.initial_anchors, &self.initial_hints, cx.scene)
    }
}

/// Content half of a committed bend: hands bend points to the content model
#[derive(Debug, Clone, PartialEq)]
pub struct BendContentOperation {
    pub initial_points: Vec<BendPoint>,
    pub final_points: Vec<BendPoint>,
}

impl UndoableOperation for BendContentOperation {
    fn label(&self) -> &str {
        "Bend Content"
    }

    fn execute(&self, cx: &mut EditContext<'_>) -> Result<(), BendError> {
        let content = cx
            .content
            .as_deref_mut()
            .ok_or(BendError::ContentUnavailable)?;
        content.bend_content(&self.final_points)
    }

    fn undo(&self, cx: &mut EditContext<'_>) -> Result<(), BendError> {
        let content = cx
            .content
            .as_deref_mut()
            .ok_or(BendError::ContentUnavailable)?;
        content.bend_content(&self.initial_points)
    }
}

/// Result of committing a bend gesture.
///
/// Executes visual then content; undoes content then visual. A rejected
/// content half rolls the visual half back. Executing the visual half again
/// right after commit is harmless because the connection already shows the
/// final anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct BendCommit {
    pub visual: BendVisualOperation,
    pub content: Option<BendContentOperation>,
}

impl BendCommit {
    pub fn final_anchors(&self) -> &[AnchorSpec] {
        &self.visual.final_anchors
    }

    pub fn initial_anchors(&self) -> &[AnchorSpec] {
        &self.visual.initial_anchors
    }

    pub fn is_content_bound(&self) -> bool {
        self.content.is_some()
    }
}

impl UndoableOperation for BendCommit {
    fn label(&self) -> &str {
        self.visual.label()
    }

    fn execute(&self, cx: &mut EditContext<'_>) -> Result<(), BendError> {
        self.visual.execute(cx)?;
        if let Some(content) = &self.content {
            if let Err(err) = content.execute(cx) {
                self.visual.undo(cx)?;
                return Err(err);
            }
        }
        Ok(())
    }

    fn undo(&self, cx: &mut EditContext<'_>) -> Result<(), BendError> {
        if let Some(content) = &self.content {
            content.undo(cx)?;
        }
        self.visual.undo(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::routing::DirectRouter;

    fn connection() -> Connection {
        let mut conn = Connection::new(
            vec![
                AnchorSpec::free(Point::new(0.0, 0.0)),
                AnchorSpec::free(Point::new(100.0, 0.0)),
            ],
            DirectRouter,
        )
        .unwrap();
        conn.refresh(&Scene::new()).unwrap();
        conn
    }

    #[test]
    fn test_unchanged_operation_has_no_commit() {
        let op = BendOperation::new(&connection());
        assert!(!op.has_effect());
        assert!(op.into_commit(true).is_none());
    }

    #[test]
    fn test_commit_without_content_binding() {
        let mut op = BendOperation::new(&connection());
        op.final_anchors_mut()
            .insert(1, AnchorSpec::free(Point::new(50.0, 20.0)));
        let commit = op.into_commit(false).unwrap();
        assert!(!commit.is_content_bound());
        assert_eq!(commit.final_anchors().len(), 3);
        assert_eq!(commit.initial_anchors().len(), 2);
    }

    #[test]
    fn test_visual_undo_redo() {
        let scene = Scene::new();
        let mut conn = connection();
        let mut op = BendOperation::new(&conn);
        op.final_anchors_mut()
            .insert(1, AnchorSpec::free(Point::new(50.0, 20.0)));
        let commit = op.into_commit(false).unwrap();

        let mut cx = EditContext::visual(&mut conn, &scene);
        commit.execute(&mut cx).unwrap();
        assert_eq!(cx.connection.anchors().len(), 3);
        commit.undo(&mut cx).unwrap();
        assert_eq!(cx.connection.anchors().len(), 2);
        commit.redo(&mut cx).unwrap();
        assert_eq!(cx.connection.routed().len(), 3);
    }

    #[test]
    fn test_content_operation_requires_content() {
        let scene = Scene::new();
        let mut conn = connection();
        let mut op = BendOperation::new(&conn);
        op.final_anchors_mut().pop();
        op.final_anchors_mut()
            .push(AnchorSpec::free(Point::new(80.0, 0.0)));
        let commit = op.into_commit(true).unwrap();

        let mut cx = EditContext::visual(&mut conn, &scene);
        assert_eq!(commit.execute(&mut cx), Err(BendError::ContentUnavailable));
        // The visual half is rolled back
        assert_eq!(
            cx.connection.anchors()[1],
            AnchorSpec::free(Point::new(100.0, 0.0))
        );
    }

    struct Rejecting;

    impl BendContent for Rejecting {
        fn bend_content(&mut self, _bend_points: &[BendPoint]) -> Result<(), BendError> {
            Err(BendError::content("read-only"))
        }
    }

    #[test]
    fn test_rejected_content_execute_restores_visual() {
        let scene = Scene::new();
        let mut conn = connection();
        let mut op = BendOperation::new(&conn);
        op.final_anchors_mut()
            .insert(1, AnchorSpec::free(Point::new(50.0, 20.0)));
        let commit = op.into_commit(true).unwrap();

        let mut content = Rejecting;
        let mut cx = EditContext::with_content(&mut conn, &scene, &mut content);
        let err = commit.execute(&mut cx).unwrap_err();
        assert_eq!(err, BendError::content("read-only"));
        assert_eq!(cx.connection.anchors().len(), 2);
        assert_eq!(cx.connection.routed().len(), 2);
    }
}
