//! Parts a connection can attach to.
//!
//! The [`Scene`] knows the parts in z-order and answers "what is under this
//! point". Whether a part can host a connection end is a separate capability,
//! looked up by part identity in the [`CapabilityRegistry`].

use std::collections::HashMap;
use std::fmt;

use crate::geometry::{BoundingBox, Point};
use crate::model::{AnchorRole, PartId};
use crate::routing::{attachment_point, facing_edge};

/// Capability of a part to host connection ends
pub trait AnchorProvider: fmt::Debug {
    /// Scene position of the anchor for `role`, given a reference position
    /// the connection comes from
    fn position(&self, role: AnchorRole, reference: Point) -> Point;

    /// Position other anchors use as reference when this part is their neighbour
    fn reference_point(&self) -> Point;

    /// Whether [`position`](Self::position) depends on the reference
    fn is_dynamic(&self) -> bool {
        true
    }
}

/// Attaches to the midpoint of the box edge that faces the reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeAnchorProvider {
    pub bounds: BoundingBox,
}

impl ShapeAnchorProvider {
    pub fn new(bounds: BoundingBox) -> Self {
        Self { bounds }
    }
}

impl AnchorProvider for ShapeAnchorProvider {
    fn position(&self, _role: AnchorRole, reference: Point) -> Point {
        attachment_point(&self.bounds, facing_edge(&self.bounds, reference))
    }

    fn reference_point(&self) -> Point {
        self.bounds.center()
    }
}

/// Always attaches at one fixed scene position (a port)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAnchorProvider {
    pub position: Point,
}

impl FixedAnchorProvider {
    pub fn new(position: Point) -> Self {
        Self { position }
    }
}

impl AnchorProvider for FixedAnchorProvider {
    fn position(&self, _role: AnchorRole, _reference: Point) -> Point {
        self.position
    }

    fn reference_point(&self) -> Point {
        self.position
    }

    fn is_dynamic(&self) -> bool {
        false
    }
}

/// Maps part identity to an optional anchor provider
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    providers: HashMap<PartId, Box<dyn AnchorProvider>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the anchor provider of a part
    pub fn register(&mut self, part: PartId, provider: impl AnchorProvider + 'static) {
        self.providers.insert(part, Box::new(provider));
    }

    /// Remove a part's anchor capability
    pub fn unregister(&mut self, part: &PartId) -> bool {
        self.providers.remove(part).is_some()
    }

    pub fn get(&self, part: &PartId) -> Option<&dyn AnchorProvider> {
        self.providers.get(part).map(|p| p.as_ref())
    }

    pub fn contains(&self, part: &PartId) -> bool {
        self.providers.contains_key(part)
    }
}

/// A visual part with its scene bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePart {
    pub id: PartId,
    pub bounds: BoundingBox,
}

/// Parts in z-order (later parts are drawn on top) plus their capabilities
#[derive(Debug, Default)]
pub struct Scene {
    parts: Vec<ScenePart>,
    registry: CapabilityRegistry,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part without any anchor capability (it still occludes parts below)
    pub fn add_part(&mut self, id: impl Into<PartId>, bounds: BoundingBox) -> &mut Self {
        self.parts.push(ScenePart {
            id: id.into(),
            bounds,
        });
        self
    }

    /// Add a part whose box edges can host connection ends
    pub fn add_shape(&mut self, id: impl Into<PartId>, bounds: BoundingBox) -> &mut Self {
        let id = id.into();
        self.registry
            .register(id.clone(), ShapeAnchorProvider::new(bounds));
        self.add_part(id, bounds)
    }

    pub fn parts(&self) -> &[ScenePart] {
        &self.parts
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.registry
    }

    pub fn anchor_provider(&self, part: &PartId) -> Option<&dyn AnchorProvider> {
        self.registry.get(part)
    }

    /// Parts under `position`, topmost first
    pub fn parts_at(&self, position: Point) -> Vec<&PartId> {
        self.parts
            .iter()
            .rev()
            .filter(|part| part.bounds.contains(position))
            .map(|part| &part.id)
            .collect()
    }

    /// The topmost part under `position` that can host a connection end
    pub fn find_anchorage(&self, position: Point) -> Option<&PartId> {
        self.parts_at(position)
            .into_iter()
            .find(|id| self.registry.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked_scene() -> Scene {
        let mut scene = Scene::new();
        scene
            .add_shape("bottom", BoundingBox::new(0.0, 0.0, 100.0, 100.0))
            .add_shape("top", BoundingBox::new(50.0, 50.0, 100.0, 100.0));
        scene
    }

    #[test]
    fn test_parts_at_is_topmost_first() {
        let scene = stacked_scene();
        let hits = scene.parts_at(Point::new(75.0, 75.0));
        assert_eq!(hits, vec![&PartId::new("top"), &PartId::new("bottom")]);
    }

    #[test]
    fn test_find_anchorage_first_match_wins() {
        let scene = stacked_scene();
        assert_eq!(
            scene.find_anchorage(Point::new(75.0, 75.0)),
            Some(&PartId::new("top"))
        );
        assert_eq!(
            scene.find_anchorage(Point::new(10.0, 10.0)),
            Some(&PartId::new("bottom"))
        );
        assert_eq!(scene.find_anchorage(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_part_without_capability_is_skipped() {
        let mut scene = stacked_scene();
        scene.add_part("label", BoundingBox::new(60.0, 60.0, 20.0, 20.0));
        assert_eq!(scene.parts_at(Point::new(70.0, 70.0)).len(), 3);
        assert_eq!(
            scene.find_anchorage(Point::new(70.0, 70.0)),
            Some(&PartId::new("top"))
        );
    }

    #[test]
    fn test_fixed_provider_is_static() {
        let port = FixedAnchorProvider::new(Point::new(5.0, 5.0));
        assert!(!port.is_dynamic());
        assert_eq!(
            port.position(AnchorRole::Start, Point::new(100.0, 100.0)),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn test_shape_provider_attaches_to_facing_edge() {
        let shape = ShapeAnchorProvider::new(BoundingBox::new(0.0, 0.0, 40.0, 40.0));
        assert!(shape.is_dynamic());
        assert_eq!(
            shape.position(AnchorRole::End, Point::new(20.0, 300.0)),
            Point::new(20.0, 40.0)
        );
    }
}
