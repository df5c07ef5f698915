//! Scripted bend gestures.
//!
//! A scenario describes one connection, the parts around it and the calls a
//! user gesture would make, in TOML:
//!
//! ```toml
//! routing = "orthogonal"
//!
//! [[parts]]
//! id = "server"
//! bounds = [0.0, 0.0, 60.0, 40.0]
//!
//! [[anchors]]
//! attached = "server"
//!
//! [[anchors]]
//! free = [200.0, 120.0]
//!
//! [[steps]]
//! op = "select-point"
//! index = 1
//! ```

use std::fmt;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::bend::{BendContent, BendGesture, BendPolicy, EditContext, UndoableOperation};
use crate::config::BendConfig;
use crate::error::BendError;
use crate::frame::Frame;
use crate::geometry::{BoundingBox, Point};
use crate::model::{AnchorRole, AnchorSpec, BendPoint, Connection, PartId, RoutedAnchor};
use crate::routing::{DirectRouter, OrthogonalRouter, RoutingMode};
use crate::scene::{FixedAnchorProvider, Scene};

/// Errors that can occur when loading or replaying a scenario
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scenario TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
    #[error("step {step} failed: {source}")]
    Step { step: usize, source: BendError },
    #[error(transparent)]
    Bend(#[from] BendError),
}

/// How a part can host connection ends
#[derive(Debug, Clone, PartialEq)]
pub enum PartCapability {
    /// Ends attach to the facing edge of the bounds
    Shape,
    /// Ends attach to one fixed port
    Port(Point),
    /// The part occludes but cannot host ends
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    pub id: PartId,
    pub bounds: BoundingBox,
    pub capability: PartCapability,
}

/// What to do once all steps ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    #[default]
    Commit,
    Cancel,
}

/// One gesture call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    Select { index: usize },
    SelectSegment { from: usize, to: usize },
    SelectPoint { index: usize },
    SelectConnectionSegment { index: usize },
    CreateBefore { index: usize, at: [f64; 2] },
    CreateAfter { index: usize, at: [f64; 2] },
    MakeExplicit { start: usize, end: usize },
    Move { from: [f64; 2], to: [f64; 2] },
    Restore,
    Normalize,
}

/// A parsed scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub routing: RoutingMode,
    pub frame: Frame,
    pub content_bound: bool,
    pub parts: Vec<PartSpec>,
    pub anchors: Vec<AnchorSpec>,
    pub steps: Vec<Step>,
    pub finish: Finish,
}

/// TOML structure for deserializing scenarios
#[derive(Deserialize)]
struct TomlScenario {
    #[serde(default)]
    routing: RoutingMode,
    origin: Option<[f64; 2]>,
    #[serde(default)]
    rotation: f64,
    #[serde(default)]
    content_bound: bool,
    #[serde(default)]
    parts: Vec<TomlPart>,
    anchors: Vec<TomlAnchor>,
    #[serde(default)]
    steps: Vec<Step>,
    #[serde(default)]
    finish: Finish,
}

#[derive(Deserialize)]
struct TomlPart {
    id: String,
    bounds: [f64; 4],
    port: Option<[f64; 2]>,
    #[serde(default = "default_anchorable")]
    anchorable: bool,
}

fn default_anchorable() -> bool {
    true
}

#[derive(Deserialize)]
struct TomlAnchor {
    free: Option<[f64; 2]>,
    attached: Option<String>,
}

fn point(xy: [f64; 2]) -> Point {
    Point::new(xy[0], xy[1])
}

impl Scenario {
    /// Parse a scenario from TOML
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ScenarioError> {
        let raw: TomlScenario = toml::from_str(toml_str)?;

        let parts = raw
            .parts
            .into_iter()
            .map(|part| {
                let [x, y, width, height] = part.bounds;
                let capability = match (part.anchorable, part.port) {
                    (false, _) => PartCapability::None,
                    (true, Some(port)) => PartCapability::Port(point(port)),
                    (true, None) => PartCapability::Shape,
                };
                PartSpec {
                    id: PartId::new(part.id),
                    bounds: BoundingBox::new(x, y, width, height),
                    capability,
                }
            })
            .collect();

        let count = raw.anchors.len();
        let anchors = raw
            .anchors
            .into_iter()
            .enumerate()
            .map(|(i, anchor)| match (anchor.free, anchor.attached) {
                (Some(xy), None) => Ok(AnchorSpec::free(point(xy))),
                (None, Some(part)) if i == 0 || i + 1 == count => Ok(AnchorSpec::attached(
                    PartId::new(part),
                    AnchorRole::for_index(i),
                )),
                (None, Some(part)) => Err(ScenarioError::Invalid(format!(
                    "anchor {} attaches to `{}` but only the first and last anchor can attach",
                    i, part
                ))),
                _ => Err(ScenarioError::Invalid(format!(
                    "anchor {} must set exactly one of `free` or `attached`",
                    i
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            routing: raw.routing,
            frame: Frame::new(raw.origin.map(point).unwrap_or_default(), raw.rotation),
            content_bound: raw.content_bound,
            parts,
            anchors,
            steps: raw.steps,
            finish: raw.finish,
        })
    }

    /// Load a scenario from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn build_scene(&self) -> Scene {
        let mut scene = Scene::new();
        for part in &self.parts {
            match part.capability {
                PartCapability::Shape => {
                    scene.add_shape(part.id.clone(), part.bounds);
                }
                PartCapability::Port(port) => {
                    scene.add_part(part.id.clone(), part.bounds);
                    scene
                        .registry_mut()
                        .register(part.id.clone(), FixedAnchorProvider::new(port));
                }
                PartCapability::None => {
                    scene.add_part(part.id.clone(), part.bounds);
                }
            }
        }
        scene
    }

    pub fn build_connection(&self) -> Result<Connection, ScenarioError> {
        let anchors = self.anchors.clone();
        let connection = match self.routing {
            RoutingMode::Direct => Connection::new(anchors, DirectRouter)?,
            RoutingMode::Orthogonal => Connection::new(anchors, OrthogonalRouter)?,
        };
        Ok(connection
            .with_frame(self.frame)
            .with_content_binding(self.content_bound))
    }

    /// Run every step in one gesture, then commit or cancel
    pub fn replay(&self, config: &BendConfig) -> Result<ReplayOutcome, ScenarioError> {
        let scene = self.build_scene();
        let mut connection = self.build_connection()?;
        let policy = BendPolicy::new(config.clone());

        let commit = {
            let mut gesture = policy.init(&mut connection, &scene)?;
            for (i, step) in self.steps.iter().enumerate() {
                debug!("step {}: {:?}", i + 1, step);
                run_step(&mut gesture, step)
                    .map_err(|source| ScenarioError::Step { step: i + 1, source })?;
            }
            match self.finish {
                Finish::Commit => gesture.commit()?,
                Finish::Cancel => {
                    gesture.cancel()?;
                    None
                }
            }
        };

        let mut content = RecordedContent::default();
        if let Some(commit) = &commit {
            let mut cx = if commit.is_content_bound() {
                EditContext::with_content(&mut connection, &scene, &mut content)
            } else {
                EditContext::visual(&mut connection, &scene)
            };
            commit.execute(&mut cx)?;
        }

        Ok(ReplayOutcome {
            committed: commit.is_some(),
            anchors: connection.anchors().to_vec(),
            routed: connection.routed().to_vec(),
            content: content.points,
        })
    }
}

fn run_step(gesture: &mut BendGesture<'_>, step: &Step) -> Result<(), BendError> {
    match *step {
        Step::Select { index } => gesture.select(index),
        Step::SelectSegment { from, to } => gesture.select_segment(from, to).map(|_| ()),
        Step::SelectPoint { index } => gesture.select_point(index).map(|_| ()),
        Step::SelectConnectionSegment { index } => {
            gesture.select_connection_segment(index).map(|_| ())
        }
        Step::CreateBefore { index, at } => gesture.create_before(index, point(at)).map(|_| ()),
        Step::CreateAfter { index, at } => gesture.create_after(index, point(at)).map(|_| ()),
        Step::MakeExplicit { start, end } => gesture.make_explicit(start, end).map(|_| ()),
        Step::Move { from, to } => gesture.move_selection(point(from), point(to)).map(|_| ()),
        Step::Restore => gesture.restore_pre_move_bendpoints(),
        Step::Normalize => gesture.normalize().map(|_| ()),
    }
}

/// Content model stand-in that keeps the last bend it received
#[derive(Debug, Default)]
struct RecordedContent {
    points: Option<Vec<BendPoint>>,
}

impl BendContent for RecordedContent {
    fn bend_content(&mut self, bend_points: &[BendPoint]) -> Result<(), BendError> {
        self.points = Some(bend_points.to_vec());
        Ok(())
    }
}

/// State of the connection after a replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub committed: bool,
    pub anchors: Vec<AnchorSpec>,
    pub routed: Vec<RoutedAnchor>,
    /// Bend points handed to the content model, if the connection is bound
    pub content: Option<Vec<BendPoint>>,
}

impl fmt::Display for ReplayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "committed: {}", if self.committed { "yes" } else { "no" })?;
        writeln!(f, "anchors:")?;
        for (i, anchor) in self.anchors.iter().enumerate() {
            writeln!(f, "  {}: {}", i, anchor)?;
        }
        writeln!(f, "route:")?;
        for anchor in &self.routed {
            writeln!(f, "  {}", anchor)?;
        }
        if let Some(points) = &self.content {
            writeln!(f, "content:")?;
            for point in points {
                match point {
                    BendPoint::Free(p) => writeln!(f, "  ({}, {})", p.x, p.y)?,
                    BendPoint::Attached(part) => writeln!(f, "  @{}", part)?,
                }
            }
        }
        Ok(())
    }
}
