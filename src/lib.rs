//! Connector Bend - interactive bend-point editing for diagram connectors
//!
//! A connector's persisted control points ([`AnchorSpec`]) are routed into
//! on-screen points by a [`Router`], which may insert implicit corners of its
//! own. A [`BendGesture`] lets a user select, drag, insert and merge control
//! points while keeping the two lists consistent, and turns the result into an
//! undoable [`BendCommit`].
//!
//! # Example
//!
//! ```rust
//! use connector_bend::{AnchorSpec, BendPolicy, Connection, DirectRouter, Point, Scene};
//!
//! let scene = Scene::new();
//! let mut connection = Connection::new(
//!     vec![
//!         AnchorSpec::free(Point::new(0.0, 0.0)),
//!         AnchorSpec::free(Point::new(100.0, 0.0)),
//!     ],
//!     DirectRouter,
//! )
//! .unwrap();
//!
//! let policy = BendPolicy::default();
//! let mut gesture = policy.init(&mut connection, &scene).unwrap();
//! let index = gesture.create_after(0, Point::new(50.0, 40.0)).unwrap();
//! gesture.select(index).unwrap();
//! gesture
//!     .move_selection(Point::new(50.0, 40.0), Point::new(50.0, 60.0))
//!     .unwrap();
//! let commit = gesture.commit().unwrap().unwrap();
//! assert_eq!(commit.final_anchors().len(), 3);
//! ```

pub mod bend;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod model;
pub mod routing;
pub mod scenario;
pub mod scene;

pub use bend::{
    BendCommit, BendContent, BendGesture, BendOperation, BendPolicy, EditContext,
    RoutingStrategy, UndoableOperation,
};
pub use config::{BendConfig, ConfigError};
pub use error::{BendError, RouteError};
pub use frame::Frame;
pub use geometry::{BoundingBox, Orientation, Point};
pub use model::{AnchorRole, AnchorSpec, AttachmentHints, BendPoint, Connection, PartId, RoutedAnchor};
pub use routing::{DirectRouter, OrthogonalRouter, Router, RoutingMode};
pub use scenario::{ReplayOutcome, Scenario, ScenarioError};
pub use scene::{AnchorProvider, CapabilityRegistry, FixedAnchorProvider, Scene, ShapeAnchorProvider};
