//! Connector model: the persisted anchor list and the live connection
//!
//! [`AnchorSpec`] is what the content model knows about a connector's control
//! points. [`Connection`] is the live visual that owns the current anchors,
//! resolves attached anchors against the [`Scene`](crate::scene::Scene) and
//! keeps the last router output, in which router-inserted implicit anchors are
//! interleaved with the explicit ones.

pub mod anchor;
pub mod connection;

pub use anchor::{AnchorRole, AnchorSpec, BendPoint, PartId};
pub use connection::{AttachmentHints, Connection, RoutedAnchor};
