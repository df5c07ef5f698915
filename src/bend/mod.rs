//! Interactive bend-point editing.
//!
//! [`BendPolicy`] opens a [`BendGesture`] on a [`Connection`]; the gesture
//! edits a [`BendOperation`] and re-routes after every call. Behaviour that
//! only makes sense for orthogonal routers is selected through
//! [`RoutingStrategy`].
//!
//! [`Connection`]: crate::model::Connection

pub mod index;
mod normalize;
pub mod operation;
mod overlay;
mod policy;
pub mod strategy;

pub use operation::{
    BendCommit, BendContent, BendContentOperation, BendOperation, BendVisualOperation,
    EditContext, UndoableOperation,
};
pub use policy::{BendGesture, BendPolicy, SelectedAnchor, SelectionState};
pub use strategy::RoutingStrategy;
