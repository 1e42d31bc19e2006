//! Core domain types for navstack.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer: the page stack, the controller,
//! configuration, and collaborator implementations.

mod content;
mod error;
mod ids;
mod nav_bar;
mod transition;

pub use content::{ContainerId, RenderableContent};
pub use error::{CollaboratorFailure, NavError};
pub use ids::{PageId, SubscriptionId, ViewHandle};
pub use nav_bar::NavBarState;
pub use transition::{AnimationClasses, AnimationCue, Direction, TransitionKind};
