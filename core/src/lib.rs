//! Page stack state machine and navigation controller.
//!
//! [`NavController`] drives a [`PageStack`] through collaborator traits
//! ([`collab`]) and never touches rendering, animation timing, or platform
//! APIs directly. [`memory`] provides in-process collaborators.

pub mod collab;
mod controller;
pub mod memory;
mod settings;
mod stack;
mod throttle;

pub use collab::NavCollaborators;
pub use controller::{ControllerState, NavController, NavEvent, PopOutcome, PushOutcome};
pub use settings::NavSettings;
pub use stack::{Page, PageStack, TransitionTicket};
pub use throttle::CooldownGate;
