//! Screen flow
//!
//! Pure state machine plus the controller that applies its effects to the
//! page. No DOM access in here.

pub mod controller;
pub mod screen;
pub mod session;
pub mod transition;

pub use controller::{
    Collaborators, FlowApp, FlowController, View, apply_effects, show_progress, try_dispatch,
    try_with_app,
};
pub use screen::{ElementId, Screen};
pub use session::{ProbeState, SessionState, SimMode};
pub use transition::{Effect, FlowEvent, FlowState, Step, step};
