//! Deterministic particle simulation
//!
//! - `step`: the pure per-tick integrator
//! - `collision`: wall containment and particle contacts
//! - `score`: fill percentage
//! - `state`: particles, size classes and the session state machine
//! - `tick`: per-frame input handling and the cancellable tick loop

pub mod collision;
pub mod score;
pub mod state;
pub mod step;
pub mod tick;

pub use collision::{Contact, Containment, particle_contact};
pub use score::{compute_fill_percentage, filled_area, region_area};
pub use state::{
    FillSession, Particle, PlayfieldSource, RngState, SessionPhase, SizeClass, add_particle,
    default_size_classes, pick_size_class,
};
pub use step::step_simulation;
pub use tick::{FrameHandle, TickInput, TickLoop, tick};
