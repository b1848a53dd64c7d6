//! Particle constellation background for terminal applications.
//!
//! A fixed set of drifting particles is simulated in a virtual pixel space.
//! Nearby particles are joined by fading links, particles lean toward the
//! pointer, and the occasional meteor streaks across the field. Each tick
//! produces a [`Scene`] display list which [`render_scene`] paints onto a
//! ratatui braille canvas.
//!
//! [`Animation`] owns the frame scheduling handle and input listeners of a
//! running background and releases them on [`Animation::stop`] or drop.

mod animations;
mod chars;
mod color;
mod lifecycle;
mod render;
mod scene;
mod state;

pub use animations::links::{LINK_MAX_OPACITY, link_opacity};
pub use animations::meteors::Meteor;
pub use animations::particles::{Particle, Shape};
pub use lifecycle::{
    Animation, AnimationState, FrameHandle, Host, ListenerId, ListenerKind, StartOutcome,
};
pub use render::render_scene;
pub use scene::{DrawCommand, Scene};
pub use state::{FieldParams, ParticleField};
