//! Ownership of a running background: frame scheduling and input listeners.
//!
//! The surrounding application implements [`Host`]. An [`Animation`] asks the
//! host for frames and listener registrations while it runs and hands every
//! one of them back on [`Animation::stop`] or when it is dropped.

use constella_core::{AnimationSpeed, Pointer, Theme};

use crate::scene::Scene;
use crate::state::ParticleField;

/// Nominal frame length the simulation constants are tuned for.
const FRAME_MS: f32 = 1000.0 / 60.0;

/// Longest gap, in nominal frames, simulated in one step.
const MAX_FRAME_STEP: f32 = 4.0;

/// Identifies a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Identifies a registered input listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Input the animation subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerLeave,
    Resize,
}

/// Environment an [`Animation`] runs in.
pub trait Host {
    /// Whether the user asked for a still background.
    fn prefers_reduced_motion(&self) -> bool;

    /// Current drawing surface size in virtual pixels.
    fn surface_size(&self) -> (f32, f32);

    /// Schedule one frame callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Drop a scheduled frame callback.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start delivering an input kind.
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    /// Stop delivering a previously registered input.
    fn remove_listener(&mut self, id: ListenerId);
}

/// Lifecycle of an [`Animation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Uninitialized,
    Running,
    TornDown,
}

/// Result of [`Animation::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Reduced motion requested; nothing was scheduled.
    ReducedMotion,
    AlreadyRunning,
    /// A stopped animation cannot be restarted.
    TornDown,
}

const LISTENERS: [ListenerKind; 3] = [
    ListenerKind::PointerMove,
    ListenerKind::PointerLeave,
    ListenerKind::Resize,
];

/// A particle field bound to a host's frame clock and input.
#[derive(Debug)]
pub struct Animation<H: Host> {
    host: H,
    field: ParticleField,
    speed: AnimationSpeed,
    state: AnimationState,
    pending_frame: Option<FrameHandle>,
    listeners: Vec<ListenerId>,
    pointer: Pointer,
    last_frame_ms: Option<u64>,
}

impl<H: Host> Animation<H> {
    pub fn new(host: H, field: ParticleField, speed: AnimationSpeed) -> Self {
        Self {
            host,
            field,
            speed,
            state: AnimationState::Uninitialized,
            pending_frame: None,
            listeners: Vec::new(),
            pointer: Pointer::default(),
            last_frame_ms: None,
        }
    }

    /// Attach listeners, initialize the field and request the first frame.
    pub fn start(&mut self) -> StartOutcome {
        match self.state {
            AnimationState::Running => return StartOutcome::AlreadyRunning,
            AnimationState::TornDown => return StartOutcome::TornDown,
            AnimationState::Uninitialized => {}
        }

        if self.host.prefers_reduced_motion() {
            tracing::info!("reduced motion requested, background stays idle");
            return StartOutcome::ReducedMotion;
        }

        self.listeners = LISTENERS
            .iter()
            .map(|&kind| self.host.add_listener(kind))
            .collect();

        let (width, height) = self.host.surface_size();
        self.field.initialize(width, height);
        self.pending_frame = Some(self.host.request_frame());
        self.state = AnimationState::Running;
        tracing::debug!(width, height, "background animation started");
        StartOutcome::Started
    }

    /// Run one frame if `handle` is the frame this animation asked for.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: u64) {
        if self.state != AnimationState::Running || self.pending_frame != Some(handle) {
            tracing::trace!(?handle, "ignoring stale frame");
            return;
        }

        let dt = frame_step(self.last_frame_ms, now_ms, self.speed);
        self.last_frame_ms = Some(now_ms);
        self.field.tick(&self.pointer, dt);
        self.pending_frame = Some(self.host.request_frame());
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if self.state == AnimationState::Running {
            self.pointer = Pointer::at(x, y);
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if self.state == AnimationState::Running {
            self.pointer.active = false;
        }
    }

    pub fn on_resize(&mut self, width: f32, height: f32) {
        if self.state == AnimationState::Running {
            self.field.resize(width, height);
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.field.set_theme(theme);
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
    }

    /// Cancel the pending frame and remove every listener. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }
        for id in self.listeners.drain(..) {
            self.host.remove_listener(id);
        }
        if self.state == AnimationState::Running {
            tracing::debug!("background animation stopped");
        }
        self.state = AnimationState::TornDown;
        self.field.clear_scene();
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Scene to paint for the current frame; empty unless running.
    pub fn scene(&self) -> &Scene {
        self.field.scene()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: Host> Drop for Animation<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Elapsed time since the previous frame in nominal frames, scaled by speed.
fn frame_step(last_ms: Option<u64>, now_ms: u64, speed: AnimationSpeed) -> f32 {
    let frames = match last_ms {
        Some(last) => now_ms.saturating_sub(last) as f32 / FRAME_MS,
        None => 1.0,
    };
    frames.min(MAX_FRAME_STEP) * speed.multiplier()
}
