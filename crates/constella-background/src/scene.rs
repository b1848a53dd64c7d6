//! Per-frame display list.

use constella_core::{Rgb, Viewport};

use crate::animations::particles::Shape;

/// One drawing operation, in virtual pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Connection line between two particles.
    Link {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        opacity: f32,
    },
    Particle {
        x: f32,
        y: f32,
        radius: f32,
        shape: Shape,
        color: Rgb,
        opacity: f32,
    },
    /// One segment of a meteor tail.
    Trail {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        opacity: f32,
    },
    MeteorHead {
        x: f32,
        y: f32,
        size: f32,
        color: Rgb,
    },
}

/// Everything drawn for one frame, back to front.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub viewport: Viewport,
    /// Color that faded elements blend toward.
    pub background: Rgb,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of link commands in the scene.
    pub fn link_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Link { .. }))
            .count()
    }

    /// Number of particle commands in the scene.
    pub fn particle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Particle { .. }))
            .count()
    }
}
