//! Particle field state management.

use constella_core::{Palette, Pointer, Theme, Viewport};
use rand::{SeedableRng, rngs::StdRng};

use crate::animations::{
    links,
    meteors::{self, Meteor},
    particles::{self, Particle},
};
use crate::scene::{DrawCommand, Scene};

/// Tunables for the particle field, in virtual pixels and 60 Hz frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Number of particles created at initialization.
    pub particle_count: usize,
    /// Particles closer than this are linked.
    pub connection_distance: f32,
    /// Particles within this distance of the pointer are pulled toward it.
    pub attraction_radius: f32,
    /// Peak pointer acceleration, in pixels per frame squared.
    pub attraction_strength: f32,
    /// Fraction of excess velocity kept each frame.
    pub damping: f32,
    /// Padding around the viewport before particles wrap.
    pub margin: f32,
    /// Largest resting speed along each axis.
    pub max_drift: f32,
    pub meteors: bool,
    /// Probability of a new meteor per frame.
    pub meteor_chance: f32,
    pub meteor_min_age: f32,
    pub meteor_max_age: f32,
    /// Positions kept in a meteor tail.
    pub trail_length: usize,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            particle_count: 70,
            connection_distance: 120.0,
            attraction_radius: 150.0,
            attraction_strength: 0.06,
            damping: 0.96,
            margin: 20.0,
            max_drift: 0.35,
            meteors: true,
            meteor_chance: 0.004,
            meteor_min_age: 40.0,
            meteor_max_age: 90.0,
            trail_length: 14,
        }
    }
}

/// A fixed set of particles plus transient meteors.
#[derive(Debug)]
pub struct ParticleField {
    params: FieldParams,
    theme: Theme,
    palette: Palette,
    viewport: Viewport,
    particles: Vec<Particle>,
    meteors: Vec<Meteor>,
    scene: Scene,
    rng: StdRng,
}

impl ParticleField {
    /// Create an empty field seeded from the system clock.
    pub fn new(params: FieldParams, theme: Theme) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(params, theme, seed)
    }

    /// Create an empty field with a fixed seed.
    pub fn with_seed(params: FieldParams, theme: Theme, seed: u64) -> Self {
        let palette = theme.palette();
        Self {
            params,
            theme,
            palette,
            viewport: Viewport::default(),
            particles: Vec::new(),
            meteors: Vec::new(),
            scene: Scene {
                background: palette.background,
                ..Scene::default()
            },
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Populate the particles for a viewport. An empty viewport leaves the
    /// field empty so nothing is drawn.
    pub fn initialize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.meteors.clear();
        self.scene.commands.clear();
        self.scene.viewport = self.viewport;

        if self.viewport.is_empty() {
            tracing::debug!(width, height, "empty viewport, particle field disabled");
            self.particles.clear();
            return;
        }

        self.particles = particles::init_particles(
            self.params.particle_count,
            self.viewport,
            &self.params,
            &mut self.rng,
        );
        tracing::debug!(
            count = self.particles.len(),
            width,
            height,
            "initialized particle field"
        );
    }

    /// Track a new viewport size, initializing if no particles exist yet.
    /// Existing particles re-enter through wrap-around.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.particles.is_empty() {
            self.initialize(width, height);
            return;
        }
        self.viewport = Viewport::new(width, height);
        self.scene.viewport = self.viewport;
        if self.viewport.is_empty() {
            self.scene.commands.clear();
        }
    }

    /// Advance the simulation by `dt` frames and rebuild the scene.
    pub fn tick(&mut self, pointer: &Pointer, dt: f32) -> &Scene {
        self.scene.commands.clear();
        self.scene.viewport = self.viewport;
        self.scene.background = self.palette.background;

        if self.viewport.is_empty() {
            return &self.scene;
        }

        particles::update(
            &mut self.particles,
            pointer,
            self.viewport,
            &self.params,
            dt,
        );
        meteors::maybe_spawn(
            &mut self.meteors,
            self.viewport,
            &self.params,
            dt,
            &mut self.rng,
        );
        meteors::update(&mut self.meteors, self.viewport, &self.params, dt);

        self.build_scene();
        &self.scene
    }

    fn build_scene(&mut self) {
        let palette = self.palette;
        let commands = &mut self.scene.commands;

        for link in links::collect_links(&self.particles, self.params.connection_distance) {
            let a = &self.particles[link.a];
            let b = &self.particles[link.b];
            commands.push(DrawCommand::Link {
                from: (a.x, a.y),
                to: (b.x, b.y),
                color: palette.accent(a.color_index),
                opacity: link.opacity,
            });
        }

        for p in &self.particles {
            commands.push(DrawCommand::Particle {
                x: p.x,
                y: p.y,
                radius: p.radius,
                shape: p.shape,
                color: palette.accent(p.color_index),
                opacity: p.opacity,
            });
        }

        for m in &self.meteors {
            let life = m.life();
            let points: Vec<(f32, f32)> = m
                .trail
                .iter()
                .copied()
                .chain(std::iter::once((m.x, m.y)))
                .collect();
            let segments = points.len().saturating_sub(1);
            for (i, pair) in points.windows(2).enumerate() {
                // Older segments fade out toward the tail end.
                let opacity = (i + 1) as f32 / segments as f32 * 0.8 * life;
                commands.push(DrawCommand::Trail {
                    from: pair[0],
                    to: pair[1],
                    color: palette.meteor,
                    opacity,
                });
            }
            commands.push(DrawCommand::MeteorHead {
                x: m.x,
                y: m.y,
                size: m.size,
                color: palette.meteor,
            });
        }
    }

    /// Switch palettes; takes effect on the next tick.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.palette = theme.palette();
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    /// Scene produced by the most recent tick.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Forget the last scene so nothing is drawn.
    pub fn clear_scene(&mut self) {
        self.scene.commands.clear();
    }
}
