//! Meteor streaks (stateful, transient).

use std::collections::VecDeque;

use constella_core::Viewport;
use rand::Rng;

use super::spread;
use crate::state::FieldParams;

/// State for a single meteor.
#[derive(Debug, Clone)]
pub struct Meteor {
    /// Head position in virtual pixels.
    pub x: f32,
    pub y: f32,
    /// Velocity in pixels per frame.
    pub vx: f32,
    pub vy: f32,
    /// Frames lived so far.
    pub age: f32,
    /// Frames after which the meteor is removed.
    pub max_age: f32,
    pub size: f32,
    /// Recent head positions, oldest first.
    pub trail: VecDeque<(f32, f32)>,
}

impl Meteor {
    /// Whether the head has left the viewport plus margin.
    fn is_off_screen(&self, viewport: Viewport, margin: f32) -> bool {
        self.x < -margin
            || self.x > viewport.width + margin
            || self.y < -margin
            || self.y > viewport.height + margin
    }

    /// Remaining life as a fraction, 1.0 at birth.
    pub fn life(&self) -> f32 {
        if self.max_age <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// Create a meteor on the top, left or right edge heading down into the viewport.
pub fn spawn<R: Rng>(viewport: Viewport, params: &FieldParams, rng: &mut R) -> Meteor {
    let speed = spread(rng, 4.0, 8.0);
    let (x, y, vx) = match rng.random_range(0..4) {
        // Top edge twice as likely as either side.
        0 | 1 => {
            let x = spread(rng, 0.0, viewport.width);
            let heading = if x < viewport.width / 2.0 { 1.0 } else { -1.0 };
            (x, 0.0, heading * speed * spread(rng, 0.3, 0.8))
        }
        2 => (0.0, spread(rng, 0.0, viewport.height / 2.0), speed * 0.8),
        _ => (
            viewport.width,
            spread(rng, 0.0, viewport.height / 2.0),
            -speed * 0.8,
        ),
    };

    Meteor {
        x,
        y,
        vx,
        vy: speed * spread(rng, 0.5, 1.0),
        age: 0.0,
        max_age: spread(rng, params.meteor_min_age, params.meteor_max_age),
        size: spread(rng, 1.0, 2.5),
        trail: VecDeque::with_capacity(params.trail_length + 1),
    }
}

/// Possibly add a meteor, with `meteor_chance` probability per elapsed frame.
pub fn maybe_spawn<R: Rng>(
    meteors: &mut Vec<Meteor>,
    viewport: Viewport,
    params: &FieldParams,
    dt: f32,
    rng: &mut R,
) {
    if !params.meteors || params.meteor_chance <= 0.0 {
        return;
    }
    let chance = 1.0 - (1.0 - params.meteor_chance.min(1.0)).powf(dt);
    if rng.random::<f32>() < chance {
        meteors.push(spawn(viewport, params, rng));
    }
}

/// Advance meteors and drop the ones that expired or left the viewport.
pub fn update(meteors: &mut Vec<Meteor>, viewport: Viewport, params: &FieldParams, dt: f32) {
    for m in meteors.iter_mut() {
        m.trail.push_back((m.x, m.y));
        while m.trail.len() > params.trail_length {
            m.trail.pop_front();
        }
        m.x += m.vx * dt;
        m.y += m.vy * dt;
        m.age += dt;
    }

    meteors.retain(|m| m.age <= m.max_age && !m.is_off_screen(viewport, params.margin));
}
