//! Drifting particles (stateful).

use std::f32::consts::TAU;

use constella_core::{Pointer, Viewport};
use rand::Rng;

use super::spread;
use crate::chars::{CIRCLE_CHARS, DIAMOND_CHARS, TRIANGLE_CHARS};
use crate::state::FieldParams;

/// Outline drawn for a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Diamond,
    Triangle,
}

impl Shape {
    /// Glyph for this shape at the given radius.
    pub fn glyph(self, radius: f32) -> char {
        let chars = match self {
            Shape::Circle => CIRCLE_CHARS,
            Shape::Diamond => DIAMOND_CHARS,
            Shape::Triangle => TRIANGLE_CHARS,
        };
        let size = if radius < 1.5 {
            0
        } else if radius < 2.4 {
            1
        } else {
            2
        };
        chars[size.min(chars.len() - 1)]
    }
}

/// State for a single particle.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position in virtual pixels.
    pub x: f32,
    pub y: f32,
    /// Current velocity in pixels per frame.
    pub vx: f32,
    pub vy: f32,
    /// Resting velocity that damping relaxes toward.
    pub drift_x: f32,
    pub drift_y: f32,
    pub radius: f32,
    /// Peak opacity of the pulse.
    pub base_opacity: f32,
    /// Opacity for the current frame.
    pub opacity: f32,
    /// Pulse phase in radians.
    pub pulse_phase: f32,
    /// Pulse phase advance per frame.
    pub pulse_speed: f32,
    pub shape: Shape,
    /// Index into the palette accents.
    pub color_index: usize,
}

/// Create `count` particles scattered over the viewport.
pub fn init_particles<R: Rng>(
    count: usize,
    viewport: Viewport,
    params: &FieldParams,
    rng: &mut R,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let drift_x = spread(rng, -params.max_drift, params.max_drift);
            let drift_y = spread(rng, -params.max_drift, params.max_drift);
            let base_opacity = spread(rng, 0.35, 0.9);
            let pulse_phase = spread(rng, 0.0, TAU);
            let shape = match rng.random_range(0..10) {
                0..=6 => Shape::Circle,
                7 | 8 => Shape::Diamond,
                _ => Shape::Triangle,
            };
            Particle {
                x: spread(rng, 0.0, viewport.width),
                y: spread(rng, 0.0, viewport.height),
                vx: drift_x,
                vy: drift_y,
                drift_x,
                drift_y,
                radius: spread(rng, 1.0, 3.0),
                base_opacity,
                opacity: pulse_opacity(base_opacity, pulse_phase),
                pulse_phase,
                pulse_speed: spread(rng, 0.01, 0.04),
                shape,
                color_index: rng.random_range(0..3),
            }
        })
        .collect()
}

/// Advance every particle by `dt` frames.
pub fn update(
    particles: &mut [Particle],
    pointer: &Pointer,
    viewport: Viewport,
    params: &FieldParams,
    dt: f32,
) {
    let decay = params.damping.powf(dt);

    for p in particles {
        p.pulse_phase = (p.pulse_phase + p.pulse_speed * dt) % TAU;
        p.opacity = pulse_opacity(p.base_opacity, p.pulse_phase);

        let (ax, ay) = attraction(p.x, p.y, pointer, params);
        p.vx += ax * dt;
        p.vy += ay * dt;

        p.vx = p.drift_x + (p.vx - p.drift_x) * decay;
        p.vy = p.drift_y + (p.vy - p.drift_y) * decay;

        p.x += p.vx * dt;
        p.y += p.vy * dt;

        wrap(p, viewport, params.margin);
    }
}

/// Pulsing opacity, between 10% and 100% of `base`.
pub fn pulse_opacity(base: f32, phase: f32) -> f32 {
    base * (0.55 + 0.45 * phase.sin())
}

/// Acceleration toward the pointer for a particle at (`x`, `y`).
///
/// Zero when the pointer is inactive or at least `attraction_radius` away;
/// otherwise it grows linearly as the particle gets closer.
pub fn attraction(x: f32, y: f32, pointer: &Pointer, params: &FieldParams) -> (f32, f32) {
    let radius = params.attraction_radius;
    if !pointer.active || !radius.is_finite() || radius <= 0.0 {
        return (0.0, 0.0);
    }

    let dx = pointer.x - x;
    let dy = pointer.y - y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist >= radius || dist <= f32::EPSILON {
        return (0.0, 0.0);
    }

    let force = params.attraction_strength * (1.0 - dist / radius);
    (dx / dist * force, dy / dist * force)
}

/// Move a particle that left the padded viewport to the opposite edge.
fn wrap(p: &mut Particle, viewport: Viewport, margin: f32) {
    if p.x < -margin {
        p.x = viewport.width + margin;
    } else if p.x > viewport.width + margin {
        p.x = -margin;
    }
    if p.y < -margin {
        p.y = viewport.height + margin;
    } else if p.y > viewport.height + margin {
        p.y = -margin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn field(count: usize, viewport: Viewport) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(7);
        init_particles(count, viewport, &FieldParams::default(), &mut rng)
    }

    fn in_bounds(p: &Particle, viewport: Viewport, margin: f32) -> bool {
        p.x >= -margin
            && p.x <= viewport.width + margin
            && p.y >= -margin
            && p.y <= viewport.height + margin
    }

    #[test]
    fn test_init_within_viewport() {
        let viewport = Viewport::new(800.0, 600.0);
        let particles = field(70, viewport);
        assert_eq!(particles.len(), 70);
        for p in &particles {
            assert!((0.0..=800.0).contains(&p.x));
            assert!((0.0..=600.0).contains(&p.y));
            assert!(p.color_index < 3);
            assert!(p.opacity >= 0.0 && p.opacity <= p.base_opacity + 1e-6);
        }
    }

    #[test]
    fn test_positions_stay_in_padded_viewport() {
        let viewport = Viewport::new(320.0, 200.0);
        let params = FieldParams::default();
        let mut particles = field(70, viewport);

        for frame in 0..2000 {
            // Sweep the pointer around so attraction is exercised too.
            let t = frame as f32 * 0.05;
            let pointer = Pointer::at(160.0 + 150.0 * t.cos(), 100.0 + 90.0 * t.sin());
            update(&mut particles, &pointer, viewport, &params, 1.0 + (frame % 4) as f32);

            assert_eq!(particles.len(), 70);
            for p in &particles {
                assert!(in_bounds(p, viewport, params.margin), "escaped: {p:?}");
            }
        }
    }

    #[test]
    fn test_wrap_moves_to_opposite_edge() {
        let viewport = Viewport::new(100.0, 100.0);
        let params = FieldParams::default();
        let mut particles = field(1, viewport);
        let p = &mut particles[0];
        p.x = -params.margin - 1.0;
        p.y = 100.0 + params.margin + 1.0;
        p.vx = 0.0;
        p.vy = 0.0;
        p.drift_x = 0.0;
        p.drift_y = 0.0;

        update(&mut particles, &Pointer::default(), viewport, &params, 1.0);
        assert_eq!(particles[0].x, 100.0 + params.margin);
        assert_eq!(particles[0].y, -params.margin);
    }

    #[test]
    fn test_off_canvas_pointer_has_no_pull() {
        let viewport = Viewport::new(1920.0, 1080.0);
        let params = FieldParams::default();
        let particles = field(70, viewport);
        let pointer = Pointer::at(-1000.0, -1000.0);

        for p in &particles {
            assert_eq!(attraction(p.x, p.y, &pointer, &params), (0.0, 0.0));
        }
    }

    #[test]
    fn test_attraction_points_at_pointer() {
        let params = FieldParams::default();
        let pointer = Pointer::at(100.0, 100.0);

        let (ax, ay) = attraction(50.0, 100.0, &pointer, &params);
        assert!(ax > 0.0);
        assert_eq!(ay, 0.0);

        let (near, _) = attraction(90.0, 100.0, &pointer, &params);
        assert!(near > ax);

        let inactive = Pointer {
            active: false,
            ..pointer
        };
        assert_eq!(attraction(50.0, 100.0, &inactive, &params), (0.0, 0.0));
        assert_eq!(attraction(100.0, 100.0, &pointer, &params), (0.0, 0.0));
    }

    #[test]
    fn test_non_finite_radius_has_no_pull() {
        let pointer = Pointer::at(100.0, 100.0);
        for radius in [f32::NAN, f32::INFINITY] {
            let params = FieldParams {
                attraction_radius: radius,
                ..FieldParams::default()
            };
            assert_eq!(attraction(90.0, 100.0, &pointer, &params), (0.0, 0.0));
        }
    }

    #[test]
    fn test_damping_bounds_speed() {
        let viewport = Viewport::new(400.0, 400.0);
        let params = FieldParams::default();
        let mut particles = field(20, viewport);
        let pointer = Pointer::at(200.0, 200.0);

        for _ in 0..1000 {
            update(&mut particles, &pointer, viewport, &params, 1.0);
        }
        let limit = params.max_drift * 2.0_f32.sqrt()
            + params.attraction_strength / (1.0 - params.damping);
        for p in &particles {
            assert!((p.vx * p.vx + p.vy * p.vy).sqrt() <= limit);
        }
    }

    #[test]
    fn test_damping_relaxes_to_drift() {
        let viewport = Viewport::new(400.0, 400.0);
        let params = FieldParams::default();
        let mut particles = field(1, viewport);
        particles[0].vx = 50.0;

        for _ in 0..500 {
            update(&mut particles, &Pointer::default(), viewport, &params, 1.0);
        }
        assert!((particles[0].vx - particles[0].drift_x).abs() < 0.01);
    }

    #[test]
    fn test_glyph_sizes() {
        assert_eq!(Shape::Circle.glyph(1.0), '·');
        assert_eq!(Shape::Circle.glyph(2.0), '•');
        assert_eq!(Shape::Diamond.glyph(2.9), '◆');
        assert_eq!(Shape::Triangle.glyph(2.9), '▲');
    }
}
