//! Connection lines between nearby particles.

use super::particles::Particle;

/// Opacity of a link between two particles at the same position.
pub const LINK_MAX_OPACITY: f32 = 0.5;

/// A visible link between two particles, by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

/// Link opacity for two particles `distance` apart.
///
/// Falls linearly from [`LINK_MAX_OPACITY`] to zero at `max_distance`.
pub fn link_opacity(distance: f32, max_distance: f32) -> f32 {
    if max_distance <= 0.0 || distance >= max_distance {
        return 0.0;
    }
    LINK_MAX_OPACITY * (1.0 - distance.max(0.0) / max_distance)
}

/// All unordered particle pairs closer than `max_distance`.
pub fn collect_links(particles: &[Particle], max_distance: f32) -> Vec<Link> {
    let max_sq = max_distance * max_distance;
    let mut links = Vec::new();

    for (i, a) in particles.iter().enumerate() {
        for (j, b) in particles.iter().enumerate().skip(i + 1) {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq >= max_sq {
                continue;
            }
            let opacity = link_opacity(dist_sq.sqrt(), max_distance);
            if opacity > 0.0 {
                links.push(Link { a: i, b: j, opacity });
            }
        }
    }

    links
}
