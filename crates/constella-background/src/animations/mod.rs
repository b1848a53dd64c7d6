//! Stateful pieces of the constellation.

pub mod links;
pub mod meteors;
pub mod particles;

use rand::Rng;

/// Uniform sample in `[min, max)`; returns `min` for an empty range.
pub(crate) fn spread<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}
