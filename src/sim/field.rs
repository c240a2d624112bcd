//! Procedural platform field
//!
//! Keeps a finite slice of the endless climb materialized around the camera:
//! extend upward until the lookahead line is covered, retire everything that
//! has dropped below the removal line. Generation is stochastic; only the
//! spacing and horizontal bounds are guaranteed.

use rand::Rng;

use super::state::Platform;
use crate::settings::Tuning;

/// Platforms added and removed by one maintenance pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldChange {
    pub added: usize,
    pub removed: usize,
}

#[inline]
fn sample_spacing<R: Rng>(rng: &mut R, tuning: &Tuning) -> f32 {
    rng.random_range(tuning.min_spacing..=tuning.max_spacing)
}

#[inline]
fn sample_x<R: Rng>(rng: &mut R, tuning: &Tuning) -> f32 {
    rng.random_range(-tuning.horizontal_range..=tuning.horizontal_range)
}

/// Start platform at y = 0 plus `initial_platforms` stacked above it
pub fn initial_field<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(tuning.initial_platforms + 1);
    platforms.push(Platform::start(tuning));

    let mut y = tuning.min_spacing;
    for _ in 0..tuning.initial_platforms {
        platforms.push(Platform::new(sample_x(rng, tuning), y, tuning));
        y += sample_spacing(rng, tuning);
    }
    platforms
}

/// Highest platform center, if any
pub fn highest(platforms: &[Platform]) -> Option<f32> {
    platforms
        .iter()
        .map(|p| p.position.y)
        .max_by(|a, b| a.total_cmp(b))
}

/// Extend the field up to the lookahead line, then retire platforms below the removal line
pub fn maintain<R: Rng>(
    platforms: &mut Vec<Platform>,
    camera_y: f32,
    rng: &mut R,
    tuning: &Tuning,
) -> FieldChange {
    let mut change = FieldChange::default();
    let ceiling = camera_y + tuning.lookahead_margin;

    let mut max_y = highest(platforms).unwrap_or_else(|| {
        log::warn!("Platform field empty at camera {camera_y:.1}, reseeding");
        camera_y
    });
    while max_y < ceiling {
        max_y += sample_spacing(rng, tuning);
        platforms.push(Platform::new(sample_x(rng, tuning), max_y, tuning));
        change.added += 1;
    }

    let floor = camera_y - tuning.removal_margin;
    let before = platforms.len();
    platforms.retain(|p| p.position.y >= floor);
    change.removed = before - platforms.len();

    change
}
