//! Per-frame simulation pipeline
//!
//! Fixed stage order while Running: input + physics, landing, camera, platform
//! field, score, terminal check. Nothing runs in Idle or Ended.

use super::camera::Camera;
use super::collision;
use super::field;
use super::physics::{self, InputState};
use super::state::{GameEvent, GamePhase, GameState};
use crate::settings::Tuning;

/// Score for a camera height
#[inline]
pub fn score_for_height(height: f32, tuning: &Tuning) -> u64 {
    (height * tuning.score_scale).floor().max(0.0) as u64
}

/// Whether the player has dropped below the playable band
#[inline]
pub fn fell_off_screen(player_y: f32, camera: &Camera, tuning: &Tuning) -> bool {
    player_y < camera.height - tuning.death_margin
}

/// Advance the run by one frame of wall-clock `dt` (capped to `max_frame_dt`)
pub fn tick(state: &mut GameState, input: &InputState, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    let dt = dt.clamp(0.0, state.tuning.max_frame_dt);
    state.frame_count += 1;

    let was_grounded = state.player.grounded;
    let step = physics::integrate(&mut state.player, input, &state.tuning, dt);
    if step.jumped {
        state.events.push(GameEvent::Jumped);
    }

    if let Some(index) = collision::resolve(&mut state.player, &state.platforms, &state.tuning, dt) {
        if !was_grounded {
            state.events.push(GameEvent::Landed {
                platform_y: state.platforms[index].position.y,
            });
        }
    }

    state.camera.advance(dt, &state.tuning);

    let change = field::maintain(
        &mut state.platforms,
        state.camera.height,
        &mut state.rng,
        &state.tuning,
    );
    if change.added > 0 || change.removed > 0 {
        log::trace!(
            "Field: +{} -{} ({} live)",
            change.added,
            change.removed,
            state.platforms.len()
        );
    }

    // Camera height never decreases, so neither does the score.
    state.score = score_for_height(state.camera.height, &state.tuning);

    if !state.game_over_latched
        && fell_off_screen(state.player.position.y, &state.camera, &state.tuning)
    {
        state.game_over_latched = true;
        state.phase = GamePhase::Ended;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "Run over: score {} at height {:.1} after {} frames",
            state.score,
            state.camera.height,
            state.frame_count
        );
    }
}
