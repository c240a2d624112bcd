//! Player integrator: input and constant forces to velocity, velocity to position
//!
//! Semi-implicit Euler. Horizontal input snaps velocity to a target instead of
//! accelerating; gravity applies every frame, grounded or not.

use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::settings::Tuning;

/// Directional keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    /// -1, 0 or +1. Both keys held cancel out.
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// What the integrator did that the orchestrator may care about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepResult {
    pub jumped: bool,
}

/// Advance the player's velocity and position by one frame
pub fn integrate(player: &mut Player, input: &InputState, tuning: &Tuning, dt: f32) -> StepResult {
    let mut result = StepResult::default();

    let direction = input.direction();
    if direction != 0.0 {
        player.velocity.x = direction * tuning.max_move_speed;
    } else {
        let friction = if player.grounded {
            tuning.ground_friction
        } else {
            tuning.air_friction
        };
        player.velocity.x *= friction;
        if player.velocity.x.abs() < tuning.stop_threshold {
            player.velocity.x = 0.0;
        }
    }

    // Grounded clears on the same frame, so a held key jumps once per landing.
    if input.jump && player.grounded {
        player.velocity.y = tuning.jump_impulse;
        player.grounded = false;
        result.jumped = true;
    }

    player.velocity.y = (player.velocity.y - tuning.gravity * dt).max(-tuning.terminal_velocity);

    player.position.x += player.velocity.x * dt;
    player.position.y += player.velocity.y * dt;
    player.position.x = player
        .position
        .x
        .clamp(-tuning.horizontal_limit, tuning.horizontal_limit);

    let target_tilt = -player.velocity.x * tuning.tilt_factor;
    player.tilt += (target_tilt - player.tilt) * tuning.tilt_smoothing;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn player() -> Player {
        Player::new(Vec3::new(0.0, 10.0, 0.0), &Tuning::default())
    }

    #[test]
    fn direction_key_snaps_to_max_speed() {
        let tuning = Tuning::default();
        let mut p = player();
        let input = InputState {
            right: true,
            ..Default::default()
        };
        integrate(&mut p, &input, &tuning, DT);
        assert_eq!(p.velocity.x, tuning.max_move_speed);

        let input = InputState {
            left: true,
            ..Default::default()
        };
        integrate(&mut p, &input, &tuning, DT);
        assert_eq!(p.velocity.x, -tuning.max_move_speed);
    }

    #[test]
    fn both_directions_cancel() {
        let input = InputState {
            left: true,
            right: true,
            jump: false,
        };
        assert_eq!(input.direction(), 0.0);
    }

    #[test]
    fn friction_decays_then_snaps_to_zero() {
        let tuning = Tuning::default();
        let mut p = player();
        p.grounded = true;
        p.velocity.x = 5.0;
        integrate(&mut p, &InputState::default(), &tuning, DT);
        assert!((p.velocity.x - 5.0 * tuning.ground_friction).abs() < 1e-6);

        for _ in 0..200 {
            p.grounded = true;
            integrate(&mut p, &InputState::default(), &tuning, DT);
        }
        assert_eq!(p.velocity.x, 0.0);
    }

    #[test]
    fn air_friction_is_gentler_than_ground() {
        let tuning = Tuning::default();
        let mut air = player();
        let mut ground = player();
        air.velocity.x = 5.0;
        ground.velocity.x = 5.0;
        ground.grounded = true;
        integrate(&mut air, &InputState::default(), &tuning, DT);
        integrate(&mut ground, &InputState::default(), &tuning, DT);
        assert!(air.velocity.x > ground.velocity.x);
    }

    #[test]
    fn jump_requires_ground_and_clears_it_same_frame() {
        let tuning = Tuning::default();
        let jump = InputState {
            jump: true,
            ..Default::default()
        };

        let mut airborne = player();
        let result = integrate(&mut airborne, &jump, &tuning, DT);
        assert!(!result.jumped);
        assert!(airborne.velocity.y < 0.0);

        let mut p = player();
        p.grounded = true;
        let result = integrate(&mut p, &jump, &tuning, DT);
        assert!(result.jumped);
        assert!(!p.grounded);
        assert!((p.velocity.y - (tuning.jump_impulse - tuning.gravity * DT)).abs() < 1e-5);

        // Key still held next frame: no second impulse while airborne
        let vy = p.velocity.y;
        let result = integrate(&mut p, &jump, &tuning, DT);
        assert!(!result.jumped);
        assert!(p.velocity.y < vy);
    }

    #[test]
    fn horizontal_position_is_clamped() {
        let tuning = Tuning::default();
        let mut p = player();
        let input = InputState {
            right: true,
            ..Default::default()
        };
        for _ in 0..600 {
            integrate(&mut p, &input, &tuning, DT);
        }
        assert_eq!(p.position.x, tuning.horizontal_limit);
    }

    #[test]
    fn tilt_leans_against_motion() {
        let tuning = Tuning::default();
        let mut p = player();
        let input = InputState {
            right: true,
            ..Default::default()
        };
        integrate(&mut p, &input, &tuning, DT);
        assert!(p.tilt < 0.0);
    }

    proptest! {
        #[test]
        fn fall_speed_never_exceeds_terminal(
            vy in -100.0f32..100.0,
            dt in 0.001f32..0.1,
            frames in 1usize..200,
        ) {
            let tuning = Tuning::default();
            let mut p = player();
            p.velocity.y = vy;
            for _ in 0..frames {
                integrate(&mut p, &InputState::default(), &tuning, dt);
                prop_assert!(p.velocity.y >= -tuning.terminal_velocity);
            }
        }

        #[test]
        fn position_integrates_updated_velocity(vx in -5.0f32..5.0, vy in -10.0f32..10.0) {
            let tuning = Tuning::default();
            let mut p = player();
            p.velocity = glam::Vec2::new(vx, vy);
            let before = p.position;
            integrate(&mut p, &InputState::default(), &tuning, DT);
            prop_assert!((p.position.y - (before.y + p.velocity.y * DT)).abs() < 1e-4);
            prop_assert!((p.position.x - (before.x + p.velocity.x * DT)).abs() < 1e-4);
        }
    }
}
