//! Game state and core simulation types
//!
//! One owned `GameState` per run. The session replaces it wholesale on restart.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::field;
use crate::settings::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start, no physics runs
    Idle,
    /// Frame pipeline active
    Running,
    /// Player fell off screen; waiting for score submission or restart
    Ended,
}

/// Notable things that happened during a tick, drained by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Player came to rest on a platform after being airborne
    Landed { platform_y: f32 },
    GameOver { score: u64 },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position (z is always 0)
    pub position: Vec3,
    pub velocity: Vec2,
    pub grounded: bool,
    /// (half width, half height)
    pub half_extents: Vec2,
    /// Cosmetic lean (radians), derived from velocity
    pub tilt: f32,
}

impl Player {
    pub fn new(position: Vec3, tuning: &Tuning) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            half_extents: Vec2::new(tuning.player_half_width, tuning.player_half_height),
            tilt: 0.0,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.half_extents.y
    }
}

/// A platform; geometry never changes after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Center position
    pub position: Vec3,
    /// (half width, half height, half depth)
    pub half_extents: Vec3,
    /// The wide platform the run starts on
    pub is_start: bool,
}

impl Platform {
    pub fn new(x: f32, y: f32, tuning: &Tuning) -> Self {
        Self {
            position: Vec3::new(x, y, 0.0),
            half_extents: Vec3::new(
                tuning.platform_half_width,
                tuning.platform_half_height,
                tuning.platform_half_depth,
            ),
            is_start: false,
        }
    }

    pub fn start(tuning: &Tuning) -> Self {
        Self {
            position: Vec3::ZERO,
            half_extents: Vec3::new(
                tuning.start_platform_half_width,
                tuning.platform_half_height,
                tuning.platform_half_depth,
            ),
            is_start: true,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y + self.half_extents.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.half_extents.y
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for the platform generator
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Live platforms in creation order
    pub platforms: Vec<Platform>,
    pub camera: Camera,
    /// floor(camera height * score scale)
    pub score: u64,
    /// Frames simulated while Running
    pub frame_count: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    /// Set once the run has ended so the terminal check cannot fire twice
    pub(crate) game_over_latched: bool,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh run: start platform, initial field, player resting above y = 0.
    /// The run stays Idle until started.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let platforms = field::initial_field(&mut rng, &tuning);
        let spawn_y = tuning.platform_half_height + tuning.player_half_height;
        let player = Player::new(Vec3::new(0.0, spawn_y, 0.0), &tuning);

        Self {
            seed,
            phase: GamePhase::Idle,
            player,
            platforms,
            camera: Camera::default(),
            score: 0,
            frame_count: 0,
            tuning,
            rng,
            game_over_latched: false,
            events: Vec::new(),
        }
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_starts_idle_on_start_platform() {
        let tuning = Tuning::default();
        let state = GameState::new(7, tuning.clone());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        let start: Vec<_> = state.platforms.iter().filter(|p| p.is_start).collect();
        assert_eq!(start.len(), 1);
        assert_eq!(start[0].position.y, 0.0);
        assert_eq!(state.player.bottom(), start[0].top());
        assert_eq!(state.player.position.z, 0.0);
    }

    #[test]
    fn start_platform_is_wider() {
        let tuning = Tuning::default();
        assert!(Platform::start(&tuning).half_extents.x > Platform::new(0.0, 5.0, &tuning).half_extents.x);
    }
}
