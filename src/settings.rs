//! Gameplay tuning
//!
//! Every physics, generation and difficulty knob lives here so a run can be
//! rebalanced without touching the simulation. Stored as JSON in LocalStorage
//! on web; native builds use the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading stored tuning
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay tuning (world units, seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player movement ===
    /// Horizontal speed while a direction key is held (snapped, not accelerated)
    pub max_move_speed: f32,
    /// Horizontal acceleration. Kept as a knob; movement currently snaps to
    /// `max_move_speed`.
    pub move_acceleration: f32,
    /// Per-frame velocity.x multiplier with no key held, on a platform
    pub ground_friction: f32,
    /// Per-frame velocity.x multiplier with no key held, airborne
    pub air_friction: f32,
    /// |velocity.x| below this snaps to zero
    pub stop_threshold: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Maximum fall speed (positive number)
    pub terminal_velocity: f32,
    /// Upward velocity set on jump
    pub jump_impulse: f32,
    /// Player x is clamped to ±this
    pub horizontal_limit: f32,
    /// Player half width
    pub player_half_width: f32,
    /// Player half height
    pub player_half_height: f32,
    /// Lean angle per unit of horizontal velocity (radians)
    pub tilt_factor: f32,
    /// Exponential smoothing factor toward the target lean (0-1)
    pub tilt_smoothing: f32,

    // === Collision ===
    /// Extra depth below a platform's bottom face that still counts as landing
    pub landing_tolerance: f32,

    // === Platforms ===
    pub platform_half_width: f32,
    pub platform_half_height: f32,
    pub platform_half_depth: f32,
    /// Half width of the wide start platform at y = 0
    pub start_platform_half_width: f32,
    /// Platforms generated above the start platform on a fresh run
    pub initial_platforms: usize,
    pub min_spacing: f32,
    pub max_spacing: f32,
    /// Platform x is sampled from ±this
    pub horizontal_range: f32,
    /// The field is extended until it reaches camera_y + this
    pub lookahead_margin: f32,
    /// Platforms below camera_y - this are retired
    pub removal_margin: f32,

    // === Difficulty ===
    /// Camera climb per frame at the start of a run (units)
    pub initial_scroll_speed: f32,
    /// Per-frame climb gained per second of run time
    pub scroll_increment: f32,
    /// Per-frame climb cap
    pub max_scroll_speed: f32,
    /// Player below camera_y - this ends the run
    pub death_margin: f32,
    /// Score points per unit of camera height
    pub score_scale: f32,

    // === Frame loop ===
    /// Wall-clock frame delta cap (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_move_speed: 8.0,
            move_acceleration: 40.0,
            ground_friction: 0.8,
            air_friction: 0.95,
            stop_threshold: 0.01,
            gravity: 30.0,
            terminal_velocity: 20.0,
            jump_impulse: 14.0,
            horizontal_limit: 8.0,
            player_half_width: 0.4,
            player_half_height: 0.5,
            tilt_factor: 0.05,
            tilt_smoothing: 0.15,

            landing_tolerance: 0.3,

            platform_half_width: 1.5,
            platform_half_height: 0.15,
            platform_half_depth: 1.0,
            start_platform_half_width: 6.0,
            initial_platforms: 20,
            min_spacing: 1.5,
            max_spacing: 2.8,
            horizontal_range: 6.0,
            lookahead_margin: 20.0,
            removal_margin: 12.0,

            initial_scroll_speed: 0.01,
            scroll_increment: 0.000_333,
            max_scroll_speed: 0.05,
            death_margin: 10.0,
            score_scale: 10.0,

            max_frame_dt: 0.1,
        }
    }
}

impl Tuning {
    /// Check the relationships the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_spacing <= 0.0 || self.min_spacing > self.max_spacing {
            return Err(ConfigError::Invalid(format!(
                "spacing range [{}, {}] must be positive and ordered",
                self.min_spacing, self.max_spacing
            )));
        }
        // A gap this large could leave the camera window without a platform.
        if self.max_spacing >= self.lookahead_margin + self.removal_margin {
            return Err(ConfigError::Invalid(format!(
                "max_spacing {} must be below lookahead + removal margins ({})",
                self.max_spacing,
                self.lookahead_margin + self.removal_margin
            )));
        }
        if self.initial_scroll_speed <= 0.0 || self.initial_scroll_speed > self.max_scroll_speed {
            return Err(ConfigError::Invalid(format!(
                "scroll speeds must satisfy 0 < initial ({}) <= max ({})",
                self.initial_scroll_speed, self.max_scroll_speed
            )));
        }
        if self.scroll_increment < 0.0 {
            return Err(ConfigError::Invalid("scroll_increment must not be negative".into()));
        }
        if self.gravity <= 0.0 || self.terminal_velocity <= 0.0 {
            return Err(ConfigError::Invalid(
                "gravity and terminal_velocity must be positive".into(),
            ));
        }
        if self.max_frame_dt <= 0.0 {
            return Err(ConfigError::Invalid("max_frame_dt must be positive".into()));
        }
        for (name, value) in [
            ("horizontal_range", self.horizontal_range),
            ("horizontal_limit", self.horizontal_limit),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::Invalid(format!("{name} must not be negative")));
            }
        }
        for (name, value) in [
            ("lookahead_margin", self.lookahead_margin),
            ("removal_margin", self.removal_margin),
            ("death_margin", self.death_margin),
            ("player_half_width", self.player_half_width),
            ("player_half_height", self.player_half_height),
            ("platform_half_width", self.platform_half_width),
            ("platform_half_height", self.platform_half_height),
            ("start_platform_half_width", self.start_platform_half_width),
        ] {
            if value <= 0.0 || value.is_nan() {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        for (name, value) in [
            ("ground_friction", self.ground_friction),
            ("air_friction", self.air_friction),
            ("tilt_smoothing", self.tilt_smoothing),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1]")));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning document (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "skyhop_tuning";

    /// Load tuning from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {e}"),
                }
            }
        }

        Self::default()
    }
}
