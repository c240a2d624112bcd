//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (wall-clock deltas from `requestAnimationFrame`)
//! - Keyboard mapping onto `InputState`
//! - Wall-clock milliseconds for leaderboard stamps

use crate::sim::InputState;

/// Delta assumed for the very first frame
pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

/// Turns successive frame timestamps into capped deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous timestamp (milliseconds), clamped to `[0, max_dt]`
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => FIRST_FRAME_DT,
        };
        self.last = Some(timestamp_ms);
        dt.clamp(0.0, self.max_dt)
    }

    /// Forget the previous timestamp, e.g. when a new run starts after a pause
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Apply a `KeyboardEvent.key` value; returns false for unmapped keys
pub fn apply_key(input: &mut InputState, key: &str, pressed: bool) -> bool {
    match key {
        "ArrowLeft" | "a" | "A" => input.left = pressed,
        "ArrowRight" | "d" | "D" => input.right = pressed,
        "ArrowUp" | "w" | "W" | " " => input.jump = pressed,
        _ => return false,
    }
    true
}

/// Wall-clock Unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Wall-clock Unix milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
