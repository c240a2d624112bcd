//! Camera height and difficulty
//!
//! Scroll speed is the height the camera climbs per frame. It is a pure
//! function of elapsed run time, recomputed every frame rather than accumulated.

use serde::{Deserialize, Serialize};

use crate::settings::Tuning;

/// Scroll speed after `elapsed` seconds of run time
#[inline]
pub fn scroll_speed(elapsed: f32, tuning: &Tuning) -> f32 {
    (tuning.initial_scroll_speed + elapsed * tuning.scroll_increment).min(tuning.max_scroll_speed)
}

/// Upward-scrolling camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Height of the camera; drives score and the platform window
    pub height: f32,
    /// Seconds since the run started
    pub elapsed: f32,
}

impl Camera {
    /// Current scroll speed
    pub fn speed(&self, tuning: &Tuning) -> f32 {
        scroll_speed(self.elapsed, tuning)
    }

    /// Climb one frame's worth at the current speed, then advance the clock by `dt`
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        self.height += self.speed(tuning);
        self.elapsed += dt;
    }
}
