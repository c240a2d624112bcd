//! Skyhop - An endless vertical platformer with a shared leaderboard
//!
//! Core modules:
//! - `sim`: Frame simulation (physics, landing, platform field, camera)
//! - `game`: Run lifecycle driven by the frame loop
//! - `leaderboard`: Score records, ranking, storage and submission
//! - `server`: HTTP endpoint for the leaderboard (native only)
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Data-driven gameplay tuning

pub mod game;
pub mod leaderboard;
pub mod platform;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod settings;
pub mod sim;

pub use game::{FrameStatus, Session};
pub use leaderboard::{LeaderboardClient, LeaderboardEntry};
pub use settings::Tuning;

/// Fixed protocol constants. Gameplay knobs live in `Tuning`.
pub mod consts {
    /// Entries kept on the leaderboard
    pub const LEADERBOARD_SIZE: usize = 10;
    /// Longest accepted player name, in characters
    pub const MAX_NAME_LEN: usize = 15;
    /// Name stored when the player leaves it blank
    pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";
    /// Where the browser build reaches the leaderboard
    pub const LEADERBOARD_ENDPOINT: &str = "/scores";
}
