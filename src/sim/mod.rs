//! Simulation module
//!
//! All gameplay logic lives here. Pure state updates only:
//! - No rendering, DOM or network access
//! - One owned `GameState` per run, passed explicitly through each stage
//! - Seeded RNG per run for platform generation

pub mod camera;
pub mod collision;
pub mod field;
pub mod physics;
pub mod state;
pub mod tick;

pub use camera::{Camera, scroll_speed};
pub use collision::resolve;
pub use field::{FieldChange, initial_field, maintain};
pub use physics::{InputState, integrate};
pub use state::{GameEvent, GamePhase, GameState, Platform, Player};
pub use tick::{score_for_height, tick};
