//! Leaderboard: records, ranking, storage and the submission protocol
//!
//! - `record`/`board`: the entry type and the ranked top-N
//! - `store`/`service`: server side, one immutable resource per submission
//! - `api`/`client`: game side, async transport plus the cached board

pub mod api;
pub mod board;
pub mod client;
pub mod error;
pub mod record;
pub mod service;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub use api::HttpApi;
pub use api::{LeaderboardApi, LocalApi};
pub use board::Leaderboard;
pub use client::LeaderboardClient;
pub use error::{LeaderboardError, SubmissionError};
pub use record::LeaderboardEntry;
pub use service::ScoreSubmission;
pub use store::{DirStore, MemoryStore, ScoreStore};
