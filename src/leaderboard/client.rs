//! Game-side leaderboard client
//!
//! Owns a cached top-N board and guards against double submission. Shared
//! behind `Rc` between the frame driver and spawned futures, so all state uses
//! interior mutability.

use std::cell::{Cell, Ref, RefCell};

use super::api::LeaderboardApi;
use super::board::Leaderboard;
use super::error::{LeaderboardError, SubmissionError};
use super::record::LeaderboardEntry;
use super::service::ScoreSubmission;
use crate::consts::LEADERBOARD_SIZE;

/// Clears the in-flight flag however the submission ends
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct LeaderboardClient<A> {
    api: A,
    cache: RefCell<Leaderboard>,
    submitting: Cell<bool>,
}

impl<A: LeaderboardApi> LeaderboardClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: RefCell::new(Leaderboard::default()),
            submitting: Cell::new(false),
        }
    }

    /// Fetch and rank the current scores, rebuilding the cache.
    ///
    /// Failures are logged and yield an empty board; the game keeps going.
    pub async fn fetch_top(&self, n: usize) -> Vec<LeaderboardEntry> {
        match self.api.fetch_scores().await {
            Ok(entries) => {
                let board = Leaderboard::from_entries(entries, LEADERBOARD_SIZE);
                log::debug!("Leaderboard refreshed: {} entries", board.len());
                let top = board.entries().iter().take(n).cloned().collect();
                *self.cache.borrow_mut() = board;
                top
            }
            Err(e) => {
                log::warn!("Failed to fetch leaderboard: {e}");
                *self.cache.borrow_mut() = Leaderboard::default();
                Vec::new()
            }
        }
    }

    pub async fn refresh(&self) {
        self.fetch_top(LEADERBOARD_SIZE).await;
    }

    /// Refresh, then report the rank `score` would take (1-based), if any
    pub async fn check_qualifies(&self, score: u64) -> Option<usize> {
        self.refresh().await;
        self.cache.borrow().potential_rank(score)
    }

    /// Submit a finished run. Only one submission may be in flight at a time.
    pub async fn submit(&self, name: &str, score: u64) -> Result<LeaderboardEntry, SubmissionError> {
        if self.submitting.replace(true) {
            return Err(SubmissionError::InFlight);
        }
        let _guard = InFlight(&self.submitting);

        if score == 0 {
            return Err(LeaderboardError::Validation("score must be positive".into()).into());
        }

        let submission = ScoreSubmission::new(name, score);
        let entry = self.api.post_score(&submission).await.inspect_err(|e| {
            log::warn!("Score submission failed: {e}");
        })?;

        log::info!("Submitted score {} as {:?}", entry.score, entry.name);
        self.cache.borrow_mut().insert(entry.clone());
        Ok(entry)
    }

    /// The board as of the last refresh or submission
    pub fn cached(&self) -> Ref<'_, Leaderboard> {
        self.cache.borrow()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }
}
