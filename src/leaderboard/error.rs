//! Leaderboard error taxonomy

use thiserror::Error;

/// Failures talking to or validating against the score store
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Store unreachable or answered with a non-success status
    #[error("leaderboard transport failed: {0}")]
    Transport(String),
    /// Malformed submission payload
    #[error("{0}")]
    Validation(String),
    /// A stored record is not a well-formed entry
    #[error("corrupt record {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LeaderboardError {
    pub fn invalid_data() -> Self {
        Self::Validation("Invalid data".to_string())
    }
}

/// Why a score submission did not go through. The caller may retry.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("a submission is already in progress")]
    InFlight,
    #[error(transparent)]
    Rejected(#[from] LeaderboardError),
}
