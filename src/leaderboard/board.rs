//! Top-N leaderboard
//!
//! Sorted descending by score and capped. The client keeps one as its local
//! cache, rebuilt on every refresh; the service uses one to rank stored records.

use serde::{Deserialize, Serialize};

use super::record::LeaderboardEntry;
use crate::consts::LEADERBOARD_SIZE;

/// Ranked leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(LEADERBOARD_SIZE)
    }
}

impl Leaderboard {
    /// Create an empty leaderboard holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Rank arbitrary entries. Equal scores keep their input order.
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>, capacity: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    /// A positive score makes the board if there is room or it beats the lowest entry
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0
            && (self.entries.len() < self.capacity
                || self.entries.last().is_some_and(|lowest| score > lowest.score))
    }

    /// Entries a score would rank below: every entry scoring at least as much
    fn slot_for(&self, score: u64) -> usize {
        self.entries.partition_point(|e| e.score >= score)
    }

    /// 1-based rank `score` would take, or `None` if it misses the board
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        self.qualifies(score).then(|| self.slot_for(score) + 1)
    }

    /// Place an entry behind any equal scores, dropping whatever falls off the end.
    /// Returns the 1-based rank taken.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score, 1_000)
    }

    fn full_board() -> Leaderboard {
        let entries = (1..=10).map(|i| entry("p", i * 10)).collect();
        Leaderboard::from_entries(entries, LEADERBOARD_SIZE)
    }

    #[test]
    fn sorts_descending_and_caps() {
        let entries = (0..25).map(|i| entry("p", (i * 37) % 50)).collect();
        let board = Leaderboard::from_entries(entries, 10);
        assert_eq!(board.len(), 10);
        assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_input_order() {
        let board = Leaderboard::from_entries(vec![entry("first", 5), entry("second", 5)], 10);
        assert_eq!(board.entries()[0].name, "first");
        assert_eq!(board.entries()[1].name, "second");
    }

    #[test]
    fn equal_score_ranks_behind_existing() {
        let mut board = Leaderboard::from_entries(vec![entry("old", 50), entry("low", 10)], 10);
        assert_eq!(board.insert(entry("new", 50)), Some(2));
        let names: Vec<_> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["old", "new", "low"]);
    }

    #[test]
    fn zero_never_qualifies() {
        assert!(!Leaderboard::default().qualifies(0));
    }

    #[test]
    fn short_board_accepts_any_positive_score() {
        let board = Leaderboard::from_entries(vec![entry("a", 500)], 10);
        assert!(board.qualifies(1));
        assert_eq!(board.potential_rank(1), Some(2));
        assert_eq!(board.potential_rank(501), Some(1));
    }

    #[test]
    fn full_board_requires_beating_lowest() {
        let board = full_board();
        assert!(!board.qualifies(10));
        assert!(board.qualifies(11));
        assert_eq!(board.potential_rank(11), Some(10));
        assert_eq!(board.potential_rank(1000), Some(1));
    }

    #[test]
    fn insert_keeps_order_and_cap() {
        let mut board = full_board();
        assert_eq!(board.insert(entry("new", 55)), Some(6));
        assert_eq!(board.len(), 10);
        assert_eq!(board.entries().last().map(|e| e.score), Some(20));
        assert_eq!(board.entries()[0].score, 100);
        assert_eq!(board.entries()[5].name, "new");
        assert_eq!(board.insert(entry("low", 5)), None);
    }
}
