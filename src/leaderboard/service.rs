//! Leaderboard protocol over a `ScoreStore`
//!
//! This is what the HTTP endpoint runs: rank every stored record, and turn an
//! untrusted submission into a new, uniquely named record.

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::board::Leaderboard;
use super::error::LeaderboardError;
use super::record::{LeaderboardEntry, sanitize_name};
use super::store::ScoreStore;

/// Directory holding one resource per entry
pub const SCORES_DIR: &str = "scores";

/// Random characters appended to resource names
const SUFFIX_LEN: usize = 8;

/// A validated score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u64,
}

impl ScoreSubmission {
    pub fn new(name: &str, score: u64) -> Self {
        Self {
            name: sanitize_name(name),
            score,
        }
    }
}

/// Validate a raw JSON body: `name` must be a string, `score` a non-negative number
///
/// Fractional scores are floored.
pub fn parse_submission(body: &[u8]) -> Result<ScoreSubmission, LeaderboardError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| LeaderboardError::invalid_data())?;

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(LeaderboardError::invalid_data)?;

    let score = value.get("score").ok_or_else(LeaderboardError::invalid_data)?;
    let score = match score.as_u64() {
        Some(score) => score,
        None => match score.as_f64() {
            Some(score) if score.is_finite() && score >= 0.0 => score.floor() as u64,
            _ => return Err(LeaderboardError::invalid_data()),
        },
    };

    Ok(ScoreSubmission::new(name, score))
}

/// Decode one stored resource
pub fn decode_entry(resource: &str, raw: &str) -> Result<LeaderboardEntry, LeaderboardError> {
    serde_json::from_str(raw).map_err(|source| LeaderboardError::Decode {
        resource: resource.to_string(),
        source,
    })
}

/// Every stored entry ranked, top `limit` returned.
///
/// Records that cannot be read or decoded are skipped; only a failed listing
/// is an error.
pub fn list_scores<S: ScoreStore + ?Sized>(
    store: &S,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    let resources = store.list(SCORES_DIR)?;

    let mut entries = Vec::with_capacity(resources.len());
    for resource in resources.iter().filter(|r| r.ends_with(".json")) {
        let raw = match store.read(resource) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping unreadable record: {e}");
                continue;
            }
        };
        match decode_entry(resource, &raw) {
            Ok(entry) => entries.push(entry),
            Err(e) => log::warn!("Skipping {e}"),
        }
    }

    log::debug!("Ranked {} stored scores", entries.len());
    Ok(Leaderboard::from_entries(entries, limit).into_entries())
}

/// Resource path for a submission made at `now_ms`
pub fn resource_path(now_ms: u64, suffix: &str) -> String {
    format!("{SCORES_DIR}/score_{now_ms}_{suffix}.json")
}

/// Persist a submission as a brand-new record and return it
pub fn submit_score<S: ScoreStore + ?Sized, R: Rng>(
    store: &S,
    submission: &ScoreSubmission,
    now_ms: u64,
    rng: &mut R,
) -> Result<LeaderboardEntry, LeaderboardError> {
    let entry = LeaderboardEntry::new(&submission.name, submission.score, now_ms);
    let json = serde_json::to_string_pretty(&entry)
        .map_err(|e| LeaderboardError::Transport(format!("failed to encode entry: {e}")))?;

    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();
    let path = resource_path(now_ms, &suffix);
    store.create(&path, &json)?;

    log::info!("Stored score {} for {:?} at {}", entry.score, entry.name, path);
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::store::MemoryStore;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn parses_valid_body() {
        let s = parse_submission(br#"{"name":"Ann","score":120}"#).unwrap();
        assert_eq!(s, ScoreSubmission::new("Ann", 120));
    }

    #[test]
    fn floors_fractional_score() {
        let s = parse_submission(br#"{"name":"Ann","score":12.9}"#).unwrap();
        assert_eq!(s.score, 12);
    }

    #[test]
    fn empty_name_is_allowed_and_defaulted() {
        let s = parse_submission(br#"{"name":"","score":50}"#).unwrap();
        assert_eq!(s.name, crate::consts::DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn rejects_invalid_bodies() {
        for body in [
            &br#"{"score":10}"#[..],
            br#"{"name":"a"}"#,
            br#"{"name":"a","score":"10"}"#,
            br#"{"name":"a","score":-1}"#,
            br#"{"name":7,"score":1}"#,
            b"not json",
            b"",
        ] {
            assert!(
                matches!(parse_submission(body), Err(LeaderboardError::Validation(_))),
                "accepted {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn empty_store_lists_nothing() {
        assert!(list_scores(&MemoryStore::new(), 10).unwrap().is_empty());
    }

    #[test]
    fn submissions_become_distinct_resources() {
        let store = MemoryStore::new();
        let mut rng = Pcg32::seed_from_u64(9);
        let a = submit_score(&store, &ScoreSubmission::new("a", 10), 1_000, &mut rng).unwrap();
        let b = submit_score(&store, &ScoreSubmission::new("b", 20), 1_000, &mut rng).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(store.len(), 2);

        let top = list_scores(&store, 10).unwrap();
        assert_eq!(top.iter().map(|e| e.score).collect::<Vec<_>>(), vec![20, 10]);
    }

    #[test]
    fn corrupt_records_are_skipped() {
        let store = MemoryStore::new();
        let mut rng = Pcg32::seed_from_u64(1);
        submit_score(&store, &ScoreSubmission::new("ok", 5), 1_000, &mut rng).unwrap();
        store.create("scores/broken.json", "{ nope").unwrap();
        store.create("scores/negative.json", r#"{"name":"x","score":-3,"date":"","id":1}"#).unwrap();
        store.create("scores/readme.txt", "not a record").unwrap();

        let top = list_scores(&store, 10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "ok");
    }

    #[test]
    fn unreadable_records_are_skipped() {
        use crate::leaderboard::store::DirStore;

        let dir = std::env::temp_dir().join(format!("skyhop-service-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let store = DirStore::new(&dir);
        let mut rng = Pcg32::seed_from_u64(4);
        submit_score(&store, &ScoreSubmission::new("ok", 30), 1_000, &mut rng).unwrap();
        std::fs::write(dir.join("scores/score_2000_bad.json"), [0xff, 0xfe, 0x00]).unwrap();

        let top = list_scores(&store, 10).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "ok");
    }

    #[test]
    fn list_caps_at_limit() {
        let store = MemoryStore::new();
        let mut rng = Pcg32::seed_from_u64(2);
        for i in 0..15u64 {
            submit_score(&store, &ScoreSubmission::new("p", i), 1_000 + i, &mut rng).unwrap();
        }
        let top = list_scores(&store, 10).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 14);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn stored_record_shape() {
        let store = MemoryStore::new();
        let mut rng = Pcg32::seed_from_u64(3);
        submit_score(&store, &ScoreSubmission::new("Ann", 7), 1_700_000_000_000, &mut rng).unwrap();
        let path = store.list(SCORES_DIR).unwrap().remove(0);
        assert!(path.starts_with("scores/score_1700000000000_"));
        let value: Value = serde_json::from_str(&store.read(&path).unwrap()).unwrap();
        assert_eq!(value["name"], "Ann");
        assert_eq!(value["score"], 7);
        assert_eq!(value["date"], "2023-11-14T22:13:20.000Z");
        assert_eq!(value["id"], 1_700_000_000_000u64);
    }
}
