use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Most entries kept in the local top scores list
pub const MAX_TOP_SCORES: usize = 10;

/// One row of the local leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub date: DateTime<Utc>,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
            date: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("score store lock poisoned")]
    Poisoned,
}

/// Durable storage for the high score and the local top scores list.
///
/// Implementations are shared between the engine and the leaderboard
/// submission task, hence `&self` methods and `Send + Sync`.
pub trait ScoreStore: Send + Sync {
    fn load_high_score(&self) -> Result<u32, StoreError>;

    fn save_high_score(&self, score: u32) -> Result<(), StoreError>;

    /// Entries ordered by descending score, at most `MAX_TOP_SCORES`
    fn load_top_scores(&self) -> Result<Vec<ScoreEntry>, StoreError>;

    fn save_top_scores(&self, scores: &[ScoreEntry]) -> Result<(), StoreError>;

    /// Load, insert `entry`, and save the trimmed list back
    fn append_top_score(&self, entry: ScoreEntry) -> Result<Vec<ScoreEntry>, StoreError> {
        let scores = record_top_score(self.load_top_scores()?, entry);
        self.save_top_scores(&scores)?;
        Ok(scores)
    }
}

/// Insert `entry`, sort by descending score and keep the best `MAX_TOP_SCORES`.
///
/// The sort is stable, so among equal scores earlier entries stay ahead.
pub fn record_top_score(mut scores: Vec<ScoreEntry>, entry: ScoreEntry) -> Vec<ScoreEntry> {
    scores.push(entry);
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(MAX_TOP_SCORES);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(scores: &[u32]) -> Vec<ScoreEntry> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ScoreEntry::new(format!("p{i}"), *s))
            .collect()
    }

    #[test]
    fn test_record_sorts_descending() {
        let scores = record_top_score(entries(&[5, 3]), ScoreEntry::new("new", 4));
        let values: Vec<u32> = scores.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![5, 4, 3]);
    }

    #[test]
    fn test_record_truncates_to_ten() {
        let full = entries(&[20, 19, 18, 17, 16, 15, 14, 13, 12, 11]);

        let scores = record_top_score(full.clone(), ScoreEntry::new("low", 1));
        assert_eq!(scores.len(), MAX_TOP_SCORES);
        assert!(scores.iter().all(|e| e.name != "low"));

        let scores = record_top_score(full, ScoreEntry::new("top", 30));
        assert_eq!(scores.len(), MAX_TOP_SCORES);
        assert_eq!(scores[0].name, "top");
        assert_eq!(scores.last().unwrap().score, 12);
    }

    #[test]
    fn test_record_ties_keep_earlier_first() {
        let scores = record_top_score(entries(&[7]), ScoreEntry::new("later", 7));
        assert_eq!(scores[0].name, "p0");
        assert_eq!(scores[1].name, "later");
    }
}
