//! JSON file backed score store
//!
//! Two files live in the data directory:
//! - `high_score.json` - a bare number
//! - `top_scores.json` - array of `{name, score, date}`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::store::{ScoreEntry, ScoreStore, StoreError, MAX_TOP_SCORES};

const HIGH_SCORE_FILE: &str = "high_score.json";
const TOP_SCORES_FILE: &str = "top_scores.json";

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn high_score_path(&self) -> PathBuf {
        self.dir.join(HIGH_SCORE_FILE)
    }

    fn top_scores_path(&self) -> PathBuf {
        self.dir.join(TOP_SCORES_FILE)
    }

    /// Read a file, treating "not found" as absent
    fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write(&self, path: &Path, contents: String) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(path, contents).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ScoreStore for JsonFileStore {
    /// A missing or unreadable number counts as zero
    fn load_high_score(&self) -> Result<u32, StoreError> {
        let path = self.high_score_path();
        let Some(contents) = Self::read_optional(&path)? else {
            return Ok(0);
        };

        match serde_json::from_str::<u32>(contents.trim()) {
            Ok(score) => Ok(score),
            Err(err) => {
                log::warn!("Ignoring malformed high score in {:?}: {}", path, err);
                Ok(0)
            }
        }
    }

    fn save_high_score(&self, score: u32) -> Result<(), StoreError> {
        let path = self.high_score_path();
        let json = serde_json::to_string(&score).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write(&path, json)
    }

    fn load_top_scores(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let path = self.top_scores_path();
        let Some(contents) = Self::read_optional(&path)? else {
            return Ok(Vec::new());
        };

        let mut scores: Vec<ScoreEntry> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(MAX_TOP_SCORES);
        Ok(scores)
    }

    fn save_top_scores(&self, scores: &[ScoreEntry]) -> Result<(), StoreError> {
        let path = self.top_scores_path();
        let json = serde_json::to_string_pretty(scores).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write(&path, json)
    }
}
