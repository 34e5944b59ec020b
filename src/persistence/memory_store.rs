use std::sync::Mutex;

use super::store::{ScoreEntry, ScoreStore, StoreError};

/// In-process store for `--no-persist` runs and tests
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    high_score: u32,
    top_scores: Vec<ScoreEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                high_score,
                top_scores: Vec::new(),
            }),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load_high_score(&self) -> Result<u32, StoreError> {
        Ok(self.inner.lock().map_err(|_| StoreError::Poisoned)?.high_score)
    }

    fn save_high_score(&self, score: u32) -> Result<(), StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)?.high_score = score;
        Ok(())
    }

    fn load_top_scores(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .top_scores
            .clone())
    }

    fn save_top_scores(&self, scores: &[ScoreEntry]) -> Result<(), StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)?.top_scores = scores.to_vec();
        Ok(())
    }
}
