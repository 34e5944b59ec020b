//! Local score persistence: the durable high score and the top 10 list

pub mod file_store;
pub mod memory_store;
pub mod store;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use store::{record_top_score, ScoreEntry, ScoreStore, StoreError, MAX_TOP_SCORES};
