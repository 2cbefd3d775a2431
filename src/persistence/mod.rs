//! Best-score persistence
//!
//! A single non-negative integer under a well-known key. Storage failures
//! never reach gameplay: reads fall back to 0 and failed writes leave the
//! in-memory best untouched.

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key the best score is stored under
pub const BEST_SCORE_KEY: &str = "bunnyRunnerBestScore";

/// Errors raised by a score store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage unavailable")]
    Unavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid stored value: {0:?}")]
    InvalidValue(String),

    #[error("Storage rejected the write: {0}")]
    WriteRejected(String),
}

/// Key/value storage for the best score
pub trait ScoreStore {
    /// Stored best, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<u64>, StoreError>;

    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Parse a stored value the way it was written (decimal integer text)
pub fn parse_score(raw: &str) -> Result<u64, StoreError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| StoreError::InvalidValue(raw.to_string()))
}

/// Read the best score, defaulting to 0 on absence or failure
pub fn load_best_score<S: ScoreStore + ?Sized>(store: &S) -> u64 {
    match store.load() {
        Ok(Some(score)) => {
            log::info!("Loaded best score: {}", score);
            score
        }
        Ok(None) => {
            log::info!("No best score found, starting fresh");
            0
        }
        Err(e) => {
            log::warn!("Could not read best score ({}), using 0", e);
            0
        }
    }
}

/// Write the best score. Returns false (after logging) when the store failed.
pub fn save_best_score<S: ScoreStore + ?Sized>(store: &mut S, score: u64) -> bool {
    match store.save(score) {
        Ok(()) => {
            log::info!("Best score saved: {}", score);
            true
        }
        Err(e) => {
            log::warn!("Could not save best score ({}), keeping it in memory", e);
            false
        }
    }
}

/// In-memory store (tests, and platforms without storage)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self { value: Some(score) }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.value = Some(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<Option<u64>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn save(&mut self, _score: u64) -> Result<(), StoreError> {
            Err(StoreError::WriteRejected("quota exceeded".into()))
        }
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("42").unwrap(), 42);
        assert_eq!(parse_score(" 7\n").unwrap(), 7);
        assert!(matches!(parse_score("-3"), Err(StoreError::InvalidValue(_))));
        assert!(parse_score("abc").is_err());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_best_score(&store), 0);
        assert!(save_best_score(&mut store, 250));
        assert_eq!(load_best_score(&store), 250);
    }

    #[test]
    fn test_failures_degrade_to_defaults() {
        let mut store = BrokenStore;
        assert_eq!(load_best_score(&store), 0);
        assert!(!save_best_score(&mut store, 10));
    }
}
