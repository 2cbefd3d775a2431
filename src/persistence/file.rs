//! File-backed store for native builds

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{BEST_SCORE_KEY, ScoreStore, StoreError, parse_score};

/// Stores the best score as decimal text in `<dir>/bunnyRunnerBestScore`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(BEST_SCORE_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_score(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves a half-written value
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, score.to_string())?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
