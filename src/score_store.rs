use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::StoreError;
use crate::metrics::TestResult;

/// The most recent result, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScore {
    #[serde(flatten)]
    pub result: TestResult,
    pub saved_at: DateTime<Local>,
}

/// Where finished results go. Only the latest result is kept; each save
/// overwrites the previous one.
pub trait ScoreStore {
    fn save_last(&mut self, result: &TestResult) -> Result<(), StoreError>;
    fn load_last(&self) -> Result<Option<SavedScore>, StoreError>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn save_last(&mut self, result: &TestResult) -> Result<(), StoreError> {
        (**self).save_last(result)
    }

    fn load_last(&self) -> Result<Option<SavedScore>, StoreError> {
        (**self).load_last()
    }
}

/// JSON file under the state directory.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::score_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for FileScoreStore {
    fn save_last(&mut self, result: &TestResult) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let saved = SavedScore {
            result: *result,
            saved_at: Local::now(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&saved)?)?;
        Ok(())
    }

    fn load_last(&self) -> Result<Option<SavedScore>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

/// Keeps every handed-off result in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub saved: Vec<TestResult>,
}

impl ScoreStore for MemoryScoreStore {
    fn save_last(&mut self, result: &TestResult) -> Result<(), StoreError> {
        self.saved.push(*result);
        Ok(())
    }

    fn load_last(&self) -> Result<Option<SavedScore>, StoreError> {
        Ok(self.saved.last().map(|result| SavedScore {
            result: *result,
            saved_at: Local::now(),
        }))
    }
}

/// Discards results (`--no-save`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScoreStore;

impl ScoreStore for NullScoreStore {
    fn save_last(&mut self, _result: &TestResult) -> Result<(), StoreError> {
        Ok(())
    }

    fn load_last(&self) -> Result<Option<SavedScore>, StoreError> {
        Ok(None)
    }
}
