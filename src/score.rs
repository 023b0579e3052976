use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ScoreError;

const APP_DIR_NAME: &str = "grid-snake";
const SCORE_FILE_NAME: &str = "highscore.json";

/// Persistence for the single high-score value.
pub trait ScoreStore {
    /// Returns the stored high score, `None` when nothing was stored yet.
    fn load(&self) -> Result<Option<u32>, ScoreError>;

    fn save(&mut self, score: u32) -> Result<(), ScoreError>;
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn default_scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// Stores the high score as a bare JSON integer, e.g. `12`.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new(default_scores_path())
    }
}

impl ScoreStore for FileScoreStore {
    /// A missing file is a first run, not an error. An unreadable or
    /// unparsable file is reported so the caller can warn about it.
    fn load(&self) -> Result<Option<u32>, ScoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str::<u32>(raw.trim())?))
    }

    /// Creates parent directories when needed.
    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string(&score)?)?;
        Ok(())
    }
}

/// Keeps the high score in memory only.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct MemoryScoreStore {
    pub value: Option<u32>,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Option<u32>, ScoreError> {
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<(), ScoreError> {
        self.value = Some(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::error::ScoreError;

    use super::{FileScoreStore, MemoryScoreStore, ScoreStore};

    #[test]
    fn saved_score_is_a_plain_integer() {
        let path = unique_test_path("plain");
        let mut store = FileScoreStore::new(path.clone());

        store.save(42).expect("score save should succeed");

        let raw = fs::read_to_string(&path).expect("score file should exist");
        assert_eq!(raw, "42");
        assert_eq!(store.load().expect("load should succeed"), Some(42));
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_score_file_returns_none() {
        let store = FileScoreStore::new(unique_test_path("missing"));
        // Deliberately do not create the file.
        let loaded = store.load().expect("missing file should return Ok(None)");
        assert_eq!(loaded, None);
    }

    #[test]
    fn malformed_score_file_returns_error() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-a-number").expect("test file write should succeed");

        let result = FileScoreStore::new(path.clone()).load();
        assert!(
            matches!(result, Err(ScoreError::Malformed(_))),
            "malformed file should return Err"
        );

        cleanup_test_path(&path);
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        let path = unique_test_path("newline");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "17\n").expect("test file write should succeed");

        assert_eq!(FileScoreStore::new(path.clone()).load().ok(), Some(Some(17)));
        cleanup_test_path(&path);
    }

    #[test]
    fn memory_store_remembers_last_save() {
        let mut store = MemoryScoreStore::default();
        assert_eq!(store.load().ok(), Some(None));

        store.save(9).expect("memory save cannot fail");
        assert_eq!(store.load().ok(), Some(Some(9)));
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-score-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
