//! High score storage
//!
//! [`JsonScoreFile`] keeps the leaderboard in a JSON file. Reads never fail: a
//! missing or malformed file yields an empty board. Writes go to a sibling temp
//! file that is then renamed over the target.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::highscores::{HighScoreEntry, HighScores};

pub trait ScoreStore {
    /// Current leaderboard, best first
    fn load(&self) -> HighScores;
    /// Insert a result, keep the best 10 and persist
    fn save(&mut self, name: &str, score: u64) -> Result<(), PersistError>;
}

#[derive(Debug, Clone)]
pub struct JsonScoreFile {
    path: PathBuf,
}

impl JsonScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "scores".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ScoreStore for JsonScoreFile {
    fn load(&self) -> HighScores {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No score file at '{}', starting fresh", self.path.display());
                return HighScores::new();
            }
            Err(err) => {
                log::warn!("Could not read '{}': {}", self.path.display(), err);
                return HighScores::new();
            }
        };

        match serde_json::from_str::<Vec<HighScoreEntry>>(&json) {
            Ok(entries) => {
                let scores = HighScores::from_entries(entries);
                log::debug!("Loaded {} high scores", scores.len());
                scores
            }
            Err(err) => {
                log::warn!("Malformed score file '{}': {}", self.path.display(), err);
                HighScores::new()
            }
        }
    }

    fn save(&mut self, name: &str, score: u64) -> Result<(), PersistError> {
        let mut scores = self.load();
        let rank = scores.add_score(name, score);

        let json = serde_json::to_string_pretty(&scores)?;
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|err| Self::io_error(&temp, err))?;
        fs::rename(&temp, &self.path).map_err(|err| Self::io_error(&self.path, err))?;

        match rank {
            Some(rank) => log::info!("Saved score {} for '{}' at rank {}", score, name, rank),
            None => log::info!("Score {} for '{}' did not make the top 10", score, name),
        }
        Ok(())
    }
}

/// Volatile store, used when no file should be touched
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: HighScores,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> HighScores {
        self.scores.clone()
    }

    fn save(&mut self, name: &str, score: u64) -> Result<(), PersistError> {
        self.scores.add_score(name, score);
        Ok(())
    }
}
