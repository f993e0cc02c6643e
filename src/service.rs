//! Score submission service
//!
//! The two calls the game makes to its backend:
//! `addScore(name, score) -> leaderboard` and `getHighScores() -> leaderboard`.

use std::path::PathBuf;

use crate::highscores::{HighScores, ScoreEntry};
use crate::persistence::{self, PersistenceError};

/// Score service failures
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    /// Blank names are rejected before any call is made
    #[error("player name is empty")]
    EmptyName,

    #[error("storage error: {0}")]
    Storage(#[from] PersistenceError),

    /// The backend refused the call
    #[error("score service rejected the request: {0}")]
    Rejected(String),
}

/// Leaderboard backend
pub trait ScoreService {
    /// Append a score and return the resulting leaderboard, best first
    fn add_score(&mut self, name: &str, score: u64) -> Result<Vec<ScoreEntry>, ScoreError>;

    /// Current leaderboard, best first
    fn get_high_scores(&self) -> Result<Vec<ScoreEntry>, ScoreError>;
}

impl<S: ScoreService + ?Sized> ScoreService for Box<S> {
    fn add_score(&mut self, name: &str, score: u64) -> Result<Vec<ScoreEntry>, ScoreError> {
        (**self).add_score(name, score)
    }

    fn get_high_scores(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        (**self).get_high_scores()
    }
}

/// Trim a submitted name, rejecting blanks
pub fn validate_name(name: &str) -> Result<&str, ScoreError> {
    let name = name.trim();
    if name.is_empty() {
        Err(ScoreError::EmptyName)
    } else {
        Ok(name)
    }
}

/// In-process leaderboard, optionally mirrored to a JSON file
#[derive(Debug, Default)]
pub struct LocalScoreService {
    board: HighScores,
    path: Option<PathBuf>,
}

impl LocalScoreService {
    /// Volatile leaderboard
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Leaderboard backed by `path`; a missing file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScoreError> {
        let path = path.into();
        let mut board: HighScores = persistence::load(&path)?.unwrap_or_default();
        board.normalize();
        log::info!(
            "Leaderboard {} opened ({} entries)",
            path.display(),
            board.entries.len()
        );
        Ok(Self {
            board,
            path: Some(path),
        })
    }

    /// Start from an existing board (e.g. one loaded from LocalStorage)
    pub fn with_board(mut board: HighScores) -> Self {
        board.normalize();
        Self { board, path: None }
    }

    pub fn board(&self) -> &HighScores {
        &self.board
    }
}

impl ScoreService for LocalScoreService {
    fn add_score(&mut self, name: &str, score: u64) -> Result<Vec<ScoreEntry>, ScoreError> {
        let name = validate_name(name)?;
        let mut updated = self.board.clone();
        let rank = updated.add_score(name, score);

        if let Some(path) = &self.path {
            persistence::save(path, &updated)?;
        }
        self.board = updated;

        match rank {
            Some(rank) => log::info!("{name} placed #{rank} with {score}"),
            None => log::info!("{name} scored {score}, below the leaderboard"),
        }
        Ok(self.board.entries.clone())
    }

    fn get_high_scores(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.board.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_then_read() {
        let mut service = LocalScoreService::in_memory();
        service.add_score("Ann", 300).unwrap();
        let scores = service.get_high_scores().unwrap();
        assert!(scores.contains(&ScoreEntry::new("Ann", 300)));
    }

    #[test]
    fn test_add_returns_leaderboard() {
        let mut service = LocalScoreService::in_memory();
        service.add_score("Ann", 300).unwrap();
        let board = service.add_score("Bob", 900).unwrap();
        assert_eq!(board[0], ScoreEntry::new("Bob", 900));
        assert_eq!(board[1], ScoreEntry::new("Ann", 300));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut service = LocalScoreService::in_memory();
        assert!(matches!(
            service.add_score("   ", 300),
            Err(ScoreError::EmptyName)
        ));
        assert!(service.get_high_scores().unwrap().is_empty());
    }

    #[test]
    fn test_names_are_trimmed() {
        assert_eq!(validate_name("  Ann \n").unwrap(), "Ann");
    }

    #[test]
    fn test_file_backed_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        {
            let mut service = LocalScoreService::open(&path).unwrap();
            service.add_score("Ann", 300).unwrap();
            service.add_score("Bob", 100).unwrap();
        }
        let service = LocalScoreService::open(&path).unwrap();
        let pairs = service.board().as_pairs();
        assert_eq!(
            pairs,
            vec![("Ann".to_string(), 300), ("Bob".to_string(), 100)]
        );
    }

    #[test]
    fn test_boxed_service() {
        let mut service: Box<dyn ScoreService> = Box::new(LocalScoreService::in_memory());
        service.add_score("Ann", 1).unwrap();
        assert_eq!(service.get_high_scores().unwrap().len(), 1);
    }
}
