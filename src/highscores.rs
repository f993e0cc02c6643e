//! High score leaderboard
//!
//! Sorted best-first, ties keep submission order, top 10 kept.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl From<ScoreEntry> for (String, u64) {
    fn from(entry: ScoreEntry) -> Self {
        (entry.name, entry.score)
    }
}

impl From<(String, u64)> for ScoreEntry {
    fn from((name, score): (String, u64)) -> Self {
        Self { name, score }
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "road_dodger_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Append a score and re-rank.
    /// Returns the rank achieved (1-indexed) or None if it fell off the board
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(rank - 1, ScoreEntry::new(name, score));
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Re-sort and trim entries from an untrusted source
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Wire form: `(name, score)` pairs, best first
    pub fn as_pairs(&self) -> Vec<(String, u64)> {
        self.entries.iter().cloned().map(Into::into).collect()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(mut scores) = serde_json::from_str::<HighScores>(&json) {
                    scores.normalize();
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> bool {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_ok() {
                    log::info!("High scores saved ({} entries)", self.entries.len());
                    return true;
                }
            }
        }
        log::warn!("High scores could not be saved");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_rank() {
        let mut board = HighScores::new();
        assert_eq!(board.add_score("Ann", 300), Some(1));
        assert_eq!(board.add_score("Bob", 500), Some(1));
        assert_eq!(board.add_score("Cid", 400), Some(2));
        assert_eq!(
            board.as_pairs(),
            vec![
                ("Bob".to_string(), 500),
                ("Cid".to_string(), 400),
                ("Ann".to_string(), 300)
            ]
        );
        assert_eq!(board.top_score(), Some(500));
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut board = HighScores::new();
        board.add_score("First", 100);
        assert_eq!(board.add_score("Second", 100), Some(2));
        assert_eq!(board.entries[0].name, "First");
        assert_eq!(board.entries[1].name, "Second");
    }

    #[test]
    fn test_zero_score_is_recorded() {
        let mut board = HighScores::new();
        assert_eq!(board.add_score("Ann", 0), Some(1));
        assert!(!board.is_empty());
    }

    #[test]
    fn test_truncates_to_max() {
        let mut board = HighScores::new();
        for i in 0..MAX_HIGH_SCORES as u64 {
            board.add_score(&format!("p{i}"), (i + 1) * 100);
        }
        assert!(!board.qualifies(100));
        assert_eq!(board.add_score("late", 50), None);
        assert_eq!(board.potential_rank(550), Some(6));
        assert_eq!(board.add_score("mid", 550), Some(6));
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_normalize() {
        let mut board = HighScores {
            entries: vec![ScoreEntry::new("a", 1), ScoreEntry::new("b", 9)],
        };
        board.normalize();
        assert_eq!(board.entries[0].name, "b");
    }
}
