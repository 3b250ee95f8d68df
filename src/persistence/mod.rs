//! Round stats and save/continue persistence
//!
//! Features:
//! - `ScoreStore` trait passed explicitly to whoever ends a round
//! - JSON file store with tmp → rename writes
//! - In-memory store for tests and demos
//! - Game state snapshots for Continue

pub mod file;

pub use file::{JsonFileStore, load_snapshot, save_snapshot};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::highscores::HighScores;

/// Stats carried across rounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub last_score: u32,
    pub high_score: u32,
    pub rounds_played: u32,
    pub leaderboard: HighScores,
}

impl GameStats {
    /// Fold a finished round into the stats
    ///
    /// Returns the leaderboard rank if the score made it.
    pub fn record(&mut self, score: u32, seed: u64, timestamp: f64) -> Option<usize> {
        self.last_score = score;
        self.high_score = self.high_score.max(score);
        self.rounds_played = self.rounds_played.saturating_add(1);
        self.leaderboard.add_score(score, seed, timestamp)
    }
}

/// Where round stats live
pub trait ScoreStore {
    /// Current stats; a store with nothing saved yet yields defaults
    fn load(&self) -> Result<GameStats>;
    fn save(&mut self, stats: &GameStats) -> Result<()>;
}

/// Store that keeps stats in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub stats: GameStats,
    pub saves: u32,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<GameStats> {
        Ok(self.stats.clone())
    }

    fn save(&mut self, stats: &GameStats) -> Result<()> {
        self.stats = stats.clone();
        self.saves += 1;
        Ok(())
    }
}
