//! Round leaderboard
//!
//! The best ten round scores, best first, stored inside `GameStats`.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Targets reached in the round
    pub score: u32,
    /// Seed the round was played with
    pub seed: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a finished round on the board
    ///
    /// Returns the 1-based rank, or `None` for a zero score or one that falls
    /// off the end. An equal score ranks below the entries already there.
    pub fn add_score(&mut self, score: u32, seed: u64, timestamp: f64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let index = self.entries.partition_point(|e| e.score >= score);
        if index >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(
            index,
            HighScoreEntry {
                score,
                seed,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Milliseconds since the Unix epoch
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// How long ago a timestamp was, in the largest whole unit
pub fn format_age(timestamp: f64, now: f64) -> String {
    const UNITS: [(u64, &str); 3] = [(86_400, "day"), (3_600, "hour"), (60, "min")];

    let secs = ((now - timestamp) / 1000.0).max(0.0) as u64;
    for (unit_secs, name) in UNITS {
        match secs / unit_secs {
            0 => continue,
            1 if name == "day" => return "Yesterday".to_string(),
            1 => return format!("1 {} ago", name),
            n => return format!("{} {}s ago", n, name),
        }
    }
    "Just now".to_string()
}
