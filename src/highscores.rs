//! High score leaderboard
//!
//! Persisted as a plain-text table, one `name,score` line per entry, at most
//! ten lines, descending by score. A missing file is not an error: the ledger
//! starts as ten placeholder entries instead.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Ten `("None", 0)` placeholder entries
    pub fn placeholder() -> Self {
        Self {
            entries: (0..MAX_HIGH_SCORES)
                .map(|_| HighScoreEntry {
                    name: "None".to_string(),
                    score: 0,
                })
                .collect(),
        }
    }

    /// Load the ledger; a missing file yields the placeholder table
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("High scores file {path:?} not found, starting fresh");
                return Self::placeholder();
            }
            Err(err) => {
                log::warn!("Could not read {path:?}: {err}; starting fresh");
                return Self::placeholder();
            }
        };

        let entries = text
            .lines()
            .filter_map(|line| {
                // Split from the right so commas inside names survive
                let (name, score) = line.rsplit_once(',')?;
                let score = score.trim().parse().ok()?;
                Some(HighScoreEntry {
                    name: name.to_string(),
                    score,
                })
            })
            .take(MAX_HIGH_SCORES)
            .collect();
        Self { entries }
    }

    /// Write the ledger back as `name,score` lines
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        for entry in &self.entries {
            writeln!(file, "{},{}", entry.name, entry.score)?;
        }
        Ok(())
    }

    /// Append a run's score, re-sort descending, truncate to the top ten.
    /// Ties rank below existing entries (stable sort after append).
    pub fn record(&mut self, name: &str, score: u64) {
        let name = name.replace(['\n', '\r'], " ");
        self.entries.push(HighScoreEntry { name, score });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Current OS user, read from the environment; opaque, never validated
pub fn player_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "None".to_string())
}
