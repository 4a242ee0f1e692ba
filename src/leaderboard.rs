//! Leaderboard lists for display
//!
//! Each category keeps its top 10 entries sorted by value. The lists are
//! refreshed from the server on a slow timer; locally banked records are
//! merged in immediately so the player sees their own catch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{Category, ScoreRecord};

/// Maximum number of entries to keep per category
pub const MAX_ENTRIES: usize = 10;

/// Default seconds between leaderboard refreshes
pub const DEFAULT_REFRESH_SECS: f32 = 60.0;

/// Where banked records are POSTed
pub fn submit_url(base: &str) -> String {
    format!("{}/api/leaderboard", base.trim_end_matches('/'))
}

/// Where one category's top entries are fetched from
pub fn board_url(base: &str, category: Category) -> String {
    format!("{}/{}", submit_url(base), category.as_str())
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("malformed leaderboard payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub fish_name: String,
    #[serde(default)]
    pub fish_rarity: String,
    pub value: f32,
    #[serde(default)]
    pub score: u64,
}

impl From<&ScoreRecord> for LeaderboardEntry {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            player_name: record.player_name.clone(),
            fish_name: record.fish_name.clone(),
            fish_rarity: record.fish_rarity.clone(),
            value: record.value,
            score: record.score,
        }
    }
}

/// Top entries for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub category: Category,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
        }
    }

    /// Parse a server payload (a JSON array of entries)
    pub fn from_json(category: Category, json: &str) -> Result<Self, LeaderboardError> {
        let mut entries: Vec<LeaderboardEntry> = serde_json::from_str(json)?;
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        entries.truncate(MAX_ENTRIES);
        Ok(Self { category, entries })
    }

    /// Insert an entry if it makes the board. Returns the rank achieved (1-indexed).
    pub fn add_entry(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if entry.value <= 0.0 {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.value > e.value);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None if self.entries.len() < MAX_ENTRIES => {
                self.entries.push(entry);
                self.entries.len()
            }
            None => return None,
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    /// Merge a locally banked record if it belongs to this board
    pub fn record(&mut self, record: &ScoreRecord) -> Option<usize> {
        if record.category != self.category {
            return None;
        }
        self.add_entry(record.into())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }
}

/// Slow wall-clock timer gating leaderboard refreshes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshTimer {
    pub interval: f32,
    pub elapsed: f32,
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_SECS)
    }
}

impl RefreshTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(1.0),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns true when a refresh is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Make the next tick fire
    pub fn force(&mut self) {
        self.elapsed = self.interval;
    }
}
