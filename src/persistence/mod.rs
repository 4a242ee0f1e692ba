//! Score records and the fire-and-forget submission seam
//!
//! The simulation appends `ScoreRecord`s to `SessionState::outbox` when a catch
//! is banked. The host drains that queue through a `ScoreSink`. Submission
//! failures are logged and dropped; gameplay never waits on them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Leaderboard a record is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Heaviest single fish
    BiggestCatch,
    /// Fish landed early in a session
    SessionCatches,
    /// Legendary and ultra rare catches
    LegendaryCatches,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::BiggestCatch,
        Category::SessionCatches,
        Category::LegendaryCatches,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BiggestCatch => "biggest_catch",
            Category::SessionCatches => "session_catches",
            Category::LegendaryCatches => "legendary_catches",
        }
    }
}

/// One leaderboard submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_name: String,
    pub fish_name: String,
    pub fish_rarity: String,
    /// Weight in lbs, or a catch count for `SessionCatches`
    pub value: f32,
    pub score: u64,
    pub category: Category,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to encode score record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Destination for score records
pub trait ScoreSink {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), SubmitError>;
}

/// Collects encoded records in memory
#[derive(Debug, Default)]
pub struct Outbox {
    pub sent: Vec<String>,
}

impl ScoreSink for Outbox {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), SubmitError> {
        self.sent.push(encode(record)?);
        Ok(())
    }
}

/// Writes records to the log (native host)
#[derive(Debug, Default)]
pub struct LogSink;

impl ScoreSink for LogSink {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), SubmitError> {
        log::info!("score [{}] {}", record.category.as_str(), encode(record)?);
        Ok(())
    }
}

/// JSON body for a record
pub fn encode(record: &ScoreRecord) -> Result<String, SubmitError> {
    Ok(serde_json::to_string(record)?)
}

/// Drain `queue` into `sink`. Returns how many records were accepted.
pub fn submit_all(queue: &mut Vec<ScoreRecord>, sink: &mut dyn ScoreSink) -> usize {
    let mut accepted = 0;
    for record in queue.drain(..) {
        match sink.submit(&record) {
            Ok(()) => accepted += 1,
            Err(e) => log::warn!(
                "Dropped {} record for {}: {}",
                record.category.as_str(),
                record.player_name,
                e
            ),
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category) -> ScoreRecord {
        ScoreRecord {
            player_name: "Skipper".to_string(),
            fish_name: "Bluegill".to_string(),
            fish_rarity: "Common".to_string(),
            value: 2.5,
            score: 120,
            category,
        }
    }

    struct Refusing;

    impl ScoreSink for Refusing {
        fn submit(&mut self, _record: &ScoreRecord) -> Result<(), SubmitError> {
            Err(SubmitError::Transport("offline".to_string()))
        }
    }

    #[test]
    fn test_encode_uses_camel_case() {
        let json = encode(&record(Category::BiggestCatch)).unwrap();
        assert!(json.contains("\"playerName\":\"Skipper\""));
        assert!(json.contains("\"fishRarity\":\"Common\""));
        assert!(json.contains("\"category\":\"biggest_catch\""));
    }

    #[test]
    fn test_submit_all_drains_queue() {
        let mut queue = vec![record(Category::BiggestCatch), record(Category::SessionCatches)];
        let mut outbox = Outbox::default();
        assert_eq!(submit_all(&mut queue, &mut outbox), 2);
        assert!(queue.is_empty());
        assert_eq!(outbox.sent.len(), 2);
    }

    #[test]
    fn test_submit_failures_are_swallowed() {
        let mut queue = vec![record(Category::LegendaryCatches)];
        assert_eq!(submit_all(&mut queue, &mut Refusing), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_record_roundtrips_through_json() {
        let original = record(Category::SessionCatches);
        let json = encode(&original).unwrap();
        let parsed: ScoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
