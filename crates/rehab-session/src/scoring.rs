//! Score submission
//!
//! Completed sessions hand their result to a [`ScoreSink`]. The sink reports
//! success or failure so the session can decide whether the result was
//! durably recorded; the session guarantees at most one submission per run.

use chrono::{DateTime, Utc};
use rehab_games::GameType;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// One finished session's result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Identifier of the session that produced this score
    pub session_id: String,
    pub patient_id: String,
    pub game_type: GameType,
    pub score: i64,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(
        session_id: impl Into<String>,
        patient_id: impl Into<String>,
        game_type: GameType,
        score: i64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            patient_id: patient_id.into(),
            game_type,
            score,
            recorded_at: Utc::now(),
        }
    }
}

/// Destination for finished session scores
///
/// Implementations decide persistence (clinic backend, local file, test
/// memory). Returning false tells the session the record was not stored.
pub trait ScoreSink: Send + Sync {
    fn record_score(&self, record: &ScoreRecord) -> bool;
}

/// Sink that drops every record, for runs without a configured backend
pub struct NullSink;

impl ScoreSink for NullSink {
    fn record_score(&self, record: &ScoreRecord) -> bool {
        log::info!(
            "scoring: no sink configured, dropping {} score {} for {}",
            record.game_type,
            record.score,
            record.patient_id
        );
        true
    }
}

/// In-memory sink used by tests and the demo binary
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ScoreRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl ScoreSink for MemorySink {
    fn record_score(&self, record: &ScoreRecord) -> bool {
        match self.records.lock() {
            Ok(mut records) => {
                records.push(record.clone());
                true
            }
            Err(_) => false,
        }
    }
}
