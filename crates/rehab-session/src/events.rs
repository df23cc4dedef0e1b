//! Session event bridge
//!
//! The worker thread reports progress over a bounded flume channel. Senders
//! never block; when the receiver lags, events are dropped with a log line
//! rather than stalling the frame loop.

use rehab_games::GameType;

/// Channel depth for session events
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Progress notifications from a running session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Score changed; carries the new total
    ScoreChanged(i64),
    /// Hand visibility flipped
    HandStatus { visible: bool },
    /// Session finished normally with the final score
    Completed { game_type: GameType, score: i64 },
    /// Session was stopped before the timer ran out
    Aborted { game_type: GameType, score: i64 },
}

/// Create the event channel pair for one session
pub fn event_channel() -> (flume::Sender<SessionEvent>, flume::Receiver<SessionEvent>) {
    flume::bounded(EVENT_CHANNEL_CAPACITY)
}

/// Send without blocking, dropping the event when the channel is full
pub fn send_event(tx: &flume::Sender<SessionEvent>, event: SessionEvent) {
    if let Err(e) = tx.try_send(event) {
        log::debug!("events: dropped session event: {}", e);
    }
}
