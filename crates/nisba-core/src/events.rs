use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionType;

/// Every state change of the focus timer produces an Event.
/// The CLI prints them; the app layer reacts to them with sounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionSelected {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran to zero. `next` is already loaded into the timer.
    SessionCompleted {
        session: SessionType,
        next: SessionType,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
    /// The next phase will start by itself after `delay_ms`.
    AutoAdvanceScheduled {
        next: SessionType,
        delay_ms: u64,
        at: DateTime<Utc>,
    },
    /// A pending auto start was superseded by a user action.
    AutoAdvanceCancelled {
        next: SessionType,
        at: DateTime<Utc>,
    },
    /// The pending auto start fired and the countdown is running again.
    AutoAdvanced {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session: SessionType,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        display: String,
        completed_sessions: u32,
        auto_advance: bool,
        auto_advance_pending: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::SessionSelected { at, .. }
            | Event::SessionCompleted { at, .. }
            | Event::AutoAdvanceScheduled { at, .. }
            | Event::AutoAdvanceCancelled { at, .. }
            | Event::AutoAdvanced { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::SessionCompleted {
            session: SessionType::Work,
            next: SessionType::LongBreak,
            completed_sessions: 4,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session_completed");
        assert_eq!(json["session"], "work");
        assert_eq!(json["next"], "longBreak");
    }
}
