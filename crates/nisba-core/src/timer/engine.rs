//! Pomodoro session controller.
//!
//! The engine is a countdown state machine over three phases. It does not
//! own a thread or a timer: callers feed it elapsed time, either explicitly
//! through [`PomodoroEngine::advance`] or from the wall clock through
//! [`PomodoroEngine::tick`]. The countdown moves in whole seconds; the
//! sub-second remainder is carried so no running time is lost or added.
//!
//! ## Phase cycle
//!
//! ```text
//! work -> shortBreak -> work -> ... -> work (4th) -> longBreak -> work
//! ```
//!
//! With auto-advance on, the next phase starts by itself one second after
//! the previous one completes. Any explicit command issued in between
//! cancels that pending start.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::deferred::DeferredSlot;
use super::session::{format_clock, SessionDurations, SessionType};
use crate::events::Event;

/// Pause between a completed phase and the automatic start of the next.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroEngine {
    durations: SessionDurations,
    session: SessionType,
    remaining_secs: u64,
    running: bool,
    completed_sessions: u32,
    auto_advance: bool,
    /// Milliseconds counted toward the next one-second step.
    #[serde(default)]
    carry_ms: u64,
    /// Wall-clock reference for `tick()` (ms since epoch).
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    #[serde(default)]
    auto_start: DeferredSlot<SessionType>,
}

impl PomodoroEngine {
    /// A stopped engine at the beginning of a work session.
    pub fn new(work_minutes: u32, auto_advance: bool) -> Self {
        let durations = SessionDurations::new(work_minutes);
        Self {
            remaining_secs: durations.secs(SessionType::Work),
            durations,
            session: SessionType::Work,
            running: false,
            completed_sessions: 0,
            auto_advance,
            carry_ms: 0,
            last_tick_epoch_ms: None,
            auto_start: DeferredSlot::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> SessionType {
        self.session
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.durations.secs(self.session)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn durations(&self) -> SessionDurations {
        self.durations
    }

    /// The phase waiting to auto-start, if any.
    pub fn pending_auto_start(&self) -> Option<SessionType> {
        self.auto_start.pending().map(|d| *d.action())
    }

    /// True while the countdown runs or an auto start is pending.
    pub fn is_active(&self) -> bool {
        self.running || self.auto_start.is_pending()
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            session: self.session,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            progress: self.progress(),
            display: format_clock(self.remaining_secs),
            completed_sessions: self.completed_sessions,
            auto_advance: self.auto_advance,
            auto_advance_pending: self.auto_start.is_pending(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. A no-op while already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.auto_start.invalidate();
        self.running = true;
        self.last_tick_epoch_ms = Some(now_ms());
        debug!(session = %self.session, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            session: self.session,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Halt the countdown where it is. Also cancels a pending auto start.
    pub fn pause(&mut self) -> Option<Event> {
        let cancelled = self.auto_start.invalidate();
        if self.running {
            self.running = false;
            self.last_tick_epoch_ms = None;
            debug!(session = %self.session, remaining = self.remaining_secs, "timer paused");
            return Some(Event::TimerPaused {
                session: self.session,
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            });
        }
        self.last_tick_epoch_ms = None;
        cancelled.map(|next| Event::AutoAdvanceCancelled {
            next,
            at: Utc::now(),
        })
    }

    /// Stop and refill the current phase.
    pub fn reset(&mut self) -> Option<Event> {
        self.stop_and_load(self.session);
        Some(Event::TimerReset {
            session: self.session,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Jump to `session`, stopped, with its full duration.
    pub fn select_session(&mut self, session: SessionType) -> Option<Event> {
        self.stop_and_load(session);
        Some(Event::SessionSelected {
            session,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Change the work duration. A stopped timer is refilled with the new
    /// length of its current phase; a running one keeps counting, capped at
    /// the new length.
    pub fn set_work_minutes(&mut self, work_minutes: u32) {
        self.durations = SessionDurations::new(work_minutes);
        let total = self.total_secs();
        if self.running {
            self.remaining_secs = self.remaining_secs.min(total);
        } else {
            self.remaining_secs = total;
            self.carry_ms = 0;
        }
    }

    /// Turning auto-advance off drops a start that is already pending.
    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.auto_advance = enabled;
        if !enabled {
            self.auto_start.invalidate();
        }
    }

    /// Advance by wall-clock time elapsed since the last command or tick.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = now_ms();
        let elapsed = self
            .last_tick_epoch_ms
            .map(|last| now.saturating_sub(last))
            .unwrap_or(0);
        let events = self.advance(Duration::from_millis(elapsed));
        self.last_tick_epoch_ms = if self.is_active() { Some(now) } else { None };
        events
    }

    /// Re-anchor the wall clock read by [`PomodoroEngine::tick`] to now.
    /// Needed after time was fed in through `advance` instead.
    pub fn sync_clock(&mut self) {
        self.last_tick_epoch_ms = self.is_active().then(now_ms);
    }

    /// Let `elapsed` pass. Completes phases and fires pending auto starts
    /// as many times as the elapsed time covers.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Event> {
        let mut budget_ms = elapsed.as_millis().min(u128::from(u64::MAX)) as u64;
        let mut events = Vec::new();

        loop {
            if self.running {
                let available = self.carry_ms.saturating_add(budget_ms);
                let whole_secs = available / 1000;
                if whole_secs < self.remaining_secs {
                    self.remaining_secs -= whole_secs;
                    self.carry_ms = available % 1000;
                    break;
                }
                let used_ms = (self.remaining_secs * 1000).saturating_sub(self.carry_ms);
                budget_ms = budget_ms.saturating_sub(used_ms);
                self.remaining_secs = 0;
                self.carry_ms = 0;
                self.complete(&mut events);
                continue;
            }

            match self.auto_start.advance(budget_ms) {
                Some((next, overshoot)) => {
                    budget_ms = overshoot;
                    self.begin_auto(next, &mut events);
                }
                None => break,
            }
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn stop_and_load(&mut self, session: SessionType) {
        self.auto_start.invalidate();
        self.running = false;
        self.last_tick_epoch_ms = None;
        self.session = session;
        self.remaining_secs = self.durations.secs(session);
        self.carry_ms = 0;
    }

    fn complete(&mut self, events: &mut Vec<Event>) {
        let finished = self.session;
        self.running = false;
        if finished == SessionType::Work {
            self.completed_sessions = self.completed_sessions.saturating_add(1);
        }
        let next = finished.successor(self.completed_sessions);
        self.session = next;
        self.remaining_secs = self.durations.secs(next);
        debug!(%finished, %next, completed = self.completed_sessions, "session completed");

        events.push(Event::SessionCompleted {
            session: finished,
            next,
            completed_sessions: self.completed_sessions,
            at: Utc::now(),
        });

        if self.auto_advance {
            self.auto_start.schedule(AUTO_ADVANCE_DELAY, next);
            events.push(Event::AutoAdvanceScheduled {
                next,
                delay_ms: AUTO_ADVANCE_DELAY.as_millis() as u64,
                at: Utc::now(),
            });
        }
    }

    fn begin_auto(&mut self, next: SessionType, events: &mut Vec<Event>) {
        self.session = next;
        self.remaining_secs = self.durations.secs(next);
        self.carry_ms = 0;
        self.running = true;
        debug!(session = %next, "auto-advanced");
        events.push(Event::AutoAdvanced {
            session: next,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        });
    }
}

impl Default for PomodoroEngine {
    fn default() -> Self {
        Self::new(25, false)
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn run_phase(engine: &mut PomodoroEngine) -> Vec<Event> {
        engine.start();
        let total = engine.remaining_secs();
        engine.advance(secs(total))
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = PomodoroEngine::default();
        assert!(!engine.is_running());

        assert!(engine.start().is_some());
        assert!(engine.is_running());
        assert!(engine.start().is_none(), "second start is a no-op");

        engine.advance(secs(10));
        assert!(engine.pause().is_some());
        assert_eq!(engine.remaining_secs(), 25 * 60 - 10);

        engine.advance(secs(100));
        assert_eq!(engine.remaining_secs(), 25 * 60 - 10, "paused timer holds");

        engine.start();
        engine.advance(secs(5));
        assert_eq!(engine.remaining_secs(), 25 * 60 - 15);
    }

    #[test]
    fn sub_second_time_carries_across_pause() {
        let mut engine = PomodoroEngine::default();
        engine.start();
        engine.advance(Duration::from_millis(600));
        engine.pause();
        engine.start();
        engine.advance(Duration::from_millis(600));
        assert_eq!(engine.remaining_secs(), 25 * 60 - 1);
    }

    #[test]
    fn reset_refills_current_phase() {
        let mut engine = PomodoroEngine::default();
        engine.select_session(SessionType::ShortBreak);
        engine.start();
        engine.advance(secs(30));
        engine.reset();
        assert!(!engine.is_running());
        assert_eq!(engine.session(), SessionType::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn select_session_stops_and_loads() {
        let mut engine = PomodoroEngine::default();
        engine.start();
        engine.select_session(SessionType::LongBreak);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_secs(), 15 * 60);
    }

    #[test]
    fn work_completion_goes_to_short_break_then_long_break() {
        let mut engine = PomodoroEngine::new(25, false);
        let mut nexts = Vec::new();
        for _ in 0..4 {
            let events = run_phase(&mut engine);
            match events.as_slice() {
                [Event::SessionCompleted { next, .. }] => nexts.push(*next),
                other => panic!("unexpected events: {other:?}"),
            }
            if engine.session().is_break() {
                run_phase(&mut engine);
            }
        }
        assert_eq!(
            nexts,
            vec![
                SessionType::ShortBreak,
                SessionType::ShortBreak,
                SessionType::ShortBreak,
                SessionType::LongBreak
            ]
        );
        assert_eq!(engine.completed_sessions(), 4);
    }

    #[test]
    fn completion_without_auto_advance_waits() {
        let mut engine = PomodoroEngine::new(25, false);
        run_phase(&mut engine);
        assert!(!engine.is_running());
        assert_eq!(engine.session(), SessionType::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5 * 60);
        assert!(engine.advance(secs(10)).is_empty());
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn auto_advance_starts_next_phase_after_one_second() {
        let mut engine = PomodoroEngine::new(25, true);
        engine.start();
        let events = engine.advance(secs(25 * 60));
        assert!(matches!(
            events.as_slice(),
            [Event::SessionCompleted { .. }, Event::AutoAdvanceScheduled { delay_ms: 1000, .. }]
        ));
        assert!(!engine.is_running());
        assert_eq!(engine.pending_auto_start(), Some(SessionType::ShortBreak));

        assert!(engine.advance(Duration::from_millis(999)).is_empty());
        let events = engine.advance(Duration::from_millis(1));
        assert!(matches!(events.as_slice(), [Event::AutoAdvanced { .. }]));
        assert!(engine.is_running());
        assert_eq!(engine.session(), SessionType::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn user_action_cancels_pending_auto_advance() {
        let mut engine = PomodoroEngine::new(25, true);
        engine.start();
        engine.advance(secs(25 * 60));
        let event = engine.pause();
        assert!(matches!(event, Some(Event::AutoAdvanceCancelled { .. })));
        assert!(engine.advance(secs(5)).is_empty());
        assert!(!engine.is_running());
        assert_eq!(engine.session(), SessionType::ShortBreak);
    }

    #[test]
    fn reset_cancels_pending_auto_advance() {
        let mut engine = PomodoroEngine::new(25, true);
        engine.start();
        engine.advance(secs(25 * 60));
        engine.reset();
        assert_eq!(engine.pending_auto_start(), None);
        assert!(engine.advance(secs(5)).is_empty());
    }

    #[test]
    fn overshoot_flows_into_the_next_phase() {
        let mut engine = PomodoroEngine::new(25, true);
        engine.start();
        // work (1500 s) + delay (1 s) + 60 s into the short break
        engine.advance(secs(25 * 60 + 1 + 60));
        assert!(engine.is_running());
        assert_eq!(engine.session(), SessionType::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5 * 60 - 60);
    }

    #[test]
    fn changing_work_minutes_refills_stopped_timer() {
        let mut engine = PomodoroEngine::default();
        engine.set_work_minutes(50);
        assert_eq!(engine.remaining_secs(), 50 * 60);
        engine.select_session(SessionType::ShortBreak);
        assert_eq!(engine.remaining_secs(), 10 * 60);
    }

    #[test]
    fn engine_roundtrips_through_json() {
        let mut engine = PomodoroEngine::new(30, true);
        engine.start();
        engine.advance(secs(42));
        let json = serde_json::to_string(&engine).unwrap();
        let restored: PomodoroEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.remaining_secs(), 30 * 60 - 42);
        assert!(restored.is_running());
        assert!(restored.auto_advance());
    }

    #[test]
    fn snapshot_reports_display_clock() {
        let engine = PomodoroEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                display,
                remaining_secs,
                running,
                ..
            } => {
                assert_eq!(display, "25:00");
                assert_eq!(remaining_secs, 1500);
                assert!(!running);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn sync_clock_drops_reference_when_idle() {
        let mut engine = PomodoroEngine::new(5, false);
        engine.start();
        engine.advance(secs(5 * 60));
        engine.sync_clock();
        assert!(engine.last_tick_epoch_ms.is_none());
        assert!(engine.tick().is_empty());

        engine.start();
        engine.sync_clock();
        assert!(engine.last_tick_epoch_ms.is_some());
    }
}
